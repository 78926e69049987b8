//! Wavelet filter bank module
//! Built-in orthogonal families (Haar, Daubechies, Symlets, Coiflets) plus
//! custom four-filter banks for the convolution and boundary transforms.

#![allow(clippy::excessive_precision)]

use crate::error::WaveletError;
use crate::num::Sample;

// Scaling filters in reconstruction low-pass order, normalized so each sums
// to sqrt(2). The remaining three filters of each bank follow from the
// quadrature-mirror relations in `quad_mirror_bank`.
const HAAR: &[f64] = &[core::f64::consts::FRAC_1_SQRT_2, core::f64::consts::FRAC_1_SQRT_2];
const DB2: &[f64] = &[
    0.48296291314453416,
    0.8365163037378079,
    0.2241438680420134,
    -0.1294095225512604,
];
const DB3: &[f64] = &[
    0.3326705529500826,
    0.8068915093110925,
    0.4598775021184916,
    -0.13501102001025458,
    -0.08544127388202666,
    0.03522629188570953,
];
const DB4: &[f64] = &[
    0.2303778133088966,
    0.7148465705529158,
    0.6308807679298588,
    -0.027983769416859948,
    -0.18703481171909303,
    0.030841381835560778,
    0.03288301166688518,
    -0.01059740178506903,
];
const DB5: &[f64] = &[
    0.16010239797419287,
    0.6038292697971896,
    0.7243085284377729,
    0.13842814590132085,
    -0.24229488706638203,
    -0.03224486958463841,
    0.07757149384004572,
    -0.006241490212798268,
    -0.012580751999081999,
    0.0033357252854737712,
];
const DB6: &[f64] = &[
    0.11154074335010983,
    0.494623890398454,
    0.7511339080210953,
    0.31525035170919613,
    -0.22626469396544016,
    -0.1297668675672612,
    0.09750160558732306,
    0.02752286553030549,
    -0.031582039317485974,
    0.0005538422011615253,
    0.004777257510945495,
    -0.0010773010853084774,
];
const DB7: &[f64] = &[
    0.07785205408500641,
    0.3965393194819092,
    0.7291320908462326,
    0.46978228740520456,
    -0.1439060039285569,
    -0.2240361849938801,
    0.07130921926682676,
    0.08061260915108555,
    -0.03802993693501368,
    -0.01657454163066769,
    0.012550998556099847,
    0.00042957797292148616,
    -0.0018016407040475154,
    0.00035371379997451964,
];
const DB8: &[f64] = &[
    0.054415842243101885,
    0.31287159091429434,
    0.6756307362972876,
    0.5853546836542128,
    -0.01582910525634304,
    -0.2840155429615471,
    0.00047248457391048355,
    0.12874742662047767,
    -0.017369301001806246,
    -0.044088253930794186,
    0.01398102791739763,
    0.008746094047405634,
    -0.004870352993451343,
    -0.0003917403733769592,
    0.0006754494064505334,
    -0.00011747678412476081,
];
const SYM4: &[f64] = &[
    0.032223100604051244,
    -0.012603967262030972,
    -0.0992195435766336,
    0.2978577956053044,
    0.8037387518051318,
    0.49761866763277646,
    -0.02963552764600196,
    -0.07576571478950232,
];
const SYM5: &[f64] = &[
    0.019538882735249834,
    -0.02110183402468892,
    -0.17532808990805596,
    0.016602105764509417,
    0.6339789634567903,
    0.7234076904040421,
    0.19939753397685706,
    -0.03913424930231396,
    0.029519490925706264,
    0.02733306834499894,
];
const SYM6: &[f64] = &[
    -0.007800708325033739,
    0.001767711864255951,
    0.04472490177078456,
    -0.021060292512380303,
    -0.07263752278637055,
    0.3379294217282039,
    0.7876411410286575,
    0.4910559419279372,
    -0.04831174258571547,
    -0.11799011114851349,
    0.00349071208422526,
    0.015404109327044242,
];
const SYM7: &[f64] = &[
    0.010268176708465268,
    0.004010244871522338,
    -0.10780823770329019,
    -0.14004724044293645,
    0.2886296317506393,
    0.7677643170048798,
    0.536101917090577,
    0.017441255086840503,
    -0.04955283493704317,
    0.06789269350122178,
    0.03051551316587898,
    -0.01263630340324076,
    -0.0010473848886797224,
    0.0026818145682602633,
];
const SYM8: &[f64] = &[
    0.0018899503327773194,
    -0.0003029205147363451,
    -0.014952258337101046,
    0.003808752013972022,
    0.04913717967376506,
    -0.02721902991732753,
    -0.051945838107656295,
    0.3644418948370398,
    0.7771857516997509,
    0.48135965125820107,
    -0.06127335906828384,
    -0.14329423835109714,
    0.007607487325114397,
    0.0316950878114998,
    -0.0005421323318189728,
    -0.0033824159510041844,
];
const COIF1: &[f64] = &[
    -0.0727326195128539,
    0.3378976624578092,
    0.8525720202122554,
    0.38486484686420286,
    -0.0727326195128539,
    -0.01565572813546454,
];
const COIF2: &[f64] = &[
    0.016387336463522112,
    -0.04146493678175915,
    -0.06737255472196302,
    0.3861100668211622,
    0.8127236354455423,
    0.41700518442169254,
    -0.0764885990783064,
    -0.0594344186464569,
    0.023680171946334084,
    0.0056114348193944995,
    -0.0018232088707029932,
    -0.0007205494453645122,
];

fn scaling_filter(name: &str) -> Option<&'static [f64]> {
    match name {
        "haar" | "db1" | "sym1" => Some(HAAR),
        "db2" | "sym2" => Some(DB2),
        "db3" | "sym3" => Some(DB3),
        "db4" => Some(DB4),
        "db5" => Some(DB5),
        "db6" => Some(DB6),
        "db7" => Some(DB7),
        "db8" => Some(DB8),
        "sym4" => Some(SYM4),
        "sym5" => Some(SYM5),
        "sym6" => Some(SYM6),
        "sym7" => Some(SYM7),
        "sym8" => Some(SYM8),
        "coif1" => Some(COIF1),
        "coif2" => Some(COIF2),
        _ => None,
    }
}

/// Anything that can hand out the four filters of a two-channel bank.
///
/// [`Wavelet`] implements this, and callers with externally derived filters
/// (learned banks, filters loaded from another toolkit) can implement it to
/// feed the transforms without going through [`Wavelet::from_filters`].
pub trait FilterBank<T: Sample> {
    /// The four filters in decomposition low, decomposition high,
    /// reconstruction low, reconstruction high order.
    fn filter_bank(&self) -> (&[T], &[T], &[T], &[T]);
}

/// A two-channel wavelet filter bank.
///
/// Holds the decomposition and reconstruction filter pairs used by every
/// transform in the crate. Built-in banks are orthogonal; custom banks only
/// need matching filter lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavelet<T> {
    name: String,
    dec_lo: Vec<T>,
    dec_hi: Vec<T>,
    rec_lo: Vec<T>,
    rec_hi: Vec<T>,
}

// Quadrature-mirror construction from a scaling filter `h` given in
// reconstruction order: dec_lo is h reversed, the high-pass pair alternates
// signs so that analysis followed by synthesis telescopes to the identity.
fn quad_mirror_bank<T: Sample>(h: &[f64]) -> (Vec<T>, Vec<T>, Vec<T>, Vec<T>) {
    let n = h.len();
    let rec_lo: Vec<T> = h.iter().map(|&x| T::from_f64(x)).collect();
    let dec_lo: Vec<T> = h.iter().rev().map(|&x| T::from_f64(x)).collect();
    let dec_hi: Vec<T> = h
        .iter()
        .enumerate()
        .map(|(k, &x)| T::from_f64(if k % 2 == 0 { -x } else { x }))
        .collect();
    let rec_hi: Vec<T> = (0..n)
        .map(|k| T::from_f64(if k % 2 == 0 { h[n - 1 - k] } else { -h[n - 1 - k] }))
        .collect();
    (dec_lo, dec_hi, rec_lo, rec_hi)
}

impl<T: Sample> Wavelet<T> {
    /// Look up a built-in wavelet by name, e.g. `"haar"`, `"db4"`, `"sym8"`,
    /// `"coif2"`. Names are matched case-insensitively.
    pub fn parse(name: &str) -> Result<Self, WaveletError> {
        let canonical = name.to_ascii_lowercase();
        let h = scaling_filter(&canonical)
            .ok_or_else(|| WaveletError::UnknownWavelet(name.to_string()))?;
        let (dec_lo, dec_hi, rec_lo, rec_hi) = quad_mirror_bank(h);
        Ok(Self { name: canonical, dec_lo, dec_hi, rec_lo, rec_hi })
    }

    /// Build a bank from explicit filters. All four must share one length of
    /// at least two taps; orthogonality is not required here and is only
    /// checked by the boundary transforms.
    pub fn from_filters(
        name: &str,
        dec_lo: Vec<T>,
        dec_hi: Vec<T>,
        rec_lo: Vec<T>,
        rec_hi: Vec<T>,
    ) -> Result<Self, WaveletError> {
        let len = dec_lo.len();
        if len < 2 {
            return Err(WaveletError::InvalidFilterBank(
                "filters need at least two taps".into(),
            ));
        }
        if dec_hi.len() != len || rec_lo.len() != len || rec_hi.len() != len {
            return Err(WaveletError::InvalidFilterBank(
                "filters must all have the same length".into(),
            ));
        }
        Ok(Self { name: name.to_string(), dec_lo, dec_hi, rec_lo, rec_hi })
    }

    /// Copy the filters out of any [`FilterBank`] implementation.
    pub fn from_bank(name: &str, bank: &dyn FilterBank<T>) -> Result<Self, WaveletError> {
        let (dec_lo, dec_hi, rec_lo, rec_hi) = bank.filter_bank();
        Self::from_filters(
            name,
            dec_lo.to_vec(),
            dec_hi.to_vec(),
            rec_lo.to_vec(),
            rec_hi.to_vec(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of taps in each filter.
    pub fn filter_length(&self) -> usize {
        self.dec_lo.len()
    }

    /// Decomposition low-pass filter.
    pub fn dec_lo(&self) -> &[T] {
        &self.dec_lo
    }

    /// Decomposition high-pass filter.
    pub fn dec_hi(&self) -> &[T] {
        &self.dec_hi
    }

    /// Reconstruction low-pass filter.
    pub fn rec_lo(&self) -> &[T] {
        &self.rec_lo
    }

    /// Reconstruction high-pass filter.
    pub fn rec_hi(&self) -> &[T] {
        &self.rec_hi
    }

    /// Whether the bank satisfies the orthogonality conditions: unit norm,
    /// vanishing even-lag autocorrelation, and high-pass filters that mirror
    /// the low-pass pair. Checked numerically with a small tolerance.
    pub fn is_orthogonal(&self) -> bool {
        let n = self.filter_length();
        if n % 2 != 0 {
            return false;
        }
        let tol = T::from_f64(1e-4);
        // Even-lag autocorrelation of rec_lo must be the unit impulse.
        for lag in (0..n).step_by(2) {
            let mut acc = T::zero();
            for k in 0..n - lag {
                acc = acc + self.rec_lo[k] * self.rec_lo[k + lag];
            }
            let target = if lag == 0 { T::one() } else { T::zero() };
            if (acc - target).abs() > tol {
                return false;
            }
        }
        // The remaining filters must be the quadrature mirrors of rec_lo.
        for k in 0..n {
            let sign = if k % 2 == 0 { -T::one() } else { T::one() };
            if (self.dec_lo[k] - self.rec_lo[n - 1 - k]).abs() > tol {
                return false;
            }
            if (self.dec_hi[k] - sign * self.rec_lo[k]).abs() > tol {
                return false;
            }
            if (self.rec_hi[k] + sign * self.rec_lo[n - 1 - k]).abs() > tol {
                return false;
            }
        }
        true
    }
}

impl<T: Sample> FilterBank<T> for Wavelet<T> {
    fn filter_bank(&self) -> (&[T], &[T], &[T], &[T]) {
        (&self.dec_lo, &self.dec_hi, &self.rec_lo, &self.rec_hi)
    }
}
