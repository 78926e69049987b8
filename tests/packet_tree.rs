use ndarray::{array, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wavetree::{
    get_freq_order, get_graycode_order, BoundaryMode, Wavelet, WaveletError, WaveletPacket,
    WaveletPacket2,
};

#[test]
/// Rebuilding the tree from the public surface and walking it in both
/// natural and frequency order reproduces the textbook packet table.
fn textbook_packet_table() {
    let data = array![[56.0, 40.0, 8.0, 24.0, 48.0, 48.0, 40.0, 16.0]];
    let w = Wavelet::from_filters(
        "unscaled-haar",
        vec![0.5, 0.5],
        vec![-0.5, 0.5],
        vec![0.5, 0.5],
        vec![0.5, -0.5],
    )
    .unwrap();
    let wp = WaveletPacket::new(&data, w, BoundaryMode::Reflect, None).unwrap();
    let natural: Vec<f64> = wp
        .get_level(3)
        .unwrap()
        .iter()
        .map(|p| wp.get(p).unwrap()[[0, 0]])
        .collect();
    assert_eq!(natural, vec![35.0, -3.0, 13.0, 3.0, 3.0, -3.0, 1.0, 7.0]);
    let by_frequency: Vec<f64> = get_graycode_order(3)
        .iter()
        .map(|p| wp.get(p).unwrap()[[0, 0]])
        .collect();
    assert_eq!(by_frequency, vec![35.0, -3.0, 3.0, 13.0, 1.0, 7.0, -3.0, 3.0]);
}

#[test]
/// A tree constructed empty behaves like one built in the constructor once
/// `transform` has run.
fn two_step_construction_equivalence() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut data = ndarray::Array2::zeros((2, 32));
    for x in data.iter_mut() {
        *x = rng.gen_range(-1.0..1.0);
    }
    let w: Wavelet<f64> = Wavelet::parse("db2").unwrap();
    let direct = WaveletPacket::new(&data, w.clone(), BoundaryMode::Zero, Some(3)).unwrap();
    let mut staged = WaveletPacket::empty(w, BoundaryMode::Zero);
    staged.transform(&data, Some(3)).unwrap();
    assert_eq!(staged.max_level(), direct.max_level());
    for path in direct.get_level(3).unwrap() {
        assert_eq!(staged.get(&path).unwrap(), direct.get(&path).unwrap());
    }
}

#[test]
/// Frequency grid layout for two-dimensional packets.
fn freq_order_level_one_grid() {
    let grid = get_freq_order(1);
    assert_eq!(grid, vec![vec!["a", "v"], vec!["h", "d"]]);
    // Rows sweep height frequency, columns width frequency.
    let grid = get_freq_order(2);
    assert_eq!(grid.len(), 4);
    assert_eq!(grid[0][0], "aa");
    assert_eq!(grid[3][3], "da");
    assert_eq!(grid[2][2], "dd");
}

#[test]
/// Unbuilt trees refuse access; built trees refuse unknown paths.
fn access_error_classes() {
    let w: Wavelet<f64> = Wavelet::parse("haar").unwrap();
    let mut wp = WaveletPacket::empty(w, BoundaryMode::Zero);
    match wp.get("") {
        Err(WaveletError::TreeNotBuilt) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    let data = ndarray::Array2::<f64>::ones((1, 8));
    wp.transform(&data, None).unwrap();
    let deep = "a".repeat(100);
    match wp.get(&deep) {
        Err(WaveletError::InvalidPath(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    match wp.get("b") {
        Err(WaveletError::InvalidPath(path)) => assert_eq!(path, "b"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
/// Quad-tree leaves of a constant image: only the all-approximation path
/// holds energy under an orthonormal wavelet.
fn two_dimensional_constant_image() {
    let data = Array3::<f64>::ones((1, 8, 8));
    let w: Wavelet<f64> = Wavelet::parse("haar").unwrap();
    let wp = WaveletPacket2::new(&data, w, BoundaryMode::Periodic, Some(2)).unwrap();
    for path in wp.get_level(2).unwrap() {
        let node = wp.get(&path).unwrap();
        assert_eq!(node.dim(), (1, 2, 2));
        let energy: f64 = node.iter().map(|x| x * x).sum();
        if path == "aa" {
            // Each coefficient is 2^level under orthonormal Haar.
            assert!((energy - 4.0 * 16.0).abs() < 1e-10, "energy {}", energy);
        } else {
            assert!(energy < 1e-20, "{}: energy {}", path, energy);
        }
    }
}
