//! Wavelet packet tree module
//! Recursive decomposition of every subband, not just the approximation
//! chain. Trees hold their nodes in a flat arena in breadth-first build
//! order with a path index over `{a,d}` (1D) or `{a,h,v,d}` (2D) strings;
//! the root path is the empty string and owns the input signal.
//! Construction either takes the signal directly or starts empty and is
//! populated by `transform`, which rebuilds the arena from scratch on
//! every call.

use hashbrown::HashMap;
use log::debug;
use ndarray::{Array2, Array3};

use crate::dwt::{check_input, dwt, dwt_max_level};
use crate::dwt2::dwt2;
use crate::error::WaveletError;
use crate::mode::BoundaryMode;
use crate::num::Sample;
use crate::wavelet::Wavelet;

const SYMBOLS_1D: [char; 2] = ['a', 'd'];
const SYMBOLS_2D: [char; 4] = ['a', 'h', 'v', 'd'];

// Packet trees keep the reference library's depth bound without the
// one-level clamp the plain transforms apply: a zero-depth tree is just
// the root.
fn resolve_depth(
    len: usize,
    taps: usize,
    requested: Option<usize>,
) -> Result<usize, WaveletError> {
    let max = dwt_max_level(len, taps);
    match requested {
        Some(level) if level > max => Err(WaveletError::InvalidLevels { requested: level, max }),
        Some(level) => Ok(level),
        None => Ok(max),
    }
}

fn validate_path(path: &str, alphabet: &[char], depth: usize) -> Result<(), WaveletError> {
    if path.len() > depth || path.chars().any(|c| !alphabet.contains(&c)) {
        return Err(WaveletError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// One arena slot: a coefficient block, its depth, and the slot of its
/// parent. The root sits in slot zero with no parent.
#[derive(Debug, Clone)]
struct Node<A> {
    path: String,
    depth: usize,
    parent: Option<usize>,
    data: A,
}

fn push_node<A>(
    nodes: &mut Vec<Node<A>>,
    index: &mut HashMap<String, usize>,
    path: String,
    parent: Option<usize>,
    data: A,
) -> usize {
    let slot = nodes.len();
    index.insert(path.clone(), slot);
    nodes.push(Node { depth: path.len(), path, parent, data });
    slot
}

fn node_data<'a, A>(
    nodes: &'a [Node<A>],
    index: &HashMap<String, usize>,
    path: &str,
) -> Result<&'a A, WaveletError> {
    index
        .get(path)
        .map(|&slot| &nodes[slot].data)
        .ok_or_else(|| WaveletError::InvalidPath(path.to_string()))
}

// Within one depth the arena is already in natural order: the build pushes
// children left to right under parents that are themselves in order.
fn level_paths<A>(nodes: &[Node<A>], level: usize) -> Vec<String> {
    nodes
        .iter()
        .filter(|node| node.depth == level)
        .map(|node| node.path.clone())
        .collect()
}

// All paths of the given length in natural (lexicographic) order.
fn natural_paths(level: usize, symbols: &[char]) -> Vec<String> {
    let mut paths = vec![String::new()];
    for _ in 0..level {
        let mut next = Vec::with_capacity(paths.len() * symbols.len());
        for p in &paths {
            for &s in symbols {
                let mut q = String::with_capacity(p.len() + 1);
                q.push_str(p);
                q.push(s);
                next.push(q);
            }
        }
        paths = next;
    }
    paths
}

fn graycode_strings(level: usize, x: char, y: char) -> Vec<String> {
    if level == 0 {
        return vec![String::new()];
    }
    let mut order = vec![x.to_string(), y.to_string()];
    for _ in 1..level {
        let mut next = Vec::with_capacity(order.len() * 2);
        for p in &order {
            next.push(format!("{x}{p}"));
        }
        for p in order.iter().rev() {
            next.push(format!("{y}{p}"));
        }
        order = next;
    }
    order
}

/// 1D packet paths of the given depth reordered so that node center
/// frequencies ascend: the classic binary-reflected sequence over `{a,d}`.
pub fn get_graycode_order(level: usize) -> Vec<String> {
    graycode_strings(level, 'a', 'd')
}

/// 2D packet paths of the given depth arranged on a `2^level x 2^level`
/// grid by ascending frequency along height (rows) and width (columns).
pub fn get_freq_order(level: usize) -> Vec<Vec<String>> {
    let size = 1usize << level;
    let gray = graycode_strings(level, 'l', 'h');
    let index: HashMap<&str, usize> =
        gray.iter().enumerate().map(|(i, p)| (p.as_str(), i)).collect();
    let mut grid = vec![vec![String::new(); size]; size];
    for path in natural_paths(level, &SYMBOLS_2D) {
        let mut rows = String::with_capacity(level);
        let mut cols = String::with_capacity(level);
        for c in path.chars() {
            let (r, w) = match c {
                'a' => ('l', 'l'),
                'h' => ('h', 'l'),
                'v' => ('l', 'h'),
                _ => ('h', 'h'),
            };
            rows.push(r);
            cols.push(w);
        }
        if let (Some(&i), Some(&j)) = (index.get(rows.as_str()), index.get(cols.as_str())) {
            grid[i][j] = path;
        }
    }
    grid
}

/// Full binary decomposition tree over batched 1D signals.
///
/// Nodes are addressed by `{a,d}` path strings, e.g. `"add"` is the detail
/// of the detail of the approximation. They live in a flat arena in build
/// order; a path index resolves lookups, and each node records its depth
/// and the arena slot of its parent. Until `transform` runs, any access
/// fails with [`WaveletError::TreeNotBuilt`].
#[derive(Debug, Clone)]
pub struct WaveletPacket<T> {
    wavelet: Wavelet<T>,
    mode: BoundaryMode,
    built_level: Option<usize>,
    nodes: Vec<Node<Array2<T>>>,
    index: HashMap<String, usize>,
}

impl<T: Sample> WaveletPacket<T> {
    /// An unpopulated tree; call [`transform`](Self::transform) to build it.
    pub fn empty(wavelet: Wavelet<T>, mode: BoundaryMode) -> Self {
        Self {
            wavelet,
            mode,
            built_level: None,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds the tree for `data` immediately. Equivalent to
    /// [`empty`](Self::empty) followed by one `transform` call.
    pub fn new(
        data: &Array2<T>,
        wavelet: Wavelet<T>,
        mode: BoundaryMode,
        max_level: Option<usize>,
    ) -> Result<Self, WaveletError> {
        let mut tree = Self::empty(wavelet, mode);
        tree.transform(data, max_level)?;
        Ok(tree)
    }

    /// (Re)populates every node down to `max_level`, discarding any prior
    /// content. The automatic depth uses the filter-length bound of
    /// [`dwt_max_level`]; explicit depths beyond it fail with
    /// [`WaveletError::InvalidLevels`].
    pub fn transform(
        &mut self,
        data: &Array2<T>,
        max_level: Option<usize>,
    ) -> Result<&mut Self, WaveletError> {
        check_input(data)?;
        let depth = resolve_depth(data.ncols(), self.wavelet.filter_length(), max_level)?;
        self.built_level = None;
        self.nodes.clear();
        self.index.clear();
        let root =
            push_node(&mut self.nodes, &mut self.index, String::new(), None, data.clone());
        let mut frontier = vec![root];
        for _ in 0..depth {
            let mut next = Vec::with_capacity(frontier.len() * 2);
            for &parent in &frontier {
                let (a, d) = dwt(&self.nodes[parent].data, &self.wavelet, self.mode)?;
                for (symbol, block) in [('a', a), ('d', d)] {
                    let mut path = self.nodes[parent].path.clone();
                    path.push(symbol);
                    next.push(push_node(
                        &mut self.nodes,
                        &mut self.index,
                        path,
                        Some(parent),
                        block,
                    ));
                }
            }
            frontier = next;
        }
        debug!("packet transform: depth {}, {} nodes", depth, self.nodes.len());
        self.built_level = Some(depth);
        Ok(self)
    }

    /// Depth of the current build, `None` while the tree is empty.
    pub fn max_level(&self) -> Option<usize> {
        self.built_level
    }

    /// Coefficients at `path`; the empty path returns the input signal.
    pub fn get(&self, path: &str) -> Result<&Array2<T>, WaveletError> {
        let depth = self.built_level.ok_or(WaveletError::TreeNotBuilt)?;
        validate_path(path, &SYMBOLS_1D, depth)?;
        node_data(&self.nodes, &self.index, path)
    }

    /// Paths of all nodes at the given depth in natural (left-to-right)
    /// order; use [`get_graycode_order`] for the frequency-ascending walk.
    pub fn get_level(&self, level: usize) -> Result<Vec<String>, WaveletError> {
        let depth = self.built_level.ok_or(WaveletError::TreeNotBuilt)?;
        if level > depth {
            return Err(WaveletError::InvalidPath(format!(
                "level {level} exceeds tree depth {depth}"
            )));
        }
        Ok(level_paths(&self.nodes, level))
    }
}

/// Full quad decomposition tree over batched images, with paths over
/// `{a,h,v,d}`. Mirrors [`WaveletPacket`] in storage and access behavior.
#[derive(Debug, Clone)]
pub struct WaveletPacket2<T> {
    wavelet: Wavelet<T>,
    mode: BoundaryMode,
    built_level: Option<usize>,
    nodes: Vec<Node<Array3<T>>>,
    index: HashMap<String, usize>,
}

impl<T: Sample> WaveletPacket2<T> {
    pub fn empty(wavelet: Wavelet<T>, mode: BoundaryMode) -> Self {
        Self {
            wavelet,
            mode,
            built_level: None,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn new(
        data: &Array3<T>,
        wavelet: Wavelet<T>,
        mode: BoundaryMode,
        max_level: Option<usize>,
    ) -> Result<Self, WaveletError> {
        let mut tree = Self::empty(wavelet, mode);
        tree.transform(data, max_level)?;
        Ok(tree)
    }

    /// (Re)populates the tree. The automatic depth follows the shorter
    /// image axis.
    pub fn transform(
        &mut self,
        data: &Array3<T>,
        max_level: Option<usize>,
    ) -> Result<&mut Self, WaveletError> {
        let (batch, height, width) = data.dim();
        if batch == 0 || height == 0 || width == 0 {
            return Err(WaveletError::EmptyInput);
        }
        let depth =
            resolve_depth(height.min(width), self.wavelet.filter_length(), max_level)?;
        self.built_level = None;
        self.nodes.clear();
        self.index.clear();
        let root =
            push_node(&mut self.nodes, &mut self.index, String::new(), None, data.clone());
        let mut frontier = vec![root];
        for _ in 0..depth {
            let mut next = Vec::with_capacity(frontier.len() * 4);
            for &parent in &frontier {
                let (a, bands) = dwt2(&self.nodes[parent].data, &self.wavelet, self.mode)?;
                for (symbol, block) in
                    [('a', a), ('h', bands.h), ('v', bands.v), ('d', bands.d)]
                {
                    let mut path = self.nodes[parent].path.clone();
                    path.push(symbol);
                    next.push(push_node(
                        &mut self.nodes,
                        &mut self.index,
                        path,
                        Some(parent),
                        block,
                    ));
                }
            }
            frontier = next;
        }
        debug!("packet2 transform: depth {}, {} nodes", depth, self.nodes.len());
        self.built_level = Some(depth);
        Ok(self)
    }

    pub fn max_level(&self) -> Option<usize> {
        self.built_level
    }

    pub fn get(&self, path: &str) -> Result<&Array3<T>, WaveletError> {
        let depth = self.built_level.ok_or(WaveletError::TreeNotBuilt)?;
        validate_path(path, &SYMBOLS_2D, depth)?;
        node_data(&self.nodes, &self.index, path)
    }

    /// Natural-order paths at one depth; [`get_freq_order`] arranges the
    /// same paths on the frequency grid.
    pub fn get_level(&self, level: usize) -> Result<Vec<String>, WaveletError> {
        let depth = self.built_level.ok_or(WaveletError::TreeNotBuilt)?;
        if level > depth {
            return Err(WaveletError::InvalidPath(format!(
                "level {level} exceeds tree depth {depth}"
            )));
        }
        Ok(level_paths(&self.nodes, level))
    }
}
