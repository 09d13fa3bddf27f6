//! Small CART classifier: axis-aligned splits chosen by Gini impurity.
//!
//! Nodes live in one `Vec`, children referenced by index. Leaves keep the
//! fraction of raining samples that reached them.

use alloc::vec::Vec;

/// Inputs per sample: `ldr, rain` for each record in the window.
pub const FEATURES: usize = 4;

pub type Features = [u16; FEATURES];

/// Growth limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: usize,
    /// A node with fewer samples is not split.
    pub min_samples_split: usize,
    /// Neither side of a split may hold fewer samples.
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_samples_split: 5,
            min_samples_leaf: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        /// Samples with `x[feature] <= threshold` go left.
        threshold: u16,
        left: usize,
        right: usize,
    },
    Leaf {
        rain_fraction: f32,
    },
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree over `(features, raining)` samples. `None` if there
    /// are no samples.
    pub fn fit(samples: &[(Features, bool)], params: &TreeParams) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut nodes = Vec::new();
        let mut idx: Vec<usize> = (0..samples.len()).collect();
        grow(samples, &mut idx, 0, params, &mut nodes);
        Some(Self { nodes })
    }

    /// Fraction of training samples in the reached leaf that were raining.
    pub fn rain_probability(&self, x: &Features) -> f32 {
        let mut at = 0;
        loop {
            match self.nodes.get(at) {
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    at = if x[*feature] <= *threshold { *left } else { *right };
                }
                Some(Node::Leaf { rain_fraction }) => return *rain_fraction,
                None => return 0.0,
            }
        }
    }

    /// Longest root-to-leaf path, in splits.
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, at: usize) -> usize {
        match self.nodes.get(at) {
            Some(Node::Split { left, right, .. }) => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
            _ => 0,
        }
    }
}

fn grow(
    samples: &[(Features, bool)],
    idx: &mut [usize],
    depth: usize,
    params: &TreeParams,
    nodes: &mut Vec<Node>,
) -> usize {
    let rain = idx.iter().filter(|&&i| samples[i].1).count();
    let me = nodes.len();
    nodes.push(Node::Leaf {
        rain_fraction: rain as f32 / idx.len() as f32,
    });

    let pure = rain == 0 || rain == idx.len();
    if pure || depth >= params.max_depth || idx.len() < params.min_samples_split {
        return me;
    }
    let Some((feature, threshold)) = best_split(samples, idx, params.min_samples_leaf) else {
        return me;
    };

    idx.sort_by_key(|&i| samples[i].0[feature] > threshold);
    let mid = idx
        .iter()
        .take_while(|&&i| samples[i].0[feature] <= threshold)
        .count();
    let (lo, hi) = idx.split_at_mut(mid);
    let left = grow(samples, lo, depth + 1, params, nodes);
    let right = grow(samples, hi, depth + 1, params, nodes);
    nodes[me] = Node::Split {
        feature,
        threshold,
        left,
        right,
    };
    me
}

/// Split with the lowest weighted Gini impurity, if any beats the parent.
fn best_split(
    samples: &[(Features, bool)],
    idx: &[usize],
    min_leaf: usize,
) -> Option<(usize, u16)> {
    let total = idx.len();
    let total_rain = idx.iter().filter(|&&i| samples[i].1).count();
    let parent = gini(total_rain, total);
    let mut best: Option<(f32, usize, u16)> = None;
    let mut order = idx.to_vec();

    for feature in 0..FEATURES {
        order.sort_by_key(|&i| samples[i].0[feature]);
        let mut left_rain = 0;
        for (k, pair) in order.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            if samples[a].1 {
                left_rain += 1;
            }
            let value = samples[a].0[feature];
            if value == samples[b].0[feature] {
                continue;
            }
            let left_n = k + 1;
            let right_n = total - left_n;
            if left_n < min_leaf || right_n < min_leaf {
                continue;
            }
            let score = (left_n as f32 * gini(left_rain, left_n)
                + right_n as f32 * gini(total_rain - left_rain, right_n))
                / total as f32;
            if score < parent && best.is_none_or(|(s, _, _)| score < s) {
                best = Some((score, feature, value));
            }
        }
    }
    best.map(|(_, feature, threshold)| (feature, threshold))
}

fn gini(rain: usize, n: usize) -> f32 {
    if n == 0 {
        return 0.0;
    }
    let p = rain as f32 / n as f32;
    2.0 * p * (1.0 - p)
}
