use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of code lines per indentation depth. Index 0 is depth 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram(Vec<u64>);

impl Histogram {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a dense histogram from per-line depths.
    ///
    /// Depths inside the observed range that never occur get a zero bucket, so
    /// the length is always the largest depth plus one (or zero for no input).
    pub fn from_depths<I>(depths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut counts: BTreeMap<usize, u64> = BTreeMap::new();
        for depth in depths {
            *counts.entry(depth).or_insert(0) += 1;
        }

        let len = counts.keys().next_back().map_or(0, |max| max + 1);
        let mut buckets = vec![0u64; len];
        for (depth, count) in counts {
            buckets[depth] = count;
        }
        Self(buckets)
    }

    /// Element-wise sum; the shorter operand is treated as zero-padded.
    pub fn merge(&self, other: &Histogram) -> Histogram {
        let (long, short) = if self.0.len() >= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        let mut merged = long.clone();
        for (bucket, value) in merged.iter_mut().zip(short) {
            *bucket += value;
        }
        Histogram(merged)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reduces the histogram to summary statistics.
    ///
    /// Depth `i` is weighted as `i + 1`, so lines at depth 0 still count
    /// towards `sum`, `average` and `stddev`.
    pub fn statistics(&self) -> DepthStatistics {
        let count: u64 = self.0.iter().sum();
        let sum: u64 = self
            .0
            .iter()
            .enumerate()
            .map(|(i, value)| (i as u64 + 1) * value)
            .sum();

        let average = if count == 0 {
            None
        } else {
            Some(sum as f64 / count as f64)
        };

        let stddev = match average {
            Some(avg) if sum > 0 => {
                let squares = self.0.iter().enumerate().fold(0.0, |acc, (i, value)| {
                    let delta = (i + 1) as f64 - avg;
                    acc + delta * delta * *value as f64
                });
                Some((squares / count as f64).sqrt())
            }
            _ => None,
        };

        DepthStatistics {
            count,
            sum,
            average,
            max_depth: self.0.len(),
            stddev,
            hist: self.clone(),
        }
    }
}

impl From<Vec<u64>> for Histogram {
    fn from(buckets: Vec<u64>) -> Self {
        Self(buckets)
    }
}

impl FromIterator<Histogram> for Histogram {
    fn from_iter<T: IntoIterator<Item = Histogram>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Histogram::new(), |acc, hist| acc.merge(&hist))
    }
}

/// Snapshot of one histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthStatistics {
    pub count: u64,
    pub sum: u64,
    pub average: Option<f64>,
    /// Histogram length, not the largest depth with a non-zero count.
    pub max_depth: usize,
    pub stddev: Option<f64>,
    pub hist: Histogram,
}

impl Default for DepthStatistics {
    fn default() -> Self {
        Histogram::new().statistics()
    }
}
