/// Three ascending cut points and four ordered category labels.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdBands {
    pub cuts: [i64; 3],
    pub labels: [&'static str; 4],
}

impl ThresholdBands {
    /// Classify a score against the cuts: `score <= cuts[0]` takes the
    /// lowest label, each further cut the next, anything above the last cut
    /// the highest. Monotonic in `score`.
    pub fn classify(&self, score: i64) -> &'static str {
        let [low, medium, high] = self.cuts;
        if score <= low {
            self.labels[0]
        } else if score <= medium {
            self.labels[1]
        } else if score <= high {
            self.labels[2]
        } else {
            self.labels[3]
        }
    }
}

/// Classify a continuous score by the nearest value in `boundaries`.
///
/// The boundary list may ascend or descend (reversed scales); `labels` is a
/// parallel list, independent of direction. A linear scan keeps the first
/// boundary hit on a tie, so ties resolve to the lowest index. Returns
/// `None` only for an empty boundary list.
pub fn classify_nearest(
    score: f64,
    boundaries: &[f64],
    labels: &[&'static str],
) -> Option<&'static str> {
    debug_assert_eq!(boundaries.len(), labels.len());
    let mut best: Option<(usize, f64)> = None;
    for (i, b) in boundaries.iter().enumerate() {
        let dist = (score - b).abs();
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((i, dist)),
        }
    }
    best.map(|(i, _)| labels[i])
}
