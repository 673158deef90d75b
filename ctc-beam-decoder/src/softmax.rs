//! Log-softmax preparation (spec §4.1).
//!
//! Applied once per `decode` call, before the frame loop starts, so the
//! beam expansion code can assume every row of the matrix is already a
//! finite, non-positive log-probability vector.

use crate::config::MIN_TOKEN_CLIP_P;

/// A `[frames, vocab]` matrix of log-probabilities, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct LogProbs {
    data: Vec<f32>,
    cols: usize,
}

impl LogProbs {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        if self.cols == 0 {
            0
        } else {
            self.data.len() / self.cols
        }
    }

    pub fn row(&self, r: usize) -> &[f32] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }
}

/// Prepare a raw `[frames, vocab]` logits matrix for decoding.
///
/// Detects whether rows already sum to 1 (within float epsilon of their
/// mean, i.e. already probabilities) versus raw, unnormalized logits, and
/// applies the appropriate conversion to log-space.
pub fn prepare_log_probs(logits: &[f32], cols: usize) -> LogProbs {
    assert!(cols > 0, "vocab size must be positive");
    assert_eq!(logits.len() % cols, 0, "logits length must be a multiple of cols");

    let rows = logits.len() / cols;
    let mean_row_sum: f32 = if rows == 0 {
        1.0
    } else {
        (0..rows)
            .map(|r| logits[r * cols..(r + 1) * cols].iter().sum::<f32>())
            .sum::<f32>()
            / rows as f32
    };
    let already_probs = (mean_row_sum - 1.0).abs() < f32::EPSILON;

    let min_log = MIN_TOKEN_CLIP_P.ln();
    let mut data = Vec::with_capacity(logits.len());

    if already_probs {
        for &p in logits {
            data.push(p.clamp(MIN_TOKEN_CLIP_P, 1.0).ln());
        }
    } else {
        for r in 0..rows {
            let row = &logits[r * cols..(r + 1) * cols];
            let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            let log_sum_exp: f32 = row.iter().map(|&x| (x - max).exp()).sum::<f32>().ln();
            for &x in row {
                let log_p = (x - max - log_sum_exp).clamp(min_log, 0.0);
                data.push(log_p);
            }
        }
    }

    LogProbs { data, cols }
}
