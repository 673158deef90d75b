//! Beam merging (spec §4.5, invariants I5/P4/P5).

use std::collections::BTreeMap;

use crate::beam::Beam;

/// Numerically stable `log(exp(a) + exp(b))`.
pub fn log_sum_exp(a: f32, b: f32) -> f32 {
    if a >= b {
        a + (1.0 + (b - a).exp()).ln()
    } else {
        b + (1.0 + (a - b).exp()).ln()
    }
}

/// Bucket beams by `(text ⊕ next_word, partial_word, last_char)`; collisions
/// keep one representative and replace its `logit_score` with the
/// log-sum-exp of the colliding scores.
///
/// Uses a `BTreeMap` rather than a hash map so beam order going into the
/// next pass is reproducible run-to-run.
pub fn merge_beams(beams: Vec<Beam>) -> Vec<Beam> {
    let mut merged: BTreeMap<(String, String, Option<String>), Beam> = BTreeMap::new();
    for beam in beams {
        let key = beam.merge_key();
        match merged.get_mut(&key) {
            Some(existing) => {
                existing.logit_score = log_sum_exp(existing.logit_score, beam.logit_score);
            }
            None => {
                merged.insert(key, beam);
            }
        }
    }
    merged.into_values().collect()
}
