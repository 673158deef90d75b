//! Prune, trim, and history-prune (spec §4.5, invariants I4/P1).

use std::collections::HashSet;

use crate::beam::LMBeam;

/// Drop every beam whose `lm_score` is below `max_lm_score + beam_prune_logp`.
///
/// `beam_prune_logp` is non-positive (validated by `DecoderConfig`), so this
/// only ever narrows the frontier. Returns the input unchanged if it's empty.
pub fn prune(beams: Vec<LMBeam>, beam_prune_logp: f32) -> Vec<LMBeam> {
    let Some(max_lm_score) = beams
        .iter()
        .map(|b| b.lm_score)
        .fold(None, |acc: Option<f32>, s| {
            Some(acc.map_or(s, |m| m.max(s)))
        })
    else {
        return beams;
    };
    let threshold = max_lm_score + beam_prune_logp;
    beams.into_iter().filter(|b| b.lm_score >= threshold).collect()
}

/// Keep the top `beam_width` beams by `lm_score`, descending.
///
/// Ties are broken deterministically by `(text, partial_word)` ascending
/// (spec §9's "Open Questions": tie-breaking is unspecified upstream, this
/// port fixes and documents a rule so output order is reproducible).
pub fn trim(mut beams: Vec<LMBeam>, beam_width: usize) -> Vec<LMBeam> {
    beams.sort_by(|a, b| {
        b.lm_score
            .total_cmp(&a.lm_score)
            .then_with(|| a.text.cmp(&b.text))
            .then_with(|| a.partial_word.cmp(&b.partial_word))
    });
    beams.truncate(beam_width);
    beams
}

/// Collapse beams that share their last `max(1, order - 1)` whitespace
/// tokens plus `(partial_word, last_char)`; keep the first beam seen for
/// each key in the input's current order (spec §4.5, optional).
pub fn history_prune(beams: Vec<LMBeam>, lm_order: usize) -> Vec<LMBeam> {
    let keep_n = lm_order.saturating_sub(1).max(1);
    let mut seen: HashSet<(String, String, Option<String>)> = HashSet::new();
    let mut kept = Vec::with_capacity(beams.len());
    for beam in beams {
        let tokens: Vec<&str> = beam.text.split_whitespace().collect();
        let start = tokens.len().saturating_sub(keep_n);
        let history = tokens[start..].join(" ");
        let key = (history, beam.partial_word.clone(), beam.last_char.clone());
        if seen.insert(key) {
            kept.push(beam);
        }
    }
    kept
}
