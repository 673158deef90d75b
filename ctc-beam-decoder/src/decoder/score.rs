//! LM + hotword scoring of merged beams (spec §4.5 `get_lm_beam`).

use crate::beam::{Beam, LMBeam, LmScoreCache, PartialTokenCache};
use crate::config::LOG_BASE_CHANGE_FACTOR;
use crate::hotword::HotwordScorer;
use crate::lm::LanguageModel;

/// Score one merged beam, threading the LM/hotword memoization caches.
///
/// `is_eos` is true only during finalization, where the LM's
/// end-of-sentence bonus (if configured) applies. `alpha`/`beta` are the
/// decoder's LM-weight and word-insertion-bonus knobs (spec §6); per spec
/// §4.3/§4.5 the LM returns a raw base-10 log-probability and the *caller*
/// converts it to natural log and applies `alpha`/`beta`, once per word
/// scored (so `beta` accrues once per committed word, not once per
/// utterance).
pub fn get_lm_beam<L: LanguageModel>(
    beam: &Beam,
    lm: Option<&L>,
    hotword: &HotwordScorer,
    lm_cache: &mut LmScoreCache<Option<L::State>>,
    partial_cache: &mut PartialTokenCache,
    is_eos: bool,
    alpha: f32,
    beta: f32,
) -> LMBeam {
    let new_text = beam.combined_text();

    let combined = if let Some(&(combined, _, _)) = lm_cache.get(&new_text, is_eos) {
        combined
    } else {
        let combined = match lm {
            Some(lm) => {
                let (prev_raw, prev_state) = lm_cache
                    .get(&beam.text, false)
                    .map(|(_, raw, state)| (*raw, state.clone()))
                    .expect("parent text is always scored before its children");
                let prev_state = prev_state.expect("lm is configured so cached state is Some");
                let (delta_log10, new_state) = lm.score(&prev_state, &beam.next_word, is_eos);
                let delta_scaled = alpha * delta_log10 * LOG_BASE_CHANGE_FACTOR + beta;
                let raw = prev_raw + delta_scaled;
                let combined = raw + hotword.score(&new_text);
                lm_cache.insert(new_text.clone(), is_eos, combined, raw, Some(new_state));
                combined
            }
            None => {
                let combined = hotword.score(&new_text);
                lm_cache.insert(new_text.clone(), is_eos, combined, 0.0, None);
                combined
            }
        };
        combined
    };

    let partial_penalty = if beam.partial_word.is_empty() {
        0.0
    } else if let Some(cached) = partial_cache.get(&beam.partial_word) {
        cached
    } else {
        let penalty = if hotword.contains(&beam.partial_word) {
            hotword.score_partial_token(&beam.partial_word)
        } else if let Some(lm) = lm {
            lm.score_partial_token(&beam.partial_word)
        } else {
            0.0
        };
        partial_cache.insert(beam.partial_word.clone(), penalty);
        penalty
    };

    LMBeam {
        text: new_text,
        next_word: String::new(),
        partial_word: beam.partial_word.clone(),
        last_char: beam.last_char.clone(),
        text_frames: beam.text_frames.clone(),
        partial_frames: beam.partial_frames,
        logit_score: beam.logit_score,
        force_next_break: beam.force_next_break,
        lm_score: beam.logit_score + combined + partial_penalty,
    }
}
