//! Finalization: flush the partial word, score end-of-sentence, rank,
//! assemble `OutputBeam`s (spec §4.6).

use crate::beam::{Beam, LMBeam, LmScoreCache, OutputBeam, PartialTokenCache, NO_FRAMES};
use crate::hotword::HotwordScorer;
use crate::lm::LanguageModel;

use super::merge::merge_beams;
use super::prune::{prune, trim};
use super::score::get_lm_beam;

/// Fold any in-progress `partial_word` into `next_word`, close out its
/// frame range into `text_frames`, and clear per-word scratch state.
///
/// Mirrors the original's unconditional `next_word_ = partial_word_`: even
/// an empty `partial_word` is carried over (it simply commits nothing), so
/// a beam with no pending partial word is scored with `next_word = ""` and
/// picks up only the end-of-sentence bonus.
fn close_beam(lm_beam: &LMBeam) -> Beam {
    let mut beam = lm_beam.project();
    if !beam.partial_word.is_empty() {
        beam.text_frames
            .push((beam.partial_word.clone(), beam.partial_frames));
    }
    beam.next_word = std::mem::take(&mut beam.partial_word);
    beam.last_char = None;
    beam.partial_frames = NO_FRAMES;
    beam
}

/// Run §4.6 end-to-end: close beams, merge, EOS-score, prune, trim, and
/// assemble ranked `OutputBeam`s (best first).
#[allow(clippy::too_many_arguments)]
pub fn finalize<L: LanguageModel>(
    lm_beams: Vec<LMBeam>,
    lm: Option<&L>,
    hotword: &HotwordScorer,
    lm_cache: &mut LmScoreCache<Option<L::State>>,
    partial_cache: &mut PartialTokenCache,
    beam_prune_logp: f32,
    beam_width: usize,
    alpha: f32,
    beta: f32,
) -> Vec<OutputBeam<L::State>> {
    let closed: Vec<Beam> = lm_beams.iter().map(close_beam).collect();
    let merged = merge_beams(closed);
    let scored: Vec<LMBeam> = merged
        .iter()
        .map(|b| get_lm_beam(b, lm, hotword, lm_cache, partial_cache, true, alpha, beta))
        .collect();
    let pruned = prune(scored, beam_prune_logp);
    let trimmed = trim(pruned, beam_width);
    trimmed
        .into_iter()
        .map(|b| assemble_output(b, lm_cache))
        .collect()
}

/// Split `text` on whitespace, zip with `text_frames` (truncated to the
/// shorter), whitespace-normalize the text, and attach the cached
/// end-of-sentence LM state for this beam's text, if any.
fn assemble_output<S: Clone>(
    lm_beam: LMBeam,
    lm_cache: &LmScoreCache<Option<S>>,
) -> OutputBeam<S> {
    let words: Vec<&str> = lm_beam.text.split_whitespace().collect();
    let text_frames = words
        .iter()
        .zip(lm_beam.text_frames.iter())
        .map(|(word, (_, frames))| (word.to_string(), *frames))
        .collect();
    let last_lm_state = lm_cache
        .get(&lm_beam.text, true)
        .and_then(|(_, _, state)| state.clone());

    OutputBeam {
        text: words.join(" "),
        last_lm_state,
        text_frames,
        logit_score: lm_beam.logit_score,
        lm_score: lm_beam.lm_score,
    }
}
