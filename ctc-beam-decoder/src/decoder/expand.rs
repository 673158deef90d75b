//! Per-frame beam expansion (spec §4.4).

use std::collections::BTreeSet;

use crate::beam::{Beam, NO_FRAMES};
use crate::config::{BPE_TOKEN, BPE_TOKEN_ALT};

/// Candidate token indices for one frame: the row argmax plus every index
/// at or above `token_min_logp`, in a `BTreeSet` so iteration order (and
/// therefore beam-construction order before merge) is reproducible.
pub fn candidate_tokens(row: &[f32], token_min_logp: f32) -> BTreeSet<usize> {
    let argmax = row
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .expect("row is nonempty");

    let mut candidates: BTreeSet<usize> = row
        .iter()
        .enumerate()
        .filter(|(_, &p)| p >= token_min_logp)
        .map(|(i, _)| i)
        .collect();
    candidates.insert(argmax);
    candidates
}

/// Expand every surviving beam by one candidate token at frame `frame_idx`.
pub fn expand_frame(
    beams: &[Beam],
    row: &[f32],
    labels: &[String],
    candidates: &BTreeSet<usize>,
    frame_idx: i32,
    is_bpe: bool,
) -> Vec<Beam> {
    let mut new_beams = Vec::with_capacity(beams.len() * candidates.len());
    for &idx in candidates {
        let p = row[idx];
        let c = labels[idx].as_str();
        for beam in beams {
            new_beams.push(expand_one(beam, c, p, frame_idx, is_bpe));
        }
    }
    new_beams
}

fn expand_one(beam: &Beam, c: &str, p: f32, frame_idx: i32, is_bpe: bool) -> Beam {
    let is_blank = c.is_empty();
    let is_repeat = !is_blank && beam.last_char.as_deref() == Some(c);

    if is_blank || is_repeat {
        // Case A.
        let mut nb = beam.clone();
        nb.logit_score += p;
        if !is_blank {
            nb.partial_frames.1 = frame_idx + 1;
        }
        nb.last_char = Some(c.to_string());
        return nb;
    }

    if is_bpe && (c.starts_with(BPE_TOKEN) || c.starts_with(BPE_TOKEN_ALT) || beam.force_next_break) {
        // Case B.
        let mut clean_char = strip_bpe_marker(c);
        let mut force_next_break = false;
        if ends_with_bpe_marker(&clean_char) {
            clean_char.truncate(clean_char.len() - BPE_TOKEN.len());
            force_next_break = true;
        }
        let mut text_frames = beam.text_frames.clone();
        if !beam.partial_word.is_empty() {
            text_frames.push((beam.partial_word.clone(), beam.partial_frames));
        }
        return Beam {
            text: beam.text.clone(),
            next_word: beam.partial_word.clone(),
            partial_word: clean_char,
            last_char: Some(c.to_string()),
            text_frames,
            partial_frames: (frame_idx, frame_idx + 1),
            logit_score: beam.logit_score + p,
            force_next_break,
        };
    }

    if !is_bpe && c == " " {
        // Case C.
        let mut text_frames = beam.text_frames.clone();
        if !beam.partial_word.is_empty() {
            text_frames.push((beam.partial_word.clone(), beam.partial_frames));
        }
        return Beam {
            text: beam.text.clone(),
            next_word: beam.partial_word.clone(),
            partial_word: String::new(),
            last_char: Some(c.to_string()),
            text_frames,
            partial_frames: NO_FRAMES,
            logit_score: beam.logit_score + p,
            force_next_break: false,
        };
    }

    // Case D: continuation.
    let new_partial_frames = if beam.partial_frames.0 < 0 {
        (frame_idx, frame_idx + 1)
    } else {
        (beam.partial_frames.0, frame_idx + 1)
    };
    Beam {
        text: beam.text.clone(),
        next_word: beam.next_word.clone(),
        partial_word: format!("{}{}", beam.partial_word, c),
        last_char: Some(c.to_string()),
        text_frames: beam.text_frames.clone(),
        partial_frames: new_partial_frames,
        logit_score: beam.logit_score + p,
        force_next_break: false,
    }
}

fn strip_bpe_marker(c: &str) -> String {
    if let Some(rest) = c.strip_prefix(BPE_TOKEN) {
        rest.to_string()
    } else if let Some(rest) = c.strip_prefix(BPE_TOKEN_ALT) {
        rest.to_string()
    } else {
        c.to_string()
    }
}

fn ends_with_bpe_marker(c: &str) -> bool {
    c.ends_with(BPE_TOKEN)
}
