//! Beam data model (spec §3).
//!
//! Per Design Note §9, `LMBeam` is not `Beam` with inheritance but a
//! disjoint record carrying the same hypothesis fields plus `lm_score`,
//! with an explicit projection back down to `Beam`. No caller ever needs
//! to treat the two polymorphically.

use std::collections::HashMap;

/// `(start_frame, end_frame)`; the sentinel `NO_FRAMES` means "no partial
/// word in progress".
pub type Frames = (i32, i32);

/// Sentinel for "no partial word yet" (invariant I3 / P3).
pub const NO_FRAMES: Frames = (-1, -1);

/// A committed word bound to the frame range it was emitted over.
pub type WordFrames = (String, Frames);

/// One decoding hypothesis, before LM rescoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    pub text: String,
    pub next_word: String,
    pub partial_word: String,
    pub last_char: Option<String>,
    pub text_frames: Vec<WordFrames>,
    pub partial_frames: Frames,
    pub logit_score: f32,
    /// Set when a BPE boundary marker ends the current token; the next
    /// frame must force a word break even without seeing another marker.
    /// Dead in practice while BPE alphabets are rejected at construction,
    /// kept so §4.4 case B reads the same as its source of truth.
    pub force_next_break: bool,
}

impl Beam {
    /// The single starting beam every `decode` call begins from.
    pub fn empty() -> Self {
        Beam {
            text: String::new(),
            next_word: String::new(),
            partial_word: String::new(),
            last_char: None,
            text_frames: Vec::new(),
            partial_frames: NO_FRAMES,
            logit_score: 0.0,
            force_next_break: false,
        }
    }

    /// `text ⊕ next_word`: whitespace-joined if both sides are nonempty.
    pub fn combined_text(&self) -> String {
        join_words(&self.text, &self.next_word)
    }

    /// The merge/dedup key (spec §4.5, invariant I5/P4).
    pub fn merge_key(&self) -> (String, String, Option<String>) {
        (
            self.combined_text(),
            self.partial_word.clone(),
            self.last_char.clone(),
        )
    }
}

/// Join two whitespace-separated fragments, skipping the separator if
/// either side is empty.
pub fn join_words(a: &str, b: &str) -> String {
    if a.is_empty() {
        b.to_string()
    } else if b.is_empty() {
        a.to_string()
    } else {
        format!("{a} {b}")
    }
}

/// A `Beam` plus its LM/hotword-adjusted ranking score.
#[derive(Debug, Clone, PartialEq)]
pub struct LMBeam {
    pub text: String,
    pub next_word: String,
    pub partial_word: String,
    pub last_char: Option<String>,
    pub text_frames: Vec<WordFrames>,
    pub partial_frames: Frames,
    pub logit_score: f32,
    pub force_next_break: bool,
    /// `logit_score + α·lm_log_score·log_base_change + β + hotword_score`.
    pub lm_score: f32,
}

impl LMBeam {
    /// Project away `lm_score`, recovering the underlying `Beam`.
    pub fn project(&self) -> Beam {
        Beam {
            text: self.text.clone(),
            next_word: self.next_word.clone(),
            partial_word: self.partial_word.clone(),
            last_char: self.last_char.clone(),
            text_frames: self.text_frames.clone(),
            partial_frames: self.partial_frames,
            logit_score: self.logit_score,
            force_next_break: self.force_next_break,
        }
    }

    pub fn combined_text(&self) -> String {
        join_words(&self.text, &self.next_word)
    }
}

/// Build the initial `LMBeam` for the starting empty beam, with
/// `lm_score` equal to `logit_score` (no LM/hotword contribution yet).
pub fn lm_beam_from(beam: &Beam, lm_score: f32) -> LMBeam {
    LMBeam {
        text: beam.text.clone(),
        next_word: beam.next_word.clone(),
        partial_word: beam.partial_word.clone(),
        last_char: beam.last_char.clone(),
        text_frames: beam.text_frames.clone(),
        partial_frames: beam.partial_frames,
        logit_score: beam.logit_score,
        force_next_break: beam.force_next_break,
        lm_score,
    }
}

/// Final, user-facing decoding result (spec §6 Output).
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBeam<S> {
    pub text: String,
    pub last_lm_state: Option<S>,
    pub text_frames: Vec<WordFrames>,
    pub logit_score: f32,
    pub lm_score: f32,
}

/// Memoized `(text, is_eos) -> (combined_lm_score, raw_lm_score, lm_state)`,
/// seeded with `("", false) -> (0, 0, start_state)`.
pub struct LmScoreCache<S> {
    entries: HashMap<(String, bool), (f32, f32, S)>,
}

impl<S: Clone> LmScoreCache<S> {
    pub fn seeded(start_state: S) -> Self {
        let mut entries = HashMap::new();
        entries.insert((String::new(), false), (0.0, 0.0, start_state));
        LmScoreCache { entries }
    }

    pub fn get(&self, text: &str, is_eos: bool) -> Option<&(f32, f32, S)> {
        self.entries.get(&(text.to_string(), is_eos))
    }

    pub fn insert(&mut self, text: String, is_eos: bool, combined: f32, raw: f32, state: S) {
        self.entries.insert((text, is_eos), (combined, raw, state));
    }
}

/// Memoized `partial_word -> unk_penalty`.
#[derive(Default)]
pub struct PartialTokenCache {
    entries: HashMap<String, f32>,
}

impl PartialTokenCache {
    pub fn new() -> Self {
        PartialTokenCache::default()
    }

    pub fn get(&self, partial: &str) -> Option<f32> {
        self.entries.get(partial).copied()
    }

    pub fn insert(&mut self, partial: String, penalty: f32) {
        self.entries.insert(partial, penalty);
    }
}
