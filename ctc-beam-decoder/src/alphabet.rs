//! Vocabulary normalization (spec §3).
//!
//! Mirrors `examples/original_source/src/alphabet.cpp`'s `normalize_regular_alphabet`
//! operation-for-operation: the order in which the pipe substitution, blank
//! detection, `_`-as-blank shortcut, blank append, and UNK substitution run
//! against each other is load-bearing and not otherwise derivable from a
//! looser description of the rules.

use crate::config::UNK_TOKEN;
use crate::error::DecoderError;

/// Ordered vocabulary: index `i` is the label for logit column `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Alphabet {
    labels: Vec<String>,
    is_bpe: bool,
    blank_idx: usize,
}

impl Alphabet {
    /// Build an alphabet from a raw label list, applying normalization.
    ///
    /// Returns [`DecoderError::EmptyAlphabet`] if `labels` is empty, or
    /// [`DecoderError::BpeNotSupported`] if any label starts with a BPE
    /// boundary marker (BPE normalization is explicitly out of scope).
    pub fn new(labels: Vec<String>) -> Result<Self, DecoderError> {
        if labels.is_empty() {
            return Err(DecoderError::EmptyAlphabet);
        }
        if check_if_bpe(&labels) {
            return Err(DecoderError::BpeNotSupported);
        }
        let normalized = normalize_regular_alphabet(labels);
        let blank_idx = normalized
            .iter()
            .position(|l| l.is_empty())
            .expect("normalize_regular_alphabet guarantees a blank entry");
        Ok(Alphabet {
            labels: normalized,
            is_bpe: false,
            blank_idx,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn is_bpe(&self) -> bool {
        self.is_bpe
    }

    /// Index of the CTC blank label (always `""` after normalization).
    pub fn blank_idx(&self) -> usize {
        self.blank_idx
    }

    pub fn label(&self, idx: usize) -> &str {
        &self.labels[idx]
    }
}

fn check_if_bpe(labels: &[String]) -> bool {
    labels
        .iter()
        .any(|l| l.starts_with(crate::config::BPE_TOKEN) || l.starts_with(crate::config::BPE_TOKEN_ALT))
}

fn is_blank_pattern(label: &str) -> bool {
    matches_bracketed(label, "pad")
}

fn is_unk_pattern(label: &str) -> bool {
    matches_bracketed(label, "unk")
}

/// Matches `^[<\[]word[>\]]$` case-insensitively, e.g. `<pad>`, `[PAD]`, or
/// `<pad]` — the opening and closing bracket characters are independent
/// character classes, not a correlated pair.
fn matches_bracketed(label: &str, word: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.len() != word.len() + 2 {
        return false;
    }
    let opens = bytes[0] == b'<' || bytes[0] == b'[';
    let closes = bytes[bytes.len() - 1] == b'>' || bytes[bytes.len() - 1] == b']';
    if !opens || !closes {
        return false;
    }
    label[1..label.len() - 1].eq_ignore_ascii_case(word)
}

fn normalize_regular_alphabet(labels: Vec<String>) -> Vec<String> {
    let mut normalized = labels;

    // substitute space: only if a literal space is not already present.
    if let Some(pipe_pos) = normalized.iter().position(|l| l == "|") {
        if !normalized.iter().any(|l| l == " ") {
            normalized[pipe_pos] = " ".to_string();
        }
    }

    // substitute ctc blank char
    for label in normalized.iter_mut() {
        if is_blank_pattern(label) {
            *label = String::new();
        }
    }

    // `_` is treated as blank only when no empty entry exists yet.
    if let Some(underscore_pos) = normalized.iter().position(|l| l == "_") {
        if !normalized.iter().any(|l| l.is_empty()) {
            normalized[underscore_pos] = String::new();
        }
    }

    if !normalized.iter().any(|l| l.is_empty()) {
        normalized.push(String::new());
    }

    // substitute unk
    for label in normalized.iter_mut() {
        if is_unk_pattern(label) {
            *label = UNK_TOKEN.to_string();
        }
    }

    normalized
}
