//! Read-only lexical statistics shared by every pipeline stage.
//!
//! A `Lexicon` holds word frequencies per tag, word co-occurrence counts,
//! POS tag transition counts and the entity role tables the recognizers
//! consult. It is assembled once (from a text source directory or a compiled
//! binary file) and never mutated afterwards.

mod io;
mod source;
#[cfg(test)]
mod tests;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::term::{PosTag, TAG_COUNT};

/// Unified error type for lexicon loading and binary I/O.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("lexicon data not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{file}:{line}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected CHLX)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch (expected {expected:08x}, found {found:08x})")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("corrupt lexicon data: {0}")]
    Corrupt(String),
}

/// One tagged reading of a word with its corpus frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexEntry {
    pub tag: PosTag,
    pub freq: u32,
}

/// Role tables used by the entity recognizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Surname,
    GivenName,
    ForeignName,
    OrgSuffix,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Surname,
        EntityKind::GivenName,
        EntityKind::ForeignName,
        EntityKind::OrgSuffix,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Surname => "surname",
            EntityKind::GivenName => "given",
            EntityKind::ForeignName => "foreign",
            EntityKind::OrgSuffix => "org_suffix",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown entity kind: {s:?}"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EntityTable {
    entries: FxHashMap<String, u32>,
    max_chars: usize,
}

/// Summary counts, reported by `dictool info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LexiconStats {
    pub words: usize,
    pub entries: usize,
    pub total_freq: u64,
    pub bigrams: usize,
    pub transitions: u64,
    pub entities: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    words: FxHashMap<String, Vec<LexEntry>>,
    word_freq: FxHashMap<String, u64>,
    total_freq: u64,
    max_word_chars: usize,
    bigrams: FxHashMap<String, FxHashMap<String, u32>>,
    /// Row-major `TAG_COUNT x TAG_COUNT` counts, indexed `left * TAG_COUNT + right`.
    transitions: Vec<u32>,
    /// Outgoing transition total per left tag.
    transition_totals: Vec<u64>,
    entities: Vec<EntityTable>,
}

impl Lexicon {
    /// Load a lexicon from a text source directory or a compiled file.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        if path.is_dir() {
            Self::from_dir(path)
        } else if path.is_file() {
            Self::open(path)
        } else {
            Err(LexiconError::NotFound(path.to_path_buf()))
        }
    }

    /// All tagged readings of `word`, most frequent first.
    pub fn entries(&self, word: &str) -> &[LexEntry] {
        self.words.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Most frequent tag of `word`.
    pub fn dominant_tag(&self, word: &str) -> Option<PosTag> {
        self.entries(word).first().map(|e| e.tag)
    }

    /// Summed frequency of `word` over all its tags.
    pub fn frequency(&self, word: &str) -> u64 {
        self.word_freq.get(word).copied().unwrap_or(0)
    }

    pub fn total_frequency(&self) -> u64 {
        self.total_freq
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn max_word_chars(&self) -> usize {
        self.max_word_chars
    }

    /// Lengths (in chars) of every lexicon word that is a prefix of `chars`.
    ///
    /// Probes a hash map once per candidate length up to the longest word.
    pub fn prefix_lengths(&self, chars: &[char]) -> Vec<usize> {
        let limit = self.max_word_chars.min(chars.len());
        let mut buf = String::with_capacity(limit * 4);
        let mut lengths = Vec::new();
        for (i, &c) in chars[..limit].iter().enumerate() {
            buf.push(c);
            if self.words.contains_key(buf.as_str()) {
                lengths.push(i + 1);
            }
        }
        lengths
    }

    /// Number of times `left` was directly followed by `right`.
    pub fn cooccurrence(&self, left: &str, right: &str) -> u32 {
        self.bigrams
            .get(left)
            .and_then(|row| row.get(right))
            .copied()
            .unwrap_or(0)
    }

    /// Number of times tag `left` was directly followed by tag `right`.
    pub fn transition(&self, left: PosTag, right: PosTag) -> u32 {
        self.transitions[left.index() * TAG_COUNT + right.index()]
    }

    pub fn transition_total(&self, left: PosTag) -> u64 {
        self.transition_totals[left.index()]
    }

    /// Frequency of `text` in the role table `kind` (0 if absent).
    pub fn entity_freq(&self, kind: EntityKind, text: &str) -> u32 {
        self.entities[kind.index()]
            .entries
            .get(text)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_entity(&self, kind: EntityKind, text: &str) -> bool {
        self.entity_freq(kind, text) > 0
    }

    /// Longest entry in the role table `kind`, in chars.
    pub fn max_entity_chars(&self, kind: EntityKind) -> usize {
        self.entities[kind.index()].max_chars
    }

    /// Cost of `text` playing role `kind` rather than being an ordinary word.
    ///
    /// `-ln((role + 1) / (role + word + 2))` where `role` is the role-table
    /// frequency and `word` the plain lexicon frequency.
    pub fn role_cost(&self, kind: EntityKind, text: &str) -> f64 {
        let role = self.entity_freq(kind, text) as f64;
        let word = self.frequency(text) as f64;
        -((role + 1.0) / (role + word + 2.0)).ln()
    }

    pub fn stats(&self) -> LexiconStats {
        LexiconStats {
            words: self.words.len(),
            entries: self.words.values().map(Vec::len).sum(),
            total_freq: self.total_freq,
            bigrams: self.bigrams.values().map(|row| row.len()).sum(),
            transitions: self.transition_totals.iter().sum(),
            entities: self.entities.iter().map(|t| t.entries.len()).sum(),
        }
    }
}

/// Incrementally assembles a `Lexicon`.
#[derive(Debug)]
pub struct LexiconBuilder {
    words: FxHashMap<String, Vec<LexEntry>>,
    bigrams: FxHashMap<String, FxHashMap<String, u32>>,
    transitions: Vec<u32>,
    entities: Vec<EntityTable>,
}

impl LexiconBuilder {
    pub fn new() -> Self {
        Self {
            words: FxHashMap::default(),
            bigrams: FxHashMap::default(),
            transitions: vec![0; TAG_COUNT * TAG_COUNT],
            entities: vec![EntityTable::default(); EntityKind::ALL.len()],
        }
    }

    /// Add `freq` occurrences of `word` tagged `tag`. Repeated pairs accumulate.
    pub fn word(&mut self, word: &str, tag: PosTag, freq: u32) -> &mut Self {
        if word.is_empty() {
            return self;
        }
        let entries = self.words.entry(word.to_string()).or_default();
        match entries.iter_mut().find(|e| e.tag == tag) {
            Some(e) => e.freq = e.freq.saturating_add(freq),
            None => entries.push(LexEntry { tag, freq }),
        }
        self
    }

    pub fn bigram(&mut self, left: &str, right: &str, freq: u32) -> &mut Self {
        let slot = self
            .bigrams
            .entry(left.to_string())
            .or_default()
            .entry(right.to_string())
            .or_insert(0);
        *slot = slot.saturating_add(freq);
        self
    }

    pub fn transition(&mut self, left: PosTag, right: PosTag, freq: u32) -> &mut Self {
        let slot = &mut self.transitions[left.index() * TAG_COUNT + right.index()];
        *slot = slot.saturating_add(freq);
        self
    }

    pub fn entity(&mut self, kind: EntityKind, text: &str, freq: u32) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        let table = &mut self.entities[kind.index()];
        let slot = table.entries.entry(text.to_string()).or_insert(0);
        *slot = slot.saturating_add(freq);
        table.max_chars = table.max_chars.max(text.chars().count());
        self
    }

    pub fn build(self) -> Lexicon {
        let mut words = self.words;
        let mut word_freq = FxHashMap::default();
        let mut total_freq = 0u64;
        let mut max_word_chars = 0;
        for (word, entries) in &mut words {
            // Stable: ties keep insertion order.
            entries.sort_by(|a, b| b.freq.cmp(&a.freq));
            let freq: u64 = entries.iter().map(|e| e.freq as u64).sum();
            total_freq += freq;
            word_freq.insert(word.clone(), freq);
            max_word_chars = max_word_chars.max(word.chars().count());
        }

        let transition_totals = (0..TAG_COUNT)
            .map(|left| {
                self.transitions[left * TAG_COUNT..(left + 1) * TAG_COUNT]
                    .iter()
                    .map(|&c| c as u64)
                    .sum()
            })
            .collect();

        Lexicon {
            words,
            word_freq,
            total_freq,
            max_word_chars,
            bigrams: self.bigrams,
            transitions: self.transitions,
            transition_totals,
            entities: self.entities,
        }
    }
}

impl Default for LexiconBuilder {
    fn default() -> Self {
        Self::new()
    }
}
