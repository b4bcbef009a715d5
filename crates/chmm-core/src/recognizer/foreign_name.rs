use std::sync::Arc;

use tracing::trace;

use crate::lexicon::{EntityKind, Lexicon};
use crate::settings::settings;
use crate::term::{PosTag, Term};
use crate::tokenizer::{TermGraph, TermPath};

use super::{with_variants, Recognizer};

/// Proposes transliterated foreign person names (`克林顿`, `特朗普`).
///
/// A maximal run of transliteration chars at least `foreign_name_min_chars`
/// long becomes an `nrf` term; each run yields its own path.
pub struct ForeignNameRecognizer {
    lexicon: Arc<Lexicon>,
}

impl ForeignNameRecognizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    fn is_foreign(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.lexicon
            .is_entity(EntityKind::ForeignName, c.encode_utf8(&mut buf))
    }

    /// Char spans of maximal transliteration runs.
    fn runs(&self, chars: &[char], min_len: usize) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            if !self.is_foreign(chars[start]) {
                start += 1;
                continue;
            }
            let end = chars[start..]
                .iter()
                .position(|&c| !self.is_foreign(c))
                .map_or(chars.len(), |p| start + p);
            if end - start >= min_len {
                runs.push((start, end));
            }
            start = end;
        }
        runs
    }
}

impl Recognizer for ForeignNameRecognizer {
    fn name(&self) -> &'static str {
        "foreign_name"
    }

    fn process(&self, graph: &TermGraph) -> Vec<TermPath> {
        let Some(base) = graph.base_path() else {
            return Vec::new();
        };
        let s = &settings().recognizer;

        let mut variants = Vec::new();
        for (start, end) in self.runs(graph.chars(), s.foreign_name_min_chars) {
            if base
                .inner()
                .iter()
                .any(|t| t.start == start && t.end == end && t.tag == PosTag::Nrf)
            {
                continue;
            }
            let surface = graph.slice(start, end);
            let cost = s.foreign_name_penalty
                + graph.chars()[start..end]
                    .iter()
                    .map(|c| self.lexicon.role_cost(EntityKind::ForeignName, &c.to_string()))
                    .sum::<f64>();
            trace!(surface = %surface, cost, "foreign name candidate");
            variants.extend(graph.splice(Term::new(surface, start, PosTag::Nrf, cost)));
        }
        with_variants(base, variants)
    }
}
