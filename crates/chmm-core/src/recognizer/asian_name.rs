use std::sync::Arc;

use tracing::trace;

use crate::lexicon::{EntityKind, Lexicon};
use crate::settings::settings;
use crate::term::{PosTag, Term};
use crate::tokenizer::{TermGraph, TermPath};
use crate::unicode::is_han;

use super::{with_variants, Recognizer};

const MAX_GIVEN_CHARS: usize = 2;

/// Proposes Chinese person names: a surname followed by one or two
/// given-name chars.
///
/// Each proposal becomes its own competing path so that the scorer decides
/// between, say, a 2+1 and a 2+2 split. Compound surnames are tried before
/// single-char ones.
pub struct AsianNameRecognizer {
    lexicon: Arc<Lexicon>,
}

struct Candidate {
    start: usize,
    end: usize,
    cost: f64,
}

impl AsianNameRecognizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    fn candidates(&self, graph: &TermGraph) -> Vec<Candidate> {
        let chars = graph.chars();
        let n = chars.len();
        let max_surname = self.lexicon.max_entity_chars(EntityKind::Surname);
        let penalty = settings().recognizer.name_penalty;

        let mut out = Vec::new();
        for start in 0..n {
            for surname_len in (1..=max_surname.min(n - start)).rev() {
                let surname = graph.slice(start, start + surname_len);
                if !self.lexicon.is_entity(EntityKind::Surname, &surname) {
                    continue;
                }
                let surname_cost = self.lexicon.role_cost(EntityKind::Surname, &surname);

                let mut cost = penalty + surname_cost;
                let given_start = start + surname_len;
                for end in given_start + 1..=(given_start + MAX_GIVEN_CHARS).min(n) {
                    let c = chars[end - 1];
                    let given = c.to_string();
                    if !is_han(c) || !self.lexicon.is_entity(EntityKind::GivenName, &given) {
                        break;
                    }
                    cost += self.lexicon.role_cost(EntityKind::GivenName, &given);
                    out.push(Candidate { start, end, cost });
                }
            }
        }
        out
    }
}

impl Recognizer for AsianNameRecognizer {
    fn name(&self) -> &'static str {
        "asian_name"
    }

    fn process(&self, graph: &TermGraph) -> Vec<TermPath> {
        let Some(base) = graph.base_path() else {
            return Vec::new();
        };
        let known = |c: &Candidate| {
            base.inner()
                .iter()
                .any(|t| t.start == c.start && t.end == c.end && t.tag == PosTag::Nr)
        };

        let mut candidates: Vec<Candidate> = self
            .candidates(graph)
            .into_iter()
            .filter(|c| !known(c))
            .collect();
        candidates.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        candidates.truncate(settings().recognizer.max_variants);

        let variants: Vec<TermPath> = candidates
            .iter()
            .filter_map(|c| {
                let surface = graph.slice(c.start, c.end);
                trace!(surface = %surface, cost = c.cost, "name candidate");
                graph.splice(Term::new(surface, c.start, PosTag::Nr, c.cost))
            })
            .collect();
        with_variants(base, variants)
    }
}
