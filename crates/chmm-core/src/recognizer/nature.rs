use std::sync::Arc;

use tracing::trace;

use crate::lexicon::Lexicon;
use crate::term::{PosTag, Term};
use crate::tokenizer::{tag_transition_cost, TermGraph, TermPath};

use super::Recognizer;

/// Final part-of-speech pass.
///
/// Runs Viterbi over the candidate tags of each term, scoring tag emissions
/// with the lexicon's per-word tag frequencies and transitions with the tag
/// bigram table. Boundaries are never changed, and tags assigned by earlier
/// recognizers stay among the candidates.
pub struct NatureRecognizer {
    lexicon: Arc<Lexicon>,
}

impl NatureRecognizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Candidate tags of a term with their emission costs, most likely first.
    fn candidates(&self, term: &Term) -> Vec<(PosTag, f64)> {
        let entries = self.lexicon.entries(&term.surface);
        let total: f64 = entries.iter().map(|e| f64::from(e.freq)).sum();
        let n = entries.len() as f64;
        let mut out: Vec<(PosTag, f64)> = entries
            .iter()
            .map(|e| (e.tag, -((f64::from(e.freq) + 1.0) / (total + n)).ln()))
            .collect();
        if (term.tag.is_entity() || out.is_empty()) && !out.iter().any(|&(t, _)| t == term.tag) {
            out.push((term.tag, 0.0));
        }
        out
    }

    fn best_tags(&self, terms: &[Term]) -> Vec<PosTag> {
        let lattice: Vec<Vec<(PosTag, f64)>> = terms.iter().map(|t| self.candidates(t)).collect();

        // cost[k], back[i][k] over the candidates of term i
        let mut cost: Vec<f64> = vec![0.0];
        let mut prev_tags: Vec<PosTag> = vec![PosTag::Begin];
        let mut back: Vec<Vec<usize>> = Vec::with_capacity(terms.len());
        for column in &lattice {
            let mut next_cost = Vec::with_capacity(column.len());
            let mut pointers = Vec::with_capacity(column.len());
            for &(tag, emission) in column {
                let (best_k, best) = Self::best_predecessor(&cost, &prev_tags, |prev| {
                    tag_transition_cost(&self.lexicon, prev, tag)
                });
                next_cost.push(best + emission);
                pointers.push(best_k);
            }
            cost = next_cost;
            prev_tags = column.iter().map(|&(t, _)| t).collect();
            back.push(pointers);
        }

        let (mut k, _) = Self::best_predecessor(&cost, &prev_tags, |prev| {
            tag_transition_cost(&self.lexicon, prev, PosTag::End)
        });
        let mut tags = vec![PosTag::X; terms.len()];
        for i in (0..terms.len()).rev() {
            tags[i] = lattice[i][k].0;
            k = back[i][k];
        }
        tags
    }

    /// Index and total cost of the cheapest predecessor; first wins on ties.
    fn best_predecessor(
        cost: &[f64],
        tags: &[PosTag],
        transition: impl Fn(PosTag) -> f64,
    ) -> (usize, f64) {
        let mut best = (0, f64::INFINITY);
        for (k, (&c, &tag)) in cost.iter().zip(tags).enumerate() {
            let total = c + transition(tag);
            if total < best.1 {
                best = (k, total);
            }
        }
        best
    }
}

impl Recognizer for NatureRecognizer {
    fn name(&self) -> &'static str {
        "nature"
    }

    fn process(&self, graph: &TermGraph) -> Vec<TermPath> {
        let Some(base) = graph.base_path() else {
            return Vec::new();
        };
        if base.is_empty() {
            return vec![base];
        }
        let tags = self.best_tags(base.inner());
        trace!(?tags, "nature");
        match base.retagged(&tags) {
            Some(path) => vec![path],
            None => vec![base],
        }
    }
}
