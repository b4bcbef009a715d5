//! Entity recognizers applied as a cascade over candidate paths.
//!
//! Each recognizer receives a graph rebuilt from one candidate path and
//! returns replacement paths in which recognized spans are merged or
//! retagged. The unchanged input path is always part of the output, so a
//! recognizer that finds nothing never loses a hypothesis.

mod asian_name;
mod company;
mod datetime;
mod foreign_name;
mod nature;
mod number;

use std::collections::HashSet;
use std::sync::Arc;

use crate::lexicon::Lexicon;
use crate::tokenizer::{PathKey, TermGraph, TermPath};

pub use asian_name::AsianNameRecognizer;
pub use company::CompanyRecognizer;
pub use datetime::DateTimeRecognizer;
pub use foreign_name::ForeignNameRecognizer;
pub use nature::NatureRecognizer;
pub use number::NumberRecognizer;

/// One stage of the recognition cascade.
pub trait Recognizer: Send + Sync {
    /// Short stable name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Produce replacement paths for the path `graph` was rebuilt from.
    ///
    /// Must return at least one path for a graph with a base path.
    fn process(&self, graph: &TermGraph) -> Vec<TermPath>;
}

/// The standard cascade: numbers, domestic names, organizations, foreign
/// names, dates/times, then part-of-speech disambiguation.
pub fn default_cascade(lexicon: &Arc<Lexicon>) -> Vec<Box<dyn Recognizer>> {
    vec![
        Box::new(NumberRecognizer::new()),
        Box::new(AsianNameRecognizer::new(lexicon.clone())),
        Box::new(CompanyRecognizer::new(lexicon.clone())),
        Box::new(ForeignNameRecognizer::new(lexicon.clone())),
        Box::new(DateTimeRecognizer::new()),
        Box::new(NatureRecognizer::new(lexicon.clone())),
    ]
}

/// `base` followed by each variant not already present, in order.
fn with_variants(base: TermPath, variants: impl IntoIterator<Item = TermPath>) -> Vec<TermPath> {
    let mut seen: HashSet<PathKey> = HashSet::new();
    seen.insert(base.key());
    let mut out = vec![base];
    for variant in variants {
        if seen.insert(variant.key()) {
            out.push(variant);
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::term::{PosTag, Term};
    use crate::tokenizer::{TermGraph, TermPath};

    /// Build a path from `(surface, tag)` pairs with unit weights.
    pub fn path_of(parts: &[(&str, PosTag)]) -> TermPath {
        let mut pos = 0;
        let terms = parts
            .iter()
            .map(|&(surface, tag)| {
                let term = Term::new(surface, pos, tag, 1.0);
                pos = term.end;
                term
            })
            .collect();
        TermPath::from_inner(terms).unwrap()
    }

    pub fn graph_of(parts: &[(&str, PosTag)]) -> TermGraph {
        TermGraph::from_path(&path_of(parts))
    }

    /// Render each path as `surface/tag` pairs joined by spaces.
    pub fn render(paths: &[TermPath]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }
}
