//! Clause tokenization via lattice construction, N-best path expansion and a
//! cascade of recognizers.
//!
//! Each clause is turned into a `TermGraph`, expanded into several candidate
//! `TermPath`s, rewritten by every recognizer in order, and finally the
//! cheapest path according to the `PathScorer` is returned without its
//! sentinels.

pub(crate) mod cost;
pub mod explain;
mod graph;
mod npath;
mod path;
mod scorer;
mod segmenter;
pub(crate) mod testutil;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::lexicon::{Lexicon, LexiconError};
use crate::recognizer::{default_cascade, Recognizer};
use crate::settings::settings;
use crate::term::Term;

pub use cost::{tag_transition_cost, word_cost};
pub use graph::{GraphError, TermGraph};
pub use npath::{CooccurrenceNPathGenerator, PathGenerator};
pub use path::{PathError, PathKey, TermPath};
pub use scorer::{PathScorer, TransitionPathScorer};
pub use segmenter::{DictLatticeBuilder, LatticeBuilder};

/// Stage name used for the N-best expansion in errors and diagnostics.
pub const NPATH_STAGE: &str = "npath";

/// Internal-consistency failures of the pipeline.
///
/// These indicate a faulty strategy implementation, never bad input.
#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error("lattice violates graph invariants: {0}")]
    InvalidGraph(#[from] GraphError),
    #[error("stage '{stage}' produced no candidate paths")]
    EmptyCandidates { stage: &'static str },
    #[error("recognizer '{stage}' returned no paths for '{path}'")]
    DroppedPath { stage: &'static str, path: String },
    #[error("stage '{stage}' produced an invalid path: {source}")]
    InvalidPath {
        stage: &'static str,
        #[source]
        source: PathError,
    },
}

/// One clause of the input with its terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clause {
    /// Char offset of the trimmed clause in the input text.
    pub start: usize,
    pub text: String,
    /// Terms with offsets relative to `text`.
    pub terms: Vec<Term>,
}

/// Notifications emitted while a clause runs through the pipeline.
pub(crate) enum Event<'a> {
    Lattice(&'a TermGraph),
    Stage {
        name: &'static str,
        paths: &'a [TermPath],
    },
}

/// The pipeline orchestrator.
///
/// Strategies are replaceable at runtime; the recognizer cascade runs in
/// insertion order.
pub struct Tokenizer {
    segmenter: Box<dyn LatticeBuilder>,
    npath: Box<dyn PathGenerator>,
    recognizers: Vec<Box<dyn Recognizer>>,
    scorer: Box<dyn PathScorer>,
}

impl Tokenizer {
    /// A tokenizer with the default strategies and recognizer cascade.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            segmenter: Box::new(DictLatticeBuilder::new(lexicon.clone())),
            npath: Box::new(CooccurrenceNPathGenerator::new(lexicon.clone())),
            recognizers: default_cascade(&lexicon),
            scorer: Box::new(TransitionPathScorer::new(lexicon)),
        }
    }

    /// Load a lexicon (text directory or compiled file) and build a tokenizer on it.
    pub fn open(path: &Path) -> Result<Self, LexiconError> {
        let lexicon = Lexicon::load(path)?;
        Ok(Self::new(Arc::new(lexicon)))
    }

    pub fn set_lattice_builder(&mut self, builder: Box<dyn LatticeBuilder>) -> &mut Self {
        self.segmenter = builder;
        self
    }

    pub fn set_path_generator(&mut self, generator: Box<dyn PathGenerator>) -> &mut Self {
        self.npath = generator;
        self
    }

    pub fn set_path_scorer(&mut self, scorer: Box<dyn PathScorer>) -> &mut Self {
        self.scorer = scorer;
        self
    }

    /// Append a recognizer to the end of the cascade.
    pub fn add_recognizer(&mut self, recognizer: Box<dyn Recognizer>) -> &mut Self {
        self.recognizers.push(recognizer);
        self
    }

    pub fn recognizer_names(&self) -> Vec<&'static str> {
        self.recognizers.iter().map(|r| r.name()).collect()
    }

    /// Tokenize a text clause by clause and concatenate the terms.
    ///
    /// Term offsets are relative to their clause; use `tokenize_clauses` to
    /// map them back into `text`.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Term>, TokenizeError> {
        let mut terms = Vec::new();
        for (_, clause) in split_clauses(text) {
            terms.extend(self.parse(clause)?);
        }
        Ok(terms)
    }

    pub fn tokenize_clauses(&self, text: &str) -> Result<Vec<Clause>, TokenizeError> {
        split_clauses(text)
            .into_iter()
            .map(|(start, clause)| {
                Ok(Clause {
                    start,
                    text: clause.to_string(),
                    terms: self.parse(clause)?,
                })
            })
            .collect()
    }

    /// Tokenize a single clause. Surrounding whitespace is ignored.
    pub fn parse(&self, clause: &str) -> Result<Vec<Term>, TokenizeError> {
        let best = self.run(clause, &mut |_| {})?;
        Ok(best.map(|(path, _)| path.into_inner()).unwrap_or_default())
    }

    /// Run the whole pipeline over one clause and return the selected path
    /// and its score, or `None` for a blank clause.
    pub(crate) fn run(
        &self,
        clause: &str,
        observe: &mut dyn FnMut(Event<'_>),
    ) -> Result<Option<(TermPath, f64)>, TokenizeError> {
        let clause = clause.trim();
        if clause.is_empty() {
            return Ok(None);
        }
        let _span = debug_span!("parse", clause).entered();

        let graph = self.segmenter.build(clause);
        graph.validate()?;
        observe(Event::Lattice(&graph));

        let generated = {
            let _span = debug_span!("stage", name = NPATH_STAGE).entered();
            self.npath.generate(&graph)
        };
        let mut candidates = self.settle(NPATH_STAGE, clause, generated)?;
        observe(Event::Stage {
            name: NPATH_STAGE,
            paths: &candidates,
        });

        for recognizer in &self.recognizers {
            let name = recognizer.name();
            let _span = debug_span!("stage", name).entered();
            let mut next = Vec::with_capacity(candidates.len());
            for path in &candidates {
                let produced = recognizer.process(&TermGraph::from_path(path));
                if produced.is_empty() {
                    return Err(TokenizeError::DroppedPath {
                        stage: name,
                        path: path.to_string(),
                    });
                }
                next.extend(produced);
            }
            candidates = self.settle(name, clause, next)?;
            observe(Event::Stage {
                name,
                paths: &candidates,
            });
        }

        let mut best: Option<(TermPath, f64)> = None;
        for path in candidates {
            let score = self.scorer.score(&path);
            if best.as_ref().map_or(true, |(_, s)| score < *s) {
                best = Some((path, score));
            }
        }
        if let Some((path, score)) = &best {
            debug!(score, terms = path.len(), "selected");
        }
        Ok(best)
    }

    /// Validate, deduplicate and bound the output of one stage.
    fn settle(
        &self,
        stage: &'static str,
        clause: &str,
        paths: Vec<TermPath>,
    ) -> Result<Vec<TermPath>, TokenizeError> {
        if paths.is_empty() {
            return Err(TokenizeError::EmptyCandidates { stage });
        }
        let char_count = clause.chars().count();
        let mut seen: HashSet<PathKey> = HashSet::with_capacity(paths.len());
        let mut out = Vec::with_capacity(paths.len());
        for path in paths {
            let path = TermPath::covering(path.terms().to_vec(), char_count)
                .and_then(|p| {
                    if p.text() == clause {
                        Ok(p)
                    } else {
                        Err(PathError::TextMismatch)
                    }
                })
                .map_err(|source| TokenizeError::InvalidPath { stage, source })?;
            if seen.insert(path.key()) {
                out.push(path);
            }
        }

        let limit = settings().cascade.max_candidates;
        if out.len() > limit {
            let mut scored: Vec<(f64, TermPath)> =
                out.into_iter().map(|p| (self.scorer.score(&p), p)).collect();
            scored.sort_by(|a, b| a.0.total_cmp(&b.0));
            scored.truncate(limit);
            out = scored.into_iter().map(|(_, p)| p).collect();
        }
        debug!(stage, candidates = out.len());
        Ok(out)
    }
}

/// Clause delimiters: comma, period, question and exclamation marks in both
/// widths. Whitespace also delimits.
fn is_delimiter(c: char) -> bool {
    matches!(c, '，' | '。' | '？' | '！' | ',' | '.' | '?' | '!') || c.is_whitespace()
}

/// Split `text` into clauses, each keeping its trailing delimiter.
///
/// Returns the char offset and trimmed text of every clause. Clauses that are
/// blank or consist only of delimiters are skipped.
pub fn split_clauses(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start_byte = 0;
    let mut start_char = 0;
    for (char_idx, (byte_idx, c)) in text.char_indices().enumerate() {
        if is_delimiter(c) {
            let end = byte_idx + c.len_utf8();
            push_clause(&mut out, &text[start_byte..end], start_char);
            start_byte = end;
            start_char = char_idx + 1;
        }
    }
    push_clause(&mut out, &text[start_byte..], start_char);
    out
}

fn push_clause<'a>(out: &mut Vec<(usize, &'a str)>, raw: &'a str, offset: usize) {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().all(is_delimiter) {
        return;
    }
    let lead = raw.chars().take_while(|c| c.is_whitespace()).count();
    out.push((offset + lead, trimmed));
}
