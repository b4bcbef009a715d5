use super::{make_tokenizer, render};
use crate::recognizer::Recognizer;
use crate::term::{PosTag, Term};
use crate::tokenizer::{
    GraphError, LatticeBuilder, PathError, PathGenerator, PathScorer, TermGraph, TermPath,
    TokenizeError, NPATH_STAGE,
};

/// Retags every term of the base path as `nz`.
struct RetagAll;

impl Recognizer for RetagAll {
    fn name(&self) -> &'static str {
        "retag_all"
    }

    fn process(&self, graph: &TermGraph) -> Vec<TermPath> {
        let Some(base) = graph.base_path() else {
            return Vec::new();
        };
        let tags = vec![PosTag::Nz; base.len()];
        base.retagged(&tags).into_iter().collect()
    }
}

/// Drops every path.
struct Swallow;

impl Recognizer for Swallow {
    fn name(&self) -> &'static str {
        "swallow"
    }

    fn process(&self, _graph: &TermGraph) -> Vec<TermPath> {
        Vec::new()
    }
}

/// Keeps a path only when every term is a single char.
struct DropMultiChar;

impl Recognizer for DropMultiChar {
    fn name(&self) -> &'static str {
        "drop_multi_char"
    }

    fn process(&self, graph: &TermGraph) -> Vec<TermPath> {
        match graph.base_path() {
            Some(base) if base.inner().iter().all(|t| t.char_len() == 1) => vec![base],
            _ => Vec::new(),
        }
    }
}

/// Replaces the clause with a single unrelated char.
struct WrongText;

impl Recognizer for WrongText {
    fn name(&self) -> &'static str {
        "wrong_text"
    }

    fn process(&self, _graph: &TermGraph) -> Vec<TermPath> {
        TermPath::from_inner(vec![Term::new("错", 0, PosTag::X, 0.0)])
            .into_iter()
            .collect()
    }
}

/// Every char as its own `x` term.
struct CharLattice;

impl LatticeBuilder for CharLattice {
    fn build(&self, clause: &str) -> TermGraph {
        let mut graph = TermGraph::new(clause);
        for (i, c) in clause.chars().enumerate() {
            graph.add(Term::new(c.to_string(), i, PosTag::X, 1.0));
        }
        graph
    }
}

/// A lattice with no edges at all.
struct EmptyLattice;

impl LatticeBuilder for EmptyLattice {
    fn build(&self, clause: &str) -> TermGraph {
        TermGraph::new(clause)
    }
}

/// Only the single-char path.
struct SinglesOnly;

impl PathGenerator for SinglesOnly {
    fn generate(&self, graph: &TermGraph) -> Vec<TermPath> {
        graph.base_path().into_iter().collect()
    }
}

/// Yields nothing.
struct NoPaths;

impl PathGenerator for NoPaths {
    fn generate(&self, _graph: &TermGraph) -> Vec<TermPath> {
        Vec::new()
    }
}

/// Prefers paths with more terms.
struct MostTerms;

impl PathScorer for MostTerms {
    fn score(&self, path: &TermPath) -> f64 {
        -(path.len() as f64)
    }
}

#[test]
fn test_appended_recognizer_runs_last() {
    let mut t = make_tokenizer();
    t.add_recognizer(Box::new(RetagAll));
    assert_eq!(t.recognizer_names().last(), Some(&"retag_all"));
    let terms = t.parse("他来自中国。").unwrap();
    assert_eq!(render(&terms), vec!["他/nz", "来自/nz", "中国/nz", "。/nz"]);
}

#[test]
fn test_custom_scorer_changes_selection() {
    let mut t = make_tokenizer();
    t.set_path_scorer(Box::new(MostTerms));
    let terms = t.parse("他来自中国。").unwrap();
    let default = make_tokenizer().parse("他来自中国。").unwrap();
    assert!(terms.len() > default.len());
}

#[test]
fn test_custom_lattice_and_generator() {
    let mut t = make_tokenizer();
    t.set_lattice_builder(Box::new(CharLattice))
        .set_path_generator(Box::new(SinglesOnly));
    let terms = t.parse("人民").unwrap();
    // The nature pass still retags single chars from the lexicon.
    assert_eq!(render(&terms), vec!["人/n", "民/n"]);
}

#[test]
fn test_swallowing_recognizer_is_an_error() {
    let mut t = make_tokenizer();
    t.add_recognizer(Box::new(Swallow));
    match t.parse("他来自中国。") {
        Err(TokenizeError::DroppedPath { stage, .. }) => assert_eq!(stage, "swallow"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_recognizer_dropping_some_paths_is_an_error() {
    let mut t = make_tokenizer();
    t.add_recognizer(Box::new(DropMultiChar));
    match t.parse("他来自中国。") {
        Err(TokenizeError::DroppedPath { stage, path }) => {
            assert_eq!(stage, "drop_multi_char");
            assert!(path.contains("来自") || path.contains("中国"), "{path}");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // Paths it keeps pass through untouched.
    let terms = t.parse("他").unwrap();
    assert_eq!(render(&terms), vec!["他/r"]);
}

#[test]
fn test_empty_generator_is_an_error() {
    let mut t = make_tokenizer();
    t.set_path_generator(Box::new(NoPaths));
    match t.parse("他来自中国。") {
        Err(TokenizeError::EmptyCandidates { stage }) => assert_eq!(stage, NPATH_STAGE),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_invalid_path_is_an_error() {
    let mut t = make_tokenizer();
    t.add_recognizer(Box::new(WrongText));
    match t.parse("他来") {
        Err(TokenizeError::InvalidPath { stage, source }) => {
            assert_eq!(stage, "wrong_text");
            assert_eq!(source, PathError::Coverage { expected: 2, found: 1 });
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // Same length, different text.
    match t.parse("他") {
        Err(TokenizeError::InvalidPath { source, .. }) => {
            assert_eq!(source, PathError::TextMismatch)
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_uncovered_lattice_is_an_error() {
    let mut t = make_tokenizer();
    t.set_lattice_builder(Box::new(EmptyLattice));
    assert!(matches!(
        t.parse("中国"),
        Err(TokenizeError::InvalidGraph(GraphError::Uncovered(0)))
    ));
    // Blank input never reaches the lattice builder.
    assert!(t.parse(" ").unwrap().is_empty());
}
