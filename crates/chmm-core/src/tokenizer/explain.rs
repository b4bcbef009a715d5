use std::fmt::Write as _;

use serde::Serialize;

use crate::term::{PosTag, Term};

use super::{Event, TermGraph, TermPath, TokenizeError, Tokenizer};

/// Full diagnostic result for a single clause.
#[derive(Debug, Serialize)]
pub struct ExplainResult {
    pub clause: String,
    pub char_count: usize,
    pub lattice: Vec<ExplainEdge>,
    pub stages: Vec<ExplainStage>,
    pub best: Vec<Term>,
    pub best_score: f64,
}

/// A lattice edge for diagnostic display.
#[derive(Debug, Serialize)]
pub struct ExplainEdge {
    pub start: usize,
    pub end: usize,
    pub surface: String,
    pub tag: PosTag,
    pub weight: f64,
}

impl From<&Term> for ExplainEdge {
    fn from(t: &Term) -> Self {
        Self {
            start: t.start,
            end: t.end,
            surface: t.surface.clone(),
            tag: t.tag,
            weight: t.weight,
        }
    }
}

/// Candidate set after one stage of the pipeline.
#[derive(Debug, Serialize)]
pub struct ExplainStage {
    pub name: String,
    pub paths: Vec<ExplainPath>,
}

#[derive(Debug, Serialize)]
pub struct ExplainPath {
    /// `surface/tag` pairs separated by spaces.
    pub text: String,
    pub score: f64,
}

impl Tokenizer {
    /// Run the pipeline over one clause and capture every intermediate result.
    ///
    /// Returns `None` for a blank clause.
    pub fn explain(&self, clause: &str) -> Result<Option<ExplainResult>, TokenizeError> {
        let mut lattice = Vec::new();
        let mut stages = Vec::new();
        let best = self.run(clause, &mut |event| match event {
            Event::Lattice(graph) => lattice = edges(graph),
            Event::Stage { name, paths } => stages.push(ExplainStage {
                name: name.to_string(),
                paths: paths.iter().map(|p| self.explain_path(p)).collect(),
            }),
        })?;

        let Some((path, best_score)) = best else {
            return Ok(None);
        };
        let clause = clause.trim().to_string();
        Ok(Some(ExplainResult {
            char_count: clause.chars().count(),
            clause,
            lattice,
            stages,
            best: path.into_inner(),
            best_score,
        }))
    }

    fn explain_path(&self, path: &TermPath) -> ExplainPath {
        ExplainPath {
            text: path.to_string(),
            score: self.scorer.score(path),
        }
    }
}

fn edges(graph: &TermGraph) -> Vec<ExplainEdge> {
    let mut edges: Vec<ExplainEdge> = graph.nodes().iter().map(ExplainEdge::from).collect();
    edges.sort_by_key(|e| (e.start, e.end));
    edges
}

/// Format an ExplainResult as human-readable text.
pub fn format_text(result: &ExplainResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "=== Lattice for \"{}\" ({} chars, {} edges) ===",
        result.clause,
        result.char_count,
        result.lattice.len(),
    );
    for edge in &result.lattice {
        let _ = writeln!(
            out,
            "  [{}..{}] {}/{}  {:.3}",
            edge.start, edge.end, edge.surface, edge.tag, edge.weight
        );
    }

    for stage in &result.stages {
        let _ = writeln!(out, "\n=== {} ({} paths) ===", stage.name, stage.paths.len());
        for (i, path) in stage.paths.iter().enumerate() {
            let _ = writeln!(out, "  #{:<2} {:>8.3}  {}", i + 1, path.score, path.text);
        }
    }

    let best: Vec<String> = result.best.iter().map(Term::to_string).collect();
    let _ = writeln!(out, "\n=== Best ({:.3}) ===\n  {}", result.best_score, best.join(" "));
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::tokenizer::testutil::test_lexicon;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(Arc::new(test_lexicon()))
    }

    #[test]
    fn test_explain_records_every_stage() {
        let t = tokenizer();
        let result = t.explain("他来自中国。").unwrap().unwrap();
        let names: Vec<&str> = result.stages.iter().map(|s| s.name.as_str()).collect();
        let mut expected = vec![super::super::NPATH_STAGE];
        expected.extend(t.recognizer_names());
        assert_eq!(names, expected);
        assert!(!result.lattice.is_empty());
        assert_eq!(result.char_count, 6);
    }

    #[test]
    fn test_explain_best_matches_parse() {
        let t = tokenizer();
        let result = t.explain("他来自中国。").unwrap().unwrap();
        assert_eq!(result.best, t.parse("他来自中国。").unwrap());
        let last = result.stages.last().unwrap();
        let min = last.paths.iter().map(|p| p.score).fold(f64::INFINITY, f64::min);
        assert_eq!(result.best_score, min);
    }

    #[test]
    fn test_explain_blank_clause() {
        assert!(tokenizer().explain("   ").unwrap().is_none());
    }

    #[test]
    fn test_explain_serializes_to_json() {
        let result = tokenizer().explain("中国人民").unwrap().unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["clause"], "中国人民");
        assert!(json["stages"].as_array().is_some_and(|s| !s.is_empty()));
    }

    #[test]
    fn test_format_text() {
        let result = tokenizer().explain("他来自中国。").unwrap().unwrap();
        let text = format_text(&result);
        assert!(text.contains("=== Lattice for \"他来自中国。\""));
        assert!(text.contains("=== nature"));
        assert!(text.contains("=== Best"));
    }
}
