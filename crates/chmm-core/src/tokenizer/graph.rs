use crate::settings::settings;
use crate::term::Term;
use crate::unicode::guess_tag;

use super::path::{PathError, TermPath};

/// Structural defects of a `TermGraph`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("no outgoing edge at position {0}")]
    Uncovered(usize),
    #[error("edge {index} has invalid span {start}..{end}")]
    InvalidSpan {
        index: usize,
        start: usize,
        end: usize,
    },
    #[error("edge {index} surface does not match the clause text")]
    SurfaceMismatch { index: usize },
}

/// The lattice: candidate terms over the char positions `0..=char_count` of a clause.
///
/// Nodes are stored in an arena; `by_start[p]` / `by_end[p]` index the terms
/// that start / end at position `p`. A graph rebuilt from a path remembers
/// that path as its `primary` path.
#[derive(Debug, Clone)]
pub struct TermGraph {
    text: String,
    chars: Vec<char>,
    nodes: Vec<Term>,
    by_start: Vec<Vec<usize>>,
    by_end: Vec<Vec<usize>>,
    primary: Option<TermPath>,
}

impl TermGraph {
    /// An empty graph over `text`.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let n = chars.len();
        Self {
            text: text.to_string(),
            chars,
            nodes: Vec::new(),
            by_start: vec![Vec::new(); n + 1],
            by_end: vec![Vec::new(); n + 1],
            primary: None,
        }
    }

    /// Rebuild a graph from a path.
    ///
    /// Every term of the path becomes an edge, and every multi-char term is
    /// re-exploded into single-char fallback edges so later stages can
    /// re-segment around it.
    pub fn from_path(path: &TermPath) -> Self {
        let mut graph = Self::new(&path.text());
        let fallback_cost = settings().cost.unknown_char_cost;
        for term in path.inner() {
            graph.add(term.clone());
        }
        for term in path.inner() {
            if term.char_len() <= 1 {
                continue;
            }
            for (offset, c) in term.surface.chars().enumerate() {
                let surface = c.to_string();
                let tag = guess_tag(&surface);
                graph.add(Term::new(surface, term.start + offset, tag, fallback_cost));
            }
        }
        graph.primary = Some(path.clone());
        graph
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn char_count(&self) -> usize {
        self.chars.len()
    }

    /// The clause text in `start..end` (char positions).
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    /// Add an edge. Exact duplicates (same span, surface and tag) are ignored.
    pub fn add(&mut self, term: Term) {
        let start = term.start.min(self.chars.len());
        if self.by_start[start].iter().any(|&i| {
            let t = &self.nodes[i];
            t.end == term.end && t.tag == term.tag && t.surface == term.surface
        }) {
            return;
        }
        let idx = self.nodes.len();
        self.by_start[start].push(idx);
        self.by_end[term.end.min(self.chars.len())].push(idx);
        self.nodes.push(term);
    }

    pub fn nodes(&self) -> &[Term] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &Term {
        &self.nodes[idx]
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.len()
    }

    /// Arena indices of the edges leaving position `pos`.
    pub fn edges_from(&self, pos: usize) -> &[usize] {
        self.by_start.get(pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Arena indices of the edges arriving at position `pos`.
    pub fn edges_to(&self, pos: usize) -> &[usize] {
        self.by_end.get(pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First single-char edge leaving `pos`.
    pub fn single(&self, pos: usize) -> Option<&Term> {
        self.edges_from(pos)
            .iter()
            .map(|&i| &self.nodes[i])
            .find(|t| t.char_len() == 1)
    }

    /// The path this graph was rebuilt from, if any.
    pub fn primary(&self) -> Option<&TermPath> {
        self.primary.as_ref()
    }

    /// The primary path, or the path of single-char edges when there is none.
    pub fn base_path(&self) -> Option<TermPath> {
        if let Some(primary) = &self.primary {
            return Some(primary.clone());
        }
        let singles: Option<Vec<Term>> = (0..self.char_count())
            .map(|p| self.single(p).cloned())
            .collect();
        TermPath::from_inner(singles?).ok()
    }

    /// Check the graph invariants: valid spans whose surfaces match the text,
    /// and at least one outgoing edge at every position before the end.
    pub fn validate(&self) -> Result<(), GraphError> {
        let n = self.chars.len();
        for (index, term) in self.nodes.iter().enumerate() {
            if term.start >= term.end || term.end > n {
                return Err(GraphError::InvalidSpan {
                    index,
                    start: term.start,
                    end: term.end,
                });
            }
            if !term.surface.chars().eq(self.chars[term.start..term.end].iter().copied()) {
                return Err(GraphError::SurfaceMismatch { index });
            }
        }
        if let Some(pos) = (0..n).find(|&p| self.by_start[p].is_empty()) {
            return Err(GraphError::Uncovered(pos));
        }
        Ok(())
    }

    /// Replace one span of the base path by `replacement`.
    pub fn splice(&self, replacement: Term) -> Option<TermPath> {
        self.splice_all(vec![replacement])
    }

    /// Replace several non-overlapping spans of the base path at once.
    ///
    /// Base terms fully inside a replacement are dropped; the uncovered parts
    /// of base terms that only partially overlap are filled with this graph's
    /// single-char edges. Returns `None` if replacements overlap, fall outside
    /// the clause, or a needed single-char edge is missing.
    pub fn splice_all(&self, mut replacements: Vec<Term>) -> Option<TermPath> {
        let base = self.base_path()?;
        replacements.sort_by_key(|t| t.start);
        let n = self.char_count();
        if replacements.windows(2).any(|w| w[0].end > w[1].start)
            || replacements.iter().any(|t| t.start >= t.end || t.end > n)
        {
            return None;
        }

        let mut out: Vec<Term> = Vec::with_capacity(base.len() + replacements.len());
        let mut pending = replacements.into_iter().peekable();
        let mut pos = 0;
        for term in base.inner() {
            // Emit replacements that start inside or at the start of this term.
            while let Some(r) = pending.next_if(|r| r.start < term.end) {
                self.fill_singles(&mut out, pos, r.start)?;
                pos = r.end;
                out.push(r);
            }
            if term.end <= pos {
                continue;
            }
            if term.start >= pos {
                out.push(term.clone());
            } else {
                self.fill_singles(&mut out, pos, term.end)?;
            }
            pos = term.end;
        }
        TermPath::covering(Self::with_sentinels(out, n), n).ok()
    }

    fn fill_singles(&self, out: &mut Vec<Term>, from: usize, to: usize) -> Option<()> {
        for p in from..to {
            out.push(self.single(p)?.clone());
        }
        Some(())
    }

    fn with_sentinels(inner: Vec<Term>, char_count: usize) -> Vec<Term> {
        let mut terms = Vec::with_capacity(inner.len() + 2);
        terms.push(Term::bos());
        terms.extend(inner);
        terms.push(Term::eos(char_count));
        terms
    }
}

impl From<&TermPath> for TermGraph {
    fn from(path: &TermPath) -> Self {
        Self::from_path(path)
    }
}

impl TryFrom<&TermGraph> for TermPath {
    type Error = PathError;

    /// Linearize a graph to its base path.
    fn try_from(graph: &TermGraph) -> Result<Self, Self::Error> {
        graph.base_path().ok_or(PathError::Coverage {
            expected: graph.char_count(),
            found: 0,
        })
    }
}
