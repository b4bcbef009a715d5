use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::lexicon::Lexicon;
use crate::settings::settings;
use crate::term::{PosTag, Term};
use crate::unicode::{guess_tag, is_decimal_point, is_digit, is_latin};

use super::cost::word_cost;
use super::graph::TermGraph;

/// Builds the initial lattice of a clause.
///
/// Implementations must cover every position with at least one outgoing
/// edge and admit a single-char edge at every position.
pub trait LatticeBuilder: Send + Sync {
    fn build(&self, clause: &str) -> TermGraph;
}

/// Lattice builder backed by lexicon prefix matching.
///
/// Every lexicon word starting at a position becomes one edge tagged with
/// its most frequent category. Digit and Latin runs become atomic edges, and
/// a single-char fallback edge is added wherever the lexicon has no
/// single-char entry, which guarantees connectivity.
pub struct DictLatticeBuilder {
    lexicon: Arc<Lexicon>,
}

impl DictLatticeBuilder {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }
}

impl LatticeBuilder for DictLatticeBuilder {
    fn build(&self, clause: &str) -> TermGraph {
        let mut graph = TermGraph::new(clause);
        let char_count = graph.char_count();
        let _span = debug_span!("build_lattice", char_count).entered();
        let s = settings();

        for start in 0..char_count {
            let lengths = self.lexicon.prefix_lengths(&graph.chars()[start..]);
            for &len in &lengths {
                let word = graph.slice(start, start + len);
                let tag = self.lexicon.dominant_tag(&word).unwrap_or(PosTag::X);
                let weight = word_cost(&self.lexicon, &word);
                graph.add(Term::new(word, start, tag, weight));
            }

            if let Some(end) = atom_end(graph.chars(), start) {
                let atom = graph.slice(start, end);
                let tag = guess_tag(&atom);
                graph.add(Term::new(atom, start, tag, s.cost.atom_cost));
            }

            if !lengths.contains(&1) {
                let ch = graph.slice(start, start + 1);
                let tag = guess_tag(&ch);
                let weight = match tag {
                    PosTag::M | PosTag::Nx => s.cost.atom_cost,
                    _ => s.cost.unknown_char_cost,
                };
                graph.add(Term::new(ch, start, tag, weight));
            }
        }

        debug!(edge_count = graph.edge_count());
        graph
    }
}

/// End of the digit or Latin run starting at `start`, if it is at least two
/// chars long and `start` is the beginning of the run.
fn atom_end(chars: &[char], start: usize) -> Option<usize> {
    let first = chars[start];
    let in_digits = |i: usize| {
        let c = chars[i];
        is_digit(c)
            || (is_decimal_point(c)
                && i > 0
                && is_digit(chars[i - 1])
                && chars.get(i + 1).copied().is_some_and(is_digit))
    };
    let in_latin = |i: usize| is_latin(chars[i]);
    let class: &dyn Fn(usize) -> bool = if is_digit(first) {
        &in_digits
    } else if is_latin(first) {
        &in_latin
    } else {
        return None;
    };
    if start > 0 && class(start - 1) {
        return None;
    }
    let end = (start..chars.len()).find(|&i| !class(i)).unwrap_or(chars.len());
    (end - start >= 2).then_some(end)
}
