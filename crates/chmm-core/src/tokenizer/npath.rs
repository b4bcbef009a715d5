use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::lexicon::Lexicon;
use crate::settings::settings;
use crate::term::Term;

use super::cost::{CooccurrenceCost, CostFunction};
use super::graph::TermGraph;
use super::path::{PathKey, TermPath};

/// Expands a lattice into ranked, distinct candidate paths.
///
/// Implementations must return at least one path for a valid graph.
pub trait PathGenerator: Send + Sync {
    fn generate(&self, graph: &TermGraph) -> Vec<TermPath>;
}

/// N-shortest-paths search weighted by word co-occurrence statistics.
pub struct CooccurrenceNPathGenerator {
    lexicon: Arc<Lexicon>,
    nbest: usize,
}

impl CooccurrenceNPathGenerator {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_nbest(lexicon, settings().npath.nbest)
    }

    pub fn with_nbest(lexicon: Arc<Lexicon>, nbest: usize) -> Self {
        Self {
            lexicon,
            nbest: nbest.max(1),
        }
    }
}

impl PathGenerator for CooccurrenceNPathGenerator {
    fn generate(&self, graph: &TermGraph) -> Vec<TermPath> {
        let cost_fn = CooccurrenceCost::new(&self.lexicon);
        nbest_paths(graph, &cost_fn, self.nbest)
            .into_iter()
            .map(|(path, _)| path)
            .collect()
    }
}

/// A single entry in the top-K list for a node: (accumulated cost, previous node index, rank at
/// that node). `prev_rank` identifies which of the K paths at the previous node this entry
/// continues from.
#[derive(Clone, Copy)]
struct KEntry {
    cost: f64,
    prev_idx: Option<usize>,
    prev_rank: usize,
}

/// Run N-best Viterbi: keep top-K cost/backpointer pairs per node.
///
/// Returns up to `n` distinct paths with their costs, best first. Paths with
/// identical boundaries and categories are deduplicated.
pub(crate) fn nbest_paths(
    graph: &TermGraph,
    cost_fn: &dyn CostFunction,
    n: usize,
) -> Vec<(TermPath, f64)> {
    let char_count = graph.char_count();
    let _span = debug_span!("nbest_paths", n, char_count).entered();
    if char_count == 0 || n == 0 {
        return Vec::new();
    }

    let bos = Term::bos();
    let eos = Term::eos(char_count);
    // top_k[node_idx] = sorted Vec of KEntry (ascending cost), max `n` entries
    let mut top_k: Vec<Vec<KEntry>> = vec![Vec::new(); graph.edge_count()];

    for &idx in graph.edges_from(0) {
        top_k[idx].push(KEntry {
            cost: cost_fn.transition_cost(&bos, graph.node(idx)),
            prev_idx: None,
            prev_rank: 0,
        });
    }

    for pos in 1..char_count {
        for &next_idx in graph.edges_from(pos) {
            let next = graph.node(next_idx);
            for &prev_idx in graph.edges_to(pos) {
                if top_k[prev_idx].is_empty() {
                    continue;
                }
                let transition = cost_fn.transition_cost(graph.node(prev_idx), next);
                for rank in 0..top_k[prev_idx].len() {
                    let total = top_k[prev_idx][rank].cost + transition;
                    insert_top_k(
                        &mut top_k[next_idx],
                        n,
                        KEntry {
                            cost: total,
                            prev_idx: Some(prev_idx),
                            prev_rank: rank,
                        },
                    );
                }
            }
        }
    }

    // Collect top-K at EOS
    let mut eos_entries: Vec<(f64, usize, usize)> = Vec::new(); // (total_cost, node_idx, rank)
    for &node_idx in graph.edges_to(char_count) {
        let transition = cost_fn.transition_cost(graph.node(node_idx), &eos);
        for (rank, entry) in top_k[node_idx].iter().enumerate() {
            eos_entries.push((entry.cost + transition, node_idx, rank));
        }
    }
    eos_entries.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut results: Vec<(TermPath, f64)> = Vec::new();
    let mut seen: HashSet<PathKey> = HashSet::new();
    for &(total_cost, end_idx, end_rank) in &eos_entries {
        if results.len() >= n {
            break;
        }
        let mut terms = vec![bos.clone()];
        terms.extend(backtrace(&top_k, end_idx, end_rank, graph));
        terms.push(eos.clone());
        let Ok(path) = TermPath::covering(terms, char_count) else {
            continue;
        };
        if seen.insert(path.key()) {
            results.push((path, total_cost));
        }
    }

    debug!(
        result_count = results.len(),
        best_cost = results.first().map(|(_, c)| *c)
    );
    results
}

/// Insert a KEntry into a top-K list, maintaining ascending sort by cost and max size `k`.
///
/// `Vec::insert` keeps the stable-index invariant that `backtrace` relies on
/// (`prev_rank` indexes into the finalized Vec of a predecessor node).
fn insert_top_k(list: &mut Vec<KEntry>, k: usize, entry: KEntry) {
    let pos = list.partition_point(|e| e.cost <= entry.cost);
    if pos >= k {
        return; // worse than all K existing entries
    }
    list.insert(pos, entry);
    if list.len() > k {
        list.pop();
    }
}

/// Backtrace from a specific (node_idx, rank) to reconstruct the real terms of a path.
fn backtrace(top_k: &[Vec<KEntry>], end_idx: usize, end_rank: usize, graph: &TermGraph) -> Vec<Term> {
    let mut indices = Vec::new();
    let mut cur_idx = end_idx;
    let mut cur_rank = end_rank;

    loop {
        indices.push(cur_idx);
        let entry = &top_k[cur_idx][cur_rank];
        match entry.prev_idx {
            Some(prev) => {
                cur_rank = entry.prev_rank;
                cur_idx = prev;
            }
            None => break,
        }
    }
    indices.reverse();
    indices.into_iter().map(|i| graph.node(i).clone()).collect()
}
