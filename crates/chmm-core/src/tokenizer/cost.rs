use crate::lexicon::Lexicon;
use crate::settings::settings;
use crate::term::{PosTag, Term, TAG_COUNT};

/// Unigram cost of a lexicon word: `-ln((freq + 1) / (total + V))`.
pub fn word_cost(lexicon: &Lexicon, word: &str) -> f64 {
    let denom = lexicon.total_frequency() as f64 + lexicon.word_count() as f64;
    -((lexicon.frequency(word) as f64 + 1.0) / denom.max(1.0)).ln()
}

/// Smoothed tag-transition cost: `-ln((count(a, b) + 1) / (total(a) + TAGS))`.
pub fn tag_transition_cost(lexicon: &Lexicon, left: PosTag, right: PosTag) -> f64 {
    let count = lexicon.transition(left, right) as f64;
    let total = lexicon.transition_total(left) as f64;
    -((count + 1.0) / (total + TAG_COUNT as f64)).ln()
}

/// Trait for scoring lattice paths during N-best search.
pub(crate) trait CostFunction: Send + Sync {
    fn transition_cost(&self, prev: &Term, next: &Term) -> f64;
}

/// Word co-occurrence cost, interpolating the unigram probability of the
/// left term with the bigram probability of the pair:
///
/// `-ln(λ·P(prev) + (1-λ)·((1-δ)·co(prev, next)/(freq(prev) + 1) + δ))`
///
/// with `δ = 1 / (total + 1)`. The BOS sentinel counts as certain (P = 1).
pub(crate) struct CooccurrenceCost<'a> {
    lexicon: &'a Lexicon,
    smoothing: f64,
}

impl<'a> CooccurrenceCost<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            smoothing: settings().cost.smoothing,
        }
    }
}

impl CostFunction for CooccurrenceCost<'_> {
    fn transition_cost(&self, prev: &Term, next: &Term) -> f64 {
        let lex = self.lexicon;
        let total = lex.total_frequency() as f64;
        let (p_prev, prev_freq) = if prev.tag == PosTag::Begin {
            (1.0, total)
        } else {
            let freq = lex.frequency(&prev.surface) as f64;
            (
                (freq + 1.0) / (total + lex.word_count() as f64).max(1.0),
                freq,
            )
        };
        let delta = 1.0 / (total + 1.0);
        let co = lex.cooccurrence(prev.key(), next.key()) as f64;
        let conditional = (1.0 - delta) * co / (prev_freq + 1.0) + delta;
        let lambda = self.smoothing;
        -(lambda * p_prev + (1.0 - lambda) * conditional).ln()
    }
}
