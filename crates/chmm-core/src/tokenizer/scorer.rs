use std::sync::Arc;

use crate::lexicon::Lexicon;

use super::cost::tag_transition_cost;
use super::path::TermPath;

/// Assigns a cost to a complete path; lower is better.
///
/// Implementations must be pure functions of the path.
pub trait PathScorer: Send + Sync {
    fn score(&self, path: &TermPath) -> f64;
}

/// Sum of term weights plus smoothed POS tag-transition costs, sentinels included.
pub struct TransitionPathScorer {
    lexicon: Arc<Lexicon>,
}

impl TransitionPathScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }
}

impl PathScorer for TransitionPathScorer {
    fn score(&self, path: &TermPath) -> f64 {
        let weights: f64 = path.inner().iter().map(|t| t.weight).sum();
        let transitions: f64 = path
            .terms()
            .windows(2)
            .map(|w| tag_transition_cost(&self.lexicon, w[0].tag, w[1].tag))
            .sum();
        weights + transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{PosTag, Term};
    use crate::tokenizer::testutil::test_lexicon;

    fn scorer() -> TransitionPathScorer {
        TransitionPathScorer::new(Arc::new(test_lexicon()))
    }

    #[test]
    fn test_score_sums_weights_and_transitions() {
        let lex = test_lexicon();
        let path = TermPath::from_inner(vec![Term::new("他", 0, PosTag::R, 2.0)]).unwrap();
        let expected = 2.0
            + tag_transition_cost(&lex, PosTag::Begin, PosTag::R)
            + tag_transition_cost(&lex, PosTag::R, PosTag::End);
        assert!((scorer().score(&path) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_attested_tags_score_lower() {
        let good = TermPath::from_inner(vec![
            Term::new("他", 0, PosTag::R, 1.0),
            Term::new("来", 1, PosTag::V, 1.0),
        ])
        .unwrap();
        let bad = good.retagged(&[PosTag::Q, PosTag::E]).unwrap();
        assert!(scorer().score(&good) < scorer().score(&bad));
    }

    #[test]
    fn test_score_is_pure() {
        let s = scorer();
        let path = TermPath::from_inner(vec![Term::new("中国", 0, PosTag::Ns, 3.0)]).unwrap();
        let first = s.score(&path);
        for _ in 0..5 {
            assert_eq!(s.score(&path), first);
        }
    }
}
