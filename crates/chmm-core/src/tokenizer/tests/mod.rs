mod pluggable;
mod properties;

use std::sync::Arc;

use super::Tokenizer;
use crate::term::Term;
use crate::tokenizer::testutil::test_lexicon;

pub(super) fn make_tokenizer() -> Tokenizer {
    Tokenizer::new(Arc::new(test_lexicon()))
}

/// `surface/tag` for every term.
pub(super) fn render(terms: &[Term]) -> Vec<String> {
    terms.iter().map(Term::to_string).collect()
}
