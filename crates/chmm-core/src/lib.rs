pub mod lexicon;
pub mod recognizer;
pub mod settings;
pub mod term;
pub mod tokenizer;
pub mod unicode;

pub use lexicon::{Lexicon, LexiconBuilder, LexiconError};
pub use term::{PosTag, Term};
pub use tokenizer::{split_clauses, Clause, TokenizeError, Tokenizer};
