//! Property-based tests for the tokenization pipeline.
//!
//! Generates random clauses from a vocabulary mixing lexicon words, entity
//! chars, digits, Latin letters and delimiters, and checks the structural
//! guarantees of `tokenize`.

use proptest::prelude::*;

use super::make_tokenizer;
use crate::tokenizer::split_clauses;

const ALPHABET: &[char] = &[
    '他', '来', '自', '中', '国', '人', '民', '银', '行', '大', '学', '公', '司', '是', '的', '在',
    '工', '作', '生', '说', '去', '年', '月', '日', '今', '天', '上', '午', '一', '三', '十', '百',
    '个', '第', '张', '王', '欧', '阳', '伟', '振', '华', '克', '林', '顿', '特', '朗', '普', '犇',
    '0', '1', '9', '%', 'a', 'b', '，', '。', '！', ' ',
];

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ALPHABET), 0..24)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every clause is covered exactly once by contiguous terms.
    #[test]
    fn prop_terms_cover_each_clause(text in arb_text()) {
        let t = make_tokenizer();
        for clause in t.tokenize_clauses(&text).unwrap() {
            let joined: String = clause.terms.iter().map(|term| term.surface.as_str()).collect();
            prop_assert_eq!(&joined, &clause.text);
            let mut pos = 0;
            for term in &clause.terms {
                prop_assert_eq!(term.start, pos);
                prop_assert_eq!(term.end - term.start, term.surface.chars().count());
                prop_assert!(!term.is_sentinel());
                pos = term.end;
            }
            prop_assert_eq!(pos, clause.text.chars().count());
        }
    }

    /// Same input, same output.
    #[test]
    fn prop_deterministic(text in arb_text()) {
        let t = make_tokenizer();
        prop_assert_eq!(t.tokenize(&text).unwrap(), t.tokenize(&text).unwrap());
    }

    /// `tokenize` is the concatenation of the per-clause results.
    #[test]
    fn prop_tokenize_matches_clauses(text in arb_text()) {
        let t = make_tokenizer();
        let clauses = t.tokenize_clauses(&text).unwrap();
        let flat: Vec<_> = clauses.into_iter().flat_map(|c| c.terms).collect();
        prop_assert_eq!(t.tokenize(&text).unwrap(), flat);
    }

    /// The selected path has the minimal score among the final candidates,
    /// and the first one wins ties.
    #[test]
    fn prop_selection_is_minimal(text in arb_text()) {
        let t = make_tokenizer();
        for (_, clause) in split_clauses(&text) {
            let result = t.explain(clause).unwrap().unwrap();
            let last = result.stages.last().unwrap();
            let min = last.paths.iter().map(|p| p.score).fold(f64::INFINITY, f64::min);
            prop_assert_eq!(result.best_score, min);
            let first_min = last.paths.iter().find(|p| p.score == min).unwrap();
            let best: Vec<String> = result.best.iter().map(|term| term.to_string()).collect();
            prop_assert_eq!(&best.join(" "), &first_min.text);
        }
    }

    /// Clause offsets point at the clause text inside the input.
    #[test]
    fn prop_clause_offsets(text in arb_text()) {
        let chars: Vec<char> = text.chars().collect();
        for (start, clause) in split_clauses(&text) {
            let len = clause.chars().count();
            let slice: String = chars[start..start + len].iter().collect();
            prop_assert_eq!(slice.as_str(), clause);
        }
    }
}
