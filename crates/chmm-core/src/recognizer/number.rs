use tracing::trace;

use crate::settings::settings;
use crate::term::{PosTag, Term};
use crate::tokenizer::{TermGraph, TermPath};
use crate::unicode::{is_decimal_point, is_digit, is_numeral, is_percent};

use super::{with_variants, Recognizer};

const ORDINAL_PREFIX: &str = "第";

/// Merges numeral expressions into single `m` terms.
///
/// A run of two or more consecutive numeric terms, optionally led by the
/// ordinal prefix `第` and closed by a percent sign, becomes one term. A lone digit term that the lexicon
/// tagged otherwise is retagged `m`.
#[derive(Debug, Default)]
pub struct NumberRecognizer;

impl NumberRecognizer {
    pub fn new() -> Self {
        Self
    }
}

/// Numerals with interior decimal points and an optional trailing percent sign.
pub(crate) fn is_numeric(surface: &str) -> bool {
    let chars: Vec<char> = surface.chars().collect();
    let body = match chars.split_last() {
        Some((&last, rest)) if is_percent(last) => rest,
        _ => &chars[..],
    };
    match (body.first(), body.last()) {
        (Some(&first), Some(&last)) if is_numeral(first) && is_numeral(last) => body
            .iter()
            .all(|&c| is_numeral(c) || is_decimal_point(c)),
        _ => false,
    }
}

fn is_percent_sign(surface: &str) -> bool {
    let mut chars = surface.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if is_percent(c))
}

impl Recognizer for NumberRecognizer {
    fn name(&self) -> &'static str {
        "number"
    }

    fn process(&self, graph: &TermGraph) -> Vec<TermPath> {
        let Some(base) = graph.base_path() else {
            return Vec::new();
        };
        let cost = settings().recognizer.number_cost;
        let terms = base.inner();

        let mut replacements = Vec::new();
        let mut i = 0;
        while i < terms.len() {
            let ordinal = terms[i].surface == ORDINAL_PREFIX;
            let first_numeric = i + usize::from(ordinal);
            let end = terms[first_numeric..]
                .iter()
                .position(|t| !is_numeric(&t.surface))
                .map_or(terms.len(), |p| first_numeric + p);
            if end == first_numeric {
                i += 1;
                continue;
            }
            // A separate `%` closes the number.
            let end = if terms.get(end).is_some_and(|t| is_percent_sign(&t.surface)) {
                end + 1
            } else {
                end
            };

            let run = &terms[i..end];
            if run.len() >= 2 {
                let surface: String = run.iter().map(|t| t.surface.as_str()).collect();
                trace!(surface = %surface, "merged number");
                replacements.push(Term::new(surface, run[0].start, PosTag::M, cost));
            } else if run[0].tag != PosTag::M && run[0].surface.chars().all(is_digit) {
                replacements.push(run[0].with_tag(PosTag::M));
            }
            i = end;
        }

        if replacements.is_empty() {
            return vec![base];
        }
        let merged = graph.splice_all(replacements);
        with_variants(base, merged)
    }
}
