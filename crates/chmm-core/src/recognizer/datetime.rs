use tracing::trace;

use crate::settings::settings;
use crate::term::{PosTag, Term};
use crate::tokenizer::{TermGraph, TermPath};

use super::number::is_numeric;
use super::{with_variants, Recognizer};

/// Calendar and clock units that follow a numeral.
const UNITS: &[&str] = &[
    "年", "月", "日", "号", "时", "点", "分", "秒", "世纪", "年代", "点钟", "刻",
];

/// Merges date and time expressions (`2023年5月1日`, `三点钟`) into one `t` term.
///
/// A piece is a numeral term followed by the term(s) spelling a unit, or a
/// single term that already reads numeral-plus-unit. Adjacent pieces merge
/// together with any `t` terms touching them. `百分`, `千分` and `万分` are
/// fractions and never start a piece.
#[derive(Debug, Default)]
pub struct DateTimeRecognizer;

impl DateTimeRecognizer {
    pub fn new() -> Self {
        Self
    }
}

/// Most terms a unit may be split across (`点` + `钟`).
const MAX_UNIT_TERMS: usize = 2;

fn is_unit(surface: &str) -> bool {
    UNITS.contains(&surface)
}

/// `百分`/`千分`/`万分` open a fraction (`百分之五十`), not a time.
fn is_fraction(numeral: &str, unit: &str) -> bool {
    unit == "分" && matches!(numeral, "百" | "千" | "万")
}

/// Number of terms from `i` whose joined surfaces form a unit, longest first.
fn unit_terms(terms: &[Term], i: usize) -> Option<usize> {
    (1..=MAX_UNIT_TERMS).rev().find(|&take| {
        terms.get(i..i + take).is_some_and(|run| {
            let joined: String = run.iter().map(|t| t.surface.as_str()).collect();
            is_unit(&joined)
        })
    })
}

/// The unit a single term ends with when the rest of it is a numeral.
fn unit_suffix(surface: &str) -> Option<&'static str> {
    UNITS.iter().copied().find(|unit| {
        surface
            .strip_suffix(unit)
            .is_some_and(|numeral| is_numeric(numeral) && !is_fraction(numeral, unit))
    })
}

/// A run of term indices `start..end` that reads as part of a date or time.
struct Piece {
    start: usize,
    end: usize,
    numeric: bool,
}

fn pieces(terms: &[Term]) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < terms.len() {
        let surface = terms[i].surface.as_str();
        if is_numeric(surface) {
            if let Some(take) = unit_terms(terms, i + 1) {
                let unit: String = terms[i + 1..i + 1 + take]
                    .iter()
                    .map(|t| t.surface.as_str())
                    .collect();
                if !is_fraction(surface, &unit) {
                    out.push(Piece { start: i, end: i + 1 + take, numeric: true });
                    i += 1 + take;
                    continue;
                }
            }
        }
        if let Some(unit) = unit_suffix(surface) {
            // `三点` + `钟` completes the longer unit `点钟`.
            let extends = terms
                .get(i + 1)
                .is_some_and(|next| is_unit(&format!("{unit}{}", next.surface)));
            let end = if extends { i + 2 } else { i + 1 };
            out.push(Piece { start: i, end, numeric: true });
            i = end;
            continue;
        }
        if terms[i].tag == PosTag::T {
            out.push(Piece { start: i, end: i + 1, numeric: false });
        }
        i += 1;
    }
    out
}

impl Recognizer for DateTimeRecognizer {
    fn name(&self) -> &'static str {
        "datetime"
    }

    fn process(&self, graph: &TermGraph) -> Vec<TermPath> {
        let Some(base) = graph.base_path() else {
            return Vec::new();
        };
        let cost = settings().recognizer.datetime_cost;
        let terms = base.inner();

        let mut replacements = Vec::new();
        let pieces = pieces(terms);
        for group in pieces.chunk_by(|a, b| a.end == b.start) {
            if !group.iter().any(|p| p.numeric) {
                continue;
            }
            let (first, last) = (group[0].start, group[group.len() - 1].end);
            if last - first == 1 && terms[first].tag == PosTag::T {
                continue;
            }
            let surface: String = terms[first..last].iter().map(|t| t.surface.as_str()).collect();
            trace!(surface = %surface, "date/time");
            replacements.push(Term::new(surface, terms[first].start, PosTag::T, cost));
        }

        if replacements.is_empty() {
            return vec![base];
        }
        let merged = graph.splice_all(replacements);
        with_variants(base, merged)
    }
}
