use std::fmt;

use crate::term::{PosTag, Term};

/// Why a term sequence is not a valid BOS-to-EOS traversal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path does not start with BOS")]
    MissingBos,
    #[error("path does not end with EOS")]
    MissingEos,
    #[error("sentinel inside path at index {index}")]
    MisplacedSentinel { index: usize },
    #[error("gap at index {index}: expected start {expected}, found {found}")]
    Gap {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("term {index} spans {span} chars but its surface has {surface}")]
    SpanMismatch {
        index: usize,
        span: usize,
        surface: usize,
    },
    #[error("EOS at {found}, expected {expected}")]
    Coverage { expected: usize, found: usize },
    #[error("path text differs from the clause")]
    TextMismatch,
}

/// Boundaries and categories of a path; two paths are distinct iff their keys differ.
pub type PathKey = Vec<(usize, usize, PosTag)>;

/// One complete segmentation hypothesis: `BOS, t1, ..., tn, EOS`.
///
/// Constructed only through validating constructors, so every `TermPath`
/// starts with BOS, ends with EOS and is contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct TermPath {
    terms: Vec<Term>,
}

impl TermPath {
    /// Validate a full term sequence, sentinels included.
    pub fn new(terms: Vec<Term>) -> Result<Self, PathError> {
        match terms.first() {
            Some(t) if t.tag == PosTag::Begin && t.start == 0 && t.end == 0 => {}
            _ => return Err(PathError::MissingBos),
        }
        let last = terms.len() - 1;
        if last == 0 || terms[last].tag != PosTag::End {
            return Err(PathError::MissingEos);
        }

        let mut pos = 0;
        for (index, term) in terms.iter().enumerate().skip(1) {
            if term.is_sentinel() && index != last {
                return Err(PathError::MisplacedSentinel { index });
            }
            if term.start != pos {
                return Err(PathError::Gap {
                    index,
                    expected: pos,
                    found: term.start,
                });
            }
            let surface = term.surface.chars().count();
            if term.end < term.start || term.end - term.start != surface {
                return Err(PathError::SpanMismatch {
                    index,
                    span: term.end.saturating_sub(term.start),
                    surface,
                });
            }
            pos = term.end;
        }
        Ok(Self { terms })
    }

    /// Wrap real terms with BOS and EOS sentinels.
    pub fn from_inner(inner: Vec<Term>) -> Result<Self, PathError> {
        let end = inner.last().map(|t| t.end).unwrap_or(0);
        let mut terms = Vec::with_capacity(inner.len() + 2);
        terms.push(Term::bos());
        terms.extend(inner);
        terms.push(Term::eos(end));
        Self::new(terms)
    }

    /// Like `new`, additionally requiring the path to cover exactly `char_count` chars.
    pub fn covering(terms: Vec<Term>, char_count: usize) -> Result<Self, PathError> {
        let path = Self::new(terms)?;
        let found = path.char_count();
        if found != char_count {
            return Err(PathError::Coverage {
                expected: char_count,
                found,
            });
        }
        Ok(path)
    }

    /// All terms, sentinels included.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Real terms, without the BOS/EOS sentinels.
    pub fn inner(&self) -> &[Term] {
        &self.terms[1..self.terms.len() - 1]
    }

    pub fn into_inner(mut self) -> Vec<Term> {
        self.terms.pop();
        self.terms.remove(0);
        self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn char_count(&self) -> usize {
        self.terms[self.terms.len() - 1].end
    }

    /// The clause text this path segments.
    pub fn text(&self) -> String {
        self.inner().iter().map(|t| t.surface.as_str()).collect()
    }

    pub fn key(&self) -> PathKey {
        self.terms.iter().map(|t| (t.start, t.end, t.tag)).collect()
    }

    /// Same boundaries with new tags for the real terms.
    ///
    /// Returns `None` if `tags` does not match the number of real terms.
    pub fn retagged(&self, tags: &[PosTag]) -> Option<Self> {
        if tags.len() != self.len() {
            return None;
        }
        let mut terms = self.terms.clone();
        for (term, &tag) in terms[1..].iter_mut().zip(tags) {
            term.tag = tag;
        }
        Some(Self { terms })
    }
}

impl fmt::Display for TermPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.inner().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(surface: &str, start: usize, tag: PosTag) -> Term {
        Term::new(surface, start, tag, 1.0)
    }

    #[test]
    fn test_from_inner_adds_sentinels() {
        let path =
            TermPath::from_inner(vec![t("他", 0, PosTag::R), t("来自", 1, PosTag::V)]).unwrap();
        assert_eq!(path.terms().len(), 4);
        assert_eq!(path.terms()[0].tag, PosTag::Begin);
        assert_eq!(path.terms()[3], Term::eos(3));
        assert_eq!(path.len(), 2);
        assert_eq!(path.char_count(), 3);
        assert_eq!(path.text(), "他来自");
        assert_eq!(path.to_string(), "他/r 来自/v");
    }

    #[test]
    fn test_empty_inner_is_valid() {
        let path = TermPath::from_inner(Vec::new()).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.char_count(), 0);
    }

    #[test]
    fn test_rejects_missing_bos() {
        let err = TermPath::new(vec![t("他", 0, PosTag::R), Term::eos(1)]).unwrap_err();
        assert_eq!(err, PathError::MissingBos);
        assert_eq!(TermPath::new(Vec::new()).unwrap_err(), PathError::MissingBos);
    }

    #[test]
    fn test_rejects_missing_eos() {
        let err = TermPath::new(vec![Term::bos(), t("他", 0, PosTag::R)]).unwrap_err();
        assert_eq!(err, PathError::MissingEos);
        assert_eq!(
            TermPath::new(vec![Term::bos()]).unwrap_err(),
            PathError::MissingEos
        );
    }

    #[test]
    fn test_rejects_gap() {
        let err = TermPath::new(vec![
            Term::bos(),
            t("他", 0, PosTag::R),
            t("自", 2, PosTag::P),
            Term::eos(3),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            PathError::Gap {
                index: 2,
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_rejects_inner_sentinel() {
        let err = TermPath::new(vec![
            Term::bos(),
            t("他", 0, PosTag::R),
            Term::eos(1),
            Term::eos(1),
        ])
        .unwrap_err();
        assert_eq!(err, PathError::MisplacedSentinel { index: 2 });
    }

    #[test]
    fn test_rejects_span_mismatch() {
        let mut bad = t("来自", 0, PosTag::V);
        bad.end = 1;
        let err = TermPath::new(vec![Term::bos(), bad, Term::eos(1)]).unwrap_err();
        assert!(matches!(err, PathError::SpanMismatch { index: 1, .. }));
    }

    #[test]
    fn test_covering_checks_length() {
        let terms = vec![Term::bos(), t("他", 0, PosTag::R), Term::eos(1)];
        assert!(TermPath::covering(terms.clone(), 1).is_ok());
        assert_eq!(
            TermPath::covering(terms, 2).unwrap_err(),
            PathError::Coverage {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_key_distinguishes_tags() {
        let a = TermPath::from_inner(vec![t("中国", 0, PosTag::Ns)]).unwrap();
        let b = TermPath::from_inner(vec![t("中国", 0, PosTag::Nt)]).unwrap();
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), a.clone().key());
    }

    #[test]
    fn test_retagged() {
        let path =
            TermPath::from_inner(vec![t("他", 0, PosTag::X), t("来", 1, PosTag::X)]).unwrap();
        let retagged = path.retagged(&[PosTag::R, PosTag::V]).unwrap();
        assert_eq!(retagged.to_string(), "他/r 来/v");
        assert_eq!(retagged.terms()[0].tag, PosTag::Begin);
        assert_eq!(retagged.terms()[3].tag, PosTag::End);
        assert!(path.retagged(&[PosTag::R]).is_none());
    }

    #[test]
    fn test_into_inner_strips_sentinels() {
        let path = TermPath::from_inner(vec![t("他", 0, PosTag::R)]).unwrap();
        let inner = path.into_inner();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].surface, "他");
    }
}
