//! Tagged spans of text and the grammatical category set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Co-occurrence key of the beginning-of-sentence sentinel.
pub const BOS_KEY: &str = "<s>";
/// Co-occurrence key of the end-of-sentence sentinel.
pub const EOS_KEY: &str = "</s>";

macro_rules! pos_tags {
    ($($variant:ident => $name:literal, $doc:literal;)+) => {
        /// Grammatical or entity category (ICTCLAS/PKU tag set plus sentinels).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum PosTag {
            $(#[doc = $doc] $variant,)+
        }

        impl PosTag {
            pub const ALL: &'static [PosTag] = &[$(PosTag::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(PosTag::$variant => $name,)+
                }
            }
        }

        impl FromStr for PosTag {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(PosTag::$variant),)+
                    _ => Err(UnknownTag(s.to_string())),
                }
            }
        }
    };
}

pos_tags! {
    Begin => "begin", "Beginning-of-sentence sentinel";
    End => "end", "End-of-sentence sentinel";
    A => "a", "Adjective";
    Ad => "ad", "Adverbial adjective";
    An => "an", "Nominal adjective";
    B => "b", "Distinguishing word";
    C => "c", "Conjunction";
    D => "d", "Adverb";
    E => "e", "Interjection";
    F => "f", "Locative";
    H => "h", "Prefix";
    K => "k", "Suffix";
    M => "m", "Numeral";
    N => "n", "Noun";
    Nr => "nr", "Person name";
    Nrf => "nrf", "Transliterated foreign person name";
    Ns => "ns", "Place name";
    Nt => "nt", "Organization name";
    Nz => "nz", "Other proper noun";
    Nx => "nx", "Latin-script string";
    O => "o", "Onomatopoeia";
    P => "p", "Preposition";
    Q => "q", "Measure word";
    R => "r", "Pronoun";
    S => "s", "Place word";
    T => "t", "Date or time expression";
    U => "u", "Auxiliary";
    V => "v", "Verb";
    Vd => "vd", "Adverbial verb";
    Vn => "vn", "Nominal verb";
    W => "w", "Punctuation";
    X => "x", "Unclassified";
    Y => "y", "Modal particle";
    Z => "z", "Descriptive word";
}

/// Number of tags, including the two sentinels.
pub const TAG_COUNT: usize = PosTag::ALL.len();

impl PosTag {
    /// Dense index for transition tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Categories assigned by entity recognizers.
    pub fn is_entity(self) -> bool {
        matches!(
            self,
            PosTag::M | PosTag::T | PosTag::Nr | PosTag::Nrf | PosTag::Ns | PosTag::Nt | PosTag::Nz
        )
    }

    pub fn is_sentinel(self) -> bool {
        matches!(self, PosTag::Begin | PosTag::End)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown POS tag: {0:?}")]
pub struct UnknownTag(pub String);

/// A tagged span of a clause.
///
/// Offsets are char indices into the clause; `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub surface: String,
    pub start: usize,
    pub end: usize,
    pub tag: PosTag,
    /// Cost of this term on its own (lower = more likely).
    pub weight: f64,
}

impl Term {
    pub fn new(surface: impl Into<String>, start: usize, tag: PosTag, weight: f64) -> Self {
        let surface = surface.into();
        let end = start + surface.chars().count();
        Self {
            surface,
            start,
            end,
            tag,
            weight,
        }
    }

    pub fn bos() -> Self {
        Self {
            surface: String::new(),
            start: 0,
            end: 0,
            tag: PosTag::Begin,
            weight: 0.0,
        }
    }

    pub fn eos(char_count: usize) -> Self {
        Self {
            surface: String::new(),
            start: char_count,
            end: char_count,
            tag: PosTag::End,
            weight: 0.0,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.tag.is_sentinel()
    }

    pub fn char_len(&self) -> usize {
        self.end - self.start
    }

    /// Key used for co-occurrence lookups.
    pub fn key(&self) -> &str {
        match self.tag {
            PosTag::Begin => BOS_KEY,
            PosTag::End => EOS_KEY,
            _ => &self.surface,
        }
    }

    pub fn with_tag(&self, tag: PosTag) -> Self {
        Self {
            tag,
            ..self.clone()
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.surface, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip_names() {
        for &tag in PosTag::ALL {
            assert_eq!(tag.as_str().parse::<PosTag>(), Ok(tag));
        }
        assert!("zz".parse::<PosTag>().is_err());
    }

    #[test]
    fn test_tag_index_is_dense() {
        for (i, &tag) in PosTag::ALL.iter().enumerate() {
            assert_eq!(tag.index(), i);
        }
        assert_eq!(TAG_COUNT, PosTag::ALL.len());
    }

    #[test]
    fn test_tag_serde_uses_name() {
        let json = serde_json::to_string(&PosTag::Nrf).unwrap();
        assert_eq!(json, "\"nrf\"");
        let tag: PosTag = serde_json::from_str("\"ns\"").unwrap();
        assert_eq!(tag, PosTag::Ns);
    }

    #[test]
    fn test_term_new_counts_chars() {
        let t = Term::new("中国", 3, PosTag::Ns, 1.5);
        assert_eq!(t.start, 3);
        assert_eq!(t.end, 5);
        assert_eq!(t.char_len(), 2);
        assert_eq!(t.to_string(), "中国/ns");
    }

    #[test]
    fn test_sentinels() {
        let bos = Term::bos();
        let eos = Term::eos(4);
        assert!(bos.is_sentinel() && eos.is_sentinel());
        assert_eq!((eos.start, eos.end), (4, 4));
        assert_eq!(bos.key(), BOS_KEY);
        assert_eq!(eos.key(), EOS_KEY);
        assert_eq!(Term::new("他", 0, PosTag::R, 0.0).key(), "他");
    }
}
