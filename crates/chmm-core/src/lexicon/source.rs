use std::fs;
use std::path::Path;

use tracing::{debug, debug_span, warn};

use super::{EntityKind, Lexicon, LexiconBuilder, LexiconError};
use crate::term::PosTag;

pub(super) const CORE_FILE: &str = "core.dic";
pub(super) const BIGRAM_FILE: &str = "bigram.dic";
pub(super) const TRANSITION_FILE: &str = "tags.tr";
pub(super) const ENTITY_FILE: &str = "entity.dic";

impl Lexicon {
    /// Load a text source directory.
    ///
    /// `core.dic` is required; `bigram.dic`, `tags.tr` and `entity.dic` are
    /// optional. All files are tab-separated with three columns:
    ///
    /// - `core.dic`: `word  tag  freq`
    /// - `bigram.dic`: `left  right  freq` (`<s>` / `</s>` for sentence boundaries)
    /// - `tags.tr`: `left_tag  right_tag  freq`
    /// - `entity.dic`: `kind  text  freq`, kind one of `surname`, `given`,
    ///   `foreign`, `org_suffix`
    pub fn from_dir(dir: &Path) -> Result<Self, LexiconError> {
        let _span = debug_span!("lexicon_from_dir", dir = %dir.display()).entered();
        let core_path = dir.join(CORE_FILE);
        if !core_path.is_file() {
            return Err(LexiconError::NotFound(core_path));
        }

        let mut builder = LexiconBuilder::new();
        read_core(&mut builder, CORE_FILE, &fs::read_to_string(&core_path)?)?;

        for (name, reader) in [
            (BIGRAM_FILE, read_bigrams as Reader),
            (TRANSITION_FILE, read_transitions as Reader),
            (ENTITY_FILE, read_entities as Reader),
        ] {
            let path = dir.join(name);
            if !path.is_file() {
                warn!(file = name, "optional lexicon file missing, skipping");
                continue;
            }
            reader(&mut builder, name, &fs::read_to_string(&path)?)?;
        }

        let lexicon = builder.build();
        debug!(stats = ?lexicon.stats());
        Ok(lexicon)
    }
}

type Reader = fn(&mut LexiconBuilder, &str, &str) -> Result<(), LexiconError>;

/// Non-empty, non-comment lines split into exactly three tab-separated fields.
fn records<'a>(
    file: &'a str,
    text: &'a str,
) -> impl Iterator<Item = Result<(usize, [&'a str; 3]), LexiconError>> + 'a {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
        .map(move |(line_no, line)| {
            let fields: Vec<&str> = line.split('\t').collect();
            match fields.as_slice() {
                [a, b, c] => Ok((line_no, [*a, *b, *c])),
                _ => Err(parse_error(
                    file,
                    line_no,
                    format!("expected 3 tab-separated fields, got {}", fields.len()),
                )),
            }
        })
}

fn parse_error(file: &str, line: usize, reason: impl Into<String>) -> LexiconError {
    LexiconError::Parse {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

fn parse_freq(file: &str, line: usize, field: &str) -> Result<u32, LexiconError> {
    field
        .trim()
        .parse()
        .map_err(|e| parse_error(file, line, format!("invalid frequency {field:?}: {e}")))
}

fn parse_tag(file: &str, line: usize, field: &str) -> Result<PosTag, LexiconError> {
    field
        .trim()
        .parse()
        .map_err(|e| parse_error(file, line, format!("{e}")))
}

pub(super) fn read_core(
    builder: &mut LexiconBuilder,
    file: &str,
    text: &str,
) -> Result<(), LexiconError> {
    for record in records(file, text) {
        let (line, [word, tag, freq]) = record?;
        let tag = parse_tag(file, line, tag)?;
        if tag.is_sentinel() {
            return Err(parse_error(file, line, "sentinel tags are not words"));
        }
        builder.word(word.trim(), tag, parse_freq(file, line, freq)?);
    }
    Ok(())
}

pub(super) fn read_bigrams(
    builder: &mut LexiconBuilder,
    file: &str,
    text: &str,
) -> Result<(), LexiconError> {
    for record in records(file, text) {
        let (line, [left, right, freq]) = record?;
        builder.bigram(left.trim(), right.trim(), parse_freq(file, line, freq)?);
    }
    Ok(())
}

pub(super) fn read_transitions(
    builder: &mut LexiconBuilder,
    file: &str,
    text: &str,
) -> Result<(), LexiconError> {
    for record in records(file, text) {
        let (line, [left, right, freq]) = record?;
        builder.transition(
            parse_tag(file, line, left)?,
            parse_tag(file, line, right)?,
            parse_freq(file, line, freq)?,
        );
    }
    Ok(())
}

pub(super) fn read_entities(
    builder: &mut LexiconBuilder,
    file: &str,
    text: &str,
) -> Result<(), LexiconError> {
    for record in records(file, text) {
        let (line, [kind, entity, freq]) = record?;
        let kind: EntityKind = kind.trim().parse().map_err(|e| parse_error(file, line, e))?;
        builder.entity(kind, entity.trim(), parse_freq(file, line, freq)?);
    }
    Ok(())
}
