use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use chmm_core::tokenizer::explain;
use chmm_core::{Term, TokenizeError, Tokenizer};

use super::dict_ops::open_lexicon;

/// Errors reading or writing snapshot files.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("tokenizing {text:?}: {source}")]
    Tokenize {
        text: String,
        #[source]
        source: TokenizeError,
    },
}

/// Tokenization result for one input line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub text: String,
    /// `surface/tag` per term.
    pub terms: Vec<String>,
}

/// Outcome of comparing current results against a baseline snapshot.
#[derive(Debug, Default, PartialEq)]
pub struct SnapshotDiff {
    pub same: usize,
    /// `(text, baseline, current)` with terms joined by spaces.
    pub changed: Vec<(String, String, String)>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

fn open_tokenizer(lexicon: &str) -> Tokenizer {
    Tokenizer::new(Arc::new(open_lexicon(lexicon)))
}

fn render(terms: &[Term]) -> String {
    terms
        .iter()
        .map(Term::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokenize `text`, or every line of stdin when no text is given.
pub fn tokenize_cmd(lexicon: &str, text: Option<&str>, json: bool) {
    let tokenizer = open_tokenizer(lexicon);
    let emit = |line: &str| {
        if json {
            let clauses = die!(tokenizer.tokenize_clauses(line), "Error: {}");
            let out = die!(serde_json::to_string(&clauses), "Error serializing: {}");
            println!("{out}");
        } else {
            let terms = die!(tokenizer.tokenize(line), "Error: {}");
            println!("{}", render(&terms));
        }
    };

    match text {
        Some(text) => emit(text),
        None => {
            for line in io::stdin().lock().lines() {
                let line = die!(line, "Error reading stdin: {}");
                emit(&line);
            }
        }
    }
}

pub fn explain_cmd(lexicon: &str, clause: &str, json: bool, no_lattice: bool) {
    let tokenizer = open_tokenizer(lexicon);
    let Some(mut result) = die!(tokenizer.explain(clause), "Error: {}") else {
        println!("(blank clause)");
        return;
    };
    if no_lattice {
        result.lattice.clear();
    }
    if json {
        let out = die!(
            serde_json::to_string_pretty(&result),
            "Error serializing: {}"
        );
        println!("{out}");
    } else {
        print!("{}", explain::format_text(&result));
    }
}

/// Non-blank input lines; `#` starts a comment line.
pub fn read_inputs(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn snapshot_entry(tokenizer: &Tokenizer, text: &str) -> Result<SnapshotEntry, SnapshotError> {
    let terms = tokenizer
        .tokenize(text)
        .map_err(|source| SnapshotError::Tokenize {
            text: text.to_string(),
            source,
        })?;
    Ok(SnapshotEntry {
        text: text.to_string(),
        terms: terms.iter().map(Term::to_string).collect(),
    })
}

/// Write one JSON line per input.
pub fn write_snapshot(
    tokenizer: &Tokenizer,
    inputs: &[String],
    out: &mut impl Write,
) -> Result<(), SnapshotError> {
    for text in inputs {
        let entry = snapshot_entry(tokenizer, text)?;
        let line =
            serde_json::to_string(&entry).map_err(|source| SnapshotError::Json { line: 0, source })?;
        writeln!(out, "{line}")?;
    }
    Ok(())
}

pub fn parse_snapshot(content: &str) -> Result<HashMap<String, SnapshotEntry>, SnapshotError> {
    let mut entries = HashMap::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: SnapshotEntry = serde_json::from_str(line)
            .map_err(|source| SnapshotError::Json { line: i + 1, source })?;
        entries.insert(entry.text.clone(), entry);
    }
    Ok(entries)
}

/// Compare `current` results (in input order) against `baseline`.
pub fn diff_snapshot(
    baseline: &HashMap<String, SnapshotEntry>,
    current: &[SnapshotEntry],
) -> SnapshotDiff {
    let mut diff = SnapshotDiff::default();
    for entry in current {
        match baseline.get(&entry.text) {
            Some(base) if base.terms == entry.terms => diff.same += 1,
            Some(base) => diff.changed.push((
                entry.text.clone(),
                base.terms.join(" "),
                entry.terms.join(" "),
            )),
            None => diff.added.push(entry.text.clone()),
        }
    }
    let seen: HashSet<&str> = current.iter().map(|e| e.text.as_str()).collect();
    diff.removed = baseline
        .keys()
        .filter(|k| !seen.contains(k.as_str()))
        .cloned()
        .collect();
    diff.removed.sort();
    diff
}

pub fn snapshot_cmd(lexicon: &str, input_file: &str, output_file: &str) {
    let tokenizer = open_tokenizer(lexicon);
    let content = die!(
        fs::read_to_string(input_file),
        "Error reading {input_file}: {}"
    );
    let inputs = read_inputs(&content);
    let file = die!(
        fs::File::create(Path::new(output_file)),
        "Error creating {output_file}: {}"
    );
    let mut out = BufWriter::new(file);
    die!(write_snapshot(&tokenizer, &inputs, &mut out), "Error: {}");
    die!(out.flush(), "Error writing {output_file}: {}");
    eprintln!("Wrote {} entries to {output_file}", inputs.len());
}

pub fn diff_snapshot_cmd(lexicon: &str, input_file: &str, baseline_file: &str) {
    let tokenizer = open_tokenizer(lexicon);
    let content = die!(
        fs::read_to_string(input_file),
        "Error reading {input_file}: {}"
    );
    let baseline_content = die!(
        fs::read_to_string(baseline_file),
        "Error reading {baseline_file}: {}"
    );
    let baseline = die!(parse_snapshot(&baseline_content), "Error in baseline: {}");

    let current: Vec<SnapshotEntry> = read_inputs(&content)
        .iter()
        .map(|text| die!(snapshot_entry(&tokenizer, text), "Error: {}"))
        .collect();
    let diff = diff_snapshot(&baseline, &current);

    for (text, base, now) in &diff.changed {
        println!("  CHANGED: {text}\n    was: {base}\n    now: {now}");
    }
    for text in &diff.added {
        println!("  NEW:     {text}");
    }
    for text in &diff.removed {
        println!("  REMOVED: {text}");
    }
    println!(
        "\n{} same, {} changed, {} new, {} removed",
        diff.same,
        diff.changed.len(),
        diff.added.len(),
        diff.removed.len()
    );
}
