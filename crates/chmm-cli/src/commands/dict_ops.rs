use std::fs;
use std::path::Path;
use std::process;

use chmm_core::lexicon::{EntityKind, Lexicon};
use tracing::info;

/// Load a lexicon from a text source directory or a compiled file, or exit.
pub fn open_lexicon(path: &str) -> Lexicon {
    die!(
        Lexicon::load(Path::new(path)),
        "Error opening lexicon at {path}: {}"
    )
}

pub fn compile(input_dir: &str, output_file: &str) {
    let input_path = Path::new(input_dir);
    if !input_path.is_dir() {
        eprintln!("Error: {input_dir} is not a directory");
        process::exit(1);
    }

    let lexicon = die!(Lexicon::from_dir(input_path), "Error parsing lexicon: {}");
    let stats = lexicon.stats();
    info!(input_dir, words = stats.words, "parsed lexicon source");
    eprintln!(
        "Loaded {} words ({} entries), {} bigrams, {} entity entries",
        stats.words, stats.entries, stats.bigrams, stats.entities
    );

    die!(
        lexicon.save(Path::new(output_file)),
        "Error writing lexicon: {}"
    );
    let file_size = fs::metadata(output_file).map(|m| m.len()).unwrap_or(0);
    eprintln!(
        "Wrote {output_file} ({:.1} MB)",
        file_size as f64 / 1_048_576.0
    );
}

pub fn info(path: &str) {
    let lexicon = open_lexicon(path);
    let stats = lexicon.stats();
    println!("Lexicon: {path}");
    println!("  words:        {}", stats.words);
    println!("  entries:      {}", stats.entries);
    println!("  total freq:   {}", stats.total_freq);
    println!("  max length:   {}", lexicon.max_word_chars());
    println!("  bigrams:      {}", stats.bigrams);
    println!("  transitions:  {}", stats.transitions);
    println!("  entities:     {}", stats.entities);
    for kind in EntityKind::ALL {
        println!(
            "    {:<10} max {} chars",
            kind.as_str(),
            lexicon.max_entity_chars(kind)
        );
    }
}

pub fn lookup(path: &str, word: &str) {
    let lexicon = open_lexicon(path);
    let entries = lexicon.entries(word);
    if entries.is_empty() {
        println!("{word}: not found");
    } else {
        println!("{word} (freq {}):", lexicon.frequency(word));
        for e in entries {
            println!("  {:<4} {}", e.tag.as_str(), e.freq);
        }
    }
    for kind in EntityKind::ALL {
        let freq = lexicon.entity_freq(kind, word);
        if freq > 0 {
            println!(
                "  role {:<10} {freq} (cost {:.3})",
                kind.as_str(),
                lexicon.role_cost(kind, word)
            );
        }
    }
}

/// Every lexicon word that is a prefix of `query`.
pub fn prefix(path: &str, query: &str) {
    let lexicon = open_lexicon(path);
    let chars: Vec<char> = query.chars().collect();
    let lengths = lexicon.prefix_lengths(&chars);
    if lengths.is_empty() {
        println!("No prefixes of {query} in lexicon");
        return;
    }
    for len in lengths {
        let word: String = chars[..len].iter().collect();
        let tag = lexicon
            .dominant_tag(&word)
            .map(|t| t.as_str())
            .unwrap_or("?");
        println!("  {word}/{tag}  freq {}", lexicon.frequency(&word));
    }
}
