use clap::{Parser, Subcommand};

use chmm_cli::commands::{config_ops, segment_ops};
use chmm_cli::trace_init::init_tracing;

#[derive(Parser)]
#[command(name = "segtool", about = "Chinese segmentation and tagging diagnostics")]
struct Cli {
    /// Settings TOML to use instead of the built-in defaults
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tokenize text (reads stdin line by line when no text is given)
    Tokenize {
        /// Lexicon directory or compiled file
        lexicon: String,
        text: Option<String>,
        /// Output one JSON array of clauses per input line
        #[arg(long)]
        json: bool,
    },
    /// Explain the pipeline for a single clause
    Explain {
        /// Lexicon directory or compiled file
        lexicon: String,
        clause: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Omit lattice edges from the output
        #[arg(long)]
        no_lattice: bool,
    },
    /// Tokenize every line of a file and record the results to JSONL
    Snapshot {
        /// Lexicon directory or compiled file
        lexicon: String,
        /// Input file (one text per line, `#` comments)
        input_file: String,
        /// Output JSONL file
        output_file: String,
    },
    /// Compare current results against a snapshot
    DiffSnapshot {
        /// Lexicon directory or compiled file
        lexicon: String,
        /// Input file (one text per line, `#` comments)
        input_file: String,
        /// Baseline JSONL file
        baseline_file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    config_ops::load_settings(cli.settings.as_deref());

    match cli.command {
        Command::Tokenize {
            lexicon,
            text,
            json,
        } => segment_ops::tokenize_cmd(&lexicon, text.as_deref(), json),
        Command::Explain {
            lexicon,
            clause,
            json,
            no_lattice,
        } => segment_ops::explain_cmd(&lexicon, &clause, json, no_lattice),
        Command::Snapshot {
            lexicon,
            input_file,
            output_file,
        } => segment_ops::snapshot_cmd(&lexicon, &input_file, &output_file),
        Command::DiffSnapshot {
            lexicon,
            input_file,
            baseline_file,
        } => segment_ops::diff_snapshot_cmd(&lexicon, &input_file, &baseline_file),
    }
}
