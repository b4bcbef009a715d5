use clap::{Parser, Subcommand};

use chmm_cli::commands::{config_ops, dict_ops};
use chmm_cli::trace_init::init_tracing;

#[derive(Parser)]
#[command(name = "dictool", about = "Segmentation lexicon build tool")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a text lexicon directory into a binary lexicon file
    Compile {
        /// Directory holding core.dic and the optional tables
        input_dir: String,
        /// Output file
        output_file: String,
    },
    /// Show lexicon statistics
    Info {
        /// Lexicon directory or compiled file
        lexicon: String,
    },
    /// Look up a word (exact match)
    Lookup {
        /// Lexicon directory or compiled file
        lexicon: String,
        word: String,
    },
    /// Common-prefix search (all words that are prefixes of the query)
    Prefix {
        /// Lexicon directory or compiled file
        lexicon: String,
        query: String,
    },
    /// Print the default settings TOML
    SettingsExport,
    /// Validate a settings TOML file
    SettingsValidate { file: String },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Compile {
            input_dir,
            output_file,
        } => dict_ops::compile(&input_dir, &output_file),
        Command::Info { lexicon } => dict_ops::info(&lexicon),
        Command::Lookup { lexicon, word } => dict_ops::lookup(&lexicon, &word),
        Command::Prefix { lexicon, query } => dict_ops::prefix(&lexicon, &query),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
