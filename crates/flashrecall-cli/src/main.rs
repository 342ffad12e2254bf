//! flashrecall CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use flashrecall_core::keywords::ScoreMode;
use flashrecall_core::model::{Difficulty, DisplayMode, PauseMode};
use flashrecall_core::notes::DEFAULT_CATEGORY;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "flashrecall", version, about = "Story memorization trainer")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story, then test your recall
    Play {
        /// Difficulty tier to pick from: simple, medium, hard
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Play this story instead of picking an unread one
        #[arg(long)]
        story: Option<String>,

        /// Delay between reveals in milliseconds
        #[arg(long)]
        delay: Option<i64>,

        /// Display mode: full or word
        #[arg(long)]
        display: Option<DisplayMode>,

        /// Pause mode: auto, unit or sentence
        #[arg(long)]
        pause: Option<PauseMode>,

        /// Narrate with the configured speech command
        #[arg(long)]
        speech: bool,

        /// Hide memory notes
        #[arg(long)]
        no_notes: bool,

        /// Scoring mode: positional or keywords
        #[arg(long)]
        mode: Option<ScoreMode>,
    },

    /// Score a recall attempt against a story
    Score {
        /// Story title
        #[arg(long)]
        story: String,

        /// The attempt; read from stdin when omitted
        #[arg(long)]
        attempt: Option<String>,

        /// Only check the last N sentences
        #[arg(long)]
        last: Option<usize>,

        /// Scoring mode: positional or keywords
        #[arg(long)]
        mode: Option<ScoreMode>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List stories and whether they have been played
    List {
        /// Only show one difficulty tier
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },

    /// Check a story catalog for problems
    Validate {
        /// Catalog file; defaults to the configured source
        #[arg(long)]
        stories: Option<PathBuf>,
    },

    /// Forget which stories have been played
    Reset,

    /// Manage memory-aid notes
    Notes {
        #[command(subcommand)]
        command: NotesCommand,
    },

    /// Edit the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Create a starter config and story catalog
    Init,
}

#[derive(Subcommand)]
pub enum NotesCommand {
    /// Show all notes, or one category
    List {
        #[arg(long)]
        category: Option<String>,
    },

    /// Add a note, or replace the note for the same word
    Add {
        word: String,
        desc: String,
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// Remove a note
    Remove {
        word: String,
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// Find notes whose word contains the query
    Search { query: String },

    /// Create an empty category
    Category { name: String },

    /// Write all notes as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Replace all notes with a JSON export
    Import { path: PathBuf },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Set one config value, keeping the rest of the file intact
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flashrecall=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Play {
            difficulty,
            story,
            delay,
            display,
            pause,
            speech,
            no_notes,
            mode,
        } => {
            let options = commands::play::PlayOptions {
                difficulty,
                story,
                delay,
                display,
                pause,
                speech,
                no_notes,
                mode,
            };
            commands::play::execute(options, config).await
        }
        Commands::Score {
            story,
            attempt,
            last,
            mode,
            format,
        } => commands::score::execute(story, attempt, last, mode, format, config).await,
        Commands::List { difficulty } => commands::list::execute(difficulty, config).await,
        Commands::Validate { stories } => commands::validate::execute(stories, config).await,
        Commands::Reset => commands::reset::execute(config),
        Commands::Notes { command } => commands::notes::execute(command, config),
        Commands::Config { command } => commands::config::execute(command, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
