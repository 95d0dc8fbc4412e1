//! lexirep CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use lexirep_core::Rating;

mod commands;

#[derive(Parser)]
#[command(name = "lexirep", version, about = "Spaced-repetition vocabulary trainer")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this RFC 3339 instant as the current time
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and word list
    Init,

    /// Validate word list TOML files
    Validate {
        /// Word list file or directory (default: `words` from the config)
        #[arg(long)]
        words: Option<PathBuf>,
    },

    /// List items due for review
    Due {
        /// Show at most this many items
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Record one review
    Review {
        /// Item id or word
        #[arg(long)]
        item: String,

        /// again, hard, good, easy (or 1-4)
        #[arg(long)]
        rating: Rating,

        /// Days since the last review, instead of measuring from its timestamp
        #[arg(long)]
        elapsed_days: Option<f64>,

        /// Seed for interval fuzz
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run an interactive study session
    Study {
        /// Seed for deck order and interval fuzz
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the interval each rating would give
    Preview {
        /// Item id or word
        #[arg(long)]
        item: String,
    },

    /// Show collection statistics and study progress
    Stats {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Write the current state to a file
    Export {
        #[arg(long)]
        output: PathBuf,
    },

    /// Replace the current state with an exported file
    Import {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lexirep=info")),
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context {
        config_path: cli.config,
        now: cli.now.unwrap_or_else(Utc::now),
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { words } => commands::validate::execute(&ctx, words),
        Commands::Due { limit, format } => commands::due::execute(&ctx, limit, format),
        Commands::Review {
            item,
            rating,
            elapsed_days,
            seed,
        } => commands::review::execute(&ctx, item, rating, elapsed_days, seed),
        Commands::Study { seed } => commands::study::execute(&ctx, seed),
        Commands::Preview { item } => commands::preview::execute(&ctx, item),
        Commands::Stats { format } => commands::stats::execute(&ctx, format),
        Commands::Export { output } => commands::transfer::export(&ctx, output),
        Commands::Import { input } => commands::transfer::import(&ctx, input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
