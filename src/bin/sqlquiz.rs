use std::path::PathBuf;

use clap::Parser;
use sqlquiz::QuizConfig;
use tracing::Level;

mod commands;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// configuration file path, by default ./sqlquiz.toml is used when present
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// SQLite database with the exercise tables
    #[clap(long)]
    database: Option<String>,

    /// Problem bundle to load (or write, with --rebuild)
    #[clap(long)]
    problems: Option<String>,

    /// File recording solved problems
    #[clap(long)]
    answers: Option<String>,

    /// Print the resolved configuration and exit
    #[clap(long)]
    show_config: bool,

    /// Rebuild the problem bundle from a JSON file of problem definitions (for authors)
    #[clap(long, value_name = "DEFINITIONS")]
    rebuild: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(Level::INFO)
            .init();
    }

    let config = match QuizConfig::new(&cli.config) {
        Ok(c) => c.with_overrides(cli.database, cli.problems, cli.answers),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if cli.show_config {
        commands::config::run(&config);
        return;
    }

    match cli.rebuild {
        Some(definitions) => commands::rebuild::run(&config, &definitions),
        None => commands::play::run(&config),
    }
}
