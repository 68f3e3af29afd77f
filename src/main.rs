use clap::{Parser, Subcommand};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vocabot::config::{load_config_from_file, DEFAULT_CONFIG_FILE};
use vocabot::runner::{list_topics, load_library, run_generation, GenerateArgs};
use vocabot::types::lexicon::{Difficulty, Tone};

#[derive(Parser)]
#[command(name = "vocabot")]
#[command(about = "Generates vocabulary-rich practice conversations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one conversation
    Generate {
        #[arg(short, long, default_value = "office")]
        topic: String,

        /// easy, medium or hard
        #[arg(short, long, default_value = "easy")]
        difficulty: Difficulty,

        /// Word budget for the whole conversation
        #[arg(short, long, default_value_t = 100)]
        words: usize,

        /// formal, informal or neutral
        #[arg(long, default_value = "neutral")]
        tone: Tone,

        /// Seed for reproducible output (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List topics with their display names and difficulties
    Topics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vocabot={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    debug!("vocabot v{} starting", env!("CARGO_PKG_VERSION"));
    let config = load_config_from_file(&cli.config)?;

    match cli.command {
        Commands::Generate {
            topic,
            difficulty,
            words,
            tone,
            seed,
            json,
        } => {
            let args = GenerateArgs {
                topic,
                difficulty,
                words,
                tone,
                seed,
                json,
            };
            let mut stdout = io::stdout().lock();
            run_generation(&config, &args, &mut stdout).await?;
        }
        Commands::Topics => {
            let library = load_library(&config)?;
            list_topics(&library.lexicon, &mut io::stdout().lock())?;
        }
    }
    Ok(())
}
