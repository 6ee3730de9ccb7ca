use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jql_builder::config::{self, ConfigError, DEFAULT_VOCABULARY_FILE};
use jql_builder::session::{self, Rendered};
use jql_builder::{ConditionSet, Vocabulary};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jql_builder", version, about = "Build JQL filters and explain them in plain English")]
struct Cli {
    /// Vocabulary overrides (JSON). Defaults to ./jql_vocabulary.json when present
    #[arg(long, global = true)]
    vocabulary: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a query interactively (default)
    Repl,
    /// Render a JSON array of conditions
    Render {
        /// Input file, or `-` for stdin
        input: PathBuf,
        /// Print {"query", "explanation"} as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}

/// 优先使用JSON配置，默认文件不可用时回退到内置词汇表
fn load_vocabulary(path: Option<&Path>) -> Result<Vocabulary> {
    if let Some(path) = path {
        return config::load_vocabulary(path)
            .with_context(|| format!("failed to load vocabulary from {}", path.display()));
    }

    match config::load_vocabulary(DEFAULT_VOCABULARY_FILE) {
        Ok(vocabulary) => {
            info!(path = DEFAULT_VOCABULARY_FILE, "using vocabulary file");
            Ok(vocabulary)
        }
        Err(ConfigError::NotFound(_)) => {
            debug!("no vocabulary file, using standard vocabulary");
            Ok(Vocabulary::standard())
        }
        Err(err) => {
            warn!(error = %err, "ignoring vocabulary file, using standard vocabulary");
            Ok(Vocabulary::standard())
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read conditions from stdin")?;
        return Ok(content);
    }
    if !path.exists() {
        bail!("input file does not exist: {}", path.display());
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn render(path: &Path, json: bool, vocabulary: &Vocabulary) -> Result<()> {
    let content = read_input(path)?;
    let conditions: ConditionSet =
        serde_json::from_str(&content).context("conditions must be a non-empty JSON array")?;
    debug!(conditions = conditions.len(), "rendering conditions");

    let rendered = Rendered::new(conditions.conditions(), vocabulary);
    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        println!("{}", rendered);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let vocabulary = load_vocabulary(cli.vocabulary.as_deref())?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => session::run(&vocabulary),
        Commands::Render { input, json } => render(&input, json, &vocabulary),
    }
}
