use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pulsar::config::Config;
use pulsar::diagnostics::{render_diagnostics, PulsarError};

#[derive(Parser)]
#[command(name = "pulsar", version, about = "Passes over Pulsar syntax trees")]
struct Cli {
    /// Config file (defaults to pulsar.toml next to the tree file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON tree back to Pulsar source
    Print {
        /// Tree file path (.json)
        file: PathBuf,
        /// Output path. If omitted, prints to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check declarations and name uses
    Check {
        /// Tree file path (.json)
        file: PathBuf,
        /// Source text the tree was parsed from, for annotated reports
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// Count nodes by kind
    Census {
        /// Tree file path (.json)
        file: PathBuf,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List statement expressions that fold to constants
    Fold {
        /// Tree file path (.json)
        file: PathBuf,
    },
}

impl Commands {
    fn file(&self) -> &Path {
        match self {
            Commands::Print { file, .. }
            | Commands::Check { file, .. }
            | Commands::Census { file, .. }
            | Commands::Fold { file } => file,
        }
    }
}

fn level_with_verbosity(base: tracing::Level, verbose: u8) -> tracing::Level {
    use tracing::Level;
    let levels = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE];
    let start = levels.iter().position(|l| *l == base).unwrap_or(1);
    levels[(start + verbose as usize).min(levels.len() - 1)]
}

fn report(err: &PulsarError) -> ! {
    match pulsar::error_path(err) {
        Some(path) => eprintln!("error [{}]: {err}", path.display()),
        None => eprintln!("error: {err}"),
    }
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let config = match pulsar::resolve_config(cli.config.as_deref(), cli.command.file()) {
        Ok(config) => config,
        Err(err) => report(&err),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level_with_verbosity(config.log_level, cli.verbose))
        .with_target(false)
        .init();

    if let Err(err) = run(cli.command, &config) {
        report(&err);
    }
}

fn run(command: Commands, config: &Config) -> Result<(), PulsarError> {
    match command {
        Commands::Print { file, output } => {
            let text = pulsar::print_file(&file, config)?;
            match output {
                Some(out) => std::fs::write(&out, text).map_err(|e| PulsarError::io(e, out.clone()))?,
                None => print!("{text}"),
            }
        }
        Commands::Check { file, source } => {
            let report = pulsar::check_file(&file, config)?;
            for func in &report.functions {
                tracing::debug!(name = %func.name, arity = func.arity, errors = func.errors, "checked function");
            }
            if !report.is_ok() {
                let text = match &source {
                    Some(path) => Some(std::fs::read_to_string(path).map_err(|e| PulsarError::io(e, path.clone()))?),
                    None => None,
                };
                let filename = source.as_ref().unwrap_or(&file).display().to_string();
                render_diagnostics(text.as_deref(), &filename, &report.diagnostics);
                return Err(PulsarError::Check { count: report.diagnostics.len() });
            }
            println!("ok: {} function(s) checked", report.functions.len());
        }
        Commands::Census { file, json } => {
            let report = pulsar::census_file(&file)?;
            if json {
                let text = serde_json::to_string_pretty(&report)
                    .map_err(|e| PulsarError::tree(format!("failed to serialize census: {e}"), file.clone()))?;
                println!("{text}");
            } else {
                println!("{report}");
            }
        }
        Commands::Fold { file } => {
            for folded in pulsar::fold_file(&file)? {
                println!("{folded}");
            }
        }
    }
    Ok(())
}
