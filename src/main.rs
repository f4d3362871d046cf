use clap::{Parser as ClapParser, Subcommand};
use jmap_lang::cli::{self, ApplyOptions, CliError};
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "jmap")]
#[command(about = "jmap - compile mapping scripts and reshape JSON documents with them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a mapping script and report problems
    Check {
        /// Path to the mapping script
        script: PathBuf,
    },

    /// Apply a mapping script to a source document
    Apply {
        /// Path to the mapping script
        script: PathBuf,

        /// Source JSON file (reads from stdin if not provided)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Initial target JSON file (defaults to an empty object)
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { script } => run_check(script),
        Commands::Apply {
            script,
            source,
            target,
            pretty,
        } => run_apply(script, source, target, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(script: PathBuf) -> Result<(), CliError> {
    let text = fs::read_to_string(&script)?;
    let report = cli::execute_check(&text)?;
    println!("{}: {} statement(s) compiled", script.display(), report.statements);
    Ok(())
}

fn run_apply(
    script: PathBuf,
    source: Option<PathBuf>,
    target: Option<PathBuf>,
    pretty: bool,
) -> Result<(), CliError> {
    let source = match source {
        Some(path) => Some(fs::read_to_string(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = ApplyOptions {
        script: fs::read_to_string(script)?,
        source,
        target: target.map(fs::read_to_string).transpose()?,
        pretty,
    };

    println!("{}", cli::execute_apply(&options)?);
    Ok(())
}
