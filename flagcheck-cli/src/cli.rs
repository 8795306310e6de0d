use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use flagcheck::output::{write_human, write_json, write_unavailable_human, write_unavailable_json};
use flagcheck::{Challenge, ReadLimits, check};
use tracing::debug;

use crate::logging;

#[derive(Parser)]
#[command(name = "flagcheck")]
#[command(about = "Check a challenge file and reveal its flag when solved", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug); logs go to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    pub format: OutputFormat,

    /// Stop a key-box search after this many bytes (no limit by default)
    #[arg(long, global = true)]
    pub max_file_size: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// The checker's literal messages
    Human,
    /// One JSON document on stdout
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pass when no line of dirtyBook.txt contains '#'
    DirtyBook,
    /// Pass when ./box/key.txt contains both the flag and the keyword
    KeyBox,
}

impl Commands {
    fn challenge(&self) -> Challenge {
        match self {
            Self::DirtyBook => Challenge::DirtyBook,
            Self::KeyBox => Challenge::KeyBox,
        }
    }
}

/// Parse arguments, run one check and report it.
///
/// A failing verdict exits 0 like a passing one; only an unreadable target
/// changes the exit status, to that target's code.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let challenge = cli.command.challenge();
    let target = challenge.target();
    let limits = cli
        .max_file_size
        .map_or_else(ReadLimits::default, ReadLimits::with_max_file_size);
    debug!(challenge = challenge.name(), "running check");

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    let code = match check(&target, &limits) {
        Ok(verdict) => {
            match cli.format {
                OutputFormat::Human => write_human(&verdict, &mut stdout, &mut stderr)?,
                OutputFormat::Json => write_json(&verdict, &mut stdout)?,
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = %e, "target unavailable");
            match cli.format {
                OutputFormat::Human => write_unavailable_human(&target, &mut stderr)?,
                OutputFormat::Json => write_unavailable_json(&target, &e, &mut stdout)?,
            }
            ExitCode::from(target.unavailable.exit_code)
        }
    };

    stdout.flush()?;
    stderr.flush()?;
    Ok(code)
}
