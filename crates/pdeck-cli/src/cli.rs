#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pdeck_runtime::ViewConfig;

use crate::error::Result;
use crate::run::run_session;

#[derive(Debug, Parser)]
#[command(
    name = "pdeck",
    about = "Drive a proof view over a demonstration engine with scripted gestures",
    version
)]
pub struct Cli {
    /// Emit logs (and errors) as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a session, replay a gesture script and print every frame.
    Run(RunArgs),

    /// Load and validate a view configuration file.
    #[command(name = "check-config")]
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Proposition to prove, e.g. "A -> (A -> B) -> B".
    #[arg(long)]
    pub goal: String,

    /// Initial hypothesis, repeatable.
    #[arg(long = "hyp", value_name = "NAME:TYPE")]
    pub hyps: Vec<String>,

    /// Gesture script; without one only the first frame is printed.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// View configuration (TOML, or JSON by extension).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = 60)]
    pub width: u16,

    #[arg(long, default_value_t = 16)]
    pub height: u16,
}

#[derive(Debug, Clone, Args)]
pub struct CheckConfigArgs {
    pub path: PathBuf,
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Run(args) => {
            run_session(&args, &mut out)?;
        }
        Commands::CheckConfig(args) => check_config(&args, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

pub fn check_config(args: &CheckConfigArgs, out: &mut dyn Write) -> Result<()> {
    let config = ViewConfig::from_file(&args.path)?;
    writeln!(out, "{}: ok", args.path.display())?;
    writeln!(out, "  commit_policy = {:?}", config.commit_policy)?;
    writeln!(out, "  drag_threshold = {}", config.gesture.drag_threshold)?;
    writeln!(
        out,
        "  multi_click_timeout_ms = {}",
        config.gesture.multi_click_timeout_ms
    )?;
    writeln!(out, "  undo_tactic = {}", config.undo_tactic)?;
    Ok(())
}
