use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use crate::cmd::{self, AppContext, fill::FillArgs, submissions::SubmissionsArgs};
use crate::config::{AppConfig, default_draft_dir};

#[derive(Parser, Debug)]
#[command(
    name = "insurance-forms",
    about = "Fill in insurance applications and browse submitted ones",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (defaults to the per-user config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the saved draft
    #[arg(long = "draft-dir", value_name = "DIR", global = true)]
    draft_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the forms the API serves
    Forms,
    /// Answer a form, resuming any saved draft, and optionally submit it
    Fill(FillArgs),
    /// Show submitted applications as a table
    Submissions(SubmissionsArgs),
    /// Print the JSON Schema of the forms payload
    Schema,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Schema = cli.command {
        return cmd::schema::run();
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    let draft_dir = cli.draft_dir.unwrap_or_else(default_draft_dir);
    let ctx = AppContext::new(config, draft_dir)?;
    match cli.command {
        Commands::Forms => cmd::forms::run(&ctx).await,
        Commands::Fill(args) => cmd::fill::run(&ctx, args).await,
        Commands::Submissions(args) => cmd::submissions::run(&ctx, args).await,
        Commands::Schema => cmd::schema::run(),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
