//! lambda-push — deploy a ZIP artifact to a function.
//!
//! # Usage
//!
//! ```text
//! lambda-push deploy [FILES]... [--config <file>] [--function <name>] [--region <region>]
//!                    [--profile <name>] [--publish] [--alias <name>]
//!                    [--alias-description <text>] [--alias-version <version>]
//!                    [--endpoint <url>] [--out-dir <dir>]
//! lambda-push check [--config <file>] [overrides...]
//! ```
//!
//! Without `--config`, `lambda-push.yaml` in the working directory is used
//! when present.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{check::CheckArgs, deploy::DeployArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "lambda-push",
    version,
    about = "Create or update a function from a ZIP artifact",
    long_about = None,
)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload code, apply configuration, publish and alias.
    Deploy(DeployArgs),

    /// Print the resolved target and options without calling the service.
    Check(CheckArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Deploy(args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(args.run())
        }
        Commands::Check(args) => args.run(),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
