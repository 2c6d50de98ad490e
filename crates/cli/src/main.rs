//! Rotation runner.
//!
//! Loads a roster, a rotation and an optional config, plays the rotation
//! and prints per-ability damage.
//!
//! ```bash
//! sim-cli run --roster demos/roster.ron --rotation demos/rotation.ron --runs 4
//! ```

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Run;

#[derive(Parser)]
#[command(name = "sim-cli")]
#[command(about = "Frame-quantized combat rotation simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Play a rotation and report damage
    Run(Run),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute().await,
    }
}
