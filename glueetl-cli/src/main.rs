//! glueetl CLI
//!
//! Manages one ETL job on AWS Glue from a local project directory:
//! scaffold the project, deploy the job and its schedule trigger, and run
//! the job while following its state until it finishes.

mod commands;
mod config;
mod error;
mod service;
mod session;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "glueetl")]
#[command(about = "Deploy and run an AWS Glue ETL job", long_about = None)]
#[command(version)]
struct Cli {
    // Global settings are accepted before the subcommand only; after `run`
    // every `--key=value` belongs to the job run.
    /// Job configuration file
    #[arg(
        long,
        env = "GLUEETL_CONFIG",
        default_value = "config.yaml"
    )]
    config: PathBuf,

    /// Job script uploaded on deploy
    #[arg(
        long,
        env = "GLUEETL_SCRIPT",
        default_value = "script.py"
    )]
    script: PathBuf,

    /// AWS region, overriding the ambient AWS configuration
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glueetl=warn,glueetl_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        config_path: cli.config,
        script_path: cli.script,
        region: cli.region,
    };

    handle_command(cli.command, &config).await
}
