//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod deploy;
mod init;
mod run;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::service::DEFAULT_POLL_INTERVAL;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a job project: config.yaml, script.py and README.md
    Init {
        /// Directory receiving the generated files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Overwrite files that already exist
        #[arg(long)]
        force: bool,
    },
    /// Upload the script and create or update the job and its trigger
    Deploy,
    /// Start a run and follow it until it finishes
    Run {
        /// Seconds between two status checks
        #[arg(
            long,
            env = "GLUEETL_POLL_INTERVAL",
            default_value_t = DEFAULT_POLL_INTERVAL.as_secs(),
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        poll_interval: u64,

        /// Run arguments, each as --key=value
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "--KEY=VALUE")]
        args: Vec<String>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// The process exit code
pub async fn handle_command(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Init { dir, force } => {
            init::handle_init(&dir, force)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Deploy => {
            deploy::handle_deploy(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            poll_interval,
            args,
        } => run::handle_run(config, &args, poll_interval).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_run_collects_hyphenated_arguments() {
        let cli = TestCli::try_parse_from([
            "glueetl",
            "run",
            "--poll-interval",
            "5",
            "--date=2024-01-01",
            "--mode=full",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                poll_interval,
                args,
            } => {
                assert_eq!(poll_interval, 5);
                assert_eq!(args, vec!["--date=2024-01-01", "--mode=full"]);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_rejects_zero_poll_interval() {
        assert!(TestCli::try_parse_from(["glueetl", "run", "--poll-interval", "0"]).is_err());
        assert!(TestCli::try_parse_from(["glueetl", "run", "--poll-interval=1"]).is_ok());
    }

    #[test]
    fn test_init_defaults() {
        let cli = TestCli::try_parse_from(["glueetl", "init"]).unwrap();

        match cli.command {
            Commands::Init { dir, force } => {
                assert_eq!(dir, PathBuf::from("."));
                assert!(!force);
            }
            _ => panic!("expected init"),
        }
    }
}
