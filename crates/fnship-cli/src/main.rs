mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "fnship",
    about = "Build and deploy monorepo functions to Google Cloud Functions"
)]
#[command(version)]
struct Cli {
    /// Repository root containing functions/ and packages/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a function and generate its module-alias entry file
    Build {
        /// Function directory name under functions/
        function: Option<String>,
    },
    /// Build a function, copy the lockfile, and deploy with gcloud
    Deploy {
        /// Function directory name under functions/
        function: Option<String>,
        /// Prepare the function and print the gcloud command without running it
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    fn function(&self) -> Option<&str> {
        match self {
            Self::Build { function } | Self::Deploy { function, .. } => function.as_deref(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatch a parsed command line. All failures surface here as errors;
/// `main` alone decides the exit status.
async fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    // No function name: usage error, exit without output.
    let Some(function) = cli.command.function() else {
        return Ok(ExitCode::FAILURE);
    };

    match &cli.command {
        Commands::Build { .. } => commands::build(&cli.root, function)
            .await
            .with_context(|| format!("building function \"{function}\""))?,
        Commands::Deploy { dry_run, .. } => commands::deploy(&cli.root, function, *dry_run)
            .await
            .with_context(|| format!("deploying function \"{function}\""))?,
    }

    Ok(ExitCode::SUCCESS)
}
