mod config;
mod generate_cmd;
mod serve_cmd;

#[cfg(test)]
mod test_util;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use lessonplan_core::{GeminiClient, LessonPlanner};

use config::{CliOverrides, LessonplanConfig};

#[derive(Parser)]
#[command(name = "lessonplan", about = "AI lesson plan generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a lessonplan config file
    Init {
        /// Gemini API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Start the HTTP server
    Serve {
        /// Address to bind (overrides LESSONPLAN_BIND)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides LESSONPLAN_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the prompt for a request file without calling the model
    Prompt {
        /// Path to a JSON generation request
        request: PathBuf,
    },
    /// Generate a lesson plan for a request file
    Generate {
        /// Path to a JSON generation request
        request: PathBuf,
        /// Write the plan to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Execute the `lessonplan init` command: write config file.
fn cmd_init(api_key: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let has_key = api_key.is_some();
    let cfg = config::ConfigFile {
        server: config::ServerSection {
            bind: Some(config::DEFAULT_BIND.to_string()),
            port: Some(config::DEFAULT_PORT),
        },
        generation: config::GenerationSection {
            api_key,
            ..Default::default()
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  server = {}:{}", config::DEFAULT_BIND, config::DEFAULT_PORT);
    if has_key {
        println!("  generation.api_key = (set)");
    } else {
        println!();
        println!(
            "No API key stored. Set {} or rerun with --api-key.",
            config::ENV_API_KEY
        );
    }

    Ok(())
}

/// Execute the `lessonplan serve` command.
async fn cmd_serve(bind: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let resolved = LessonplanConfig::resolve(&CliOverrides { bind, port })?;

    if !resolved.gemini.has_api_key() {
        tracing::warn!(
            "no Gemini API key configured ({} or generation.api_key); generation requests will fail",
            config::ENV_API_KEY
        );
    }
    tracing::info!(model = %resolved.gemini.model, "using Gemini model");

    let client = GeminiClient::new(resolved.gemini).context("failed to build generation client")?;
    let planner = Arc::new(LessonPlanner::new(Arc::new(client)));
    serve_cmd::run_serve(planner, &resolved.bind, resolved.port).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { api_key, force } => {
            cmd_init(api_key, force)?;
        }
        Commands::Serve { bind, port } => {
            cmd_serve(bind, port).await?;
        }
        Commands::Prompt { request } => {
            generate_cmd::run_prompt(&request)?;
        }
        Commands::Generate { request, output } => {
            let resolved = LessonplanConfig::resolve(&CliOverrides::default())?;
            generate_cmd::run_generate(&request, output.as_deref(), resolved.gemini).await?;
        }
    }

    Ok(())
}
