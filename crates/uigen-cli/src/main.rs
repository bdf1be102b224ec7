//! `uigen`: run recorded model responses through the extraction pipeline.

mod commands;
mod input;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::commands::ReplayOptions;
use crate::input::read_input;

#[derive(Parser)]
#[command(name = "uigen")]
#[command(about = "Extract and finalize React screens from streamed LLM responses")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded response chunk by chunk with live previews
    Replay {
        /// Response file, or `-` for stdin
        file: PathBuf,
        /// Prompt the response answers; used for the provisional screen name
        #[arg(long, default_value = "Generated screen")]
        prompt: String,
        #[arg(long, default_value_t = 24)]
        chunk_size: usize,
        /// Pause between chunks, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Print one JSON object per event
        #[arg(long)]
        json: bool,
    },
    /// Extract the final code and component name from a complete response
    Finalize {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Check whether a code file is ready for the live preview
    Check { file: PathBuf },
    /// Print the sandbox entry file a code file would be mounted as
    AppSource {
        file: PathBuf,
        /// Apply the live-preview readiness check
        #[arg(long)]
        generating: bool,
    },
    /// Explain a sandbox render error message
    Explain {
        message: String,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    uigen_core::observability::init_observability();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let mut out = std::io::stdout().lock();
    match args.command {
        Commands::Replay {
            file,
            prompt,
            chunk_size,
            delay_ms,
            json,
        } => {
            let response = read_input(&file)?;
            let opts = ReplayOptions {
                prompt,
                chunk_chars: chunk_size,
                delay: delay_ms.map(Duration::from_millis),
                json,
            };
            commands::replay(&mut out, response, opts).await?;
        }
        Commands::Finalize { file, json } => {
            let response = read_input(&file)?;
            commands::finalize_response(&mut out, &response, json)?;
        }
        Commands::Check { file } => {
            let code = read_input(&file)?;
            if !commands::check(&mut out, &code)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::AppSource { file, generating } => {
            let code = read_input(&file)?;
            if !commands::app_source(&mut out, &code, generating)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Explain { message, json } => commands::explain(&mut out, &message, json)?,
    }
    Ok(ExitCode::SUCCESS)
}
