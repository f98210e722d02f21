//! CLI binary for quizcraft.
//!
//! `serve` runs the HTTP API. `study` and `extract` run the same pipeline on
//! a local PDF and print the result, which is handy for checking keys and a
//! pdfium install without a browser.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quizcraft::pipeline::input::resolve_local;
use quizcraft::{build_study_pack, extract_text, serve, AppConfig, AppState, ProviderGateway};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "quizcraft",
    version,
    about = "Turn PDFs into summaries, quizzes, flashcards and notes",
    long_about = "Extracts text from a PDF (vision OCR through Groq, or the embedded text layer \
                  when rendering is unavailable) and generates study material with an LLM.\n\n\
                  API keys are read from GROQ_API_KEY and NVIDIA_API_KEY, or from a .env file."
)]
struct Cli {
    /// Path to libpdfium, or the directory containing it
    #[arg(long, global = true, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, env = "QUIZCRAFT_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "QUIZCRAFT_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(short, long, env = "QUIZCRAFT_PORT", default_value_t = 5000)]
        port: u16,

        /// Directory for temporary upload files
        #[arg(long, env = "QUIZCRAFT_TEMP_DIR")]
        temp_dir: Option<PathBuf>,
    },

    /// Build a study pack from a local PDF and print it as JSON
    Study {
        /// PDF file to process
        pdf: String,

        #[arg(short = 'n', long, default_value_t = 5)]
        num_questions: u32,

        #[arg(short, long, default_value = "Medium")]
        difficulty: String,
    },

    /// Print the text extracted from a local PDF
    Extract {
        /// PDF file to process
        pdf: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is the normal case in production.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(lib) = cli.pdfium_lib {
        config.pdfium_lib_path = Some(lib);
    }

    match cli.command {
        Command::Serve {
            host,
            port,
            temp_dir,
        } => {
            if let Some(dir) = temp_dir {
                config.temp_dir = Some(dir);
            }
            warn_missing_keys(&config);

            let state = AppState::from_config(config).context("Failed to build backends")?;
            serve(state, &host, port)
                .await
                .with_context(|| format!("Server on {}:{} stopped", host, port))?;
        }

        Command::Study {
            pdf,
            num_questions,
            difficulty,
        } => {
            let path = resolve_local(&pdf)?;
            let gateway =
                Arc::new(ProviderGateway::from_config(&config).context("Failed to build backends")?);

            let pack = build_study_pack(&path, num_questions.max(1), &difficulty, gateway, &config)
                .await
                .with_context(|| format!("Failed to process '{}'", pdf))?;

            println!("{}", serde_json::to_string_pretty(&pack)?);
        }

        Command::Extract { pdf } => {
            let path = resolve_local(&pdf)?;
            let gateway = ProviderGateway::from_config(&config).context("Failed to build backends")?;

            let text = extract_text(&path, &gateway, &config)
                .await
                .with_context(|| format!("Failed to extract '{}'", pdf))?;

            println!("{}", text);
        }
    }

    Ok(())
}

fn warn_missing_keys(config: &AppConfig) {
    for backend in [&config.primary, &config.fallback] {
        if backend.api_key.is_none() {
            tracing::warn!(
                "{} has no API key; set {} to enable it",
                backend.name,
                backend.api_key_env
            );
        }
    }
}
