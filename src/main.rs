//! # Vertex AI Model Check
//!
//! Checks which Gemini models are available in your Vertex AI region by asking
//! each one to parse a small sample document.
//!
//! ## Example
//!
//! ```bash
//! export GCP_PROJECT=my-project-id
//! export GCP_REGION=us-central1   # optional, defaults to us-west1
//! vertex-model-check
//! ```
//!
//! Set `RUST_LOG=debug` to see the requests being made.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use vertex_model_check::config::load_dotenv;
use vertex_model_check::{run_check, CheckOptions, Config, VertexParser};

/// Main entry point for the application
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Before tracing so RUST_LOG can come from .env
    let dotenv = load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env file loaded: {}", e),
    }

    let options = CheckOptions {
        spinner: std::io::stderr().is_terminal(),
        ..CheckOptions::default()
    };

    run_check(
        Config::from_env(),
        |config| Ok(VertexParser::new(config)),
        options,
        std::io::stdout(),
    )
    .await?;

    Ok(())
}
