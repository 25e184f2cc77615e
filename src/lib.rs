//! # Vertex AI Model Check Library
//!
//! A Rust library for checking which Gemini models answer in a Google Cloud
//! Vertex AI region. This library provides the core functionality for the
//! `vertex-model-check` command-line tool.
//!
//! ## Features
//!
//! - Probes a fixed list of Gemini models with a one-page sample document
//! - Classifies failures (not available, bad request, other errors)
//! - Prints a summary and a model recommendation
//!
//! ## Example
//!
//! ```rust,no_run
//! use vertex_model_check::{run_check, CheckOptions, Config, VertexParser};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let report = run_check(
//!     Config::from_env(),
//!     |config| Ok(VertexParser::new(config)),
//!     CheckOptions::default(),
//!     std::io::stdout(),
//! )
//! .await?;
//!
//! if let Some(report) = report {
//!     println!("{} models available", report.available.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `GCP_PROJECT`: Your Google Cloud project ID (required)
//! - `GCP_REGION`: The Vertex AI region (defaults to `us-west1`)
//!
//! ## Error Handling
//!
//! Probe failures never abort a run; they are reported per model. The library
//! uses `anyhow::Result` for everything else.
//!
//! ## License
//!
//! This project is licensed under the MIT License.

pub mod auth;
pub mod check;
pub mod config;
pub mod models;
pub mod parser;
pub mod probe;
pub mod report;
pub mod vertex_ai;

// Re-export commonly used items
pub use auth::{get_access_token, GcloudToken, StaticToken, TokenSource};
pub use check::{run_check, CheckOptions};
pub use config::{Config, ConfigError};
pub use models::{ModelCandidate, CANDIDATES};
pub use parser::{DocumentParser, ParseError, ParseOptions, ParseResponse, VertexParser};
pub use probe::{classify_error, ErrorClass, ProbeOutcome, ProbeReport, ProbeStatus};

/// Re-export anyhow::Result for convenience
pub use anyhow::Result;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
