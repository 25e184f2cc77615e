//! End-to-end availability check
//!
//! Reads the configuration, probes every candidate and prints the report.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::config::{Config, ConfigError};
use crate::models::ModelCandidate;
use crate::parser::DocumentParser;
use crate::probe::{run_probes, ProbeReport};
use crate::report::{
    write_banner, write_config_error, write_probing_started, write_recommendation, write_summary,
    ConsoleReporter,
};

/// Options for [`run_check`] that do not come from the environment
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions<'a> {
    /// Models to probe, in the order they are reported
    pub candidates: &'a [ModelCandidate],
    /// Show a spinner on stderr while each probe runs
    pub spinner: bool,
}

impl Default for CheckOptions<'_> {
    fn default() -> Self {
        Self {
            candidates: crate::models::CANDIDATES,
            spinner: false,
        }
    }
}

/// Runs the availability check and prints the full report to `out`
///
/// The parser is only built once the configuration is known to be valid. A
/// configuration error is printed with its remediation and yields `Ok(None)`
/// without probing anything.
///
/// # Arguments
///
/// * `config` - The configuration, or the error raised while reading it
/// * `build_parser` - Creates the document parser for a valid configuration
/// * `options` - Candidates to probe and terminal behaviour
/// * `out` - Where the report is written
///
/// # Returns
///
/// * `Result<Option<ProbeReport>>` - The buckets, or `None` when nothing was probed
pub async fn run_check<P, F, W>(
    config: Result<Config, ConfigError>,
    build_parser: F,
    options: CheckOptions<'_>,
    out: W,
) -> Result<Option<ProbeReport>>
where
    P: DocumentParser,
    F: FnOnce(&Config) -> Result<P>,
    W: Write,
{
    let mut reporter = ConsoleReporter::new(out).with_spinner(options.spinner);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!("{}", e);
            write_config_error(reporter.out(), &e)
                .and_then(|_| reporter.out().flush())
                .context("Failed to write report")?;
            return Ok(None);
        }
    };

    let parser = build_parser(&config).context("Failed to create document parser")?;

    write_banner(reporter.out(), &config).context("Failed to write report")?;
    write_probing_started(reporter.out()).context("Failed to write report")?;

    tracing::info!(
        project = %config.project_id,
        region = %config.region,
        candidates = options.candidates.len(),
        "starting model availability check"
    );

    let report = run_probes(
        &parser,
        Path::new(&config.sample_file),
        options.candidates,
        &mut reporter,
    )
    .await;

    let mut out = reporter.finish().context("Failed to write report")?;
    write_summary(&mut out, &report).context("Failed to write report")?;
    write_recommendation(&mut out, &report).context("Failed to write report")?;
    out.flush().context("Failed to write report")?;

    tracing::info!(
        available = report.available.len(),
        unavailable = report.unavailable.len(),
        "model availability check finished"
    );

    Ok(Some(report))
}
