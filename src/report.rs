//! Terminal output for the availability check
//!
//! Every section is written to a caller-supplied [`Write`] so the exact output
//! can be checked in tests. [`ConsoleReporter`] adds a spinner on stderr while
//! a probe is in flight.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::config::{Config, ConfigError};
use crate::models::{ModelCandidate, GA_MODEL, PREVIEW_MODEL};
use crate::probe::{ProbeObserver, ProbeOutcome, ProbeReport, ProbeStatus};

/// Width of the `=` rules between sections
const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn write_section_header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "{}", title.bold())?;
    writeln!(out, "{}", rule())
}

/// Prints the remediation for a configuration error
pub fn write_config_error<W: Write>(out: &mut W, err: &ConfigError) -> io::Result<()> {
    writeln!(out, "{}", format!("❌ Error: {}", err).red())?;
    writeln!(out, "   {}", err.remediation())
}

/// Prints the header banner with the effective project and region
pub fn write_banner<W: Write>(out: &mut W, config: &Config) -> io::Result<()> {
    writeln!(out, "{}", rule())?;
    writeln!(out, "{}", "🔍 Vertex AI Model Availability Check".green().bold())?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "📍 Project: {}", config.project_id.cyan())?;
    writeln!(out, "🌍 Region: {}", config.region.cyan())?;
    writeln!(out, "{}", rule())
}

pub fn write_probing_started<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "\n{}\n",
        "📋 Testing models (this may take a few minutes)...".blue().bold()
    )
}

pub fn write_probe_start<W: Write>(out: &mut W, candidate: &ModelCandidate) -> io::Result<()> {
    writeln!(out, "\n🧪 Testing {}...", candidate.identifier)
}

/// Prints the status line for a finished probe
pub fn write_probe_result<W: Write>(out: &mut W, outcome: &ProbeOutcome) -> io::Result<()> {
    let model = outcome.candidate.identifier;
    match &outcome.status {
        ProbeStatus::Available { total_tokens } => {
            writeln!(
                out,
                "   {}",
                format!("✅ {} - {}", model, outcome.detail).green()
            )?;
            writeln!(out, "      Tokens used: {}", total_tokens)
        }
        ProbeStatus::NoResponse => writeln!(
            out,
            "   {}",
            format!("❌ {} - Failed ({})", model, outcome.detail).red()
        ),
        ProbeStatus::MalformedRequest => writeln!(
            out,
            "   {}",
            format!("⚠️  {} - {}", model, outcome.detail).yellow()
        ),
        ProbeStatus::NotAvailable | ProbeStatus::Error { .. } => writeln!(
            out,
            "   {}",
            format!("❌ {} - {}", model, outcome.detail).red()
        ),
    }
}

fn write_bucket<W: Write>(out: &mut W, outcomes: &[ProbeOutcome]) -> io::Result<()> {
    for outcome in outcomes {
        writeln!(
            out,
            "   • {} ({})",
            outcome.candidate.identifier, outcome.candidate.label
        )?;
    }
    Ok(())
}

/// Prints both buckets with their counts
pub fn write_summary<W: Write>(out: &mut W, report: &ProbeReport) -> io::Result<()> {
    write_section_header(out, "📊 SUMMARY")?;

    writeln!(
        out,
        "\n{}",
        format!("✅ Available Models ({}):", report.available.len()).green()
    )?;
    write_bucket(out, &report.available)?;

    writeln!(
        out,
        "\n{}",
        format!("❌ Unavailable Models ({}):", report.unavailable.len()).red()
    )?;
    write_bucket(out, &report.unavailable)
}

/// Prints which model to use, depending on whether the preview model answered
pub fn write_recommendation<W: Write>(out: &mut W, report: &ProbeReport) -> io::Result<()> {
    write_section_header(out, "💡 RECOMMENDATION")?;

    if report.is_available(PREVIEW_MODEL) {
        writeln!(out, "\n🎉 Gemini 2.5 Flash is available in your region!")?;
        writeln!(out, "\nYou have two good options:")?;
        writeln!(out, "\n1. Conservative (Production):")?;
        writeln!(out, "   model = '{}'  # GA, stable, proven", GA_MODEL.cyan())?;
        writeln!(out, "\n2. Cutting-edge (Preview):")?;
        writeln!(
            out,
            "   model = '{}'  # Better accuracy, preview status",
            PREVIEW_MODEL.cyan()
        )?;
        writeln!(
            out,
            "\n{}",
            "⚠️  Note: Preview models may have breaking changes".yellow()
        )
    } else {
        writeln!(out, "\n✅ Use Gemini 1.5 Flash (GA - Production Ready)")?;
        writeln!(out, "   model = '{}'", GA_MODEL.cyan())?;
        writeln!(out, "\n❌ Gemini 2.5 models not available in your region yet")
    }
}

/// Prints probe progress as it happens
///
/// Write failures are kept and surfaced by [`ConsoleReporter::finish`], since
/// observer callbacks cannot return them.
pub struct ConsoleReporter<W: Write> {
    out: W,
    show_spinner: bool,
    spinner: Option<ProgressBar>,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_spinner: false,
            spinner: None,
            error: None,
        }
    }

    /// Shows a spinner on stderr while each probe runs
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.show_spinner = enabled;
        self
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    fn keep_error(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    fn start_spinner(&mut self, candidate: &ModelCandidate) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Waiting for {}", candidate.identifier));
        spinner.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(spinner);
    }

    /// Returns the writer, or the first write error seen while probing
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> ProbeObserver for ConsoleReporter<W> {
    fn on_probe_start(&mut self, candidate: &ModelCandidate) {
        let result = write_probe_start(&mut self.out, candidate).and_then(|_| self.out.flush());
        self.keep_error(result);
        if self.show_spinner {
            self.start_spinner(candidate);
        }
    }

    fn on_probe_complete(&mut self, outcome: &ProbeOutcome) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        let result = write_probe_result(&mut self.out, outcome);
        self.keep_error(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CANDIDATES;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn report_with_available(identifiers: &[&str]) -> ProbeReport {
        let mut report = ProbeReport::default();
        for candidate in CANDIDATES {
            let status = if identifiers.contains(&candidate.identifier) {
                ProbeStatus::Available { total_tokens: 10 }
            } else {
                ProbeStatus::NotAvailable
            };
            report.record(ProbeOutcome::new(*candidate, status));
        }
        report
    }

    #[test]
    fn test_banner() {
        let config = Config {
            project_id: "demo".to_string(),
            region: "us-west1".to_string(),
            sample_file: "test_sample.pdf".to_string(),
        };
        let text = render(|out| write_banner(out, &config));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(60));
        assert_eq!(lines[1], "🔍 Vertex AI Model Availability Check");
        assert_eq!(lines[3], "📍 Project: demo");
        assert_eq!(lines[4], "🌍 Region: us-west1");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_config_error() {
        let err = ConfigError::MissingEnvVar("GCP_PROJECT".to_string());
        let text = render(|out| write_config_error(out, &err));
        assert_eq!(
            text,
            "❌ Error: GCP_PROJECT environment variable not set\n   Set it with: export GCP_PROJECT=your-project-id\n"
        );
    }

    #[test]
    fn test_probe_result_lines() {
        let candidate = CANDIDATES[0];
        let cases = [
            (
                ProbeStatus::Available { total_tokens: 42 },
                "   ✅ gemini-1.5-flash - AVAILABLE and working\n      Tokens used: 42\n",
            ),
            (
                ProbeStatus::NoResponse,
                "   ❌ gemini-1.5-flash - Failed (no response)\n",
            ),
            (
                ProbeStatus::NotAvailable,
                "   ❌ gemini-1.5-flash - NOT AVAILABLE in this region\n",
            ),
            (
                ProbeStatus::MalformedRequest,
                "   ⚠️  gemini-1.5-flash - Available but request format issue\n",
            ),
            (
                ProbeStatus::Error {
                    message: "boom".to_string(),
                },
                "   ❌ gemini-1.5-flash - Error: boom\n",
            ),
        ];

        for (status, expected) in cases {
            let outcome = ProbeOutcome::new(candidate, status);
            assert_eq!(render(|out| write_probe_result(out, &outcome)), expected);
        }
    }

    #[test]
    fn test_summary_lists_buckets_with_labels() {
        let report = report_with_available(&["gemini-1.5-flash"]);
        let text = render(|out| write_summary(out, &report));

        assert!(text.contains("📊 SUMMARY"));
        assert!(text.contains("✅ Available Models (1):\n   • gemini-1.5-flash (GA - Recommended)\n"));
        assert!(text.contains("❌ Unavailable Models (6):\n   • gemini-1.5-pro (GA - High accuracy)\n"));
        assert!(text.ends_with("   • gemini-2.5-flash-lite (Preview - Limited availability)\n"));
    }

    #[test]
    fn test_recommendation_with_preview_available() {
        let report = report_with_available(&["gemini-1.5-flash", "gemini-2.5-flash"]);
        let text = render(|out| write_recommendation(out, &report));

        assert!(text.contains("🎉 Gemini 2.5 Flash is available in your region!"));
        assert!(text.contains("model = 'gemini-1.5-flash'  # GA, stable, proven"));
        assert!(text.contains("model = 'gemini-2.5-flash'  # Better accuracy, preview status"));
        assert!(text.contains("Preview models may have breaking changes"));
        assert!(!text.contains("not available in your region yet"));
    }

    #[test]
    fn test_recommendation_without_preview() {
        let report = report_with_available(&["gemini-1.5-flash", "gemini-2.5-pro"]);
        let text = render(|out| write_recommendation(out, &report));

        assert!(text.contains("✅ Use Gemini 1.5 Flash (GA - Production Ready)"));
        assert!(text.contains("   model = 'gemini-1.5-flash'\n"));
        assert!(text.contains("❌ Gemini 2.5 models not available in your region yet"));
        assert!(!text.contains("two good options"));
    }

    #[test]
    fn test_console_reporter_writes_progress() {
        colored::control::set_override(false);
        let mut reporter = ConsoleReporter::new(Vec::new());
        let candidate = CANDIDATES[1];

        reporter.on_probe_start(&candidate);
        reporter.on_probe_complete(&ProbeOutcome::new(candidate, ProbeStatus::NotAvailable));

        let text = String::from_utf8(reporter.finish().unwrap()).unwrap();
        assert_eq!(
            text,
            "\n🧪 Testing gemini-1.5-pro...\n   ❌ gemini-1.5-pro - NOT AVAILABLE in this region\n"
        );
    }
}
