//! Model probing and outcome classification
//!
//! Each candidate is probed exactly once by parsing the sample document with
//! it. Whatever happens, the probe is folded into a [`ProbeOutcome`] and placed
//! in either the available or the unavailable bucket of a [`ProbeReport`].

use std::fmt::Display;
use std::path::Path;

use crate::models::ModelCandidate;
use crate::parser::{DocumentParser, ParseOptions, ParseResponse};

/// Number of characters of an unclassified error kept in the report
pub const ERROR_DETAIL_CHARS: usize = 100;

/// Coarse category of a probe failure, decided from the error text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The model does not exist in this region
    NotFound,
    /// The model exists but rejected the request
    MalformedRequest,
    /// Anything else; reported with the raw error text
    Other,
}

/// Classifies an error message
///
/// `404` or "not found" (any case) wins over `400` when both appear.
///
/// # Example
///
/// ```rust
/// use vertex_model_check::probe::{classify_error, ErrorClass};
///
/// assert_eq!(classify_error("Model not found in region"), ErrorClass::NotFound);
/// assert_eq!(classify_error("400 Bad Request: invalid field"), ErrorClass::MalformedRequest);
/// assert_eq!(classify_error("connection reset"), ErrorClass::Other);
/// ```
pub fn classify_error(message: &str) -> ErrorClass {
    if message.contains("404") || message.to_lowercase().contains("not found") {
        ErrorClass::NotFound
    } else if message.contains("400") {
        ErrorClass::MalformedRequest
    } else {
        ErrorClass::Other
    }
}

/// What a single probe observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The model parsed the sample and returned content
    Available { total_tokens: u64 },
    /// The call succeeded but returned nothing usable
    NoResponse,
    /// The model answered 404 or "not found" for this region
    NotAvailable,
    /// The service answered with a 400; it likely exists
    MalformedRequest,
    /// Any other failure, with the truncated error text
    Error { message: String },
}

impl ProbeStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeStatus::Available { .. })
    }

    /// Short human-readable reason for the status
    pub fn detail(&self) -> String {
        match self {
            ProbeStatus::Available { .. } => "AVAILABLE and working".to_string(),
            ProbeStatus::NoResponse => "no response".to_string(),
            ProbeStatus::NotAvailable => "NOT AVAILABLE in this region".to_string(),
            ProbeStatus::MalformedRequest => "Available but request format issue".to_string(),
            ProbeStatus::Error { message } => format!("Error: {}", message),
        }
    }
}

/// Folds the result of a parse call into a probe status
pub fn classify_response<E: Display>(result: Result<ParseResponse, E>) -> ProbeStatus {
    match result {
        Ok(response) if !response.is_empty() => ProbeStatus::Available {
            total_tokens: response.token_usage.total,
        },
        Ok(_) => ProbeStatus::NoResponse,
        Err(e) => {
            let message = e.to_string();
            match classify_error(&message) {
                ErrorClass::NotFound => ProbeStatus::NotAvailable,
                ErrorClass::MalformedRequest => ProbeStatus::MalformedRequest,
                ErrorClass::Other => ProbeStatus::Error {
                    message: message.chars().take(ERROR_DETAIL_CHARS).collect(),
                },
            }
        }
    }
}

/// The result of probing one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub candidate: ModelCandidate,
    pub available: bool,
    pub detail: String,
    pub status: ProbeStatus,
}

impl ProbeOutcome {
    pub fn new(candidate: ModelCandidate, status: ProbeStatus) -> Self {
        Self {
            candidate,
            available: status.is_available(),
            detail: status.detail(),
            status,
        }
    }
}

/// Outcomes of a full run, split into the two buckets in probe order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub available: Vec<ProbeOutcome>,
    pub unavailable: Vec<ProbeOutcome>,
}

impl ProbeReport {
    pub fn record(&mut self, outcome: ProbeOutcome) {
        if outcome.available {
            self.available.push(outcome);
        } else {
            self.unavailable.push(outcome);
        }
    }

    /// Whether the model with this identifier landed in the available bucket
    pub fn is_available(&self, identifier: &str) -> bool {
        self.available
            .iter()
            .any(|outcome| outcome.candidate.identifier == identifier)
    }

    pub fn len(&self) -> usize {
        self.available.len() + self.unavailable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receives progress while candidates are probed
pub trait ProbeObserver {
    fn on_probe_start(&mut self, candidate: &ModelCandidate);
    fn on_probe_complete(&mut self, outcome: &ProbeOutcome);
}

/// Probes one candidate; errors from the parser never escape
pub async fn probe_candidate<P: DocumentParser>(
    parser: &P,
    sample: &Path,
    candidate: ModelCandidate,
) -> ProbeOutcome {
    let options = ParseOptions::probe(candidate.identifier);
    let result = parser.parse(sample, &options).await;

    if let Err(e) = &result {
        tracing::warn!(model = candidate.identifier, error = %e, "probe failed");
    }

    ProbeOutcome::new(candidate, classify_response(result))
}

/// Probes every candidate in order, one at a time
pub async fn run_probes<P, O>(
    parser: &P,
    sample: &Path,
    candidates: &[ModelCandidate],
    observer: &mut O,
) -> ProbeReport
where
    P: DocumentParser,
    O: ProbeObserver + ?Sized,
{
    let mut report = ProbeReport::default();

    for candidate in candidates {
        observer.on_probe_start(candidate);
        let outcome = probe_candidate(parser, sample, *candidate).await;
        observer.on_probe_complete(&outcome);
        report.record(outcome);
    }

    report
}
