//! Gemini models probed by the availability check

/// A model that may or may not be reachable in the configured region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelCandidate {
    /// Vertex AI model identifier, e.g. `gemini-1.5-flash`
    pub identifier: &'static str,
    /// Release maturity shown next to the identifier
    pub label: &'static str,
}

impl ModelCandidate {
    pub const fn new(identifier: &'static str, label: &'static str) -> Self {
        Self { identifier, label }
    }
}

/// The stable model recommended for production use
pub const GA_MODEL: &str = "gemini-1.5-flash";

/// The preview model whose availability decides the recommendation
pub const PREVIEW_MODEL: &str = "gemini-2.5-flash";

/// Models to test, in display order
pub const CANDIDATES: &[ModelCandidate] = &[
    // Production GA models
    ModelCandidate::new("gemini-1.5-flash", "GA - Recommended"),
    ModelCandidate::new("gemini-1.5-pro", "GA - High accuracy"),
    ModelCandidate::new("gemini-1.0-pro", "GA - Legacy"),
    // Experimental/Preview models
    ModelCandidate::new("gemini-2.0-flash-exp", "Experimental"),
    ModelCandidate::new("gemini-2.5-flash", "Preview"),
    ModelCandidate::new("gemini-2.5-pro", "Preview"),
    ModelCandidate::new("gemini-2.5-flash-lite", "Preview - Limited availability"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_list_order() {
        let ids: Vec<&str> = CANDIDATES.iter().map(|c| c.identifier).collect();
        assert_eq!(
            ids,
            [
                "gemini-1.5-flash",
                "gemini-1.5-pro",
                "gemini-1.0-pro",
                "gemini-2.0-flash-exp",
                "gemini-2.5-flash",
                "gemini-2.5-pro",
                "gemini-2.5-flash-lite",
            ]
        );
    }

    #[test]
    fn test_recommendation_models_are_candidates() {
        assert!(CANDIDATES.iter().any(|c| c.identifier == GA_MODEL));
        assert!(CANDIDATES.iter().any(|c| c.identifier == PREVIEW_MODEL));
    }
}
