//! Configuration module for the model availability check
//!
//! This module reads the project and region the check runs against from the
//! process environment.

use std::path::{Path, PathBuf};

/// Region used when `GCP_REGION` is not set
pub const DEFAULT_REGION: &str = "us-west1";

/// Sample document every model is asked to parse
pub const SAMPLE_FILE: &str = "test_sample.pdf";

/// Environment variables used by the tool
pub mod env {
    /// The Google Cloud project ID environment variable
    pub const PROJECT: &str = "GCP_PROJECT";
    /// The Vertex AI region environment variable
    pub const REGION: &str = "GCP_REGION";
}

/// Configuration for a model availability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The Google Cloud project ID
    pub project_id: String,
    /// The region for Vertex AI services
    pub region: String,
    /// The document parsed by every probe
    pub sample_file: String,
}

impl Config {
    /// Builds the configuration from the process environment
    ///
    /// # Returns
    ///
    /// * `Result<Config, ConfigError>` - The configuration, or the missing variable
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    ///
    /// Empty values are treated the same as unset ones.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vertex_model_check::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "GCP_PROJECT" => Some("demo".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.region, "us-west1");
    /// # Ok::<(), vertex_model_check::ConfigError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let project_id =
            non_empty(env::PROJECT).ok_or_else(|| ConfigError::MissingEnvVar(env::PROJECT.to_string()))?;
        let region = non_empty(env::REGION).unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            project_id,
            region,
            sample_file: SAMPLE_FILE.to_string(),
        })
    }
}

/// Error types for configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Error when environment variable is missing
    #[error("{0} environment variable not set")]
    MissingEnvVar(String),
}

impl ConfigError {
    /// Tells the user how to fix the configuration
    pub fn remediation(&self) -> String {
        match self {
            ConfigError::MissingEnvVar(name) if name == env::PROJECT => {
                format!("Set it with: export {}=your-project-id", name)
            }
            ConfigError::MissingEnvVar(name) => format!("Set it with: export {}=<value>", name),
        }
    }
}

/// Loads environment variables from a .env file in the working directory
///
/// Returns the file that was loaded, or the reason none was. Callers decide
/// whether to log it, since this usually runs before logging is set up.
pub fn load_dotenv() -> Result<PathBuf, dotenv::Error> {
    dotenv::dotenv()
}

/// Loads environment variables from a specific .env file
pub fn load_dotenv_from(path: &Path) -> Result<PathBuf, dotenv::Error> {
    dotenv::from_path(path).map(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_region_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[("GCP_PROJECT", "demo")])).unwrap();
        assert_eq!(config.project_id, "demo");
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.sample_file, SAMPLE_FILE);
    }

    #[test]
    fn test_explicit_region_wins() {
        let config = Config::from_lookup(lookup_from(&[
            ("GCP_PROJECT", "demo"),
            ("GCP_REGION", "europe-west4"),
        ]))
        .unwrap();
        assert_eq!(config.region, "europe-west4");
    }

    #[test]
    fn test_empty_region_falls_back_to_default() {
        let config =
            Config::from_lookup(lookup_from(&[("GCP_PROJECT", "demo"), ("GCP_REGION", "")])).unwrap();
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn test_missing_project_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("GCP_REGION", "us-central1")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("GCP_PROJECT".to_string()));
        assert_eq!(err.to_string(), "GCP_PROJECT environment variable not set");
        assert_eq!(
            err.remediation(),
            "Set it with: export GCP_PROJECT=your-project-id"
        );
    }

    #[test]
    fn test_dotenv_file_is_loaded() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "VERTEX_MODEL_CHECK_DOTENV_MARKER=loaded").unwrap();

        let path = load_dotenv_from(file.path()).unwrap();
        assert_eq!(path, file.path());
        assert_eq!(
            std::env::var("VERTEX_MODEL_CHECK_DOTENV_MARKER").unwrap(),
            "loaded"
        );
    }

    #[test]
    fn test_missing_dotenv_file_reports_why() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dotenv_from(&dir.path().join(".env")).is_err());
    }

    #[test]
    fn test_empty_project_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("GCP_PROJECT", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }
}
