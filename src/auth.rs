use anyhow::{Context, Result};
use std::process::Command;

/// Supplies OAuth access tokens for Vertex AI requests
pub trait TokenSource {
    /// Returns a bearer token, or an error describing why none is available
    fn access_token(&self) -> Result<String>;
}

/// Token source backed by the `gcloud` command-line tool
#[derive(Debug, Default, Clone, Copy)]
pub struct GcloudToken;

impl TokenSource for GcloudToken {
    fn access_token(&self) -> Result<String> {
        get_access_token()
    }
}

/// A fixed token, useful when the caller already holds credentials
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn access_token(&self) -> Result<String> {
        non_empty_token(self.0.clone())
    }
}

/// Gets an access token for API authentication
///
/// This function retrieves an access token for authenticating with
/// Google Cloud APIs using the gcloud auth print-access-token command.
pub fn get_access_token() -> Result<String> {
    let output = Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .context("Failed to execute gcloud auth print-access-token command")?;

    if !output.status.success() {
        let error_message = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow::anyhow!(
            "Failed to get access token: {}",
            error_message.trim()
        ));
    }

    let access_token = String::from_utf8(output.stdout)
        .context("Failed to parse access token")?
        .trim()
        .to_string();

    non_empty_token(access_token)
}

fn non_empty_token(token: String) -> Result<String> {
    if token.is_empty() {
        return Err(anyhow::anyhow!(
            "Empty access token received. Please make sure you are authenticated with gcloud."
        ));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token() {
        let token = StaticToken("ya29.test".to_string());
        assert_eq!(token.access_token().unwrap(), "ya29.test");
    }

    #[test]
    fn test_empty_static_token_is_rejected() {
        let err = StaticToken(String::new()).access_token().unwrap_err();
        assert!(err.to_string().contains("Empty access token"));
    }
}
