//! Error types for aws-cli-oidc.

use std::path::PathBuf;
use thiserror::Error;

/// Rejection of a single prompt attempt.
///
/// The `Display` text is what the operator sees before the prompt repeats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input is required")]
    Required,

    #[error("Input must be {}", describe_allowed(.allowed))]
    NotAllowed { allowed: Vec<String> },

    #[error("Input must be valid UTF-8")]
    InvalidEncoding,
}

fn describe_allowed(allowed: &[String]) -> String {
    let quoted: Vec<String> = allowed.iter().map(|v| format!("'{}'", v)).collect();
    match quoted.split_last() {
        None => "empty".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

#[derive(Debug, Error)]
pub enum Error {
    // Capture errors
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),

    // Storage errors
    #[error("Failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config document {}: {message}", path.display())]
    Document { path: PathBuf, message: String },

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
