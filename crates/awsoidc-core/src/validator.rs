//! Field capture with retry-until-valid semantics.

use crate::error::{Error, Result, ValidationError};
use crate::prompt::Prompter;
use std::io;
use tracing::debug;

/// Constraints for a single prompted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub prompt: String,
    pub required: bool,
    /// Returned for empty input on an optional field.
    pub default: String,
    /// Case-sensitive whitelist, when present.
    pub allowed_values: Option<Vec<String>>,
    pub retry_on_invalid: bool,
}

impl FieldSpec {
    /// A field that must be non-empty. Invalid answers are re-prompted.
    pub fn required(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            required: true,
            default: String::new(),
            allowed_values: None,
            retry_on_invalid: true,
        }
    }

    /// A field that falls back to an empty default.
    pub fn optional(prompt: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(prompt)
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn retry(mut self, retry_on_invalid: bool) -> Self {
        self.retry_on_invalid = retry_on_invalid;
        self
    }

    /// Check one raw answer against this spec.
    pub fn validate(&self, raw: &str) -> std::result::Result<String, ValidationError> {
        if raw.is_empty() {
            if self.required {
                return Err(ValidationError::Required);
            }
            return Ok(self.default.clone());
        }

        if let Some(allowed) = &self.allowed_values {
            if !allowed.iter().any(|value| value == raw) {
                return Err(ValidationError::NotAllowed {
                    allowed: allowed.clone(),
                });
            }
        }

        Ok(raw.to_string())
    }
}

/// Solicits field values from a [`Prompter`].
pub struct FieldValidator<P> {
    prompter: P,
}

impl<P: Prompter> FieldValidator<P> {
    pub fn new(prompter: P) -> Self {
        Self { prompter }
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Prompt until an answer satisfies `spec`.
    ///
    /// With `retry_on_invalid` there is no attempt limit; the loop ends only on
    /// a valid answer or when the input source fails.
    pub fn capture(&mut self, spec: &FieldSpec) -> Result<String> {
        loop {
            let attempt = match self.prompter.read_line(&spec.prompt) {
                Ok(raw) => spec.validate(&raw),
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    Err(ValidationError::InvalidEncoding)
                }
                Err(err) => return Err(Error::Input(err)),
            };

            match attempt {
                Ok(value) => return Ok(value),
                Err(err) if spec.retry_on_invalid => {
                    debug!(prompt = %spec.prompt, error = %err, "Rejected input");
                    self.prompter
                        .report_invalid(&err.to_string())
                        .map_err(Error::Input)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
