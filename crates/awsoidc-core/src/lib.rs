//! aws-cli-oidc core
//!
//! Provider configuration model and the interactive setup pipeline:
//! field capture with retry-until-valid prompts, the federation-specific
//! configuration builder, and the named-profile document store.

pub mod builder;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod store;
pub mod validator;

pub use builder::{CommonFields, ProviderConfigBuilder};
pub use error::{Error, Result, ValidationError};
pub use prompt::{LinePrompter, Prompter};
pub use provider::{Federation, FederationType, ProviderConfig, SubjectTokenType};
pub use session::{SetupOutcome, SetupSession, SetupStage};
pub use store::{CONFIG_FILE_NAME, ProfileDocument, ProfileStore};
pub use validator::{FieldSpec, FieldValidator};
