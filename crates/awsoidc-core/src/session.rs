//! End-to-end setup workflow.

use crate::builder::ProviderConfigBuilder;
use crate::error::Result;
use crate::prompt::Prompter;
use crate::provider::ProviderConfig;
use crate::store::ProfileStore;
use crate::validator::FieldValidator;
use std::path::PathBuf;
use tracing::{debug, error};

/// Stages of a setup run. The run only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    Start,
    CaptureCommon,
    CaptureFederationType,
    CaptureVariantFields,
    Assemble,
    Persist,
    Done,
    Failed,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct SetupOutcome {
    pub config: ProviderConfig,
    /// Whether an existing entry with the same name was replaced.
    pub replaced: bool,
    /// Location of the written document.
    pub path: PathBuf,
}

/// One interactive setup run against a loaded [`ProfileStore`].
pub struct SetupSession<P> {
    validator: FieldValidator<P>,
    store: ProfileStore,
    stage: SetupStage,
}

impl<P: Prompter> SetupSession<P> {
    pub fn new(prompter: P, store: ProfileStore) -> Self {
        Self {
            validator: FieldValidator::new(prompter),
            store,
            stage: SetupStage::Start,
        }
    }

    pub fn stage(&self) -> SetupStage {
        self.stage
    }

    /// Capture a provider config and persist it.
    ///
    /// Capture errors (closed input) leave the stage where capture stopped;
    /// only a persistence failure moves the session to [`SetupStage::Failed`].
    /// Either way nothing has been written.
    pub fn run(&mut self) -> Result<SetupOutcome> {
        let mut builder = ProviderConfigBuilder::new(&mut self.validator);

        Self::advance(&mut self.stage, SetupStage::CaptureCommon);
        let common = builder.capture_common()?;

        Self::advance(&mut self.stage, SetupStage::CaptureFederationType);
        let federation_type = builder.capture_federation_type()?;

        Self::advance(&mut self.stage, SetupStage::CaptureVariantFields);
        let federation = builder.capture_federation(federation_type)?;

        Self::advance(&mut self.stage, SetupStage::Assemble);
        let config = common.assemble(federation);
        let replaced = self.store.document().contains(&config.provider_name);

        Self::advance(&mut self.stage, SetupStage::Persist);
        let persisted = self
            .store
            .set(&config)
            .and_then(|()| self.store.persist());
        if let Err(err) = persisted {
            error!(error = %err, "Setup failed");
            Self::advance(&mut self.stage, SetupStage::Failed);
            return Err(err);
        }

        Self::advance(&mut self.stage, SetupStage::Done);
        Ok(SetupOutcome {
            config,
            replaced,
            path: self.store.path().to_path_buf(),
        })
    }

    fn advance(stage: &mut SetupStage, next: SetupStage) {
        debug!(from = ?stage, to = ?next, "Setup stage");
        *stage = next;
    }
}
