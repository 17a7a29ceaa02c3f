//! Ordered capture of a [`ProviderConfig`].

use crate::error::{Error, Result, ValidationError};
use crate::prompt::Prompter;
use crate::provider::{Federation, FederationType, ProviderConfig, SubjectTokenType};
use crate::validator::{FieldSpec, FieldValidator};

/// Fields shared by both federation types, captured before the discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonFields {
    pub provider_name: String,
    pub metadata_url: String,
    pub additional_auth_query: String,
    pub successful_redirect_url: String,
    pub failure_redirect_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl CommonFields {
    /// Combine with a completed federation variant.
    pub fn assemble(self, federation: Federation) -> ProviderConfig {
        ProviderConfig {
            provider_name: self.provider_name,
            metadata_url: self.metadata_url,
            additional_auth_query: self.additional_auth_query,
            successful_redirect_url: self.successful_redirect_url,
            failure_redirect_url: self.failure_redirect_url,
            client_id: self.client_id,
            client_secret: self.client_secret,
            federation,
        }
    }
}

/// Drives the field prompts for one provider.
///
/// Nothing is returned until every field of the chosen branch has been
/// captured; there is no way to revisit an earlier answer within a run.
pub struct ProviderConfigBuilder<'a, P> {
    validator: &'a mut FieldValidator<P>,
}

impl<'a, P: Prompter> ProviderConfigBuilder<'a, P> {
    pub fn new(validator: &'a mut FieldValidator<P>) -> Self {
        Self { validator }
    }

    /// Capture every field and assemble the config.
    pub fn build(mut self) -> Result<ProviderConfig> {
        let common = self.capture_common()?;
        let federation_type = self.capture_federation_type()?;
        let federation = self.capture_federation(federation_type)?;
        Ok(common.assemble(federation))
    }

    /// Provider name followed by the common client settings.
    pub fn capture_common(&mut self) -> Result<CommonFields> {
        let provider_name = self.ask(FieldSpec::required("OIDC provider name:"))?;
        let metadata_url = self.ask(FieldSpec::required(
            "OIDC provider metadata URL (https://your-oidc-provider/.well-known/openid-configuration):",
        ))?;
        let additional_auth_query = self.ask(FieldSpec::optional(
            "Additional query for OIDC authentication request (Default: none):",
        ))?;
        let successful_redirect_url =
            self.ask(FieldSpec::optional("Successful redirect URL (Default: none):"))?;
        let failure_redirect_url =
            self.ask(FieldSpec::optional("Failure redirect URL (Default: none):"))?;
        let client_id = self.ask(FieldSpec::required(
            "Client ID which is registered in the OIDC provider:",
        ))?;
        let client_secret = self.ask(FieldSpec::optional(
            "Client secret which is registered in the OIDC provider (Default: none):",
        ))?;

        Ok(CommonFields {
            provider_name,
            metadata_url,
            additional_auth_query,
            successful_redirect_url,
            failure_redirect_url,
            client_id,
            client_secret,
        })
    }

    pub fn capture_federation_type(&mut self) -> Result<FederationType> {
        let names = FederationType::ALL.map(|t| t.as_str());
        let spec = FieldSpec::required(format!(
            "Choose type of AWS federation [{}]:",
            names.join("/")
        ))
        .one_of(names);

        let answer = self.ask(spec.clone())?;
        answer.parse().map_err(|_| not_allowed(&spec))
    }

    /// Variant fields for the chosen federation type.
    pub fn capture_federation(&mut self, federation_type: FederationType) -> Result<Federation> {
        match federation_type {
            FederationType::Oidc => {
                let role = self.ask(FieldSpec::required(
                    "AWS federation role (arn:aws:iam::<Account ID>:role/<Role Name>):",
                ))?;
                let role_session_name =
                    self.ask(FieldSpec::required("AWS federation roleSessionName:"))?;
                Ok(Federation::Oidc {
                    role,
                    role_session_name,
                })
            }
            FederationType::Saml2 => {
                let subject_token_type = self.capture_subject_token_type()?;
                let audience = self.ask(FieldSpec::required("Audience for token exchange:"))?;
                Ok(Federation::Saml2 {
                    subject_token_type,
                    audience,
                })
            }
        }
    }

    fn capture_subject_token_type(&mut self) -> Result<SubjectTokenType> {
        let mut prompt =
            String::from("Select the subject token type to exchange for SAML2 assertion:");
        for (key, token_type) in SubjectTokenType::CHOICES {
            prompt.push_str(&format!(
                "\n  {}. {} ({})",
                key,
                token_type.label(),
                token_type.as_urn()
            ));
        }
        prompt.push_str("\nChoice:");

        let keys = SubjectTokenType::CHOICES.map(|(key, _)| key);
        let spec = FieldSpec::required(prompt).one_of(keys);
        let answer = self.ask(spec.clone())?;
        SubjectTokenType::from_choice(&answer).ok_or_else(|| not_allowed(&spec))
    }

    fn ask(&mut self, spec: FieldSpec) -> Result<String> {
        self.validator.capture(&spec)
    }
}

fn not_allowed(spec: &FieldSpec) -> Error {
    ValidationError::NotAllowed {
        allowed: spec.allowed_values.clone().unwrap_or_default(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::LinePrompter;
    use std::io::Cursor;

    type ScriptedValidator = FieldValidator<LinePrompter<Cursor<String>, Vec<u8>>>;

    fn scripted(lines: &[&str]) -> ScriptedValidator {
        let mut script = lines.join("\n");
        script.push('\n');
        FieldValidator::new(LinePrompter::new(Cursor::new(script), Vec::new()))
    }

    const COMMON: [&str; 7] = [
        "idp1",
        "https://idp.example/.well-known/openid-configuration",
        "",
        "",
        "",
        "abc",
        "",
    ];

    #[test]
    fn test_build_oidc() {
        let mut lines = COMMON.to_vec();
        lines.extend(["oidc", "arn:aws:iam::111122223333:role/Demo", "demo-session"]);
        let mut validator = scripted(&lines);

        let config = ProviderConfigBuilder::new(&mut validator).build().unwrap();

        assert_eq!(config.provider_name, "idp1");
        assert_eq!(config.client_id, "abc");
        assert_eq!(config.successful_redirect_url, "");
        assert_eq!(
            config.federation,
            Federation::Oidc {
                role: "arn:aws:iam::111122223333:role/Demo".to_string(),
                role_session_name: "demo-session".to_string(),
            }
        );
    }

    #[test]
    fn test_build_saml2_with_retries() {
        let mut lines = COMMON.to_vec();
        lines.extend(["xyz", "saml2", "", "3", "access", "1", "", "urn:example:aud"]);
        let mut validator = scripted(&lines);

        let config = ProviderConfigBuilder::new(&mut validator).build().unwrap();

        assert_eq!(
            config.federation,
            Federation::Saml2 {
                subject_token_type: SubjectTokenType::AccessToken,
                audience: "urn:example:aud".to_string(),
            }
        );

        let transcript = String::from_utf8(validator.into_prompter().into_writer()).unwrap();
        assert_eq!(transcript.matches("Choose type of AWS federation").count(), 2);
        assert_eq!(transcript.matches("Input must be '1' or '2'").count(), 2);
        assert!(transcript.contains("2. ID Token (urn:ietf:params:oauth:token-type:id_token)"));
    }

    #[test]
    fn test_capture_aborts_when_input_ends() {
        let mut validator = scripted(&["", "idp1", "", "https://idp.example"]);
        let mut builder = ProviderConfigBuilder::new(&mut validator);

        let err = builder.capture_common().unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn test_no_config_without_variant_fields() {
        let mut lines = COMMON.to_vec();
        lines.extend(["oidc", "arn:aws:iam::111122223333:role/Demo"]);
        let mut validator = scripted(&lines);

        assert!(ProviderConfigBuilder::new(&mut validator).build().is_err());
    }
}
