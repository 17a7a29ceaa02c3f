//! Provider configuration model.
//!
//! A [`ProviderConfig`] is the persisted unit: common OIDC client settings
//! plus exactly one [`Federation`] variant. The variant is a tagged union on
//! `aws_federation_type`, so the other variant's keys never reach storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OAuth 2.0 Token Exchange identifier for access tokens.
pub const TOKEN_TYPE_ACCESS_TOKEN: &str = "urn:ietf:params:oauth:token-type:access_token";
/// OAuth 2.0 Token Exchange identifier for ID tokens.
pub const TOKEN_TYPE_ID_TOKEN: &str = "urn:ietf:params:oauth:token-type:id_token";

/// Configuration for one identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Key of this entry in the profile document; not stored inside the entry.
    #[serde(skip)]
    pub provider_name: String,
    /// OIDC discovery endpoint.
    #[serde(rename = "oidc_provider_metadata_url")]
    pub metadata_url: String,
    /// Extra query appended to the authorization request.
    #[serde(rename = "oidc_authentication_request_additional_query", default)]
    pub additional_auth_query: String,
    #[serde(default)]
    pub successful_redirect_url: String,
    #[serde(default)]
    pub failure_redirect_url: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(flatten)]
    pub federation: Federation,
}

impl ProviderConfig {
    pub fn federation_type(&self) -> FederationType {
        self.federation.federation_type()
    }
}

/// Strategy for turning the identity token into cloud credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "aws_federation_type", rename_all = "lowercase")]
pub enum Federation {
    /// Direct role assumption with the OIDC token.
    Oidc {
        #[serde(rename = "aws_federation_role")]
        role: String,
        #[serde(rename = "aws_federation_role_session_name")]
        role_session_name: String,
    },
    /// Token exchange of a subject token for a SAML2 assertion.
    Saml2 {
        #[serde(rename = "oidc_provider_token_exchange_subject_token_type")]
        subject_token_type: SubjectTokenType,
        #[serde(rename = "oidc_provider_token_exchange_audience")]
        audience: String,
    },
}

impl Federation {
    pub fn federation_type(&self) -> FederationType {
        match self {
            Federation::Oidc { .. } => FederationType::Oidc,
            Federation::Saml2 { .. } => FederationType::Saml2,
        }
    }
}

/// Discriminator of [`Federation`], as typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FederationType {
    Oidc,
    Saml2,
}

impl FederationType {
    pub const ALL: [FederationType; 2] = [FederationType::Oidc, FederationType::Saml2];

    pub fn as_str(&self) -> &'static str {
        match self {
            FederationType::Oidc => "oidc",
            FederationType::Saml2 => "saml2",
        }
    }
}

impl fmt::Display for FederationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FederationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oidc" => Ok(FederationType::Oidc),
            "saml2" => Ok(FederationType::Saml2),
            _ => Err(format!("Unknown federation type: {}", s)),
        }
    }
}

/// Token type sent as `subject_token_type` in the token exchange request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectTokenType {
    #[serde(rename = "urn:ietf:params:oauth:token-type:access_token")]
    AccessToken,
    #[serde(rename = "urn:ietf:params:oauth:token-type:id_token")]
    IdToken,
}

impl SubjectTokenType {
    /// Numbered menu entries, in display order.
    pub const CHOICES: [(&'static str, SubjectTokenType); 2] = [
        ("1", SubjectTokenType::AccessToken),
        ("2", SubjectTokenType::IdToken),
    ];

    /// Map a menu answer (`1` or `2`) to its token type.
    pub fn from_choice(choice: &str) -> Option<Self> {
        Self::CHOICES
            .iter()
            .find(|(key, _)| *key == choice)
            .map(|(_, token_type)| *token_type)
    }

    pub fn as_urn(&self) -> &'static str {
        match self {
            SubjectTokenType::AccessToken => TOKEN_TYPE_ACCESS_TOKEN,
            SubjectTokenType::IdToken => TOKEN_TYPE_ID_TOKEN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubjectTokenType::AccessToken => "Access Token",
            SubjectTokenType::IdToken => "ID Token",
        }
    }
}

impl fmt::Display for SubjectTokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_urn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saml2_config() -> ProviderConfig {
        ProviderConfig {
            provider_name: "idp1".to_string(),
            metadata_url: "https://idp.example/.well-known/openid-configuration".to_string(),
            additional_auth_query: String::new(),
            successful_redirect_url: String::new(),
            failure_redirect_url: String::new(),
            client_id: "abc".to_string(),
            client_secret: String::new(),
            federation: Federation::Saml2 {
                subject_token_type: SubjectTokenType::IdToken,
                audience: "urn:example:aud".to_string(),
            },
        }
    }

    #[test]
    fn test_choice_mapping() {
        assert_eq!(SubjectTokenType::from_choice("1"), Some(SubjectTokenType::AccessToken));
        assert_eq!(SubjectTokenType::from_choice("2"), Some(SubjectTokenType::IdToken));
        assert_eq!(SubjectTokenType::from_choice("3"), None);
        assert_eq!(SubjectTokenType::from_choice(" 1"), None);
        assert_eq!(SubjectTokenType::IdToken.as_urn(), TOKEN_TYPE_ID_TOKEN);
    }

    #[test]
    fn test_federation_type_parse() {
        assert_eq!("oidc".parse::<FederationType>(), Ok(FederationType::Oidc));
        assert_eq!("saml2".parse::<FederationType>(), Ok(FederationType::Saml2));
        assert!("OIDC".parse::<FederationType>().is_err());
    }

    #[test]
    fn test_saml2_serializes_only_its_variant_keys() {
        let yaml = serde_yaml::to_string(&saml2_config()).unwrap();

        assert!(yaml.contains("aws_federation_type: saml2"));
        assert!(yaml.contains(
            "oidc_provider_token_exchange_subject_token_type: urn:ietf:params:oauth:token-type:id_token"
        ));
        assert!(yaml.contains("oidc_provider_token_exchange_audience: urn:example:aud"));
        assert!(!yaml.contains("aws_federation_role"));
        assert!(!yaml.contains("provider_name"));
    }

    #[test]
    fn test_decode_oidc_entry() {
        let yaml = r#"
oidc_provider_metadata_url: https://idp.example/.well-known/openid-configuration
client_id: abc
aws_federation_type: oidc
aws_federation_role: arn:aws:iam::111122223333:role/Demo
aws_federation_role_session_name: demo-session
"#;
        let config: ProviderConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.federation_type(), FederationType::Oidc);
        assert_eq!(config.client_secret, "");
        assert_eq!(
            config.federation,
            Federation::Oidc {
                role: "arn:aws:iam::111122223333:role/Demo".to_string(),
                role_session_name: "demo-session".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_rejects_incomplete_variant() {
        let yaml = r#"
oidc_provider_metadata_url: https://idp.example
client_id: abc
aws_federation_type: saml2
oidc_provider_token_exchange_audience: urn:example:aud
"#;
        assert!(serde_yaml::from_str::<ProviderConfig>(yaml).is_err());
    }
}
