//! CLI command definitions.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive setup of an OIDC provider
    ///
    /// Prompts for the OIDC provider URL, client settings and the AWS
    /// federation type, then saves them under the provider name.
    Setup,

    /// List configured OIDC providers
    List,
}
