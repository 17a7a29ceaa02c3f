//! Command handlers.

use crate::config::CliConfig;
use crate::terminal::TerminalPrompter;
use awsoidc_core::{Federation, LinePrompter, ProfileStore, Prompter, SetupSession};
use console::style;
use std::io::{self, IsTerminal};
use tracing::info;

/// Interactive setup of one provider.
pub fn setup(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = ProfileStore::open(&config.config_root)?;
    if store.exists() {
        eprintln!("Using config file: {}", store.path().display());
    }

    let mut prompter: Box<dyn Prompter> = if io::stdin().is_terminal() {
        Box::new(TerminalPrompter::new())
    } else {
        info!("stdin is not a terminal, reading answers line by line");
        Box::new(LinePrompter::new(io::stdin().lock(), io::stderr()))
    };

    let mut session = SetupSession::new(&mut *prompter, store);
    let outcome = session.run()?;

    if outcome.replaced {
        eprintln!(
            "{} Replaced existing provider {}",
            style("!").yellow(),
            style(&outcome.config.provider_name).bold()
        );
    }
    eprintln!("{} Saved {}", style("✓").green(), outcome.path.display());
    Ok(())
}

/// List configured providers.
pub fn list(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = ProfileStore::open(&config.config_root)?;
    let document = store.document();

    if document.is_empty() {
        println!(
            "{} No providers configured. Run: aws-cli-oidc setup",
            style("i").blue()
        );
        return Ok(());
    }

    for name in document.provider_names() {
        match document.get(&name) {
            Ok(Some(provider)) => {
                println!(
                    "{} ({})",
                    style(&name).bold(),
                    style(provider.federation_type()).cyan()
                );
                println!("  metadata_url: {}", provider.metadata_url);
                println!("  client_id: {}", provider.client_id);
                println!(
                    "  client_secret: {}",
                    if provider.client_secret.is_empty() {
                        "(not set)"
                    } else {
                        "***"
                    }
                );
                match &provider.federation {
                    Federation::Oidc { role, .. } => println!("  role: {}", role),
                    Federation::Saml2 {
                        subject_token_type,
                        audience,
                    } => {
                        println!("  subject_token_type: {}", subject_token_type);
                        println!("  audience: {}", audience);
                    }
                }
            }
            Ok(None) => {}
            Err(err) => println!("{} {} (invalid entry: {})", style("!").yellow(), name, err),
        }
    }

    println!("\nConfig file: {}", store.path().display());
    Ok(())
}
