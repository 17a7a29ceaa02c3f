//! Terminal-backed prompter.

use awsoidc_core::Prompter;
use console::{Term, style};
use dialoguer::Input;
use std::io;

/// Prompts on the controlling terminal with dialoguer.
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        // dialoguer redraws only the last line, so print any menu above it.
        let (header, question) = match prompt.rsplit_once('\n') {
            Some((header, question)) => (Some(header), question),
            None => (None, prompt),
        };
        if let Some(header) = header {
            for line in header.lines() {
                self.term.write_line(line)?;
            }
        }

        Input::<String>::new()
            .with_prompt(question.trim_end_matches(':'))
            .allow_empty(true)
            .report(false)
            .interact_text_on(&self.term)
            .map_err(io::Error::other)
    }

    fn report_invalid(&mut self, message: &str) -> io::Result<()> {
        self.term
            .write_line(&format!("{} {}", style("✗").red(), style(message).red()))
    }
}
