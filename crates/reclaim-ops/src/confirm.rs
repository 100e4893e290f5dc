//! Confirmation of an apply run.

use std::io::{self, BufRead, Write};

use reclaim_core::CleanError;

/// Prompt shown before a delete pass.
pub const DEFAULT_PROMPT: &str = "Delete these items? [Y/n] ";

/// A user's answer to the delete prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

impl Confirmation {
    /// Interpret one line of user input.
    ///
    /// An empty answer, `y`, `Y`, `yes` and `YES` confirm. Everything else,
    /// including `Yes` and surrounding whitespace, cancels.
    pub fn from_response(response: &str) -> Self {
        match response.trim_end_matches(['\n', '\r']) {
            "" | "y" | "Y" | "yes" | "YES" => Self::Confirmed,
            _ => Self::Cancelled,
        }
    }

    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }
}

/// Source of confirmations.
///
/// Implement this trait to plug in a different confirmation UI.
pub trait Confirm {
    /// Ask the user to confirm a delete pass.
    fn confirm(&mut self, prompt: &str) -> Result<Confirmation, CleanError>;
}

/// Prompts on stderr and reads one line from stdin.
///
/// End of input counts as a cancellation, not as an empty answer.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<Confirmation, CleanError> {
        let mut stderr = io::stderr();
        write!(stderr, "{prompt}").map_err(|e| CleanError::io("<stderr>", e))?;
        stderr.flush().map_err(|e| CleanError::io("<stderr>", e))?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| CleanError::io("<stdin>", e))?;
        if read == 0 {
            return Ok(Confirmation::Cancelled);
        }
        Ok(Confirmation::from_response(&input))
    }
}

/// Always confirms (`--yes`).
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<Confirmation, CleanError> {
        Ok(Confirmation::Confirmed)
    }
}

/// Always cancels.
#[derive(Debug, Default)]
pub struct AutoDecline;

impl Confirm for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<Confirmation, CleanError> {
        Ok(Confirmation::Cancelled)
    }
}

/// Answers with a fixed response and remembers the prompts it was shown.
#[derive(Debug, Clone)]
pub struct ScriptedConfirm {
    response: String,
    prompts: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            prompts: Vec::new(),
        }
    }

    /// Prompts seen so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<Confirmation, CleanError> {
        self.prompts.push(prompt.to_string());
        Ok(Confirmation::from_response(&self.response))
    }
}
