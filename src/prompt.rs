//! Interactive welcome and tool selection, with a non-interactive stand-in for
//! CI and tests.
use anyhow::{Context as _, Result};
use inquire::error::InquireError;
use inquire::{Confirm, MultiSelect};

/// Outcome of the welcome screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Welcome {
    /// Carry on with setup.
    Continue,
    /// The user backed out; setup ends without changes.
    Abort,
}

/// Gathers the user's choices before anything is installed.
pub trait Prompt {
    /// Show the welcome screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be driven.
    fn welcome(&self) -> Result<Welcome>;

    /// Let the user pick from `names`, all of which start selected. The
    /// result keeps the order of `names`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be driven.
    fn select(&self, names: &[String]) -> Result<Vec<String>>;
}

/// Accepts the welcome screen and selects everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl Prompt for NonInteractive {
    fn welcome(&self) -> Result<Welcome> {
        Ok(Welcome::Continue)
    }

    fn select(&self, names: &[String]) -> Result<Vec<String>> {
        Ok(names.to_vec())
    }
}

/// Terminal prompts backed by `inquire`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interactive;

const WELCOME_HELP: &str = "Initializes ~/.config/.machine-setup/config.yaml and installs \
                            the selected tools. Esc to abort.";

fn is_abort(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

impl Prompt for Interactive {
    fn welcome(&self) -> Result<Welcome> {
        match Confirm::new("Welcome to machine setup! Continue?")
            .with_default(true)
            .with_help_message(WELCOME_HELP)
            .prompt()
        {
            Ok(true) => Ok(Welcome::Continue),
            Ok(false) => Ok(Welcome::Abort),
            Err(e) if is_abort(&e) => Ok(Welcome::Abort),
            Err(e) => Err(e).context("welcome prompt"),
        }
    }

    fn select(&self, names: &[String]) -> Result<Vec<String>> {
        match MultiSelect::new("Select dev tools to install", names.to_vec())
            .with_all_selected_by_default()
            .with_help_message("All defaults are pre-selected. Space to toggle, Enter to confirm.")
            .with_page_size(names.len().max(1))
            .prompt()
        {
            Ok(selected) => Ok(selected),
            Err(e) if is_abort(&e) => Ok(names.to_vec()),
            Err(e) => Err(e).context("tool selection prompt"),
        }
    }
}

/// Pick the prompt implementation for this run.
#[must_use]
pub fn for_mode(interactive: bool) -> Box<dyn Prompt> {
    if interactive {
        Box::new(Interactive)
    } else {
        Box::new(NonInteractive)
    }
}
