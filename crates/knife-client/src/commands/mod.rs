//! Command handlers behind the `knife` subcommands.
//!
//! Each handler builds the controller for one page, runs the requested
//! action and returns what the page shows afterwards as a [`Rendered`].
//! Handlers never fail: errors have already been turned into inline text
//! or notices by the controller.

pub mod bookmarks;
pub mod drafts;
pub mod notes;
pub mod pages;
pub mod profile;
pub mod session;

use serde::Serialize;

use crate::actions::Outcome;
use crate::events::Notice;

/// Output of one command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rendered {
    /// HTML fragment of the page after the command ran.
    pub html: String,
    /// Set for commands that perform an action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Inline status line, for pages that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Notice>,
}

impl Rendered {
    pub fn page(html: String) -> Self {
        Self {
            html,
            outcome: None,
            status: None,
        }
    }

    pub fn action(html: String, outcome: Outcome) -> Self {
        Self {
            html,
            outcome: Some(outcome),
            status: None,
        }
    }

    pub fn with_status(mut self, status: Option<Notice>) -> Self {
        self.status = status;
        self
    }

    /// False when the command's action failed or was refused.
    pub fn succeeded(&self) -> bool {
        !matches!(self.outcome, Some(Outcome::Failed) | Some(Outcome::Busy))
    }
}
