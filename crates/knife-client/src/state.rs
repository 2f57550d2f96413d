//! Application state shared by every controller.
//!
//! [`AppState`] is cheap to clone: the collaborator and both user gates sit
//! behind `Arc`s, so each controller keeps its own copy.

use std::sync::Arc;

use crate::api::{HttpCollaborator, SharedCollaborator};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::events::{emit_notice, Notice, Notifier, StderrNotifier};
use crate::gate::{AutoApprove, Confirm, TerminalConfirm};
use crate::memory::MemoryCollaborator;

#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,

    /// Remote side of every operation.
    pub api: SharedCollaborator,

    /// Asked before anything destructive is sent.
    pub confirm: Arc<dyn Confirm>,

    /// Receives blocking notices.
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        config: ClientConfig,
        api: SharedCollaborator,
        confirm: Arc<dyn Confirm>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            api,
            confirm,
            notifier,
        }
    }

    /// State for a live instance: HTTP collaborator, terminal prompts
    /// (or auto-approval with `assume_yes`) and notices on stderr.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let api: SharedCollaborator = Arc::new(HttpCollaborator::new(&config)?);
        tracing::info!(server = %config.server_url, "Using remote instance");
        Ok(Self::with_terminal_gates(config, api))
    }

    /// State backed by a sample in-process instance.
    pub fn offline(config: ClientConfig) -> Self {
        tracing::info!("Using in-process sample instance");
        let api: SharedCollaborator = Arc::new(MemoryCollaborator::sample());
        Self::with_terminal_gates(config, api)
    }

    fn with_terminal_gates(config: ClientConfig, api: SharedCollaborator) -> Self {
        let confirm: Arc<dyn Confirm> = if config.assume_yes {
            Arc::new(AutoApprove)
        } else {
            Arc::new(TerminalConfirm)
        };
        Self::new(config, api, confirm, Arc::new(StderrNotifier))
    }

    pub fn confirm(&self, prompt: &str) -> bool {
        self.confirm.confirm(prompt)
    }

    pub fn notify(&self, notice: Notice) {
        emit_notice(self.notifier.as_ref(), notice);
    }
}
