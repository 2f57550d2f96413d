//! Confirmation gates for destructive actions.
//!
//! A gate answers a yes/no prompt synchronously. A `false` answer
//! short-circuits the action before any request is issued.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for std::sync::Arc<C> {
    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Always says yes. Headless runs with `--yes`.
pub struct AutoApprove;

impl Confirm for AutoApprove {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, "Auto-approved confirmation");
        true
    }
}

/// Always says no.
pub struct AutoDeny;

impl Confirm for AutoDeny {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, "Auto-denied confirmation");
        false
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stderr = std::io::stderr();
        if write!(stderr, "{prompt} [y/N] ").and_then(|_| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Wraps another gate and counts how often it was asked.
pub struct CountingConfirm<C> {
    inner: C,
    asked: AtomicUsize,
}

impl<C: Confirm> CountingConfirm<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl<C: Confirm> Confirm for CountingConfirm<C> {
    fn confirm(&self, prompt: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.inner.confirm(prompt)
    }
}
