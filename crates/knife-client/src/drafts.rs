//! Compose form and draft lifecycle.
//!
//! The manager keeps one local field that outlives a render: the id of the
//! draft the form is bound to. The first save creates a draft and binds its
//! id, later saves update that draft, and a successful publish deletes it
//! and unbinds. Saves and publishes never overlap; a second one issued while
//! the first is in flight is rejected without a request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::{error, info, warn};

use knife_shared::constants::text;
use knife_shared::protocol::ComposeBody;
use knife_shared::{Draft, DraftId, PublicRange};

use crate::actions::Outcome;
use crate::events::Notice;
use crate::render::escape;
use crate::state::AppState;

/// The fields of the compose form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeForm {
    pub content: String,
    pub cw: String,
    pub category: String,
    pub public_range: PublicRange,
}

impl ComposeForm {
    pub fn from_draft(draft: &Draft) -> Self {
        Self {
            content: draft.content.clone(),
            cw: draft.cw.clone().unwrap_or_default(),
            category: draft.category.clone().unwrap_or_default(),
            public_range: draft.public_range.unwrap_or_default(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut options = String::new();
        for range in PublicRange::KNOWN {
            let selected = if range == self.public_range { " selected" } else { "" };
            options.push_str(&format!(
                "<option value=\"{}\"{selected}>{}</option>",
                range.code(),
                range.label()
            ));
        }
        format!(
            "<form id='compose-form'>\
             <textarea name='content'>{}</textarea>\
             <input name='cw' value=\"{}\" />\
             <input name='category' value=\"{}\" />\
             <select name='public_range'>{options}</select></form>",
            escape(self.content.as_str()),
            escape(self.cw.as_str()),
            escape(self.category.as_str()),
        )
    }

    pub fn body(&self) -> ComposeBody {
        ComposeBody {
            content: self.content.clone(),
            cw: self.cw.clone(),
            category: self.category.clone(),
            public_range: self.public_range,
        }
    }
}

/// Clears the in-flight flag when the operation ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct DraftManager {
    state: AppState,
    draft_id: Mutex<Option<DraftId>>,
    form: Mutex<ComposeForm>,
    status: Mutex<Option<Notice>>,
    in_flight: AtomicBool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl DraftManager {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            draft_id: Mutex::new(None),
            form: Mutex::new(ComposeForm::default()),
            status: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn draft_id(&self) -> Option<DraftId> {
        *lock(&self.draft_id)
    }

    pub fn form(&self) -> ComposeForm {
        lock(&self.form).clone()
    }

    pub fn set_form(&self, form: ComposeForm) {
        *lock(&self.form) = form;
    }

    pub fn edit(&self, f: impl FnOnce(&mut ComposeForm)) {
        f(&mut *lock(&self.form));
    }

    /// Inline status line under the form.
    pub fn status(&self) -> Option<Notice> {
        lock(&self.status).clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn set_status(&self, notice: Notice) {
        *lock(&self.status) = Some(notice);
    }

    fn reset(&self, bound: Option<DraftId>) {
        *lock(&self.form) = ComposeForm::default();
        *lock(&self.draft_id) = bound;
    }

    /// Prefill the form from the newest draft, if there is one.
    pub async fn enter(&self) {
        *lock(&self.status) = None;
        match self.state.api.list_drafts().await {
            Ok(drafts) => match drafts.first() {
                Some(draft) => {
                    info!(draft_id = %draft.id, "Resuming draft");
                    *lock(&self.form) = ComposeForm::from_draft(draft);
                    *lock(&self.draft_id) = Some(draft.id);
                }
                None => self.reset(None),
            },
            Err(e) => {
                warn!(error = %e, "Failed to fetch drafts, starting blank");
                self.reset(None);
            }
        }
    }

    /// Create the draft on first save, update it afterwards.
    pub async fn save(&self) -> Outcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            self.set_status(Notice::error(text::BUSY));
            return Outcome::Busy;
        };

        let body = self.form().body();
        let bound = self.draft_id();

        let result = match bound {
            Some(id) => self.state.api.update_draft(id, &body).await.map(|()| id),
            None => self.state.api.create_draft(&body).await.map(|draft| draft.id),
        };

        match result {
            Ok(id) => {
                info!(draft_id = %id, created = bound.is_none(), "Draft saved");
                *lock(&self.draft_id) = Some(id);
                self.set_status(Notice::info(text::DRAFT_SAVED));
                Outcome::Completed
            }
            Err(e) => {
                error!(error = %e, "Failed to save draft");
                self.set_status(Notice::error(format!(
                    "Error saving draft: {}",
                    e.user_message("Failed to save draft")
                )));
                Outcome::Failed
            }
        }
    }

    /// Post the form as a note, then discard the bound draft.
    pub async fn publish(&self) -> Outcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            self.set_status(Notice::error(text::BUSY));
            return Outcome::Busy;
        };

        let body = self.form().body();
        if let Err(e) = self.state.api.create_note(&body).await {
            error!(error = %e, "Failed to post note");
            self.set_status(Notice::error(format!(
                "Error posting note: {}",
                e.user_message("Failed to post note")
            )));
            return Outcome::Failed;
        }
        info!("Note posted");

        // The note is out, so the binding goes regardless of how the
        // cleanup went. A draft left behind shows up again on the next enter.
        if let Some(id) = self.draft_id() {
            if let Err(e) = self.state.api.delete_draft(id).await {
                warn!(draft_id = %id, error = %e, "Posted note but failed to delete draft");
            }
        }

        self.reset(None);
        self.set_status(Notice::info(text::NOTE_POSTED));
        Outcome::Completed
    }
}
