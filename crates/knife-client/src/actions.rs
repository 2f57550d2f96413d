//! Note mutations shared by the timeline and the single-note page.
//!
//! None of these touch a view. Callers decide what to refresh based on the
//! returned [`Outcome`].

use serde::Serialize;
use tracing::{error, info};

use knife_shared::constants::text;
use knife_shared::{NoteId, PublicRange};

use crate::events::Notice;
use crate::state::AppState;

/// Result of a user action as seen by the controller that ran it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The confirmation gate said no; nothing was sent.
    Declined,
    /// The action was rejected locally because another one is in flight.
    Busy,
    Completed,
    /// The request failed and the user was told.
    Failed,
}

impl Outcome {
    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

/// Ask for confirmation, then delete the note.
pub async fn delete_note(state: &AppState, id: NoteId) -> Outcome {
    if !state.confirm(text::CONFIRM_DELETE_NOTE) {
        return Outcome::Declined;
    }

    match state.api.delete_note(id).await {
        Ok(()) => {
            info!(note_id = %id, "Note deleted");
            Outcome::Completed
        }
        Err(e) => {
            error!(note_id = %id, error = %e, "Failed to delete note");
            state.notify(Notice::error(format!(
                "Error deleting note: {}",
                e.user_message("Failed to delete note")
            )));
            Outcome::Failed
        }
    }
}

/// Bookmark the note. Success and failure are both reported as notices.
pub async fn bookmark_note(state: &AppState, id: NoteId) -> Outcome {
    match state.api.create_bookmark(id).await {
        Ok(()) => {
            state.notify(Notice::info(text::NOTE_BOOKMARKED));
            Outcome::Completed
        }
        Err(e) => {
            error!(note_id = %id, error = %e, "Failed to bookmark note");
            state.notify(Notice::error(format!(
                "Error bookmarking note: {}",
                e.user_message("Failed to bookmark note")
            )));
            Outcome::Failed
        }
    }
}

/// Read the current record, overwrite its visibility and write it back
/// whole. Every other field, including ones this client does not know,
/// goes back exactly as it was read.
pub async fn change_visibility(state: &AppState, id: NoteId, range: PublicRange) -> Outcome {
    let result = async {
        let mut note = state.api.get_note(id).await?;
        note.public_range = Some(range);
        state.api.update_note(&note).await
    }
    .await;

    match result {
        Ok(()) => {
            info!(note_id = %id, public_range = range.code(), "Note visibility updated");
            Outcome::Completed
        }
        Err(e) => {
            error!(note_id = %id, error = %e, "Failed to update note visibility");
            state.notify(Notice::error(format!(
                "Error updating note: {}",
                e.user_message("Failed to update note")
            )));
            Outcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use knife_shared::Note;

    use super::*;
    use crate::error::ClientError;
    use crate::memory::{Call, MemoryCollaborator};
    use crate::state::testing::Harness;

    fn seeded() -> MemoryCollaborator {
        let mut note = Note::new(NoteId(5), "hi");
        note.public_range = Some(PublicRange::Public);
        MemoryCollaborator::new().with_notes(vec![note])
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let h = Harness::declining(seeded());
        assert_eq!(delete_note(&h.state, NoteId(5)).await, Outcome::Declined);
        assert_eq!(h.confirm.asked(), 1);
        assert!(h.api.calls().is_empty());
        assert!(h.notices.notices().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_surfaces_description() {
        let h = Harness::new(seeded());
        h.api.fail_when(
            |c| matches!(c, Call::DeleteNote(_)),
            ClientError::status(403, "You cannot delete this note"),
        );
        assert_eq!(delete_note(&h.state, NoteId(5)).await, Outcome::Failed);
        assert_eq!(h.notice_texts(), vec!["Error deleting note: You cannot delete this note"]);
    }

    #[tokio::test]
    async fn test_delete_failure_without_body_uses_fallback() {
        let h = Harness::new(seeded());
        h.api.fail_when(
            |c| matches!(c, Call::DeleteNote(_)),
            ClientError::Status {
                status: 500,
                description: None,
            },
        );
        delete_note(&h.state, NoteId(5)).await;
        assert_eq!(h.notice_texts(), vec!["Error deleting note: Failed to delete note"]);
    }

    #[tokio::test]
    async fn test_bookmark_notices() {
        let h = Harness::new(seeded());
        assert_eq!(bookmark_note(&h.state, NoteId(5)).await, Outcome::Completed);
        h.api.fail_once(
            |c| matches!(c, Call::CreateBookmark(_)),
            ClientError::status(401, "Unauthorized"),
        );
        assert_eq!(bookmark_note(&h.state, NoteId(5)).await, Outcome::Failed);
        assert_eq!(
            h.notice_texts(),
            vec!["Note bookmarked!", "Error bookmarking note: Unauthorized"]
        );
    }

    #[tokio::test]
    async fn test_visibility_keeps_other_fields() {
        let mut note = Note::new(NoteId(5), "hi");
        note.public_range = Some(PublicRange::Public);
        note.extra.insert("sensitive".into(), serde_json::json!(true));
        let h = Harness::new(MemoryCollaborator::new().with_notes(vec![note.clone()]));

        let outcome = change_visibility(&h.state, NoteId(5), PublicRange::FollowersOnly).await;
        assert_eq!(outcome, Outcome::Completed);

        let mut expected = note;
        expected.public_range = Some(PublicRange::FollowersOnly);
        assert_eq!(
            h.api.calls(),
            vec![Call::GetNote(NoteId(5)), Call::UpdateNote(expected)]
        );
    }

    #[tokio::test]
    async fn test_visibility_read_failure_skips_write() {
        let h = Harness::new(seeded());
        h.api.fail_when(
            |c| matches!(c, Call::GetNote(_)),
            ClientError::status(404, "Note not found"),
        );
        assert_eq!(
            change_visibility(&h.state, NoteId(5), PublicRange::Private).await,
            Outcome::Failed
        );
        assert_eq!(h.api.count(|c| matches!(c, Call::UpdateNote(_))), 0);
        assert_eq!(h.notice_texts(), vec!["Error updating note: Note not found"]);
    }
}
