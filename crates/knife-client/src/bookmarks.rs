//! Bookmark list controller.
//!
//! Same shape as the timeline, except that the only action is "Remove" and
//! it is offered only to a logged-in user. Login state is asked for once
//! per render pass and never cached.

use tracing::{error, info, warn};

use knife_shared::constants::text;
use knife_shared::{Note, NoteId};

use crate::actions::Outcome;
use crate::events::Notice;
use crate::render;
use crate::state::AppState;
use crate::view::{FeedView, NoteAction, Region};

pub struct BookmarkFeedController {
    state: AppState,
    region: Region<FeedView>,
}

impl BookmarkFeedController {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            region: Region::new(FeedView::Loading),
        }
    }

    pub fn view(&self) -> FeedView {
        self.region.snapshot()
    }

    pub fn html(&self) -> String {
        self.view().to_html()
    }

    pub async fn load(&self) {
        let ticket = self.region.begin();
        let view = match self.state.api.list_bookmarks().await {
            Ok(notes) => {
                info!(count = notes.len(), "Bookmarks fetched");
                self.render(&notes).await
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch bookmarks");
                FeedView::Failed(format!("Error fetching bookmarks: {e}"))
            }
        };
        self.region.commit(ticket, view);
    }

    /// Build the bookmark view. Queries the login state exactly once
    /// unless the list is empty.
    pub async fn render(&self, notes: &[Note]) -> FeedView {
        if notes.is_empty() {
            return FeedView::Empty(text::BOOKMARKS_EMPTY);
        }

        let logged_in = match self.state.api.auth_status().await {
            Ok(status) => status.logged_in,
            Err(e) => {
                warn!(error = %e, "Auth status unavailable, treating as logged out");
                false
            }
        };

        let units = notes
            .iter()
            .map(|note| {
                let mut unit = render::render(note);
                if logged_in {
                    unit.attach(NoteAction::RemoveBookmark);
                }
                unit
            })
            .collect();
        FeedView::Notes(units)
    }

    pub async fn remove(&self, id: NoteId) -> Outcome {
        if !self.state.confirm(text::CONFIRM_REMOVE_BOOKMARK) {
            return Outcome::Declined;
        }

        match self.state.api.delete_bookmark(id).await {
            Ok(()) => {
                info!(note_id = %id, "Bookmark removed");
                self.load().await;
                Outcome::Completed
            }
            Err(e) => {
                error!(note_id = %id, error = %e, "Failed to remove bookmark");
                self.state.notify(Notice::error(format!(
                    "Error removing bookmark: {}",
                    e.user_message("Failed to remove bookmark")
                )));
                Outcome::Failed
            }
        }
    }

    pub fn toggle_cw(&self, id: NoteId) -> bool {
        self.region.update(|view| {
            view.unit_mut(id).map(|unit| unit.toggle_cw()).is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::memory::{Call, MemoryCollaborator};
    use crate::state::testing::Harness;

    fn seeded(logged_in: bool) -> MemoryCollaborator {
        MemoryCollaborator::new()
            .with_notes(vec![Note::new(NoteId(7), "a"), Note::new(NoteId(8), "b")])
            .with_bookmarks(vec![NoteId(7), NoteId(8)])
            .logged_in(logged_in)
    }

    #[tokio::test]
    async fn test_logged_out_gets_no_remove_action() {
        let h = Harness::new(seeded(false));
        let bookmarks = BookmarkFeedController::new(h.state.clone());
        bookmarks.load().await;

        let view = bookmarks.view();
        assert_eq!(view.units().len(), 2);
        assert!(view.units().iter().all(|u| u.actions.is_empty()));
        assert!(!bookmarks.html().contains("remove-bookmark-button"));
    }

    #[tokio::test]
    async fn test_logged_in_gets_remove_on_every_unit() {
        let h = Harness::new(seeded(true));
        let bookmarks = BookmarkFeedController::new(h.state.clone());
        bookmarks.load().await;

        assert!(bookmarks
            .view()
            .units()
            .iter()
            .all(|u| u.actions == vec![NoteAction::RemoveBookmark]));
        assert_eq!(h.api.count(|c| matches!(c, Call::AuthStatus)), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_counts_as_logged_out() {
        let h = Harness::new(seeded(true));
        h.api.fail_when(
            |c| matches!(c, Call::AuthStatus),
            ClientError::Transport("reset".into()),
        );
        let bookmarks = BookmarkFeedController::new(h.state.clone());
        bookmarks.load().await;
        assert!(bookmarks.view().units().iter().all(|u| u.actions.is_empty()));
    }

    #[tokio::test]
    async fn test_empty_list_skips_auth() {
        let h = Harness::new(MemoryCollaborator::new());
        let bookmarks = BookmarkFeedController::new(h.state.clone());
        bookmarks.load().await;
        assert_eq!(bookmarks.html(), "<p>No bookmarks found.</p>");
        assert_eq!(h.api.calls(), vec![Call::ListBookmarks]);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_inline() {
        let h = Harness::new(seeded(true));
        h.api.fail_when(
            |c| matches!(c, Call::ListBookmarks),
            ClientError::status(500, "boom"),
        );
        let bookmarks = BookmarkFeedController::new(h.state.clone());
        bookmarks.load().await;
        assert_eq!(
            bookmarks.view(),
            FeedView::Failed("Error fetching bookmarks: Server responded 500: boom".into())
        );
    }

    #[tokio::test]
    async fn test_remove_reloads_and_requeries_auth() {
        let h = Harness::new(seeded(true));
        let bookmarks = BookmarkFeedController::new(h.state.clone());
        bookmarks.load().await;
        h.api.clear_calls();

        assert_eq!(bookmarks.remove(NoteId(7)).await, Outcome::Completed);
        assert_eq!(
            h.api.calls(),
            vec![Call::DeleteBookmark(NoteId(7)), Call::ListBookmarks, Call::AuthStatus]
        );
        assert_eq!(bookmarks.view().units().len(), 1);
    }

    #[tokio::test]
    async fn test_declined_remove_sends_nothing() {
        let h = Harness::declining(seeded(true));
        let bookmarks = BookmarkFeedController::new(h.state.clone());
        bookmarks.load().await;
        h.api.clear_calls();

        assert_eq!(bookmarks.remove(NoteId(7)).await, Outcome::Declined);
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_remove_failure_notifies() {
        let h = Harness::new(seeded(true));
        h.api.fail_when(
            |c| matches!(c, Call::DeleteBookmark(_)),
            ClientError::Status {
                status: 500,
                description: None,
            },
        );
        let bookmarks = BookmarkFeedController::new(h.state.clone());
        assert_eq!(bookmarks.remove(NoteId(7)).await, Outcome::Failed);
        assert_eq!(h.notice_texts(), vec!["Error removing bookmark: Failed to remove bookmark"]);
    }
}
