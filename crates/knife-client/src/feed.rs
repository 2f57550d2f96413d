//! Timeline controller.
//!
//! Owns the timeline region. Every write is followed by a full reload;
//! nothing is patched into the displayed list locally.

use tracing::{info, warn};

use knife_shared::constants::text;
use knife_shared::{Note, NoteId, PublicRange};

use crate::actions::{self, Outcome};
use crate::render;
use crate::state::AppState;
use crate::view::{FeedView, NoteAction, Region};

pub struct FeedController {
    state: AppState,
    region: Region<FeedView>,
}

impl FeedController {
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

    /// Fetch the timeline and replace the region with it.
    pub async fn load(&self) {
        let ticket = self.region.begin();
        let view = match self.state.api.list_notes().await {
            Ok(notes) => {
                info!(count = notes.len(), "Timeline fetched");
                Self::render(&notes)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch timeline");
                FeedView::Failed(format!("Error fetching timeline: {e}"))
            }
        };
        self.region.commit(ticket, view);
    }

    /// Build the timeline view from scratch.
    pub fn render(notes: &[Note]) -> FeedView {
        if notes.is_empty() {
            return FeedView::Empty(text::TIMELINE_EMPTY);
        }
        let units = notes
            .iter()
            .map(|note| {
                let mut unit = render::render(note);
                unit.attach(NoteAction::Delete);
                unit.attach(NoteAction::Bookmark);
                unit.attach(NoteAction::Visibility {
                    current: note.public_range,
                });
                unit
            })
            .collect();
        FeedView::Notes(units)
    }

    pub async fn delete(&self, id: NoteId) -> Outcome {
        let outcome = actions::delete_note(&self.state, id).await;
        if outcome.is_completed() {
            self.load().await;
        }
        outcome
    }

    pub async fn bookmark(&self, id: NoteId) -> Outcome {
        actions::bookmark_note(&self.state, id).await
    }

    /// The timeline reloads whether or not the update went through.
    pub async fn change_visibility(&self, id: NoteId, range: PublicRange) -> Outcome {
        let outcome = actions::change_visibility(&self.state, id, range).await;
        self.load().await;
        outcome
    }

    /// Flip the content-warning disclosure of a displayed note.
    pub fn toggle_cw(&self, id: NoteId) -> bool {
        self.region.update(|view| match view.unit_mut(id) {
            Some(unit) => {
                unit.toggle_cw();
                true
            }
            None => false,
        })
    }
}
