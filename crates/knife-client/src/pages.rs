//! Read views outside the timeline: a single note, the category index and
//! one category's notes.

use tracing::{info, warn};

use knife_shared::constants::text;
use knife_shared::NoteId;

use crate::actions::{self, Outcome};
use crate::error::ClientError;
use crate::render::{self, escape};
use crate::state::AppState;
use crate::view::{FeedView, NoteAction, NoteUnit, Region};

// ---------------------------------------------------------------------------
// Single note
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteView {
    Loading,
    /// The note could not be shown; holds the message displayed instead.
    Unavailable(String),
    Note(NoteUnit),
    /// Terminal state after a successful delete.
    Deleted,
}

impl NoteView {
    pub fn to_html(&self) -> String {
        match self {
            Self::Loading => "<p class='loading'>Loading...</p>".to_string(),
            Self::Unavailable(msg) => format!("<p class='error-message'>{}</p>", escape(msg.as_str())),
            Self::Note(unit) => unit.to_html(),
            Self::Deleted => format!("<p>{}</p>", text::NOTE_DELETED),
        }
    }
}

pub struct NotePage {
    state: AppState,
    id: NoteId,
    region: Region<NoteView>,
}

impl NotePage {
    pub fn new(state: AppState, id: NoteId) -> Self {
        Self {
            state,
            id,
            region: Region::new(NoteView::Loading),
        }
    }

    pub fn view(&self) -> NoteView {
        self.region.snapshot()
    }

    pub fn html(&self) -> String {
        self.view().to_html()
    }

    pub async fn load(&self) {
        let ticket = self.region.begin();
        let view = match self.state.api.get_note(self.id).await {
            Ok(note) => {
                let mut unit = render::render(&note);
                render::with_uri(&mut unit, note.uri.as_deref());
                unit.attach(NoteAction::Bookmark);
                unit.attach(NoteAction::Delete);
                NoteView::Note(unit)
            }
            Err(e) => {
                warn!(note_id = %self.id, error = %e, "Failed to fetch note");
                let message = match e {
                    _ if e.is_not_found() => text::NOTE_NOT_FOUND.to_string(),
                    ClientError::Status { status, .. } => format!("Failed to fetch note. Status: {status}"),
                    other => format!("Error fetching note: {other}"),
                };
                NoteView::Unavailable(message)
            }
        };
        self.region.commit(ticket, view);
    }

    pub async fn bookmark(&self) -> Outcome {
        actions::bookmark_note(&self.state, self.id).await
    }

    pub async fn delete(&self) -> Outcome {
        let outcome = actions::delete_note(&self.state, self.id).await;
        if outcome.is_completed() {
            let ticket = self.region.begin();
            self.region.commit(ticket, NoteView::Deleted);
        }
        outcome
    }

    pub fn toggle_cw(&self) -> bool {
        self.region.update(|view| match view {
            NoteView::Note(unit) => {
                unit.toggle_cw();
                true
            }
            _ => false,
        })
    }
}

// ---------------------------------------------------------------------------
// Category index
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoriesView {
    Loading,
    Failed(String),
    Empty,
    Categories(Vec<String>),
}

impl CategoriesView {
    pub fn to_html(&self) -> String {
        match self {
            Self::Loading => "<p class='loading'>Loading...</p>".to_string(),
            Self::Failed(msg) => format!("<p class='error-message'>{}</p>", escape(msg.as_str())),
            Self::Empty => format!("<p>{}</p>", text::CATEGORIES_EMPTY),
            Self::Categories(names) => {
                let items: String = names
                    .iter()
                    .map(|name| {
                        format!(
                            "<li><a href=\"/category/{}\">{}</a></li>",
                            urlencoding::encode(name),
                            escape(name.as_str())
                        )
                    })
                    .collect();
                format!("<ul class='category-list'>{items}</ul>")
            }
        }
    }
}

pub struct CategoriesPage {
    state: AppState,
    region: Region<CategoriesView>,
}

impl CategoriesPage {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            region: Region::new(CategoriesView::Loading),
        }
    }

    pub fn view(&self) -> CategoriesView {
        self.region.snapshot()
    }

    pub fn html(&self) -> String {
        self.view().to_html()
    }

    pub async fn load(&self) {
        let ticket = self.region.begin();
        let view = match self.state.api.list_categories().await {
            Ok(names) if names.is_empty() => CategoriesView::Empty,
            Ok(names) => {
                info!(count = names.len(), "Categories fetched");
                CategoriesView::Categories(names)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch categories");
                CategoriesView::Failed(format!("Error fetching categories: {e}"))
            }
        };
        self.region.commit(ticket, view);
    }
}

// ---------------------------------------------------------------------------
// Category feed
// ---------------------------------------------------------------------------

/// Notes filed under one category. Read-only: no actions are attached.
pub struct CategoryFeed {
    state: AppState,
    name: String,
    region: Region<FeedView>,
}

impl CategoryFeed {
    pub fn new(state: AppState, name: impl Into<String>) -> Self {
        Self {
            state,
            name: name.into(),
            region: Region::new(FeedView::Loading),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> FeedView {
        self.region.snapshot()
    }

    pub fn html(&self) -> String {
        self.view().to_html()
    }

    pub async fn load(&self) {
        let ticket = self.region.begin();
        let name = self.name.trim();
        if name.is_empty() {
            self.region.commit(ticket, FeedView::Empty(text::CATEGORY_MISSING));
            return;
        }

        let view = match self.state.api.category_notes(name).await {
            Ok(notes) if notes.is_empty() => FeedView::Empty(text::CATEGORY_EMPTY),
            Ok(notes) => FeedView::Notes(notes.iter().map(render::render).collect()),
            Err(e) => {
                warn!(category = name, error = %e, "Failed to fetch category notes");
                FeedView::Failed(format!("Error fetching notes: {e}"))
            }
        };
        self.region.commit(ticket, view);
    }

    pub fn toggle_cw(&self, id: NoteId) -> bool {
        self.region.update(|view| view.unit_mut(id).map(NoteUnit::toggle_cw).is_some())
    }
}

#[cfg(test)]
mod tests {
    use knife_shared::Note;

    use super::*;
    use crate::memory::{Call, MemoryCollaborator};
    use crate::state::testing::Harness;

    fn with_note() -> MemoryCollaborator {
        let mut note = Note::new(NoteId(5), "<p>hi</p>");
        note.uri = Some("https://example.org/notes/5".into());
        note.category = Some("rust".into());
        MemoryCollaborator::new().with_notes(vec![note])
    }

    #[tokio::test]
    async fn test_note_page_renders_actions_and_uri() {
        let h = Harness::new(with_note());
        let page = NotePage::new(h.state.clone(), NoteId(5));
        page.load().await;

        let NoteView::Note(unit) = page.view() else {
            panic!("expected a rendered note");
        };
        assert_eq!(unit.actions, vec![NoteAction::Bookmark, NoteAction::Delete]);
        assert!(page.html().contains("URI: <a href=\"https://example.org/notes/5\">"));
    }

    #[tokio::test]
    async fn test_note_page_not_found() {
        let h = Harness::new(MemoryCollaborator::new());
        let page = NotePage::new(h.state.clone(), NoteId(5));
        page.load().await;
        assert_eq!(page.view(), NoteView::Unavailable("Note not found.".into()));
    }

    #[tokio::test]
    async fn test_note_page_other_status() {
        let h = Harness::new(with_note());
        h.api.fail_when(
            |c| matches!(c, Call::GetNote(_)),
            ClientError::status(500, "boom"),
        );
        let page = NotePage::new(h.state.clone(), NoteId(5));
        page.load().await;
        assert_eq!(
            page.view(),
            NoteView::Unavailable("Failed to fetch note. Status: 500".into())
        );
    }

    #[tokio::test]
    async fn test_note_page_delete_is_terminal() {
        let h = Harness::new(with_note());
        let page = NotePage::new(h.state.clone(), NoteId(5));
        page.load().await;

        assert_eq!(page.delete().await, Outcome::Completed);
        assert_eq!(page.view(), NoteView::Deleted);
        assert_eq!(page.html(), "<p>Note deleted.</p>");
        assert!(h.api.notes().is_empty());
    }

    #[tokio::test]
    async fn test_note_page_declined_delete_keeps_note() {
        let h = Harness::declining(with_note());
        let page = NotePage::new(h.state.clone(), NoteId(5));
        page.load().await;
        assert_eq!(page.delete().await, Outcome::Declined);
        assert!(matches!(page.view(), NoteView::Note(_)));
    }

    #[tokio::test]
    async fn test_categories_page() {
        let h = Harness::new(with_note());
        let page = CategoriesPage::new(h.state.clone());
        page.load().await;
        assert_eq!(page.view(), CategoriesView::Categories(vec!["rust".into()]));
        assert!(page.html().contains("<a href=\"/category/rust\">rust</a>"));

        let empty = Harness::new(MemoryCollaborator::new());
        let page = CategoriesPage::new(empty.state.clone());
        page.load().await;
        assert_eq!(page.html(), "<p>No categories found.</p>");
    }

    #[tokio::test]
    async fn test_category_feed_without_name_sends_nothing() {
        let h = Harness::new(with_note());
        let feed = CategoryFeed::new(h.state.clone(), "  ");
        feed.load().await;
        assert_eq!(feed.view(), FeedView::Empty(text::CATEGORY_MISSING));
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_category_feed_has_no_actions() {
        let h = Harness::new(with_note());
        let feed = CategoryFeed::new(h.state.clone(), "rust");
        feed.load().await;
        let view = feed.view();
        assert_eq!(view.units().len(), 1);
        assert!(view.units()[0].actions.is_empty());

        let other = CategoryFeed::new(h.state.clone(), "go");
        other.load().await;
        assert_eq!(other.html(), "<p>No notes found in this category.</p>");
    }
}
