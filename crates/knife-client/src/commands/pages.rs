use knife_shared::NoteId;

use super::Rendered;
use crate::pages::{CategoriesPage, CategoryFeed, NotePage};
use crate::state::AppState;

pub async fn show_note(state: &AppState, id: NoteId) -> Rendered {
    let page = NotePage::new(state.clone(), id);
    page.load().await;
    Rendered::page(page.html())
}

/// Delete from the single-note page. Ends in the "Note deleted." state.
pub async fn delete_note(state: &AppState, id: NoteId) -> Rendered {
    let page = NotePage::new(state.clone(), id);
    page.load().await;
    let outcome = page.delete().await;
    Rendered::action(page.html(), outcome)
}

pub async fn categories(state: &AppState) -> Rendered {
    let page = CategoriesPage::new(state.clone());
    page.load().await;
    Rendered::page(page.html())
}

pub async fn category(state: &AppState, name: &str) -> Rendered {
    let feed = CategoryFeed::new(state.clone(), name);
    feed.load().await;
    Rendered::page(feed.html())
}
