use knife_shared::NoteId;

use super::Rendered;
use crate::bookmarks::BookmarkFeedController;
use crate::state::AppState;

pub async fn list(state: &AppState) -> Rendered {
    let bookmarks = BookmarkFeedController::new(state.clone());
    bookmarks.load().await;
    Rendered::page(bookmarks.html())
}

pub async fn remove(state: &AppState, id: NoteId) -> Rendered {
    let bookmarks = BookmarkFeedController::new(state.clone());
    bookmarks.load().await;
    let outcome = bookmarks.remove(id).await;
    Rendered::action(bookmarks.html(), outcome)
}
