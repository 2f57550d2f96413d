use knife_shared::{NoteId, PublicRange};

use super::Rendered;
use crate::feed::FeedController;
use crate::state::AppState;

pub async fn timeline(state: &AppState) -> Rendered {
    let feed = FeedController::new(state.clone());
    feed.load().await;
    Rendered::page(feed.html())
}

pub async fn delete(state: &AppState, id: NoteId) -> Rendered {
    let feed = FeedController::new(state.clone());
    feed.load().await;
    let outcome = feed.delete(id).await;
    Rendered::action(feed.html(), outcome)
}

pub async fn bookmark(state: &AppState, id: NoteId) -> Rendered {
    let feed = FeedController::new(state.clone());
    feed.load().await;
    let outcome = feed.bookmark(id).await;
    Rendered::action(feed.html(), outcome)
}

pub async fn set_visibility(state: &AppState, id: NoteId, range: PublicRange) -> Rendered {
    let feed = FeedController::new(state.clone());
    let outcome = feed.change_visibility(id, range).await;
    Rendered::action(feed.html(), outcome)
}
