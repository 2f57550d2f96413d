//! End-to-end flows through the controllers, backed by the in-process
//! collaborator.

use std::sync::Arc;

use knife_client_lib::actions::Outcome;
use knife_client_lib::bookmarks::BookmarkFeedController;
use knife_client_lib::config::ClientConfig;
use knife_client_lib::drafts::DraftManager;
use knife_client_lib::events::RecordingNotifier;
use knife_client_lib::feed::FeedController;
use knife_client_lib::gate::{AutoApprove, AutoDeny, Confirm, CountingConfirm};
use knife_client_lib::memory::{Call, MemoryCollaborator};
use knife_client_lib::state::AppState;
use knife_client_lib::view::{Disclosure, FeedView};
use knife_shared::{Note, NoteId, PublicRange};

fn state(api: &Arc<MemoryCollaborator>, confirm: Arc<dyn Confirm>) -> AppState {
    AppState::new(
        ClientConfig::default(),
        api.clone(),
        confirm,
        Arc::new(RecordingNotifier::new()),
    )
}

fn note(id: i64, cw: Option<&str>, range: Option<i64>) -> Note {
    let mut n = Note::new(NoteId(id), "<p>secret plans</p>");
    n.cw = cw.map(String::from);
    n.public_range = range.map(PublicRange::from_code);
    n
}

#[tokio::test]
async fn public_note_without_warning() {
    let api = Arc::new(MemoryCollaborator::new().with_notes(vec![note(1, None, Some(3))]));
    let feed = FeedController::new(state(&api, Arc::new(AutoApprove)));
    feed.load().await;

    let view = feed.view();
    let unit = &view.units()[0];
    assert_eq!(unit.range_label, "Public");
    assert_eq!(unit.disclosure, Disclosure::Open);
    assert!(!feed.html().contains("cw-container"));
}

#[tokio::test]
async fn warned_note_starts_hidden_and_toggles() {
    let api = Arc::new(MemoryCollaborator::new().with_notes(vec![note(2, Some("spoiler"), None)]));
    let feed = FeedController::new(state(&api, Arc::new(AutoApprove)));
    feed.load().await;

    let html = feed.html();
    assert!(html.contains("cw-content hidden"));
    assert!(html.contains(">Show</button>"));

    assert!(feed.toggle_cw(NoteId(2)));
    let html = feed.html();
    assert!(!html.contains("cw-content hidden"));
    assert!(html.contains(">Hide</button>"));
    assert!(html.contains("<p>secret plans</p>"));
}

#[tokio::test]
async fn logged_out_bookmarks_have_no_remove() {
    let api = Arc::new(
        MemoryCollaborator::new()
            .with_notes(vec![note(1, None, Some(3)), note(2, None, Some(0))])
            .with_bookmarks(vec![NoteId(1), NoteId(2)])
            .logged_in(false),
    );
    let bookmarks = BookmarkFeedController::new(state(&api, Arc::new(AutoApprove)));
    bookmarks.load().await;

    assert_eq!(bookmarks.view().units().len(), 2);
    assert!(!bookmarks.html().contains("remove-bookmark-button"));
}

#[tokio::test]
async fn declined_delete_issues_nothing() {
    let api = Arc::new(MemoryCollaborator::new().with_notes(vec![note(1, None, Some(3))]));
    let confirm = Arc::new(CountingConfirm::new(AutoDeny));
    let feed = FeedController::new(state(&api, confirm.clone()));
    feed.load().await;
    let before = feed.view();

    assert_eq!(feed.delete(NoteId(1)).await, Outcome::Declined);
    assert_eq!(confirm.asked(), 1);
    assert_eq!(api.count(|c| matches!(c, Call::DeleteNote(_))), 0);
    assert_eq!(feed.view(), before);
    assert_eq!(api.notes().len(), 1);
}

#[tokio::test]
async fn visibility_change_keeps_everything_else() {
    let mut original = note(5, None, Some(3));
    original.content = "hi".into();
    let api = Arc::new(MemoryCollaborator::new().with_notes(vec![original.clone()]));
    let feed = FeedController::new(state(&api, Arc::new(AutoApprove)));

    feed.change_visibility(NoteId(5), PublicRange::from_code(1)).await;

    let mut expected = original;
    expected.public_range = Some(PublicRange::FollowersOnly);
    assert_eq!(api.notes(), vec![expected]);
    assert_eq!(feed.view().units()[0].range_label, "Followers Only");
}

#[tokio::test]
async fn draft_lifecycle() {
    let api = Arc::new(MemoryCollaborator::new());
    let drafts = DraftManager::new(state(&api, Arc::new(AutoApprove)));
    drafts.enter().await;
    assert_eq!(drafts.draft_id(), None);

    drafts.edit(|f| f.content = "first".into());
    drafts.save().await;
    let id = drafts.draft_id().expect("bound after first save");

    drafts.edit(|f| f.content = "second".into());
    drafts.save().await;
    assert_eq!(drafts.draft_id(), Some(id));
    assert_eq!(api.count(|c| matches!(c, Call::CreateDraft(_))), 1);
    assert_eq!(api.drafts().len(), 1);
    assert_eq!(api.drafts()[0].content, "second");

    // A fresh manager resumes the same draft.
    let resumed = DraftManager::new(state(&api, Arc::new(AutoApprove)));
    resumed.enter().await;
    assert_eq!(resumed.draft_id(), Some(id));
    assert_eq!(resumed.form().content, "second");

    assert_eq!(resumed.publish().await, Outcome::Completed);
    assert!(api.drafts().is_empty());
    assert_eq!(api.notes()[0].content, "second");

    let feed = FeedController::new(state(&api, Arc::new(AutoApprove)));
    feed.load().await;
    assert!(matches!(feed.view(), FeedView::Notes(ref units) if units.len() == 1));
}
