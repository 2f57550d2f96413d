//! In-process collaborator.
//!
//! Behaves like a single-user instance held in memory. Every call is
//! recorded, failures can be injected per call, and a call can be held
//! until released to reorder responses. Used by the tests and by the
//! `--offline` mode of the command-line front end.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use knife_shared::protocol::{ComposeBody, ProfileUpdate};
use knife_shared::{AuthStatus, Draft, DraftId, Note, NoteId, Profile, PublicRange};

use crate::api::Collaborator;
use crate::error::{ClientError, Result};

/// One request received by the collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListNotes,
    GetNote(NoteId),
    CreateNote(ComposeBody),
    UpdateNote(Note),
    DeleteNote(NoteId),
    ListBookmarks,
    CreateBookmark(NoteId),
    DeleteBookmark(NoteId),
    ListDrafts,
    CreateDraft(ComposeBody),
    UpdateDraft(DraftId, ComposeBody),
    DeleteDraft(DraftId),
    AuthStatus,
    Login,
    Logout,
    Profile,
    SaveProfile { update: ProfileUpdate, create: bool },
    RecentNotes,
    ListCategories,
    CategoryNotes(String),
}

type Matcher = Box<dyn Fn(&Call) -> bool + Send + Sync>;

struct Failure {
    matches: Matcher,
    error: ClientError,
    once: bool,
}

struct Hold {
    matches: Matcher,
    release: Arc<Notify>,
}

/// Releases a held call.
#[derive(Clone)]
pub struct HoldHandle(Arc<Notify>);

impl HoldHandle {
    pub fn release(&self) {
        self.0.notify_one();
    }
}

struct Store {
    notes: Vec<Note>,
    bookmarks: Vec<NoteId>,
    drafts: Vec<Draft>,
    profile: Option<Profile>,
    password: String,
    logged_in: bool,
    next_note_id: i64,
    next_draft_id: i64,
    calls: Vec<Call>,
    failures: Vec<Failure>,
    holds: Vec<Hold>,
}

pub struct MemoryCollaborator {
    store: Mutex<Store>,
}

impl Default for MemoryCollaborator {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCollaborator {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store {
                notes: Vec::new(),
                bookmarks: Vec::new(),
                drafts: Vec::new(),
                profile: None,
                password: String::new(),
                logged_in: false,
                next_note_id: 1,
                next_draft_id: 1,
                calls: Vec::new(),
                failures: Vec::new(),
                holds: Vec::new(),
            }),
        }
    }

    /// A small populated instance for demos.
    pub fn sample() -> Self {
        let now = Utc::now();
        let note = |id: i64, content: &str, cw: Option<&str>, range: PublicRange, category: Option<&str>| {
            let mut n = Note::new(NoteId(id), content);
            n.author_name = "Knife Admin".into();
            n.author_finger = "admin@localhost".into();
            n.host = "localhost".into();
            n.cw = cw.map(String::from);
            n.public_range = Some(range);
            n.category = category.map(String::from);
            n.create_time = Some(now);
            n.uri = Some(format!("https://localhost/notes/{id}"));
            n
        };
        Self::new()
            .with_notes(vec![
                note(3, "<p>Finished the <em>last</em> season.</p>", Some("ending spoilers"), PublicRange::Public, Some("tv")),
                note(2, "<p>Followers-only musings.</p>", None, PublicRange::FollowersOnly, None),
                note(1, "<p>Hello, fediverse!</p>", None, PublicRange::Public, Some("meta")),
            ])
            .with_bookmarks(vec![NoteId(1)])
            .with_profile(Profile {
                display_name: "Knife Admin".into(),
                bio: "Posting from an in-memory instance.".into(),
                finger: "admin@localhost".into(),
                avatar_url: None,
            })
            .with_password("knife")
            .logged_in(true)
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    // -- setup --------------------------------------------------------------

    /// Seed notes, newest first.
    pub fn with_notes(self, notes: Vec<Note>) -> Self {
        {
            let mut store = self.lock();
            let max = notes.iter().map(|n| n.id.0).max().unwrap_or(0);
            store.next_note_id = store.next_note_id.max(max + 1);
            store.notes = notes;
        }
        self
    }

    pub fn with_bookmarks(self, ids: Vec<NoteId>) -> Self {
        self.lock().bookmarks = ids;
        self
    }

    /// Seed drafts, newest first.
    pub fn with_drafts(self, drafts: Vec<Draft>) -> Self {
        {
            let mut store = self.lock();
            let max = drafts.iter().map(|d| d.id.0).max().unwrap_or(0);
            store.next_draft_id = store.next_draft_id.max(max + 1);
            store.drafts = drafts;
        }
        self
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.lock().profile = Some(profile);
        self
    }

    pub fn with_password(self, password: &str) -> Self {
        self.lock().password = password.to_string();
        self
    }

    pub fn logged_in(self, logged_in: bool) -> Self {
        self.lock().logged_in = logged_in;
        self
    }

    /// Fail every matching call with `error`.
    pub fn fail_when(&self, matches: impl Fn(&Call) -> bool + Send + Sync + 'static, error: ClientError) {
        self.lock().failures.push(Failure {
            matches: Box::new(matches),
            error,
            once: false,
        });
    }

    /// Fail the next matching call only.
    pub fn fail_once(&self, matches: impl Fn(&Call) -> bool + Send + Sync + 'static, error: ClientError) {
        self.lock().failures.push(Failure {
            matches: Box::new(matches),
            error,
            once: true,
        });
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Hold the next matching call until the handle is released.
    pub fn hold_next(&self, matches: impl Fn(&Call) -> bool + Send + Sync + 'static) -> HoldHandle {
        let release = Arc::new(Notify::new());
        self.lock().holds.push(Hold {
            matches: Box::new(matches),
            release: release.clone(),
        });
        HoldHandle(release)
    }

    // -- inspection ---------------------------------------------------------

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| matches(*c)).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn notes(&self) -> Vec<Note> {
        self.lock().notes.clone()
    }

    pub fn drafts(&self) -> Vec<Draft> {
        self.lock().drafts.clone()
    }

    pub fn bookmarks(&self) -> Vec<NoteId> {
        self.lock().bookmarks.clone()
    }

    /// Change a note behind the client's back, as another actor would.
    pub fn edit_note(&self, id: NoteId, edit: impl FnOnce(&mut Note)) {
        if let Some(note) = self.lock().notes.iter_mut().find(|n| n.id == id) {
            edit(note);
        }
    }

    // -- request pipeline ---------------------------------------------------

    /// Record the call, wait on a matching hold, then apply injected failures.
    async fn enter(&self, call: Call) -> Result<()> {
        let hold = {
            let mut store = self.lock();
            store.calls.push(call.clone());
            let pos = store.holds.iter().position(|h| (h.matches)(&call));
            pos.map(|i| store.holds.remove(i).release)
        };

        if let Some(release) = hold {
            release.notified().await;
        }

        let mut store = self.lock();
        let Some(i) = store.failures.iter().position(|f| (f.matches)(&call)) else {
            return Ok(());
        };
        let error = store.failures[i].error.clone();
        if store.failures[i].once {
            store.failures.remove(i);
        }
        Err(error)
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::status(404, format!("{what} not found"))
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[async_trait]
impl Collaborator for MemoryCollaborator {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        self.enter(Call::ListNotes).await?;
        Ok(self.lock().notes.clone())
    }

    async fn get_note(&self, id: NoteId) -> Result<Note> {
        self.enter(Call::GetNote(id)).await?;
        self.lock()
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| not_found("Note"))
    }

    async fn create_note(&self, body: &ComposeBody) -> Result<()> {
        self.enter(Call::CreateNote(body.clone())).await?;
        let mut store = self.lock();
        let id = NoteId(store.next_note_id);
        store.next_note_id += 1;

        let profile = store.profile.clone().unwrap_or_default();
        let mut note = Note::new(id, body.content.clone());
        note.author_name = profile.display_name;
        note.author_finger = profile.finger;
        note.cw = non_empty(&body.cw);
        note.category = non_empty(&body.category);
        note.public_range = Some(body.public_range);
        note.host = "localhost".into();
        note.create_time = Some(Utc::now());
        note.uri = Some(format!("https://localhost/notes/{id}"));
        store.notes.insert(0, note);
        Ok(())
    }

    async fn update_note(&self, note: &Note) -> Result<()> {
        self.enter(Call::UpdateNote(note.clone())).await?;
        let mut store = self.lock();
        let slot = store
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| not_found("Note"))?;
        *slot = note.clone();
        Ok(())
    }

    async fn delete_note(&self, id: NoteId) -> Result<()> {
        self.enter(Call::DeleteNote(id)).await?;
        let mut store = self.lock();
        let before = store.notes.len();
        store.notes.retain(|n| n.id != id);
        if store.notes.len() == before {
            return Err(not_found("Note"));
        }
        store.bookmarks.retain(|b| *b != id);
        Ok(())
    }

    async fn list_bookmarks(&self) -> Result<Vec<Note>> {
        self.enter(Call::ListBookmarks).await?;
        let store = self.lock();
        Ok(store
            .bookmarks
            .iter()
            .filter_map(|id| store.notes.iter().find(|n| n.id == *id).cloned())
            .collect())
    }

    async fn create_bookmark(&self, id: NoteId) -> Result<()> {
        self.enter(Call::CreateBookmark(id)).await?;
        self.lock().bookmarks.push(id);
        Ok(())
    }

    async fn delete_bookmark(&self, id: NoteId) -> Result<()> {
        self.enter(Call::DeleteBookmark(id)).await?;
        self.lock().bookmarks.retain(|b| *b != id);
        Ok(())
    }

    async fn list_drafts(&self) -> Result<Vec<Draft>> {
        self.enter(Call::ListDrafts).await?;
        Ok(self.lock().drafts.clone())
    }

    async fn create_draft(&self, body: &ComposeBody) -> Result<Draft> {
        self.enter(Call::CreateDraft(body.clone())).await?;
        let mut store = self.lock();
        let now = Utc::now();
        let draft = Draft {
            id: DraftId(store.next_draft_id),
            content: body.content.clone(),
            cw: non_empty(&body.cw),
            category: non_empty(&body.category),
            public_range: Some(body.public_range),
            create_time: Some(now),
            update_time: Some(now),
        };
        store.next_draft_id += 1;
        store.drafts.insert(0, draft.clone());
        Ok(draft)
    }

    async fn update_draft(&self, id: DraftId, body: &ComposeBody) -> Result<()> {
        self.enter(Call::UpdateDraft(id, body.clone())).await?;
        let mut store = self.lock();
        let draft = store
            .drafts
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found("Draft"))?;
        draft.content = body.content.clone();
        draft.cw = non_empty(&body.cw);
        draft.category = non_empty(&body.category);
        draft.public_range = Some(body.public_range);
        draft.update_time = Some(Utc::now());
        Ok(())
    }

    async fn delete_draft(&self, id: DraftId) -> Result<()> {
        self.enter(Call::DeleteDraft(id)).await?;
        let mut store = self.lock();
        let before = store.drafts.len();
        store.drafts.retain(|d| d.id != id);
        if store.drafts.len() == before {
            return Err(not_found("Draft"));
        }
        Ok(())
    }

    async fn auth_status(&self) -> Result<AuthStatus> {
        self.enter(Call::AuthStatus).await?;
        Ok(AuthStatus {
            logged_in: self.lock().logged_in,
        })
    }

    async fn login(&self, password: &str) -> Result<Option<String>> {
        self.enter(Call::Login).await?;
        let mut store = self.lock();
        if store.password.is_empty() || store.password != password {
            return Err(ClientError::status(401, "Invalid password"));
        }
        store.logged_in = true;
        Ok(Some("memory-session".to_string()))
    }

    async fn logout(&self) -> Result<()> {
        self.enter(Call::Logout).await?;
        self.lock().logged_in = false;
        Ok(())
    }

    async fn profile(&self) -> Result<Profile> {
        self.enter(Call::Profile).await?;
        self.lock().profile.clone().ok_or_else(|| not_found("Profile"))
    }

    async fn save_profile(&self, update: &ProfileUpdate, create: bool) -> Result<()> {
        self.enter(Call::SaveProfile {
            update: update.clone(),
            create,
        })
        .await?;
        let mut store = self.lock();
        let profile = store.profile.get_or_insert_with(Profile::default);
        profile.display_name = update.display_name.clone();
        profile.bio = update.bio.clone();
        Ok(())
    }

    async fn recent_notes(&self) -> Result<Vec<Note>> {
        self.enter(Call::RecentNotes).await?;
        Ok(self.lock().notes.iter().take(20).cloned().collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        self.enter(Call::ListCategories).await?;
        let mut names: Vec<String> = self
            .lock()
            .notes
            .iter()
            .filter_map(|n| n.category_name().map(String::from))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn category_notes(&self, name: &str) -> Result<Vec<Note>> {
        self.enter(Call::CategoryNotes(name.to_string())).await?;
        Ok(self
            .lock()
            .notes
            .iter()
            .filter(|n| n.category_name() == Some(name))
            .cloned()
            .collect())
    }
}
