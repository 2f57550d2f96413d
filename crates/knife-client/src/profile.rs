//! Profile card, recent notes and the settings form.

use std::sync::{Mutex, MutexGuard};

use tracing::{error, info, warn};

use knife_shared::constants::text;
use knife_shared::protocol::ProfileUpdate;
use knife_shared::Profile;

use crate::actions::Outcome;
use crate::events::Notice;
use crate::render::{self, escape};
use crate::state::AppState;
use crate::view::{FeedView, Region};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileView {
    Loading,
    Failed(String),
    Missing,
    Card(Profile),
}

impl ProfileView {
    pub fn to_html(&self) -> String {
        match self {
            Self::Loading => "<p class='loading'>Loading...</p>".to_string(),
            Self::Failed(msg) => format!("<p class='error-message'>{}</p>", escape(msg.as_str())),
            Self::Missing => format!("<p>{}</p>", text::PROFILE_NOT_FOUND),
            Self::Card(profile) => {
                let name = match profile.display_name.as_str() {
                    "" => text::PROFILE_NAME_FALLBACK.to_string(),
                    name => escape(name),
                };
                let finger = match profile.finger.as_str() {
                    "" => text::PROFILE_FINGER_FALLBACK.to_string(),
                    finger => format!("@{}", escape(finger)),
                };
                let bio = match profile.bio.as_str() {
                    "" => text::PROFILE_BIO_FALLBACK.to_string(),
                    bio => escape(bio),
                };
                format!(
                    "<div class='profile-card'><h2 class='display-name'>{name}</h2>\
                     <p class='finger'>{finger}</p><p class='bio'>{bio}</p></div>"
                )
            }
        }
    }
}

/// The user's profile card plus their most recent notes.
pub struct ProfilePage {
    state: AppState,
    card: Region<ProfileView>,
    recent: Region<FeedView>,
}

impl ProfilePage {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            card: Region::new(ProfileView::Loading),
            recent: Region::new(FeedView::Loading),
        }
    }

    pub fn card(&self) -> ProfileView {
        self.card.snapshot()
    }

    pub fn recent(&self) -> FeedView {
        self.recent.snapshot()
    }

    pub fn html(&self) -> String {
        format!(
            "{}<h3>Recent notes</h3>{}",
            self.card().to_html(),
            self.recent().to_html()
        )
    }

    /// Fetch the card and the recent notes side by side.
    pub async fn load(&self) {
        let card_ticket = self.card.begin();
        let recent_ticket = self.recent.begin();
        let (profile, recent) = futures::join!(self.state.api.profile(), self.state.api.recent_notes());

        let card = match profile {
            Ok(profile) => ProfileView::Card(profile),
            Err(e) if e.is_not_found() => ProfileView::Missing,
            Err(e) => {
                warn!(error = %e, "Failed to fetch profile");
                ProfileView::Failed(format!("Error fetching profile: {e}"))
            }
        };
        self.card.commit(card_ticket, card);

        let recent = match recent {
            Ok(notes) if notes.is_empty() => FeedView::Empty(text::RECENT_EMPTY),
            Ok(notes) => FeedView::Notes(notes.iter().map(render::render).collect()),
            Err(e) => {
                warn!(error = %e, "Failed to fetch recent notes");
                FeedView::Failed(format!("Error fetching recent notes: {e}"))
            }
        };
        self.recent.commit(recent_ticket, recent);
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Whether the collaborator already holds a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Existing {
    Unknown,
    Yes,
    No,
}

pub struct ProfileSettings {
    state: AppState,
    form: Mutex<ProfileUpdate>,
    existing: Mutex<Existing>,
    status: Mutex<Option<Notice>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl ProfileSettings {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            form: Mutex::new(ProfileUpdate {
                display_name: String::new(),
                bio: String::new(),
            }),
            existing: Mutex::new(Existing::Unknown),
            status: Mutex::new(None),
        }
    }

    pub fn form(&self) -> ProfileUpdate {
        lock(&self.form).clone()
    }

    pub fn set_form(&self, form: ProfileUpdate) {
        *lock(&self.form) = form;
    }

    pub fn status(&self) -> Option<Notice> {
        lock(&self.status).clone()
    }

    /// Prefill the form. A 404 means the next save creates the profile.
    pub async fn load(&self) {
        match self.state.api.profile().await {
            Ok(profile) => {
                *lock(&self.form) = ProfileUpdate {
                    display_name: profile.display_name,
                    bio: profile.bio,
                };
                *lock(&self.existing) = Existing::Yes;
            }
            Err(e) if e.is_not_found() => {
                info!("No profile yet");
                *lock(&self.existing) = Existing::No;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load profile");
                *lock(&self.status) = Some(Notice::error(format!("Error loading profile: {e}")));
            }
        }
    }

    pub async fn save(&self) -> Outcome {
        let mut update = self.form();
        update.display_name = update.display_name.trim().to_string();
        if update.display_name.is_empty() {
            *lock(&self.status) = Some(Notice::error(text::PROFILE_NAME_REQUIRED));
            return Outcome::Failed;
        }

        let create = *lock(&self.existing) == Existing::No;
        match self.state.api.save_profile(&update, create).await {
            Ok(()) => {
                info!(create, "Profile saved");
                *lock(&self.existing) = Existing::Yes;
                *lock(&self.form) = update;
                *lock(&self.status) = Some(Notice::info(text::PROFILE_SAVED));
                Outcome::Completed
            }
            Err(e) => {
                error!(error = %e, "Failed to save profile");
                *lock(&self.status) = Some(Notice::error(format!(
                    "Error saving profile: {}",
                    e.user_message("Failed to save profile")
                )));
                Outcome::Failed
            }
        }
    }
}
