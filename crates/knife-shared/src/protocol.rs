use serde::{Deserialize, Serialize};

use crate::models::Draft;
use crate::types::{NoteId, PublicRange};

/// Body of `POST /api/notes`, `POST /api/drafts` and `PUT /api/drafts/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComposeBody {
    pub content: String,
    pub cw: String,
    pub category: String,
    pub public_range: PublicRange,
}

impl From<&Draft> for ComposeBody {
    fn from(d: &Draft) -> Self {
        Self {
            content: d.content.clone(),
            cw: d.cw.clone().unwrap_or_default(),
            category: d.category.clone().unwrap_or_default(),
            public_range: d.public_range.unwrap_or_default(),
        }
    }
}

/// Body of `POST /api/bookmarks`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkRequest {
    pub note_id: NoteId,
}

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Body of `PUT /api/profile` / `POST /api/profile`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub bio: String,
}

/// Error body returned by the collaborator on a non-success status.
///
/// Different handlers fill different fields; the first present one wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_text(self) -> Option<String> {
        [self.description, self.message, self.error]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }

    /// Extract the human-readable text from a raw response body, if any.
    pub fn text_from_bytes(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_text)
    }
}
