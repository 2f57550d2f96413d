//! # knife-shared
//!
//! Wire data model shared by the note client and its collaborators: the
//! records the server owns, the request/response bodies, endpoint paths
//! and the user-facing text the views display.

pub mod constants;
pub mod error;
pub mod models;
pub mod protocol;
pub mod types;

pub use error::SharedError;
pub use models::{AuthStatus, Draft, Note, Profile};
pub use types::{DraftId, NoteId, PublicRange};
