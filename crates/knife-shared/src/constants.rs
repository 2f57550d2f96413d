/// Application name
pub const APP_NAME: &str = "knife";

/// Default collaborator base URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Name of the session cookie set by `POST /api/login`
pub const AUTH_COOKIE: &str = "auth_token";

/// Label rendered for a missing or unrecognized visibility code
pub const UNKNOWN_RANGE_LABEL: &str = "Unknown";

/// REST endpoints of the collaborator, relative to the base URL
pub mod paths {
    pub const NOTES: &str = "/api/notes";
    pub const BOOKMARKS: &str = "/api/bookmarks";
    pub const DRAFTS: &str = "/api/drafts";
    pub const AUTH_STATUS: &str = "/api/auth/status";
    pub const LOGIN: &str = "/api/login";
    pub const LOGOUT: &str = "/api/logout";
    pub const PROFILE: &str = "/api/profile";
    pub const PROFILE_RECENT: &str = "/api/profile/recent";
    pub const CATEGORY: &str = "/api/category";
}

/// User-facing text shown by the feed views
pub mod text {
    pub const TIMELINE_EMPTY: &str = "No notes yet. Be the first to post!";
    pub const BOOKMARKS_EMPTY: &str = "No bookmarks found.";
    pub const CATEGORY_EMPTY: &str = "No notes found in this category.";
    pub const CATEGORY_MISSING: &str = "No category specified.";
    pub const CATEGORIES_EMPTY: &str = "No categories found.";
    pub const NOTE_NOT_FOUND: &str = "Note not found.";
    pub const NOTE_DELETED: &str = "Note deleted.";
    pub const PROFILE_NOT_FOUND: &str = "Profile not found. Please create one in settings.";
    pub const RECENT_EMPTY: &str = "No recent notes.";

    pub const PROFILE_NAME_FALLBACK: &str = "Your Name";
    pub const PROFILE_FINGER_FALLBACK: &str = "@yourhandle";
    pub const PROFILE_BIO_FALLBACK: &str = "No bio provided.";
    pub const PROFILE_NAME_REQUIRED: &str = "Display name is required.";
    pub const PROFILE_SAVED: &str = "Profile saved successfully.";

    pub const CONFIRM_DELETE_NOTE: &str = "Are you sure you want to delete this note?";
    pub const CONFIRM_REMOVE_BOOKMARK: &str = "Remove this note from your bookmarks?";

    pub const NOTE_BOOKMARKED: &str = "Note bookmarked!";
    pub const DRAFT_SAVED: &str = "Draft saved successfully.";
    pub const NOTE_POSTED: &str = "Note posted successfully!";
    pub const LOGGED_IN: &str = "Logged in.";
    pub const LOGGED_OUT: &str = "Logged out.";
    pub const BUSY: &str = "Another request is still in progress.";

    pub const CW_SHOW: &str = "Show";
    pub const CW_HIDE: &str = "Hide";
}
