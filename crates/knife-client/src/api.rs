//! The collaborator seam.
//!
//! Everything the client knows about the server goes through
//! [`Collaborator`]. [`HttpCollaborator`] talks to a live instance over
//! REST; [`crate::memory::MemoryCollaborator`] is an in-process stand-in.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use knife_shared::constants::{paths, AUTH_COOKIE};
use knife_shared::protocol::{BookmarkRequest, ComposeBody, ErrorBody, LoginRequest, ProfileUpdate};
use knife_shared::{AuthStatus, Draft, DraftId, Note, NoteId, Profile};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Shared handle to a collaborator, as held by every controller.
pub type SharedCollaborator = Arc<dyn Collaborator>;

/// Remote operations consumed by the controllers.
#[async_trait]
pub trait Collaborator: Send + Sync {
    async fn list_notes(&self) -> Result<Vec<Note>>;
    async fn get_note(&self, id: NoteId) -> Result<Note>;
    async fn create_note(&self, body: &ComposeBody) -> Result<()>;
    /// Replace the whole record. Callers must send every field back.
    async fn update_note(&self, note: &Note) -> Result<()>;
    async fn delete_note(&self, id: NoteId) -> Result<()>;

    async fn list_bookmarks(&self) -> Result<Vec<Note>>;
    async fn create_bookmark(&self, id: NoteId) -> Result<()>;
    async fn delete_bookmark(&self, id: NoteId) -> Result<()>;

    /// Newest first.
    async fn list_drafts(&self) -> Result<Vec<Draft>>;
    /// Returns the stored draft, including its freshly assigned id.
    async fn create_draft(&self, body: &ComposeBody) -> Result<Draft>;
    async fn update_draft(&self, id: DraftId, body: &ComposeBody) -> Result<()>;
    async fn delete_draft(&self, id: DraftId) -> Result<()>;

    async fn auth_status(&self) -> Result<AuthStatus>;
    /// Returns the session token when the server handed one out.
    async fn login(&self, password: &str) -> Result<Option<String>>;
    async fn logout(&self) -> Result<()>;

    async fn profile(&self) -> Result<Profile>;
    /// `create` selects POST (no profile yet) over PUT.
    async fn save_profile(&self, update: &ProfileUpdate, create: bool) -> Result<()>;
    async fn recent_notes(&self) -> Result<Vec<Note>>;

    async fn list_categories(&self) -> Result<Vec<String>>;
    async fn category_notes(&self, name: &str) -> Result<Vec<Note>>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// [`Collaborator`] backed by the instance's REST API.
#[derive(Clone)]
pub struct HttpCollaborator {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpCollaborator {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("knife/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match self.auth_token {
            Some(ref token) => builder.header(header::COOKIE, format!("{AUTH_COOKIE}={token}")),
            None => builder,
        }
    }

    /// Send and map non-success statuses to [`ClientError::Status`].
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("Invalid request: {e}")))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%method, %path, status = status.as_u16(), "Collaborator responded");

        if status.is_success() {
            return Ok(response);
        }

        // Best effort: an unreadable error body still yields a status error.
        let body = response.bytes().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            description: ErrorBody::text_from_bytes(&body),
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read body: {e}")))?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Malformed(e.to_string()))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await.map(|_| ())
    }

    fn json<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> RequestBuilder {
        self.request(method, path).json(body)
    }
}

#[async_trait]
impl Collaborator for HttpCollaborator {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        self.fetch_json(self.request(Method::GET, paths::NOTES)).await
    }

    async fn get_note(&self, id: NoteId) -> Result<Note> {
        let path = format!("{}/{id}", paths::NOTES);
        self.fetch_json(self.request(Method::GET, &path)).await
    }

    async fn create_note(&self, body: &ComposeBody) -> Result<()> {
        self.execute(self.json(Method::POST, paths::NOTES, body)).await
    }

    async fn update_note(&self, note: &Note) -> Result<()> {
        let path = format!("{}/{}", paths::NOTES, note.id);
        self.execute(self.json(Method::PUT, &path, note)).await
    }

    async fn delete_note(&self, id: NoteId) -> Result<()> {
        let path = format!("{}/{id}", paths::NOTES);
        self.execute(self.request(Method::DELETE, &path)).await
    }

    async fn list_bookmarks(&self) -> Result<Vec<Note>> {
        self.fetch_json(self.request(Method::GET, paths::BOOKMARKS)).await
    }

    async fn create_bookmark(&self, id: NoteId) -> Result<()> {
        let body = BookmarkRequest { note_id: id };
        self.execute(self.json(Method::POST, paths::BOOKMARKS, &body)).await
    }

    async fn delete_bookmark(&self, id: NoteId) -> Result<()> {
        let path = format!("{}/{id}", paths::BOOKMARKS);
        self.execute(self.request(Method::DELETE, &path)).await
    }

    async fn list_drafts(&self) -> Result<Vec<Draft>> {
        self.fetch_json(self.request(Method::GET, paths::DRAFTS)).await
    }

    async fn create_draft(&self, body: &ComposeBody) -> Result<Draft> {
        self.fetch_json(self.json(Method::POST, paths::DRAFTS, body)).await
    }

    async fn update_draft(&self, id: DraftId, body: &ComposeBody) -> Result<()> {
        let path = format!("{}/{id}", paths::DRAFTS);
        self.execute(self.json(Method::PUT, &path, body)).await
    }

    async fn delete_draft(&self, id: DraftId) -> Result<()> {
        let path = format!("{}/{id}", paths::DRAFTS);
        self.execute(self.request(Method::DELETE, &path)).await
    }

    async fn auth_status(&self) -> Result<AuthStatus> {
        self.fetch_json(self.request(Method::GET, paths::AUTH_STATUS)).await
    }

    async fn login(&self, password: &str) -> Result<Option<String>> {
        let body = LoginRequest {
            password: password.to_string(),
        };
        let response = self.send(self.json(Method::POST, paths::LOGIN, &body)).await?;
        Ok(session_token(&response))
    }

    async fn logout(&self) -> Result<()> {
        self.execute(self.request(Method::POST, paths::LOGOUT)).await
    }

    async fn profile(&self) -> Result<Profile> {
        self.fetch_json(self.request(Method::GET, paths::PROFILE)).await
    }

    async fn save_profile(&self, update: &ProfileUpdate, create: bool) -> Result<()> {
        let method = if create { Method::POST } else { Method::PUT };
        self.execute(self.json(method, paths::PROFILE, update)).await
    }

    async fn recent_notes(&self) -> Result<Vec<Note>> {
        self.fetch_json(self.request(Method::GET, paths::PROFILE_RECENT)).await
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        self.fetch_json(self.request(Method::GET, paths::CATEGORY)).await
    }

    async fn category_notes(&self, name: &str) -> Result<Vec<Note>> {
        let path = format!("{}/{}", paths::CATEGORY, urlencoding::encode(name));
        self.fetch_json(self.request(Method::GET, &path)).await
    }
}

/// Pull the `auth_token` value out of the response's `Set-Cookie` headers.
fn session_token(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(parse_auth_cookie)
}

fn parse_auth_cookie(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?.trim();
    let value = pair.strip_prefix(AUTH_COOKIE)?.strip_prefix('=')?;
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_cookie() {
        assert_eq!(
            parse_auth_cookie("auth_token=deadbeef; Path=/; Max-Age=86400; HttpOnly; Secure").as_deref(),
            Some("deadbeef")
        );
        assert_eq!(parse_auth_cookie("auth_token=; Path=/; Max-Age=0"), None);
        assert_eq!(parse_auth_cookie("auth_token_old=x"), None);
        assert_eq!(parse_auth_cookie("theme=dark"), None);
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let config = ClientConfig {
            server_url: "http://localhost:9000/".into(),
            ..ClientConfig::default()
        };
        let api = HttpCollaborator::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:9000");
    }
}
