//! Login state and the chrome that depends on it.

use std::sync::Mutex;

use tracing::{error, info, warn};

use knife_shared::constants::text;

use crate::actions::Outcome;
use crate::events::Notice;
use crate::state::AppState;

/// Which control the page header shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chrome {
    LoginForm,
    LogoutControl,
}

impl Chrome {
    pub fn to_html(self) -> &'static str {
        match self {
            Self::LoginForm => {
                "<form id='login-form'><input type='password' name='password' />\
                 <button type='submit'>Login</button></form>"
            }
            Self::LogoutControl => "<button id='logout-button'>Logout</button>",
        }
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// `token` is the session cookie value if the server sent one.
    LoggedIn { token: Option<String> },
    Failed,
}

pub struct Session {
    state: AppState,
    chrome: Mutex<Chrome>,
}

impl Session {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            chrome: Mutex::new(Chrome::LoginForm),
        }
    }

    pub fn chrome(&self) -> Chrome {
        *self.chrome.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_chrome(&self, chrome: Chrome) {
        *self.chrome.lock().unwrap_or_else(|e| e.into_inner()) = chrome;
    }

    /// Ask the collaborator and switch the chrome. Failure shows the login form.
    pub async fn refresh(&self) -> Chrome {
        let chrome = match self.state.api.auth_status().await {
            Ok(status) if status.logged_in => Chrome::LogoutControl,
            Ok(_) => Chrome::LoginForm,
            Err(e) => {
                warn!(error = %e, "Auth status unavailable");
                Chrome::LoginForm
            }
        };
        self.set_chrome(chrome);
        chrome
    }

    pub async fn login(&self, password: &str) -> LoginOutcome {
        match self.state.api.login(password).await {
            Ok(token) => {
                info!(has_token = token.is_some(), "Logged in");
                self.set_chrome(Chrome::LogoutControl);
                self.state.notify(Notice::info(text::LOGGED_IN));
                LoginOutcome::LoggedIn { token }
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.state.notify(Notice::error(format!(
                    "Login failed: {}",
                    e.user_message("Invalid password")
                )));
                LoginOutcome::Failed
            }
        }
    }

    pub async fn logout(&self) -> Outcome {
        match self.state.api.logout().await {
            Ok(()) => {
                info!("Logged out");
                self.set_chrome(Chrome::LoginForm);
                self.state.notify(Notice::info(text::LOGGED_OUT));
                Outcome::Completed
            }
            Err(e) => {
                error!(error = %e, "Logout failed");
                self.state.notify(Notice::error(format!(
                    "Logout failed: {}",
                    e.user_message("Failed to log out")
                )));
                Outcome::Failed
            }
        }
    }
}
