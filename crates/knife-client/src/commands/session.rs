use super::Rendered;
use crate::actions::Outcome;
use crate::session::{LoginOutcome, Session};
use crate::state::AppState;

pub async fn status(state: &AppState) -> Rendered {
    let session = Session::new(state.clone());
    Rendered::page(session.refresh().await.to_html().to_string())
}

/// Log in. On success the session token, if any, is returned in place of
/// the chrome so it can be exported as `KNIFE_AUTH_TOKEN`.
pub async fn login(state: &AppState, password: &str) -> Rendered {
    let session = Session::new(state.clone());
    match session.login(password).await {
        LoginOutcome::LoggedIn { token: Some(token) } => Rendered::action(token, Outcome::Completed),
        LoginOutcome::LoggedIn { token: None } => {
            Rendered::action(session.chrome().to_html().to_string(), Outcome::Completed)
        }
        LoginOutcome::Failed => Rendered::action(session.chrome().to_html().to_string(), Outcome::Failed),
    }
}

pub async fn logout(state: &AppState) -> Rendered {
    let session = Session::new(state.clone());
    let outcome = session.logout().await;
    Rendered::action(session.chrome().to_html().to_string(), outcome)
}
