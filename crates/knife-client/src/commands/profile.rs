use knife_shared::protocol::ProfileUpdate;

use super::Rendered;
use crate::profile::{ProfilePage, ProfileSettings};
use crate::render::escape;
use crate::state::AppState;

pub async fn show(state: &AppState) -> Rendered {
    let page = ProfilePage::new(state.clone());
    page.load().await;
    Rendered::page(page.html())
}

/// Load the settings form, overwrite the given fields and save.
pub async fn update(state: &AppState, display_name: Option<String>, bio: Option<String>) -> Rendered {
    let settings = ProfileSettings::new(state.clone());
    settings.load().await;

    let current = settings.form();
    settings.set_form(ProfileUpdate {
        display_name: display_name.unwrap_or(current.display_name),
        bio: bio.unwrap_or(current.bio),
    });
    let outcome = settings.save().await;

    let form = settings.form();
    let html = format!(
        "<form id='profile-form'><input name='display_name' value=\"{}\" />\
         <textarea name='bio'>{}</textarea></form>",
        escape(form.display_name.as_str()),
        escape(form.bio.as_str()),
    );
    Rendered::action(html, outcome).with_status(settings.status())
}
