use knife_shared::PublicRange;

use super::Rendered;
use crate::actions::Outcome;
use crate::drafts::{ComposeForm, DraftManager};
use crate::state::AppState;

/// Field values given on the command line. Unset fields keep what the
/// resumed draft had.
#[derive(Debug, Clone, Default)]
pub struct FormEdits {
    pub content: Option<String>,
    pub cw: Option<String>,
    pub category: Option<String>,
    pub public_range: Option<PublicRange>,
}

impl FormEdits {
    fn apply(self, form: &mut ComposeForm) {
        if let Some(content) = self.content {
            form.content = content;
        }
        if let Some(cw) = self.cw {
            form.cw = cw;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(range) = self.public_range {
            form.public_range = range;
        }
    }
}

async fn resume(state: &AppState, edits: FormEdits) -> DraftManager {
    let drafts = DraftManager::new(state.clone());
    drafts.enter().await;
    drafts.edit(|form| edits.apply(form));
    drafts
}

fn rendered(drafts: &DraftManager, outcome: Option<Outcome>) -> Rendered {
    let html = drafts.form().to_html();
    let page = match outcome {
        Some(outcome) => Rendered::action(html, outcome),
        None => Rendered::page(html),
    };
    page.with_status(drafts.status())
}

pub async fn show(state: &AppState) -> Rendered {
    let drafts = resume(state, FormEdits::default()).await;
    rendered(&drafts, None)
}

pub async fn save(state: &AppState, edits: FormEdits) -> Rendered {
    let drafts = resume(state, edits).await;
    let outcome = drafts.save().await;
    rendered(&drafts, Some(outcome))
}

pub async fn publish(state: &AppState, edits: FormEdits) -> Rendered {
    let drafts = resume(state, edits).await;
    let outcome = drafts.publish().await;
    rendered(&drafts, Some(outcome))
}
