//! Headless view model.
//!
//! A [`NoteUnit`] is one rendered note; a [`FeedView`] is what a feed region
//! currently displays. Both turn into HTML fragments with `to_html`. A
//! [`Region`] owns the displayed value and discards results of fetches that
//! were overtaken by a newer one.

use std::fmt::Write as _;
use std::sync::Mutex;

use knife_shared::constants::text;
use knife_shared::{NoteId, PublicRange};

use crate::render::escape;

// ---------------------------------------------------------------------------
// Content-warning disclosure
// ---------------------------------------------------------------------------

/// Per-unit disclosure state.
///
/// `Open` is used when the note carries no content warning; it never turns
/// into `Hidden`. Units with a warning start `Hidden` and flip on toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclosure {
    Open,
    Hidden,
    Shown,
}

impl Disclosure {
    pub fn toggle(&mut self) {
        *self = match *self {
            Self::Open => Self::Open,
            Self::Hidden => Self::Shown,
            Self::Shown => Self::Hidden,
        };
    }

    /// Text of the toggle control, if the unit has one.
    pub fn toggle_label(&self) -> Option<&'static str> {
        match self {
            Self::Open => None,
            Self::Hidden => Some(text::CW_SHOW),
            Self::Shown => Some(text::CW_HIDE),
        }
    }

    pub fn content_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Controls a page attaches to a rendered unit after rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    /// Visibility selector with the note's current tier preselected.
    Visibility { current: Option<PublicRange> },
    Bookmark,
    Delete,
    RemoveBookmark,
}

impl NoteAction {
    fn write_html(&self, id: NoteId, out: &mut String) {
        let _ = match self {
            Self::Visibility { current } => {
                let _ = write!(out, "<select class='public-range-select' data-note-id='{id}'>");
                for range in PublicRange::KNOWN {
                    let selected = if *current == Some(range) { " selected" } else { "" };
                    let _ = write!(
                        out,
                        "<option value=\"{}\"{selected}>{}</option>",
                        range.code(),
                        range.label()
                    );
                }
                write!(out, "</select>")
            }
            Self::Bookmark => write!(
                out,
                "<button class='bookmark-button' data-note-id='{id}'>Bookmark</button>"
            ),
            Self::Delete => write!(
                out,
                "<button class='delete-button' data-note-id='{id}'>Delete</button>"
            ),
            Self::RemoveBookmark => write!(
                out,
                "<button class='remove-bookmark-button' data-note-id='{id}'>Remove</button>"
            ),
        };
    }
}

// ---------------------------------------------------------------------------
// NoteUnit
// ---------------------------------------------------------------------------

/// One rendered note.
///
/// Text fields hold ready-to-insert markup: everything except `content_html`
/// has already been escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUnit {
    pub note_id: NoteId,
    pub header_html: String,
    /// Escaped content-warning label; present iff the note has a warning.
    pub cw_html: Option<String>,
    pub disclosure: Disclosure,
    /// Trusted HTML from the collaborator, inserted verbatim.
    pub content_html: String,
    pub meta_html: String,
    /// Visibility label shown in the metadata line.
    pub range_label: &'static str,
    pub actions: Vec<NoteAction>,
}

impl NoteUnit {
    pub fn attach(&mut self, action: NoteAction) {
        self.actions.push(action);
    }

    pub fn has_action(&self, action: NoteAction) -> bool {
        self.actions.contains(&action)
    }

    pub fn toggle_cw(&mut self) {
        self.disclosure.toggle();
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "<div class='note' data-note-id='{}'>", self.note_id);
        out.push_str(&self.header_html);
        out.push_str("<hr /><div class='note-content'>");

        match (&self.cw_html, self.disclosure.toggle_label()) {
            (Some(cw), Some(label)) => {
                let hidden = if self.disclosure.content_visible() { "" } else { " hidden" };
                let _ = write!(
                    out,
                    "<div class=\"cw-container\"><div class=\"cw-header\">\
                     <span class=\"cw-text\">{cw}</span>\
                     <button class=\"cw-toggle-button\">{label}</button></div>\
                     <div class=\"cw-content{hidden}\"><div class=\"note-content-inner\">{}</div></div></div>",
                    self.content_html
                );
            }
            _ => {
                let _ = write!(out, "<div class=\"note-content-inner\">{}</div>", self.content_html);
            }
        }

        out.push_str("</div>");
        out.push_str(&self.meta_html);
        out.push_str("<div class='note-actions'>");
        for action in &self.actions {
            action.write_html(self.note_id, &mut out);
        }
        out.push_str("</div></div>");
        out
    }
}

// ---------------------------------------------------------------------------
// FeedView
// ---------------------------------------------------------------------------

/// What a feed region displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    Loading,
    /// Inline error replacing the whole feed.
    Failed(String),
    /// Placeholder shown for an empty list.
    Empty(&'static str),
    Notes(Vec<NoteUnit>),
}

impl FeedView {
    pub fn units(&self) -> &[NoteUnit] {
        match self {
            Self::Notes(units) => units,
            _ => &[],
        }
    }

    pub fn unit(&self, id: NoteId) -> Option<&NoteUnit> {
        self.units().iter().find(|u| u.note_id == id)
    }

    pub fn unit_mut(&mut self, id: NoteId) -> Option<&mut NoteUnit> {
        match self {
            Self::Notes(units) => units.iter_mut().find(|u| u.note_id == id),
            _ => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Loading => "<p class='loading'>Loading...</p>".to_string(),
            Self::Failed(msg) => format!("<p class='error-message'>{}</p>", escape(msg.as_str())),
            Self::Empty(placeholder) => format!("<p>{placeholder}</p>"),
            Self::Notes(units) => units.iter().map(NoteUnit::to_html).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Generation number a fetch takes before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

struct Slot<V> {
    view: V,
    issued: u64,
}

/// The displayed area owned by one controller.
///
/// Only the holder of the newest ticket may replace the view, so a slow
/// response never overwrites what a newer fetch already displayed.
pub struct Region<V> {
    slot: Mutex<Slot<V>>,
}

impl<V: Clone> Region<V> {
    pub fn new(initial: V) -> Self {
        Self {
            slot: Mutex::new(Slot {
                view: initial,
                issued: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot<V>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn begin(&self) -> Ticket {
        let mut slot = self.lock();
        slot.issued += 1;
        Ticket(slot.issued)
    }

    /// Replace the view if `ticket` is still the newest one.
    /// Returns `false` when the result was stale and dropped.
    pub fn commit(&self, ticket: Ticket, view: V) -> bool {
        let mut slot = self.lock();
        if ticket.0 < slot.issued {
            tracing::debug!(ticket = ticket.0, newest = slot.issued, "Dropping stale view");
            return false;
        }
        slot.view = view;
        true
    }

    pub fn snapshot(&self) -> V {
        self.lock().view.clone()
    }

    /// Local in-place edits (disclosure toggles). Does not take a ticket.
    pub fn update<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.lock().view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disclosure_open_never_hides() {
        let mut d = Disclosure::Open;
        d.toggle();
        assert_eq!(d, Disclosure::Open);
        assert_eq!(d.toggle_label(), None);
        assert!(d.content_visible());
    }

    #[test]
    fn test_disclosure_cycle() {
        let mut d = Disclosure::Hidden;
        assert_eq!(d.toggle_label(), Some("Show"));
        assert!(!d.content_visible());
        d.toggle();
        assert_eq!(d, Disclosure::Shown);
        assert_eq!(d.toggle_label(), Some("Hide"));
        d.toggle();
        assert_eq!(d, Disclosure::Hidden);
    }

    #[test]
    fn test_region_drops_stale_commit() {
        let region = Region::new(FeedView::Loading);
        let first = region.begin();
        let second = region.begin();

        assert!(region.commit(second, FeedView::Empty("newer")));
        assert!(!region.commit(first, FeedView::Failed("older".into())));
        assert_eq!(region.snapshot(), FeedView::Empty("newer"));
    }

    #[test]
    fn test_region_same_ticket_commits() {
        let region = Region::new(0u32);
        let t = region.begin();
        assert!(region.commit(t, 1));
        assert!(region.commit(t, 2));
        assert_eq!(region.snapshot(), 2);
    }

    #[test]
    fn test_failed_view_escapes_message() {
        let view = FeedView::Failed("<script>".into());
        assert_eq!(view.to_html(), "<p class='error-message'>&lt;script&gt;</p>");
    }

    #[test]
    fn test_visibility_selector_marks_current() {
        let mut out = String::new();
        NoteAction::Visibility {
            current: Some(PublicRange::Unlisted),
        }
        .write_html(NoteId(3), &mut out);
        assert!(out.contains("<option value=\"2\" selected>Unlisted</option>"));
        assert!(out.contains("<option value=\"3\">Public</option>"));
        assert_eq!(out.matches(" selected").count(), 1);
    }
}
