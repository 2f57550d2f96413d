//! Note rendering shared by every page: the timeline, bookmarks, the single
//! note view, category feeds and the profile's recent notes all build their
//! units here and attach their own actions afterwards.
//!
//! `content` is the one field inserted without escaping. The collaborator
//! is trusted to deliver sanitized HTML; if it does not, this is where
//! markup from a note reaches the page.

use std::fmt::Write as _;

use knife_shared::constants::UNKNOWN_RANGE_LABEL;
use knife_shared::{Note, PublicRange};

use crate::view::{Disclosure, NoteUnit};

/// Escape text for insertion into markup.
///
/// Single pass over `&`, `<`, `>`, `"` and `'`. Absent input yields an
/// empty string. Applying it twice escapes the ampersands again.
pub fn escape<'a>(text: impl Into<Option<&'a str>>) -> String {
    let Some(text) = text.into() else {
        return String::new();
    };
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Visibility label, "Unknown" for anything outside 0–3 or missing.
pub fn label(range: Option<PublicRange>) -> &'static str {
    range.map_or(UNKNOWN_RANGE_LABEL, |r| r.label())
}

/// Build the displayable unit for `note`. The actions region starts empty.
pub fn render(note: &Note) -> NoteUnit {
    let header_html = format!(
        "<div class='note-header'><div><span class='author'>{}</span> \
         <span class='finger'>@{}</span></div></div>",
        escape(note.author_name.as_str()),
        escape(note.author_finger.as_str()),
    );

    let cw_html = note.content_warning().map(|cw| escape(cw));
    let disclosure = if cw_html.is_some() {
        Disclosure::Hidden
    } else {
        Disclosure::Open
    };

    let range_label = label(note.public_range);

    NoteUnit {
        note_id: note.id,
        header_html,
        cw_html,
        disclosure,
        content_html: note.content.clone(),
        meta_html: meta_html(note, range_label),
        range_label,
        actions: Vec::new(),
    }
}

fn meta_html(note: &Note, range_label: &str) -> String {
    let posted = note
        .create_time
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "an unknown date".to_string());

    let mut out = String::from("<div class='note-meta'>");
    let _ = write!(
        out,
        "<a href='/notes/{}' class='note-link-time'>Posted on {posted}</a>",
        note.id
    );
    if let Some(category) = note.category_name() {
        let _ = write!(
            out,
            "<span> | Category: <a href=\"/category/{}\">{}</a></span>",
            urlencoding::encode(category),
            escape(category)
        );
    }
    let _ = write!(
        out,
        "<br /><span class='public-range'>{range_label}</span><br /><span>Host: {}</span>",
        escape(note.host.as_str())
    );
    if note.likes > 0 {
        let _ = write!(out, "<span> | {} Likes</span>", note.likes);
    }
    if note.shares > 0 {
        let _ = write!(out, "<span> | {} Shares</span>", note.shares);
    }
    out.push_str("</div>");
    out
}

/// Append the canonical link line used by the single-note page.
///
/// Only `http` and `https` URIs become links; anything else is shown as
/// plain text.
pub fn with_uri(unit: &mut NoteUnit, uri: Option<&str>) {
    let Some(raw) = uri.map(str::trim).filter(|u| !u.is_empty()) else {
        return;
    };
    let uri = escape(raw);
    let line = if is_web_link(raw) {
        format!("<a href=\"{uri}\">{uri}</a>")
    } else {
        uri
    };
    // Slot the line in before the closing tag of the metadata block.
    if let Some(stripped) = unit.meta_html.strip_suffix("</div>") {
        unit.meta_html = format!("{stripped}<br /><span>URI: {line}</span></div>");
    }
}

fn is_web_link(uri: &str) -> bool {
    let scheme = uri.split_once(':').map(|(scheme, _)| scheme).unwrap_or_default();
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use knife_shared::NoteId;

    use super::*;
    use crate::view::NoteAction;

    fn note() -> Note {
        let mut n = Note::new(NoteId(1), "<p>hello <b>world</b></p>");
        n.author_name = "Ann <admin>".into();
        n.author_finger = "ann@example.org".into();
        n.host = "example.org".into();
        n.public_range = Some(PublicRange::Public);
        n.create_time = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
        n
    }

    #[test]
    fn test_escape_all_five() {
        assert_eq!(escape("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#039;");
        assert_eq!(escape(None::<&str>), "");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_escape_is_single_pass() {
        let once = escape("&");
        assert_eq!(once, "&amp;");
        assert_eq!(escape(once.as_str()), "&amp;amp;");
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(label(Some(PublicRange::from_code(0))), "Private");
        assert_eq!(label(Some(PublicRange::from_code(1))), "Followers Only");
        assert_eq!(label(Some(PublicRange::from_code(2))), "Unlisted");
        assert_eq!(label(Some(PublicRange::from_code(3))), "Public");
        assert_eq!(label(Some(PublicRange::from_code(4))), "Unknown");
        assert_eq!(label(Some(PublicRange::from_code(-1))), "Unknown");
        assert_eq!(label(None), "Unknown");
    }

    #[test]
    fn test_render_without_cw() {
        let unit = render(&note());
        assert_eq!(unit.disclosure, Disclosure::Open);
        assert_eq!(unit.range_label, "Public");
        assert!(unit.actions.is_empty());

        let html = unit.to_html();
        assert!(!html.contains("cw-container"));
        assert!(html.contains("<p>hello <b>world</b></p>"));
        assert!(html.contains("Ann &lt;admin&gt;"));
        assert!(html.contains("@ann@example.org"));
        assert!(html.contains("Posted on 2024-05-01 12:30:00 UTC"));
        assert!(!html.contains("Likes"));
        assert!(!html.contains("Shares"));
    }

    #[test]
    fn test_render_with_cw_starts_hidden() {
        let mut n = note();
        n.cw = Some("spoiler <3".into());
        let mut unit = render(&n);

        assert_eq!(unit.disclosure, Disclosure::Hidden);
        let html = unit.to_html();
        assert!(html.contains("<span class=\"cw-text\">spoiler &lt;3</span>"));
        assert!(html.contains(">Show</button>"));
        assert!(html.contains("cw-content hidden"));

        unit.toggle_cw();
        let html = unit.to_html();
        assert_eq!(unit.disclosure, Disclosure::Shown);
        assert!(html.contains(">Hide</button>"));
        assert!(!html.contains("cw-content hidden"));
    }

    #[test]
    fn test_render_counts_and_category() {
        let mut n = note();
        n.likes = 2;
        n.shares = 0;
        n.category = Some("rust & go".into());
        let html = render(&n).to_html();
        assert!(html.contains("<span> | 2 Likes</span>"));
        assert!(!html.contains("Shares"));
        assert!(html.contains("href=\"/category/rust%20%26%20go\">rust &amp; go</a>"));
    }

    #[test]
    fn test_rebuild_resets_disclosure() {
        let mut n = note();
        n.cw = Some("cw".into());
        let mut unit = render(&n);
        unit.toggle_cw();
        assert_eq!(render(&n).disclosure, Disclosure::Hidden);
    }

    #[test]
    fn test_actions_render_into_actions_region() {
        let mut unit = render(&note());
        unit.attach(NoteAction::Bookmark);
        unit.attach(NoteAction::Delete);
        let html = unit.to_html();
        assert!(html.contains(
            "<div class='note-actions'><button class='bookmark-button' data-note-id='1'>Bookmark</button>\
             <button class='delete-button' data-note-id='1'>Delete</button></div>"
        ));
    }

    #[test]
    fn test_with_uri_escapes_link() {
        let mut unit = render(&note());
        with_uri(&mut unit, Some("https://example.org/notes/1?a=1&b=2"));
        assert!(unit
            .meta_html
            .contains("URI: <a href=\"https://example.org/notes/1?a=1&amp;b=2\">"));
        assert!(unit.meta_html.ends_with("</div>"));
    }

    #[test]
    fn test_uri_link_only_for_web_schemes() {
        let mut unit = render(&note());
        with_uri(&mut unit, Some("JavaScript:alert('x')"));
        assert!(!unit.meta_html.contains("URI: <a"));
        assert!(unit
            .meta_html
            .contains("URI: JavaScript:alert(&#039;x&#039;)</span>"));

        let mut unit = render(&note());
        with_uri(&mut unit, Some("HTTP://example.org/n/1"));
        assert!(unit.meta_html.contains("<a href=\"HTTP://example.org/n/1\">"));
    }
}
