//! Flash message extraction from the page rendered after `/check`

use kiosk_core::{SubmissionReceipt, ToastKind};

/// Read the toast element's `data-message` and `data-type` attributes.
///
/// The backend redirects to its index page after a submission and embeds the
/// flashed message there. A page without a toast yields an empty receipt.
pub fn parse_toast(html: &str) -> SubmissionReceipt {
    let Some(start) = html.find("id=\"toast\"") else {
        return SubmissionReceipt::default();
    };
    let tag_start = html[..start].rfind('<').unwrap_or(start);
    let tag_end = html[start..].find('>').map_or(html.len(), |i| start + i);
    let tag = &html[tag_start..tag_end];

    let message = attribute(tag, "data-message")
        .map(unescape)
        .filter(|m| !m.trim().is_empty());
    let kind = match attribute(tag, "data-type") {
        Some("error") => ToastKind::Error,
        _ => ToastKind::Success,
    };

    SubmissionReceipt { message, kind }
}

fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

fn unescape(value: &str) -> String {
    value
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
