//! Pure string utility functions for presenting API payload text

use std::borrow::Cow;

/// Decode character entities left in API text (`&amp;`, `&quot;`, `&#39;`).
///
/// The API escapes user-supplied text twice; the XML layer removes one level
/// and this removes the second. Text containing entities that cannot be
/// resolved is returned unchanged.
///
/// # Examples
///
/// ```
/// use vknet_domain::utils::text::decode_entities;
///
/// assert_eq!(decode_entities("Rock &amp; Roll"), "Rock & Roll");
/// assert_eq!(decode_entities("&#39;quoted&#39;"), "'quoted'");
/// assert_eq!(decode_entities("plain"), "plain");
/// ```
#[must_use]
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Format a duration in seconds as `mm:ss`.
///
/// Minutes are not wrapped at the hour.
///
/// ```
/// use vknet_domain::utils::text::format_mm_ss;
///
/// assert_eq!(format_mm_ss(65), "01:05");
/// assert_eq!(format_mm_ss(3725), "62:05");
/// ```
#[must_use]
pub fn format_mm_ss(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_entities_leave_text_untouched() {
        assert_eq!(decode_entities("a&nbsp;b"), "a&nbsp;b");
    }

    #[test]
    fn zero_duration_formats_as_zeroes() {
        assert_eq!(format_mm_ss(0), "00:00");
    }
}
