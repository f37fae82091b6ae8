//! Channel name normalization
//!
//! The platform only accepts lowercase alphanumerics and hyphens in text
//! channel names, so raw configured names are slugified before lookup or
//! creation. Lookup and creation must use the same slug or reconciliation
//! would create duplicates.

/// Normalize a raw channel name to a channel-safe slug
///
/// Lowercases, trims, collapses whitespace runs to single hyphens, and
/// strips every character outside `[a-z0-9-]`.
pub fn channel_slug(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for ch in raw.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            pending_hyphen = !slug.is_empty();
            continue;
        }
        if pending_hyphen {
            slug.push('-');
            pending_hyphen = false;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        }
    }

    slug
}
