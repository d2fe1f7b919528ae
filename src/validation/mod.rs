//! Slug derivation for blog posts and case studies.

/// Derive a URL-safe slug from a title.
///
/// Lowercases, collapses whitespace runs to single hyphens, and strips any
/// character that is not alphanumeric, underscore, or hyphen. A title with no
/// word characters yields an empty or hyphen-only string; callers reject
/// those before writing.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_space = false;

    for ch in title.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                slug.push('-');
                last_was_space = true;
            }
            continue;
        }
        last_was_space = false;
        for lower in ch.to_lowercase() {
            if lower.is_alphanumeric() || lower == '_' || lower == '-' {
                slug.push(lower);
            }
        }
    }

    slug
}

/// Whether a derived slug is usable as a unique key.
pub fn slug_is_usable(slug: &str) -> bool {
    slug.chars().any(|c| c != '-')
}
