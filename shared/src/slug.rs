//! Slug generation for article URLs

use uuid::Uuid;

/// Slug used when a title contains no usable characters
pub const FALLBACK_SLUG: &str = "article";

/// Number of hex characters appended when disambiguating a slug
pub const SUFFIX_LEN: usize = 8;

/// Convert a title into a URL-safe slug.
///
/// Output only contains `[a-z0-9-]`, never starts or ends with `-`
/// and never contains `--`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Append a random hex suffix to a slug (`how-to-train-3f9a0c1d`)
pub fn with_random_suffix(base: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", base, &suffix[..SUFFIX_LEN])
}

/// Whether `slug` is `base` itself or `base` plus a random suffix
pub fn is_derived_from(slug: &str, base: &str) -> bool {
    match slug.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest.strip_prefix('-').is_some_and(|suffix| {
            suffix.len() == SUFFIX_LEN && suffix.chars().all(|c| c.is_ascii_hexdigit())
        }),
        None => false,
    }
}
