//! URL slug generation.

/// Convert arbitrary text into a URL-safe slug.
///
/// Lowercases the input, collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen and trims hyphens from both ends.
/// The result may be empty when the input has no ASCII alphanumerics.
pub fn generate_slug(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Append a disambiguating suffix: `<base>-<suffix>`.
pub fn with_suffix(base: &str, suffix: impl std::fmt::Display) -> String {
    format!("{}-{}", base, suffix)
}

/// Whether `slug` is lowercase kebab-case (`^[a-z0-9]+(-[a-z0-9]+)*$`).
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
