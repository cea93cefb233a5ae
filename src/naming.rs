//! Page file names derived from identifiers.
//!
//! Identifiers come straight from the data source and may contain anything,
//! so every detail page goes through [`page_slug`] before touching the
//! filesystem:
//!
//! - `"jwage"` → `jwage`
//! - `"Marco Pivetta"` → `marco-pivetta`
//! - `"../etc"` → `..-etc` (no path separators survive)
//! - `""` → `_unnamed`

/// Slug used for an empty identifier.
pub const UNNAMED_SLUG: &str = "_unnamed";

/// Lowercase `id` and replace anything outside `[a-z0-9._-]` with `-`.
pub fn page_slug(id: &str) -> String {
    if id.is_empty() {
        return UNNAMED_SLUG.to_string();
    }
    let slug: String = id
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '-',
        })
        .collect();
    // "." and ".." would name the directory itself.
    if slug.chars().all(|c| c == '.') {
        return slug.replace('.', "-");
    }
    slug
}

/// Relative output path of a user's detail page.
pub fn user_page_path(username: &str) -> String {
    format!("user/{}.html", page_slug(username))
}

/// Path for the `n`th distinct username sharing a slug (`n >= 2`).
pub fn numbered_user_page_path(username: &str, n: usize) -> String {
    format!("user/{}-{n}.html", page_slug(username))
}
