//! Containment checks for caller-supplied file names and source URLs.
//!
//! Names are used verbatim (no renaming or dedup); we only refuse names that
//! would resolve outside the public directory.

/// Returns true if `name` is a single, non-special path component.
pub fn is_contained_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(&['/', '\\', '\0'][..])
}

/// Returns true if `url` parses and uses `http` or `https`.
pub fn is_fetchable_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(u) => matches!(u.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
