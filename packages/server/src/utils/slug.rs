/// Maximum number of suffixed insert attempts before giving up on a slug.
pub const MAX_SLUG_ATTEMPTS: u32 = 50;

/// Derive a URL-safe slug from a title: lowercase, whitespace runs become a
/// single hyphen, everything outside `[a-z0-9_-]` is stripped.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress leading hyphens

    for c in title.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            if !last_was_hyphen {
                slug.push('-');
                last_was_hyphen = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
            last_was_hyphen = false;
        }
        // everything else is dropped
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// The nth candidate for a base slug: `base`, `base-2`, `base-3`, ...
///
/// Collisions are resolved by attempting the insert and retrying with the
/// next candidate when the unique constraint fires, so two concurrent
/// creations can never end up with the same slug.
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}-{}", attempt + 1)
    }
}
