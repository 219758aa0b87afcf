//! URL-safe slug derivation.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases the input, strips every character outside `[a-z0-9\s-]`,
/// collapses runs of whitespace and hyphens into a single hyphen, and trims
/// leading/trailing hyphens. Deterministic, no I/O.
///
/// Collisions are NOT resolved here - uniqueness is the store's constraint
/// and surfaces as a conflict at write time.
///
/// ```
/// use voltlane_core::slug::derive_slug;
///
/// assert_eq!(derive_slug("RGB Mouse!!"), "rgb-mouse");
/// assert_eq!(derive_slug("  Acme   Gaming  "), "acme-gaming");
/// ```
#[must_use]
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    // Treat the start as "just emitted a hyphen" to suppress a leading one.
    let mut pending_separator = false;
    let mut started = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && started {
                slug.push('-');
            }
            slug.push(c);
            pending_separator = false;
            started = true;
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
        // Every other character is stripped without becoming a separator.
    }

    slug
}
