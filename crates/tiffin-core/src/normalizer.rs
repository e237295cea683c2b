//! Canonical ingredient-name keys
//!
//! Equality across the whole engine is by normalized name: lowercase,
//! non-alphanumeric characters stripped. The function is total — any
//! input yields a key, unmatched lookups are "not found", never an error.

/// Normalize a name into its canonical key.
///
/// `"Curry Leaves"`, `"curry-leaves"` and `"CURRYLEAVES"` all map to
/// `"curryleaves"`.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}
