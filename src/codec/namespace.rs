//! Namespace resolution for nested record fields.

/// Join `parent` and the lower-cased `name` with `.`, trimming leading and
/// trailing dots.
///
/// Called once per nesting level. No collision detection happens here: two
/// distinct fields resolving to the same path share one property key.
pub fn resolve(parent: &str, name: &str) -> String {
    let joined = format!("{parent}.{}", name.to_lowercase());
    joined.trim_matches('.').to_owned()
}
