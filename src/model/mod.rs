pub mod document;
pub mod list;
pub mod task;

/// Generate an opaque unique id token.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Trim a string and cap it at `max` characters.
pub(crate) fn clip(s: &str, max: usize) -> String {
    s.trim().chars().take(max).collect()
}
