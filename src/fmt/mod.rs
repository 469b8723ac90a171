//! Canonical source form of the AST
//!
//! Every node prints as text that parses back into an equal node against
//! the same environment. Types print through their own `Display`, which is
//! the canonical type syntax.

pub mod surface;

/// Escape a string value so it can be written between double quotes.
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}
