//! Routing ids.
//!
//! A routing id binds a caller stub to its dispatcher without central
//! coordination: both sides hash the same `"{Type}:{Kind}:{Member}"` string.

/// Polynomial string hash over UTF-16 code units, 32-bit wrapping.
pub fn hash_str(s: &str) -> i32 {
    s.encode_utf16()
        .fold(23i32, |h, c| h.wrapping_mul(31).wrapping_add(i32::from(c)))
}

/// Routing id of `member` of kind `kind` declared on `type_name`.
pub fn routing_id(type_name: &str, kind: &str, member: &str) -> i32 {
    hash_str(&format!("{type_name}:{kind}:{member}"))
}
