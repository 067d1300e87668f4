use crate::hash::{hash_str, routing_id};

#[test]
fn known_values() {
    assert_eq!(hash_str(""), 23);
    assert_eq!(hash_str("a"), 23 * 31 + 97);
    assert_eq!(hash_str("ab"), (23 * 31 + 97) * 31 + 98);
}

#[test]
fn routing_id_is_stable_and_distinct() {
    let jump = routing_id("PlayerController", "Command", "CmdJump");
    let fire = routing_id("PlayerController", "Command", "CmdFire");
    assert_ne!(jump, fire);
    assert_eq!(jump, routing_id("PlayerController", "Command", "CmdJump"));
    assert_eq!(jump, hash_str("PlayerController:Command:CmdJump"));
}

#[test]
fn kind_and_type_participate() {
    let cmd = routing_id("Player", "Cmd", "Act");
    assert_ne!(cmd, routing_id("Player", "Rpc", "Act"));
    assert_ne!(cmd, routing_id("Enemy", "Cmd", "Act"));
}

#[test]
fn long_input_wraps_instead_of_overflowing() {
    let long = "x".repeat(4096);
    assert_eq!(hash_str(&long), hash_str(&long));
}

#[test]
fn non_ascii_uses_utf16_units() {
    // U+1F600 encodes as a surrogate pair.
    let expected = (23i32.wrapping_mul(31).wrapping_add(0xD83D))
        .wrapping_mul(31)
        .wrapping_add(0xDE00);
    assert_eq!(hash_str("\u{1F600}"), expected);
}
