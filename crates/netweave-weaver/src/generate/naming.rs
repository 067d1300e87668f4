//! Names of generated members.
//!
//! These are an external contract with the host runtime, which looks some of
//! them up by name.

use netweave_bytecode::MessageCategory;

pub fn getter(field: &str) -> String {
    format!("get_Network{field}")
}

pub fn setter(field: &str) -> String {
    format!("set_Network{field}")
}

pub fn property(field: &str) -> String {
    format!("Network{field}")
}

/// Identity field replicated in place of an entity reference.
pub fn shadow_field(field: &str) -> String {
    format!("___{field}NetId")
}

/// Static field holding a member's routing id.
pub fn routing_field(category: MessageCategory, member: &str) -> String {
    format!("k{}{member}", category.kind())
}

/// Static dispatcher invoked by the runtime on message arrival.
pub fn dispatcher(category: MessageCategory, member: &str) -> String {
    let prefix = match category {
        MessageCategory::Command => "InvokeCmd",
        MessageCategory::Rpc | MessageCategory::TargetRpc => "InvokeRpc",
        MessageCategory::SyncEvent => "InvokeSyncEvent",
        MessageCategory::SyncList => "InvokeSyncList",
    };
    format!("{prefix}{member}")
}

/// Caller stub that replaces direct calls to a remote member.
pub fn caller(member: &str) -> String {
    format!("Call{member}")
}
