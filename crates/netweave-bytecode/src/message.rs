/// Message-category tag written into every generated outbound message.
///
/// The values are fixed by the host runtime's message router. Broadcast and
/// targeted calls share framing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageCategory {
    Command,
    Rpc,
    TargetRpc,
    SyncEvent,
    SyncList,
}

impl MessageCategory {
    pub fn tag(self) -> i16 {
        match self {
            MessageCategory::Command => 5,
            MessageCategory::Rpc | MessageCategory::TargetRpc => 2,
            MessageCategory::SyncEvent => 7,
            MessageCategory::SyncList => 9,
        }
    }

    /// Kind segment of the routing-id hash input and of generated member names.
    pub fn kind(self) -> &'static str {
        match self {
            MessageCategory::Command => "Cmd",
            MessageCategory::Rpc => "Rpc",
            MessageCategory::TargetRpc => "TargetRpc",
            MessageCategory::SyncEvent => "Event",
            MessageCategory::SyncList => "List",
        }
    }
}
