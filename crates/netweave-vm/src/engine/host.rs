//! Simulated host runtime state observed by generated code.

use std::collections::HashMap;

use netweave_bytecode::{MessageCategory, MethodRef};

use super::value::ObjId;

/// Which side of the connection this VM plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Server,
    Client,
    /// Server with a client in the same process.
    Host,
}

/// Runtime send entry point a message left through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendKind {
    Command,
    Rpc,
    TargetRpc,
    Event,
}

/// One outbound message handed to the runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct SentMessage {
    pub kind: SendKind,
    pub bytes: Vec<u8>,
    pub channel: i32,
    pub name: String,
    /// Connection of a targeted call.
    pub connection: Option<ObjId>,
}

/// Dispatcher bound to a routing id.
#[derive(Clone, Debug, PartialEq)]
pub struct Handler {
    pub category: MessageCategory,
    /// Behaviour type the dispatcher belongs to.
    pub ty: String,
    pub dispatcher: MethodRef,
}

#[derive(Clone, Debug, Default)]
pub struct Host {
    role: Role,
    /// Lines passed to the engine's log.
    pub logs: Vec<String>,
    pub sent: Vec<SentMessage>,
    handlers: HashMap<i32, Handler>,
    /// `(type name, channel)` in registration order.
    pub registered_types: Vec<(String, i32)>,
    /// Entity objects by identity.
    entities: HashMap<u32, ObjId>,
    /// Behaviours attached to each entity identity.
    spawned: HashMap<u32, Vec<ObjId>>,
    /// Connection the client is ready on.
    pub ready_connection: Option<ObjId>,
}

impl Host {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn server_active(&self) -> bool {
        matches!(self.role, Role::Server | Role::Host)
    }

    pub fn client_active(&self) -> bool {
        matches!(self.role, Role::Client | Role::Host)
    }

    pub fn local_client_active(&self) -> bool {
        self.role == Role::Host
    }

    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::debug!("runtime log: {line}");
        self.logs.push(line);
    }

    /// Drains the outbound queue.
    pub fn take_sent(&mut self) -> Vec<SentMessage> {
        std::mem::take(&mut self.sent)
    }

    pub fn register_handler(&mut self, routing_id: i32, handler: Handler) {
        log::trace!(
            "routing id {routing_id} -> {}::{}",
            handler.dispatcher.owner,
            handler.dispatcher.name
        );
        self.handlers.insert(routing_id, handler);
    }

    pub fn handler(&self, routing_id: i32) -> Option<&Handler> {
        self.handlers.get(&routing_id)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn add_entity(&mut self, net_id: u32, game_object: ObjId) {
        self.entities.insert(net_id, game_object);
    }

    pub fn entity(&self, net_id: u32) -> Option<ObjId> {
        self.entities.get(&net_id).copied()
    }

    /// Identity of an entity object; behaviours have theirs on the instance.
    pub fn net_id_of(&self, game_object: ObjId) -> Option<u32> {
        self.entities
            .iter()
            .find(|(_, obj)| **obj == game_object)
            .map(|(id, _)| *id)
    }

    pub fn add_behaviour(&mut self, net_id: u32, behaviour: ObjId) {
        self.spawned.entry(net_id).or_default().push(behaviour);
    }

    /// Behaviours spawned under `net_id`, in spawn order.
    pub fn behaviours_of(&self, net_id: u32) -> &[ObjId] {
        self.spawned
            .get(&net_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
