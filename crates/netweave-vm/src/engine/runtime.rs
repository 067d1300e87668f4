//! Host-runtime intrinsics.
//!
//! Each intrinsic pops its own arguments, receiver last, and pushes its
//! result if it has one.

use netweave_bytecode::{MessageCategory, MethodRef};
use netweave_core::names;

use super::error::RuntimeError;
use super::frame::Frame;
use super::heap::{ListOp, Object};
use super::host::{Handler, SendKind, SentMessage};
use super::stream::Wire;
use super::value::Value;
use super::vm::Vm;

impl Vm<'_> {
    pub(super) fn native(&mut self, frame: &mut Frame, method: &MethodRef) -> Result<(), RuntimeError> {
        let name = method.name.as_str();
        let handled = match method.owner.as_str() {
            names::NETWORK_BEHAVIOUR => self.behaviour_native(frame, name)?,
            names::NETWORK_WRITER => self.writer_native(frame, name)?,
            names::NETWORK_READER => self.reader_native(frame, name)?,
            owner if self.is_list_type(owner) => self.list_native(frame, name)?,
            owner => self.static_native(frame, owner, name)?,
        };
        if handled {
            Ok(())
        } else {
            Err(RuntimeError::UnknownMethod(method.to_string()))
        }
    }

    fn is_list_type(&self, name: &str) -> bool {
        self.assembly
            .find(name)
            .is_some_and(|id| self.assembly.is_assignable_to(id, names::SYNC_LIST))
    }

    /// Identity an object replicates as: entities by registration,
    /// behaviours by the entity they were spawned under.
    fn net_id_of(&self, value: &Value) -> u32 {
        let Value::Obj(obj) = value else {
            return 0;
        };
        self.host.net_id_of(*obj).unwrap_or_else(|| {
            self.heap
                .instance(*obj)
                .map(|instance| instance.net_id)
                .unwrap_or(0)
        })
    }

    fn behaviour_native(&mut self, frame: &mut Frame, name: &str) -> Result<bool, RuntimeError> {
        match name {
            "get_syncVarDirtyBits" => {
                let this = frame.pop()?.as_obj()?;
                let bits = self.heap.instance(this)?.dirty_bits;
                frame.push(Value::I32(bits));
            }
            "ClearSyncVarDirtyBits" => {
                let mask = frame.pop()?.as_i32()?;
                let this = frame.pop()?.as_obj()?;
                self.heap.instance_mut(this)?.dirty_bits &= !mask;
            }
            "get_syncVarHookGuard" => {
                let this = frame.pop()?.as_obj()?;
                let guard = self.heap.instance(this)?.hook_guard;
                frame.push(Value::Bool(guard));
            }
            "set_syncVarHookGuard" => {
                let guard = frame.pop()?.is_truthy();
                let this = frame.pop()?.as_obj()?;
                self.heap.instance_mut(this)?.hook_guard = guard;
            }
            "SetSyncVar" => {
                let bit = frame.pop()?.as_i32()?;
                let field = frame.pop()?;
                let value = frame.pop()?;
                let this = frame.pop()?.as_obj()?;
                if self.load_addr(&field)? != value {
                    log::trace!("{this} dirty bit {bit:#x}");
                    self.heap.instance_mut(this)?.dirty_bits |= bit;
                    self.store_addr(&field, value)?;
                }
            }
            "SetSyncVarGameObject" => {
                let shadow = frame.pop()?;
                let bit = frame.pop()?.as_i32()?;
                let field = frame.pop()?;
                let value = frame.pop()?;
                let this = frame.pop()?.as_obj()?;
                if self.heap.instance(this)?.hook_guard {
                    self.store_addr(&field, value)?;
                    return Ok(true);
                }
                let new_id = self.net_id_of(&value);
                let current = self.load_addr(&field)?;
                let old_id = self.net_id_of(&current);
                if new_id != old_id {
                    self.heap.instance_mut(this)?.dirty_bits |= bit;
                    self.store_addr(&field, value)?;
                    self.store_addr(&shadow, Value::InstanceId(new_id))?;
                }
            }
            "get_isServer" => {
                frame.pop()?.as_obj()?;
                frame.push(Value::Bool(self.host.server_active()));
            }
            "get_netId" => {
                let this = frame.pop()?.as_obj()?;
                let id = self.heap.instance(this)?.net_id;
                frame.push(Value::InstanceId(id));
            }
            "SendCommandInternal" => self.send(frame, SendKind::Command)?,
            "SendRPCInternal" => self.send(frame, SendKind::Rpc)?,
            "SendTargetRPCInternal" => self.send(frame, SendKind::TargetRpc)?,
            "SendEventInternal" => self.send(frame, SendKind::Event)?,
            "RegisterCommandDelegate" => self.register(frame, MessageCategory::Command)?,
            "RegisterRpcDelegate" => self.register(frame, MessageCategory::Rpc)?,
            "RegisterEventDelegate" => self.register(frame, MessageCategory::SyncEvent)?,
            "RegisterSyncListDelegate" => self.register(frame, MessageCategory::SyncList)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Hands a framed message to the outbound queue, filling in its size.
    fn send(&mut self, frame: &mut Frame, kind: SendKind) -> Result<(), RuntimeError> {
        let name = frame.pop()?.as_str()?.to_string();
        let channel = frame.pop()?.as_i32()?;
        let writer = frame.pop()?.as_obj()?;
        let connection = match kind {
            SendKind::TargetRpc => Some(frame.pop()?.as_obj()?),
            _ => None,
        };
        frame.pop()?.as_obj()?;

        let mut bytes = self.heap.writer_mut(writer)?.bytes().to_vec();
        if bytes.len() >= 4 {
            let size = (bytes.len() - 4) as u16;
            bytes[..2].copy_from_slice(&size.to_le_bytes());
        }
        log::debug!("send {kind:?} {name} on channel {channel} ({} bytes)", bytes.len());
        self.host.sent.push(SentMessage {
            kind,
            bytes,
            channel,
            name,
            connection,
        });
        Ok(())
    }

    /// `Register*Delegate(Type, int routingId, delegate)`. The first
    /// registration of a routing id wins.
    fn register(&mut self, frame: &mut Frame, category: MessageCategory) -> Result<(), RuntimeError> {
        let delegate = frame.pop()?.as_obj()?;
        let routing_id = frame.pop()?.as_i32()?;
        let ty = match frame.pop()? {
            Value::Type(name) => name,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "type",
                    found: format!("{other:?}"),
                });
            }
        };
        let dispatcher = match self.heap.get(delegate) {
            Object::Delegate(targets) => targets.first().map(|(_, m)| m.clone()),
            _ => None,
        }
        .ok_or_else(|| RuntimeError::TypeMismatch {
            expected: "delegate",
            found: self.heap.type_name(delegate).to_string(),
        })?;

        if self.host.handler(routing_id).is_some() {
            log::debug!("routing id {routing_id} already registered, keeping the first");
            return Ok(());
        }
        self.host.register_handler(
            routing_id,
            Handler {
                category,
                ty,
                dispatcher,
            },
        );
        Ok(())
    }

    fn writer_native(&mut self, frame: &mut Frame, name: &str) -> Result<bool, RuntimeError> {
        match name {
            "WriteSyncList" => {
                let list = frame.pop()?.as_obj()?;
                let writer = frame.pop()?.as_obj()?;
                let (element, items) = {
                    let list = self.heap.list(list)?;
                    (list.element, list.items.clone())
                };
                let w = self.heap.writer_mut(writer)?;
                w.write_u16(items.len() as u16);
                for item in &items {
                    element.write(w, item)?;
                }
            }
            "WriteGameObject" | "WriteNetworkIdentity" => {
                let value = frame.pop()?;
                let writer = frame.pop()?.as_obj()?;
                let id = self.net_id_of(&value);
                self.heap.writer_mut(writer)?.write_packed(id);
            }
            _ => {
                let Some(wire) = name.strip_prefix("Write").and_then(Wire::from_suffix) else {
                    return Ok(false);
                };
                let value = frame.pop()?;
                let writer = frame.pop()?.as_obj()?;
                wire.write(self.heap.writer_mut(writer)?, &value)?;
            }
        }
        Ok(true)
    }

    fn reader_native(&mut self, frame: &mut Frame, name: &str) -> Result<bool, RuntimeError> {
        match name {
            "ReadSyncListInto" => {
                let list = frame.pop()?.as_obj()?;
                let reader = frame.pop()?.as_obj()?;
                let element = self.heap.list(list)?.element;
                let r = self.heap.reader_mut(reader)?;
                let count = r.read_u16()?;
                let items = (0..count)
                    .map(|_| element.read(r))
                    .collect::<Result<Vec<_>, _>>()?;
                self.heap.list_mut(list)?.items = items;
            }
            "ReadGameObject" | "ReadNetworkIdentity" => {
                let reader = frame.pop()?.as_obj()?;
                let id = self.heap.reader_mut(reader)?.read_packed()?;
                let found = self.host.entity(id).map_or(Value::Null, Value::Obj);
                frame.push(found);
            }
            _ => {
                let Some(wire) = name.strip_prefix("Read").and_then(Wire::from_suffix) else {
                    return Ok(false);
                };
                let reader = frame.pop()?.as_obj()?;
                let value = wire.read(self.heap.reader_mut(reader)?)?;
                frame.push(value);
            }
        }
        Ok(true)
    }

    fn list_native(&mut self, frame: &mut Frame, name: &str) -> Result<bool, RuntimeError> {
        match name {
            "InitializeBehaviour" => {
                let routing_id = frame.pop()?.as_i32()?;
                let behaviour = frame.pop()?.as_obj()?;
                let list = frame.pop()?.as_obj()?;
                let list = self.heap.list_mut(list)?;
                list.owner = Some(behaviour);
                list.routing_id = routing_id;
            }
            "HandleMsg" => {
                let reader = frame.pop()?.as_obj()?;
                let list = frame.pop()?.as_obj()?;
                let element = self.heap.list(list)?.element;
                let op = ListOp::decode(self.heap.reader_mut(reader)?, element)?;
                log::trace!("{list} applies {op:?}");
                op.apply(&mut self.heap.list_mut(list)?.items)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn static_native(
        &mut self,
        frame: &mut Frame,
        owner: &str,
        name: &str,
    ) -> Result<bool, RuntimeError> {
        match (owner, name) {
            (names::NETWORK_CRC, "RegisterBehaviour") => {
                let channel = frame.pop()?.as_i32()?;
                let ty = frame.pop()?.as_str()?.to_string();
                self.host.registered_types.push((ty, channel));
            }
            (names::NETWORK_SERVER, "get_active") => {
                frame.push(Value::Bool(self.host.server_active()));
            }
            (names::NETWORK_SERVER, "get_localClientActive") => {
                frame.push(Value::Bool(self.host.local_client_active()));
            }
            (names::NETWORK_CLIENT, "get_active") => {
                frame.push(Value::Bool(self.host.client_active()));
            }
            (names::CLIENT_SCENE, "FindLocalObject") => {
                let id = frame.pop()?.as_instance_id()?;
                let found = self.host.entity(id).map_or(Value::Null, Value::Obj);
                frame.push(found);
            }
            (names::CLIENT_SCENE, "get_readyConnection") => {
                let connection = self.host.ready_connection.map_or(Value::Null, Value::Obj);
                frame.push(connection);
            }
            (names::NETWORK_INSTANCE_ID, "IsEmpty") => {
                let id = frame.pop()?;
                let id = match id {
                    Value::Addr { .. } => self.load_addr(&id)?,
                    other => other,
                };
                frame.push(Value::Bool(id.as_instance_id()? == 0));
            }
            (names::TYPE, "GetTypeFromHandle") => {
                let handle = frame.pop()?;
                frame.push(handle);
            }
            (names::DEBUG, "Log" | "LogWarning" | "LogError") => {
                let message = frame.pop()?;
                let line = match &message {
                    Value::Str(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                self.host.log(line);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
