//! Host-runtime entry points referenced by generated method bodies.
//!
//! These have no body in any container; the runtime (or the reference VM)
//! implements them by owner and name.

use netweave_core::{TypeRef, names};

use crate::instr::MethodRef;

fn behaviour(name: &str) -> MethodRef {
    MethodRef::new(names::NETWORK_BEHAVIOUR, name)
}

/// `this.syncVarDirtyBits` (instance, returns int).
pub fn dirty_bits() -> MethodRef {
    behaviour("get_syncVarDirtyBits")
}

/// `this.ClearSyncVarDirtyBits(int mask)`.
pub fn clear_dirty_bits() -> MethodRef {
    behaviour("ClearSyncVarDirtyBits")
}

pub fn hook_guard() -> MethodRef {
    behaviour("get_syncVarHookGuard")
}

pub fn set_hook_guard() -> MethodRef {
    behaviour("set_syncVarHookGuard")
}

/// `this.SetSyncVar<T>(T value, ref T field, int dirtyBit)`.
pub fn set_sync_var(ty: &TypeRef) -> MethodRef {
    behaviour("SetSyncVar").with_generic_arg(ty.clone())
}

/// `this.SetSyncVarGameObject(GameObject value, ref GameObject field, int dirtyBit, ref NetworkInstanceId netIdField)`.
pub fn set_sync_var_game_object() -> MethodRef {
    behaviour("SetSyncVarGameObject")
}

pub fn is_server() -> MethodRef {
    behaviour("get_isServer")
}

/// Instance identity of the behaviour's entity.
pub fn net_id() -> MethodRef {
    behaviour("get_netId")
}

/// `this.SendCommandInternal(writer, channel, name)`.
pub fn send_command() -> MethodRef {
    behaviour("SendCommandInternal")
}

/// `this.SendRPCInternal(writer, channel, name)`.
pub fn send_rpc() -> MethodRef {
    behaviour("SendRPCInternal")
}

/// `this.SendTargetRPCInternal(conn, writer, channel, name)`.
pub fn send_target_rpc() -> MethodRef {
    behaviour("SendTargetRPCInternal")
}

/// `this.SendEventInternal(writer, channel, name)`.
pub fn send_event() -> MethodRef {
    behaviour("SendEventInternal")
}

/// `RegisterCommandDelegate(Type, int hash, CmdDelegate)` (static).
pub fn register_command_delegate() -> MethodRef {
    behaviour("RegisterCommandDelegate")
}

pub fn register_rpc_delegate() -> MethodRef {
    behaviour("RegisterRpcDelegate")
}

pub fn register_event_delegate() -> MethodRef {
    behaviour("RegisterEventDelegate")
}

pub fn register_sync_list_delegate() -> MethodRef {
    behaviour("RegisterSyncListDelegate")
}

pub fn cmd_delegate_ctor() -> MethodRef {
    MethodRef::new(names::CMD_DELEGATE, names::CTOR)
}

/// `NetworkCRC.RegisterBehaviour(string name, int channel)`.
pub fn register_behaviour() -> MethodRef {
    MethodRef::new(names::NETWORK_CRC, "RegisterBehaviour")
}

pub fn server_active() -> MethodRef {
    MethodRef::new(names::NETWORK_SERVER, "get_active")
}

/// True when a client runs in the same process as the server.
pub fn local_client_active() -> MethodRef {
    MethodRef::new(names::NETWORK_SERVER, "get_localClientActive")
}

pub fn client_active() -> MethodRef {
    MethodRef::new(names::NETWORK_CLIENT, "get_active")
}

pub fn find_local_object() -> MethodRef {
    MethodRef::new(names::CLIENT_SCENE, "FindLocalObject")
}

pub fn ready_connection() -> MethodRef {
    MethodRef::new(names::CLIENT_SCENE, "get_readyConnection")
}

/// `ref NetworkInstanceId.IsEmpty()`.
pub fn instance_id_is_empty() -> MethodRef {
    MethodRef::new(names::NETWORK_INSTANCE_ID, "IsEmpty")
}

pub fn writer_ctor() -> MethodRef {
    MethodRef::new(names::NETWORK_WRITER, names::CTOR)
}

pub fn write_int16() -> MethodRef {
    MethodRef::new(names::NETWORK_WRITER, "WriteInt16")
}

pub fn write_packed_u32() -> MethodRef {
    MethodRef::new(names::NETWORK_WRITER, "WritePackedUInt32")
}

pub fn write_instance_id() -> MethodRef {
    MethodRef::new(names::NETWORK_WRITER, "WriteNetworkInstanceId")
}

pub fn write_sync_list() -> MethodRef {
    MethodRef::new(names::NETWORK_WRITER, "WriteSyncList")
}

pub fn read_packed_u32() -> MethodRef {
    MethodRef::new(names::NETWORK_READER, "ReadPackedUInt32")
}

pub fn read_instance_id() -> MethodRef {
    MethodRef::new(names::NETWORK_READER, "ReadNetworkInstanceId")
}

/// `reader.ReadSyncListInto(list)`: replaces the list's contents in place.
pub fn read_sync_list_into() -> MethodRef {
    MethodRef::new(names::NETWORK_READER, "ReadSyncListInto")
}

pub fn sync_list_initialize() -> MethodRef {
    MethodRef::new(names::SYNC_LIST, "InitializeBehaviour")
}

pub fn sync_list_handle_msg() -> MethodRef {
    MethodRef::new(names::SYNC_LIST, "HandleMsg")
}

pub fn type_from_handle() -> MethodRef {
    MethodRef::new(names::TYPE, "GetTypeFromHandle")
}

pub fn log_error() -> MethodRef {
    MethodRef::new(names::DEBUG, "LogError")
}
