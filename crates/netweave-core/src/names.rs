//! Well-known names of the host runtime, engine and standard library.
//!
//! Generated code and validation rules refer to these by full name; the
//! reference declarations installed into every assembly use the same strings.

// Modules

pub const CORLIB_MODULE: &str = "mscorlib";
pub const SYSTEM_RUNTIME_MODULE: &str = "System.Runtime";
pub const ENGINE_MODULE: &str = "Engine";
pub const RUNTIME_MODULE: &str = "Net";

// Standard library

pub const OBJECT: &str = "System.Object";
pub const VOID: &str = "System.Void";
pub const BOOLEAN: &str = "System.Boolean";
pub const CHAR: &str = "System.Char";
pub const BYTE: &str = "System.Byte";
pub const SBYTE: &str = "System.SByte";
pub const INT16: &str = "System.Int16";
pub const UINT16: &str = "System.UInt16";
pub const INT32: &str = "System.Int32";
pub const UINT32: &str = "System.UInt32";
pub const INT64: &str = "System.Int64";
pub const UINT64: &str = "System.UInt64";
pub const SINGLE: &str = "System.Single";
pub const DOUBLE: &str = "System.Double";
pub const STRING: &str = "System.String";
pub const TYPE: &str = "System.Type";
pub const RUNTIME_TYPE_HANDLE: &str = "System.RuntimeTypeHandle";
pub const MULTICAST_DELEGATE: &str = "System.MulticastDelegate";
pub const ENUMERATOR: &str = "System.Collections.IEnumerator";

// Engine

pub const ENGINE_OBJECT: &str = "Engine.Object";
pub const COMPONENT: &str = "Engine.Component";
pub const BEHAVIOUR: &str = "Engine.Behaviour";
pub const MONO_BEHAVIOUR: &str = "Engine.MonoBehaviour";
pub const GAME_OBJECT: &str = "Engine.GameObject";
pub const SCRIPTABLE_OBJECT: &str = "Engine.ScriptableObject";
pub const VECTOR3: &str = "Engine.Vector3";
pub const DEBUG: &str = "Engine.Debug";

// Networking runtime

pub const NETWORK_BEHAVIOUR: &str = "Net.NetworkBehaviour";
pub const NETWORK_IDENTITY: &str = "Net.NetworkIdentity";
pub const NETWORK_INSTANCE_ID: &str = "Net.NetworkInstanceId";
pub const NETWORK_CONNECTION: &str = "Net.NetworkConnection";
pub const LOCAL_CONNECTION_TO_SERVER: &str = "Net.LocalConnectionToServer";
pub const NETWORK_WRITER: &str = "Net.NetworkWriter";
pub const NETWORK_READER: &str = "Net.NetworkReader";
pub const NETWORK_SERVER: &str = "Net.NetworkServer";
pub const NETWORK_CLIENT: &str = "Net.NetworkClient";
pub const CLIENT_SCENE: &str = "Net.ClientScene";
pub const NETWORK_CRC: &str = "Net.NetworkCRC";
pub const SYNC_LIST: &str = "Net.SyncList`1";
pub const SYNC_LIST_STRUCT: &str = "Net.SyncListStruct`1";
pub const SYNC_LIST_INT: &str = "Net.SyncListInt";
pub const SYNC_LIST_UINT: &str = "Net.SyncListUInt";
pub const SYNC_LIST_FLOAT: &str = "Net.SyncListFloat";
pub const SYNC_LIST_BOOL: &str = "Net.SyncListBool";
pub const SYNC_LIST_STRING: &str = "Net.SyncListString";
pub const CMD_DELEGATE: &str = "Net.NetworkBehaviour/CmdDelegate";
pub const EVENT_DELEGATE: &str = "Net.NetworkBehaviour/EventDelegate";

// Attributes

pub const SYNC_VAR_ATTR: &str = "Net.SyncVarAttribute";
pub const COMMAND_ATTR: &str = "Net.CommandAttribute";
pub const CLIENT_RPC_ATTR: &str = "Net.ClientRpcAttribute";
pub const TARGET_RPC_ATTR: &str = "Net.TargetRpcAttribute";
pub const SYNC_EVENT_ATTR: &str = "Net.SyncEventAttribute";
pub const NETWORK_SETTINGS_ATTR: &str = "Net.NetworkSettingsAttribute";

/// Attributes that only make sense on behaviour subclasses.
pub const NETWORK_MEMBER_ATTRS: [&str; 5] = [
    SYNC_VAR_ATTR,
    COMMAND_ATTR,
    CLIENT_RPC_ATTR,
    TARGET_RPC_ATTR,
    SYNC_EVENT_ATTR,
];

// Special members

pub const CTOR: &str = ".ctor";
pub const CCTOR: &str = ".cctor";
pub const AWAKE: &str = "Awake";
pub const INVOKE: &str = "Invoke";
pub const ON_SERIALIZE: &str = "OnSerialize";
pub const ON_DESERIALIZE: &str = "OnDeserialize";
pub const PRE_START_CLIENT: &str = "PreStartClient";
pub const GET_NETWORK_CHANNEL: &str = "GetNetworkChannel";
pub const GET_NETWORK_SEND_INTERVAL: &str = "GetNetworkSendInterval";
pub const WEAVE_MARKER: &str = "NetweaveVersion";
