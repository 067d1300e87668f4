use netweave_bytecode::{
    FieldDescriptor, FieldRef, Instr, MethodDescriptor, MethodRef, TypeDescriptor, dump_body,
};
use netweave_core::{Attribute, Colors, TypeRef, names};

use crate::hash::routing_id;
use crate::test_utils::{
    BehaviourBuilder, delegate, game, ret_body, void_method, weave_err, weave_ok, weave_with,
};
use crate::{DiagnosticKind, WeaverConfig, Woven};

const PLAYER: &str = "Game.Player";

fn method<'a>(woven: &'a Woven, ty: &str, name: &str) -> &'a MethodDescriptor {
    woven
        .assembly
        .by_name(ty)
        .and_then(|t| t.method(name))
        .unwrap_or_else(|| panic!("`{ty}::{name}` was not generated"))
}

fn listing(woven: &Woven, ty: &str, name: &str) -> String {
    let body = method(woven, ty, name).body.as_ref().expect("generated body");
    dump_body(body, Colors::OFF)
}

fn instructions<'a>(woven: &'a Woven, ty: &str, name: &str) -> &'a [Instr] {
    &method(woven, ty, name)
        .body
        .as_ref()
        .expect("generated body")
        .instructions
}

fn calls(instrs: &[Instr], owner: &str, name: &str) -> bool {
    instrs
        .iter()
        .any(|i| matches!(i.callee(), Some(m) if m.owner == owner && m.name == name))
}

fn weave_player(player: TypeDescriptor) -> Woven {
    weave_ok(game([player]))
}

#[test]
fn field_accessors() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_var("Health", names::INT32)
            .build(),
    );

    insta::assert_snapshot!(listing(&woven, PLAYER, "get_NetworkHealth"), @r"
        ldarg 0
        ldfld Game.Player::Health
        ret
    ");
    insta::assert_snapshot!(listing(&woven, PLAYER, "set_NetworkHealth"), @r"
        ldarg 0
        ldarg 1
        ldarg 0
        ldflda Game.Player::Health
        ldc.i4 1
        call Net.NetworkBehaviour::SetSyncVar<System.Int32>
        ret
    ");

    let player = woven.assembly.by_name(PLAYER).unwrap();
    let property = &player.properties[0];
    assert_eq!(property.name, "NetworkHealth");
    assert_eq!(property.getter.as_deref(), Some("get_NetworkHealth"));
    assert_eq!(property.setter.as_deref(), Some("set_NetworkHealth"));
}

#[test]
fn hooked_setter_guards_reentry() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_var_hooked("Health", names::INT32, "OnHealth")
            .build(),
    );

    insta::assert_snapshot!(listing(&woven, PLAYER, "set_NetworkHealth"), @r"
        call Net.NetworkServer::get_localClientActive
        brfalse L0
        ldarg 0
        call Net.NetworkBehaviour::get_syncVarHookGuard
        brtrue L0
        ldarg 0
        ldc.i4 1
        call Net.NetworkBehaviour::set_syncVarHookGuard
        ldarg 0
        ldarg 1
        call Game.Player::OnHealth
        ldarg 0
        ldc.i4 0
        call Net.NetworkBehaviour::set_syncVarHookGuard
    L0:
        ldarg 0
        ldarg 1
        ldarg 0
        ldflda Game.Player::Health
        ldc.i4 1
        call Net.NetworkBehaviour::SetSyncVar<System.Int32>
        ret
    ");
}

#[test]
fn entity_reference_replicates_through_shadow_id() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_var("Health", names::INT32)
            .sync_var("Target", names::GAME_OBJECT)
            .build(),
    );

    let player = woven.assembly.by_name(PLAYER).unwrap();
    let shadow = player.field("___TargetNetId").expect("shadow field");
    assert!(shadow.ty.is(names::NETWORK_INSTANCE_ID));

    let setter = instructions(&woven, PLAYER, "set_NetworkTarget");
    assert!(calls(setter, names::NETWORK_BEHAVIOUR, "SetSyncVarGameObject"));
    assert!(setter.contains(&Instr::LdcI4(0b10)));
    assert!(setter.contains(&Instr::LdFlda(FieldRef::new(PLAYER, "___TargetNetId"))));

    insta::assert_snapshot!(listing(&woven, PLAYER, "PreStartClient"), @r"
        ldarg 0
        ldflda Game.Player::___TargetNetId
        call Net.NetworkInstanceId::IsEmpty
        brtrue L0
        ldarg 0
        ldarg 0
        ldfld Game.Player::___TargetNetId
        call Net.ClientScene::FindLocalObject
        stfld Game.Player::Target
    L0:
        ret
    ");
}

#[test]
fn no_entity_reference_no_pre_start_client() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_var("Health", names::INT32)
            .build(),
    );
    let player = woven.assembly.by_name(PLAYER).unwrap();
    assert!(!player.has_method(names::PRE_START_CLIENT));
}

#[test]
fn serializer_writes_mask_once() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_var("Health", names::INT32)
            .build(),
    );

    insta::assert_snapshot!(listing(&woven, PLAYER, names::ON_SERIALIZE), @r"
    .locals [0] System.Boolean
        ldarg 2
        brfalse L0
        ldarg 1
        ldarg 0
        ldfld Game.Player::Health
        call Net.NetworkWriter::WriteInt32
        ldarg 0
        ldc.i4 1
        call Net.NetworkBehaviour::ClearSyncVarDirtyBits
        ldc.i4 1
        ret
    L0:
        ldarg 0
        call Net.NetworkBehaviour::get_syncVarDirtyBits
        ldc.i4 1
        and
        brfalse L1
        ldloc 0
        brtrue L2
        ldarg 1
        ldarg 0
        call Net.NetworkBehaviour::get_syncVarDirtyBits
        ldc.i4 1
        and
        call Net.NetworkWriter::WritePackedUInt32
        ldc.i4 1
        stloc 0
    L2:
        ldarg 1
        ldarg 0
        ldfld Game.Player::Health
        call Net.NetworkWriter::WriteInt32
    L1:
        ldloc 0
        brtrue L3
        ldarg 1
        ldarg 0
        call Net.NetworkBehaviour::get_syncVarDirtyBits
        ldc.i4 1
        and
        call Net.NetworkWriter::WritePackedUInt32
    L3:
        ldarg 0
        ldc.i4 1
        call Net.NetworkBehaviour::ClearSyncVarDirtyBits
        ldloc 0
        ret
    ");
}

#[test]
fn deserializer_routes_delta_values_through_hooks() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_var_hooked("Health", names::INT32, "OnHealth")
            .build(),
    );

    insta::assert_snapshot!(listing(&woven, PLAYER, names::ON_DESERIALIZE), @r"
    .locals [0] System.Int32
        ldarg 2
        brfalse L0
        ldarg 0
        ldarg 1
        call Net.NetworkReader::ReadInt32
        stfld Game.Player::Health
        ret
    L0:
        ldarg 1
        call Net.NetworkReader::ReadPackedUInt32
        stloc 0
        ldloc 0
        ldc.i4 1
        and
        brfalse L1
        ldarg 0
        ldarg 1
        call Net.NetworkReader::ReadInt32
        call Game.Player::OnHealth
    L1:
        ret
    ");
}

#[test]
fn serializers_without_members() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .command(void_method("CmdJump", &[]))
            .build(),
    );

    insta::assert_snapshot!(listing(&woven, PLAYER, names::ON_SERIALIZE), @r"
    .locals [0] System.Boolean
        ldloc 0
        ret
    ");
    insta::assert_snapshot!(listing(&woven, PLAYER, names::ON_DESERIALIZE), @r"
        ret
    ");
}

#[test]
fn derived_serializers_chain_to_base() {
    let base = BehaviourBuilder::new("Game.Unit")
        .sync_var("Health", names::INT32)
        .build();
    let derived = BehaviourBuilder::new(PLAYER)
        .base("Game.Unit")
        .sync_var("Score", names::INT32)
        .build();

    let woven = weave_ok(game([derived, base]));

    let serialize = instructions(&woven, PLAYER, names::ON_SERIALIZE);
    assert!(calls(serialize, "Game.Unit", names::ON_SERIALIZE));
    assert!(serialize.contains(&Instr::Or));
    assert!(serialize.contains(&Instr::LdcI4(0b10)));
    let deserialize = instructions(&woven, PLAYER, names::ON_DESERIALIZE);
    assert!(calls(deserialize, "Game.Unit", names::ON_DESERIALIZE));

    let base_serialize = instructions(&woven, "Game.Unit", names::ON_SERIALIZE);
    assert!(!calls(base_serialize, names::NETWORK_BEHAVIOUR, names::ON_SERIALIZE));
}

#[test]
fn user_serializer_is_kept() {
    let mut custom = void_method(names::ON_SERIALIZE, &[("writer", names::NETWORK_WRITER)]);
    custom.return_type = TypeRef::named(names::BOOLEAN);
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_var("Health", names::INT32)
            .method(custom)
            .build(),
    );

    let player = woven.assembly.by_name(PLAYER).unwrap();
    let serializers = player
        .methods
        .iter()
        .filter(|m| m.name == names::ON_SERIALIZE)
        .count();
    assert_eq!(serializers, 1);
    assert_eq!(instructions(&woven, PLAYER, names::ON_SERIALIZE), [Instr::Ret]);
}

#[test]
fn command_stubs() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .command(void_method("CmdJump", &[("height", names::SINGLE)]))
            .build(),
    );

    insta::assert_snapshot!(listing(&woven, PLAYER, "InvokeCmdCmdJump"), @r#"
        call Net.NetworkServer::get_active
        brtrue L0
        ldstr "Command CmdJump called on client."
        call Engine.Debug::LogError
        ret
    L0:
        ldarg 0
        castclass Game.Player
        ldarg 1
        call Net.NetworkReader::ReadSingle
        call Game.Player::CmdJump
        ret
    "#);
    insta::assert_snapshot!(listing(&woven, PLAYER, "CallCmdJump"), @r#"
    .locals [0] Net.NetworkWriter
        call Net.NetworkClient::get_active
        brtrue L0
        ldstr "Command function CmdJump called on server."
        call Engine.Debug::LogError
        ret
    L0:
        ldarg 0
        call Net.NetworkBehaviour::get_isServer
        brfalse L1
        ldarg 0
        ldarg 1
        call Game.Player::CmdJump
        ret
    L1:
        newobj Net.NetworkWriter::.ctor
        stloc 0
        ldloc 0
        ldc.i4 0
        call Net.NetworkWriter::WriteInt16
        ldloc 0
        ldc.i4 5
        call Net.NetworkWriter::WriteInt16
        ldloc 0
        ldsfld Game.Player::kCmdCmdJump
        call Net.NetworkWriter::WritePackedUInt32
        ldloc 0
        ldarg 0
        call Net.NetworkBehaviour::get_netId
        call Net.NetworkWriter::WriteNetworkInstanceId
        ldloc 0
        ldarg 1
        call Net.NetworkWriter::WriteSingle
        ldarg 0
        ldloc 0
        ldc.i4 0
        ldstr "CmdJump"
        call Net.NetworkBehaviour::SendCommandInternal
        ret
    "#);

    let dispatcher = method(&woven, PLAYER, "InvokeCmdCmdJump");
    assert!(dispatcher.is_static);
    let params: Vec<_> = dispatcher.params.iter().map(|p| p.ty.name.as_str()).collect();
    assert_eq!(params, [names::NETWORK_BEHAVIOUR, names::NETWORK_READER]);
    let caller = method(&woven, PLAYER, "CallCmdJump");
    assert_eq!(caller.params[0].name, "height");
}

#[test]
fn broadcast_rpc_uses_its_channel() {
    let rpc = void_method("RpcHit", &[("amount", names::INT32)])
        .with_attribute(Attribute::new(names::CLIENT_RPC_ATTR).with_arg("channel", 3));
    let woven = weave_player(BehaviourBuilder::new(PLAYER).method(rpc).build());

    let caller = instructions(&woven, PLAYER, "CallRpcHit");
    assert!(calls(caller, names::NETWORK_SERVER, "get_active"));
    assert!(calls(caller, names::NETWORK_BEHAVIOUR, "SendRPCInternal"));
    assert!(caller.contains(&Instr::LdcI4(2)));
    assert!(caller.contains(&Instr::LdcI4(3)));
    assert!(caller.contains(&Instr::LdStr("RPC Function RpcHit called on client.".into())));
    assert!(!calls(caller, names::NETWORK_BEHAVIOUR, "get_isServer"));

    let dispatcher = instructions(&woven, PLAYER, "InvokeRpcRpcHit");
    assert!(calls(dispatcher, names::NETWORK_CLIENT, "get_active"));
    assert!(calls(dispatcher, names::NETWORK_READER, "ReadInt32"));
    assert!(woven.assembly.by_name(PLAYER).unwrap().has_field("kRpcRpcHit"));
}

#[test]
fn targeted_rpc_skips_connection_on_the_wire() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .target_rpc(void_method(
                "TargetHit",
                &[("conn", names::NETWORK_CONNECTION), ("amount", names::INT32)],
            ))
            .build(),
    );

    insta::assert_snapshot!(listing(&woven, PLAYER, "InvokeRpcTargetHit"), @r#"
        call Net.NetworkClient::get_active
        brtrue L0
        ldstr "TargetRPC TargetHit called on server."
        call Engine.Debug::LogError
        ret
    L0:
        ldarg 0
        castclass Game.Player
        call Net.ClientScene::get_readyConnection
        ldarg 1
        call Net.NetworkReader::ReadInt32
        call Game.Player::TargetHit
        ret
    "#);

    let caller = instructions(&woven, PLAYER, "CallTargetHit");
    assert!(caller.contains(&Instr::IsInst(TypeRef::named(
        names::LOCAL_CONNECTION_TO_SERVER
    ))));
    assert!(caller.contains(&Instr::LdStr(
        "TargetRPC Function TargetHit called on connection to server".into()
    )));
    let writes: Vec<_> = caller
        .iter()
        .filter_map(Instr::callee)
        .filter(|m| m.name == "WriteInt32")
        .collect();
    assert_eq!(writes.len(), 1);
    let tail: Vec<_> = caller.iter().rev().take(7).rev().cloned().collect();
    assert_eq!(
        tail,
        [
            Instr::LdArg(0),
            Instr::LdArg(1),
            Instr::LdLoc(0),
            Instr::LdcI4(0),
            Instr::LdStr("TargetHit".into()),
            Instr::Call(MethodRef::new(names::NETWORK_BEHAVIOUR, "SendTargetRPCInternal")),
            Instr::Ret,
        ]
    );
}

#[test]
fn event_stubs() {
    let woven = weave_ok(game([
        BehaviourBuilder::new(PLAYER)
            .event("EventDamage", "Game.DamageDelegate")
            .build(),
        delegate("Game.DamageDelegate", &[("amount", names::INT32)]),
    ]));

    insta::assert_snapshot!(listing(&woven, PLAYER, "InvokeSyncEventEventDamage"), @r#"
        call Net.NetworkClient::get_active
        brtrue L0
        ldstr "Event EventDamage called on server."
        call Engine.Debug::LogError
        ret
    L0:
        ldarg 0
        castclass Game.Player
        ldfld Game.Player::EventDamage
        brtrue L1
        ret
    L1:
        ldarg 0
        castclass Game.Player
        ldfld Game.Player::EventDamage
        ldarg 1
        call Net.NetworkReader::ReadInt32
        callvirt Game.DamageDelegate::Invoke
        ret
    "#);

    let caller = instructions(&woven, PLAYER, "CallEventDamage");
    assert!(caller.contains(&Instr::LdcI4(7)));
    assert!(caller.contains(&Instr::LdStr("Event EventDamage called on client.".into())));
    assert!(calls(caller, names::NETWORK_BEHAVIOUR, "SendEventInternal"));
    assert!(calls(caller, names::NETWORK_WRITER, "WriteInt32"));
}

#[test]
fn static_initializer_registers_routing_ids() {
    let woven = weave_ok(game([
        BehaviourBuilder::new(PLAYER)
            .command(void_method("CmdJump", &[]))
            .rpc(void_method("RpcJump", &[]))
            .event("EventDamage", "Game.DamageDelegate")
            .sync_list("Items", names::SYNC_LIST_INT)
            .build(),
        delegate("Game.DamageDelegate", &[]),
    ]));

    let cctor = method(&woven, PLAYER, names::CCTOR);
    assert!(cctor.is_static);
    let body = &cctor.body.as_ref().unwrap().instructions;

    let stores: Vec<_> = body
        .windows(2)
        .filter_map(|w| match w {
            [Instr::LdcI4(id), Instr::StSFld(f)] => Some((f.name.as_str(), *id)),
            _ => None,
        })
        .collect();
    assert_eq!(
        stores,
        [
            ("kCmdCmdJump", routing_id("Player", "Cmd", "CmdJump")),
            ("kRpcRpcJump", routing_id("Player", "Rpc", "RpcJump")),
            ("kEventEventDamage", routing_id("Player", "Event", "EventDamage")),
            ("kListItems", routing_id("Player", "List", "Items")),
        ]
    );
    for register in [
        "RegisterCommandDelegate",
        "RegisterRpcDelegate",
        "RegisterEventDelegate",
        "RegisterSyncListDelegate",
    ] {
        assert!(calls(body, names::NETWORK_BEHAVIOUR, register), "{register}");
    }
    assert!(body.contains(&Instr::LdFtn(MethodRef::new(PLAYER, "InvokeSyncListItems"))));
    assert!(body.ends_with(&[
        Instr::LdStr("Player".into()),
        Instr::LdcI4(0),
        Instr::Call(MethodRef::new(names::NETWORK_CRC, "RegisterBehaviour")),
        Instr::Ret,
    ]));
    assert!(!woven.assembly.by_name(PLAYER).unwrap().flags.before_field_init);
}

#[test]
fn existing_static_initializer_is_extended() {
    let mut b = netweave_bytecode::BodyBuilder::new();
    b.ldc_i4(7)
        .st_sfld(FieldRef::new(PLAYER, "Spawned"))
        .ret();
    let cctor = MethodDescriptor::new(names::CCTOR)
        .static_()
        .with_body(b.finish());
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .field(FieldDescriptor::new("Spawned", names::INT32).static_())
            .command(void_method("CmdJump", &[]))
            .method(cctor)
            .build(),
    );

    let player = woven.assembly.by_name(PLAYER).unwrap();
    let cctors = player.methods.iter().filter(|m| m.name == names::CCTOR).count();
    assert_eq!(cctors, 1);
    let body = instructions(&woven, PLAYER, names::CCTOR);
    assert_eq!(body[..2], [Instr::LdcI4(7), Instr::StSFld(FieldRef::new(PLAYER, "Spawned"))]);
    assert_eq!(body.iter().filter(|i| **i == Instr::Ret).count(), 1);
}

#[test]
fn unterminated_static_initializer_is_rejected() {
    let mut b = netweave_bytecode::BodyBuilder::new();
    b.ldc_i4(7).emit(Instr::Pop);
    let cctor = MethodDescriptor::new(names::CCTOR)
        .static_()
        .with_body(b.finish());
    let diagnostics = weave_err(game([BehaviourBuilder::new(PLAYER)
        .command(void_method("CmdJump", &[]))
        .method(cctor)
        .build()]));

    assert_eq!(diagnostics.kinds(), [DiagnosticKind::MalformedTerminator]);
}

#[test]
fn collections_are_constructed_and_bound() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_list("Items", names::SYNC_LIST_INT)
            .build(),
    );

    insta::assert_snapshot!(listing(&woven, PLAYER, names::CTOR), @r"
        ldarg 0
        newobj Net.SyncListInt::.ctor
        stfld Game.Player::Items
        ret
    ");
    insta::assert_snapshot!(listing(&woven, PLAYER, names::AWAKE), @r"
        ldarg 0
        ldfld Game.Player::Items
        ldarg 0
        ldsfld Game.Player::kListItems
        call Net.SyncList`1::InitializeBehaviour
        ret
    ");
    insta::assert_snapshot!(listing(&woven, PLAYER, "InvokeSyncListItems"), @r#"
        call Net.NetworkClient::get_active
        brtrue L0
        ldstr "SyncList Items called on server."
        call Engine.Debug::LogError
        ret
    L0:
        ldarg 0
        castclass Game.Player
        ldfld Game.Player::Items
        ldarg 1
        callvirt Net.SyncList`1::HandleMsg
        ret
    "#);

    let serialize = instructions(&woven, PLAYER, names::ON_SERIALIZE);
    assert!(calls(serialize, names::NETWORK_WRITER, "WriteSyncList"));
    let deserialize = instructions(&woven, PLAYER, names::ON_DESERIALIZE);
    assert!(calls(deserialize, names::NETWORK_READER, "ReadSyncListInto"));
}

#[test]
fn user_constructed_collection_is_not_replaced() {
    let mut b = netweave_bytecode::BodyBuilder::new();
    b.ld_arg(0)
        .emit(Instr::NewObj(MethodRef::new(names::SYNC_LIST_INT, names::CTOR)))
        .st_fld(FieldRef::new(PLAYER, "Items"))
        .ret();
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .without_ctor()
            .method(MethodDescriptor::new(names::CTOR).with_body(b.finish()))
            .sync_list("Items", names::SYNC_LIST_INT)
            .build(),
    );

    let ctor = instructions(&woven, PLAYER, names::CTOR);
    let constructions = ctor
        .iter()
        .filter(|i| matches!(i, Instr::NewObj(_)))
        .count();
    assert_eq!(constructions, 1);
}

#[test]
fn existing_awake_is_extended() {
    let mut b = netweave_bytecode::BodyBuilder::new();
    b.ld_str("awake").call(MethodRef::new(names::DEBUG, "Log")).ret();
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_list("Items", names::SYNC_LIST_INT)
            .method(MethodDescriptor::new(names::AWAKE).with_body(b.finish()))
            .build(),
    );

    let awake = instructions(&woven, PLAYER, names::AWAKE);
    assert_eq!(awake[0], Instr::LdStr("awake".into()));
    assert!(calls(awake, names::SYNC_LIST, "InitializeBehaviour"));
    assert_eq!(awake.last(), Some(&Instr::Ret));
}

#[test]
fn generated_awake_calls_base_awake() {
    let base = BehaviourBuilder::new("Game.Unit")
        .method(MethodDescriptor::new(names::AWAKE).virtual_().with_body(ret_body()))
        .build();
    let derived = BehaviourBuilder::new(PLAYER)
        .base("Game.Unit")
        .sync_list("Items", names::SYNC_LIST_INT)
        .build();

    let woven = weave_ok(game([base, derived]));

    let awake = instructions(&woven, PLAYER, names::AWAKE);
    assert_eq!(awake[..2], [Instr::LdArg(0), Instr::Call(MethodRef::new("Game.Unit", names::AWAKE))]);
    assert!(method(&woven, PLAYER, names::AWAKE).is_virtual);
}

#[test]
fn routed_members_need_a_constructor() {
    let diagnostics = weave_err(game([BehaviourBuilder::new(PLAYER)
        .without_ctor()
        .command(void_method("CmdJump", &[]))
        .build()]));

    insta::assert_snapshot!(diagnostics.render(), @r"
    error: no instance constructor to extend
      --> Game.Player::.ctor
    ");
}

#[test]
fn fields_alone_need_no_constructor() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .without_ctor()
            .sync_var("Health", names::INT32)
            .build(),
    );
    let player = woven.assembly.by_name(PLAYER).unwrap();
    assert!(!player.has_method(names::CCTOR));
    assert!(!player.has_method(names::CTOR));
}

#[test]
fn unmarshallable_types_are_rejected() {
    let item = TypeDescriptor::new("Game.Item", "Game").with_base(names::OBJECT);
    let diagnostics = weave_err(game([
        BehaviourBuilder::new(PLAYER)
            .sync_var("Held", "Game.Item")
            .build(),
        item.clone(),
    ]));
    insta::assert_snapshot!(diagnostics.render(), @r"
    error: no marshalling function for type `Game.Item`
      --> Game.Player::Held
      = hint: register a marshalling function for the type
    ");

    let diagnostics = weave_err(game([
        BehaviourBuilder::new(PLAYER)
            .command(void_method("CmdUse", &[("item", "Game.Item")]))
            .build(),
        item,
    ]));
    assert_eq!(diagnostics.kinds(), [DiagnosticKind::NoMarshalFunction]);
}

#[test]
fn network_settings_overrides() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .attribute(
                Attribute::new(names::NETWORK_SETTINGS_ATTR)
                    .with_arg("channel", 2)
                    .with_arg("sendInterval", 0.5),
            )
            .sync_var("Health", names::INT32)
            .build(),
    );

    insta::assert_snapshot!(listing(&woven, PLAYER, names::GET_NETWORK_CHANNEL), @r"
        ldc.i4 2
        ret
    ");
    insta::assert_snapshot!(listing(&woven, PLAYER, names::GET_NETWORK_SEND_INTERVAL), @r"
        ldc.r4 0.5
        ret
    ");
}

#[test]
fn default_settings_generate_nothing() {
    let woven = weave_player(
        BehaviourBuilder::new(PLAYER)
            .sync_var("Health", names::INT32)
            .build(),
    );
    let player = woven.assembly.by_name(PLAYER).unwrap();
    assert!(!player.has_method(names::GET_NETWORK_CHANNEL));
    assert!(!player.has_method(names::GET_NETWORK_SEND_INTERVAL));
    assert!(player.has_method(names::WEAVE_MARKER));
}

#[test]
fn debug_logs_are_injected_on_request() {
    let player = BehaviourBuilder::new(PLAYER)
        .sync_var("Health", names::INT32)
        .command(void_method("CmdJump", &[]))
        .build();
    let config = WeaverConfig::new().with_debug_logs(true);

    let woven = weave_with(game([player]), config).unwrap();

    let serialize = instructions(&woven, PLAYER, names::ON_SERIALIZE);
    assert_eq!(serialize[0], Instr::LdStr("Injected Serialize Game.Player".into()));
    let deserialize = instructions(&woven, PLAYER, names::ON_DESERIALIZE);
    assert_eq!(deserialize[0], Instr::LdStr("Injected Deserialize Game.Player".into()));
    assert!(calls(deserialize, names::DEBUG, "LogError"));
    let caller = instructions(&woven, PLAYER, "CallCmdJump");
    assert_eq!(caller[0], Instr::LdStr("Call Command function CmdJump".into()));
    assert!(calls(caller, names::DEBUG, "LogError"));
}
