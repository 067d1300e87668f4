use netweave_bytecode::{FieldDescriptor, MethodDescriptor, ParamDescriptor, TypeDescriptor};
use netweave_core::{Attribute, TypeRef, names};

use crate::StageResult;
use crate::config::WeaverConfig;
use crate::diagnostics::DiagnosticKind;
use crate::scan::{DEFAULT_SEND_INTERVAL, RemoteKind, ScannedType, SyncKind, check_plain_type, scan_type};
use crate::test_utils::{BehaviourBuilder, delegate, game, void_method};

const PLAYER: &str = "Game.Player";

fn scan_with(types: Vec<TypeDescriptor>, config: &WeaverConfig) -> StageResult<ScannedType> {
    let assembly = game(types);
    let id = assembly.find(PLAYER).expect("fixture declares the player");
    scan_type(&assembly, id, config)
}

fn scan(types: Vec<TypeDescriptor>) -> StageResult<ScannedType> {
    scan_with(types, &WeaverConfig::default())
}

fn errors(types: Vec<TypeDescriptor>) -> Vec<DiagnosticKind> {
    scan(types).unwrap_err().kinds()
}

fn other_behaviour() -> TypeDescriptor {
    BehaviourBuilder::new("Game.Other").build()
}

#[test]
fn classifies_members_in_declaration_order() {
    let player = BehaviourBuilder::new(PLAYER)
        .sync_var("Health", names::INT32)
        .sync_list("Items", names::SYNC_LIST_INT)
        .sync_var("Name", names::STRING)
        .command(void_method("CmdJump", &[("height", names::SINGLE)]))
        .rpc(void_method("RpcHit", &[]))
        .target_rpc(void_method(
            "TargetHit",
            &[("conn", names::NETWORK_CONNECTION), ("amount", names::INT32)],
        ))
        .event("EventDamage", "Game.DamageDelegate")
        .build();
    let damage = delegate("Game.DamageDelegate", &[("amount", names::INT32)]);

    let (scanned, warnings) = scan(vec![player, damage]).unwrap();

    assert!(warnings.is_empty());
    let members: Vec<_> = scanned.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(members, ["Health", "Items", "Name"]);
    assert!(scanned.members[1].is_collection());
    assert_eq!(scanned.commands[0].name, "CmdJump");
    assert_eq!(scanned.rpcs[0].kind, RemoteKind::Rpc);
    assert_eq!(scanned.target_rpcs[0].wire_params().len(), 1);
    assert_eq!(scanned.events[0].params[0].name, "amount");
    assert_eq!(scanned.settings.channel, 0);
    assert_eq!(scanned.settings.send_interval, DEFAULT_SEND_INTERVAL);
    assert!(scanned.has_routed_members());
}

#[test]
fn entity_reference_gets_shadow_field() {
    let player = BehaviourBuilder::new(PLAYER)
        .sync_var("Target", names::GAME_OBJECT)
        .build();

    let (scanned, _) = scan(vec![player]).unwrap();

    assert_eq!(
        scanned.members[0].kind,
        SyncKind::Field {
            hook: None,
            shadow: Some("___TargetNetId".to_string()),
        }
    );
}

#[test]
fn generic_behaviour_stops_immediately() {
    let mut player = BehaviourBuilder::new(PLAYER)
        .sync_var("Score", names::INT32)
        .field(FieldDescriptor::new("Bad", names::INT32).static_().with_attribute(Attribute::new(names::SYNC_VAR_ATTR)))
        .build();
    player.generic_params.push("T".to_string());

    assert_eq!(errors(vec![player]), [DiagnosticKind::GenericBehaviour]);
}

#[test]
fn sync_var_shape_violations() {
    let sync_var = |name: &str, ty: TypeRef| {
        FieldDescriptor::new(name, ty).with_attribute(Attribute::new(names::SYNC_VAR_ATTR))
    };
    let player = BehaviourBuilder::new(PLAYER)
        .field(sync_var("A", names::INT32.into()).static_())
        .field(sync_var("B", TypeRef::array_of(names::INT32.into())))
        .field(sync_var("C", names::ENUMERATOR.into()))
        .field(sync_var("D", "Game.Other".into()))
        .field(sync_var("E", names::SCRIPTABLE_OBJECT.into()))
        .field(sync_var("F", "Game.Missing".into()))
        .field(sync_var("G", TypeRef::generic("Game.Pair`1", vec![names::INT32.into()])))
        .build();
    let pair = {
        let mut pair = TypeDescriptor::new("Game.Pair`1", "Game");
        pair.generic_params.push("T".to_string());
        pair
    };

    assert_eq!(
        errors(vec![player, other_behaviour(), pair]),
        [
            DiagnosticKind::SyncVarStatic,
            DiagnosticKind::SyncVarArray,
            DiagnosticKind::SyncVarInterface,
            DiagnosticKind::SyncVarBehaviour,
            DiagnosticKind::SyncVarScriptableObject,
            DiagnosticKind::UnresolvedType,
            DiagnosticKind::SyncVarGeneric,
        ]
    );
}

#[test]
fn cross_module_field_type_needs_allow_list() {
    let player = BehaviourBuilder::new(PLAYER)
        .sync_var("Stats", "Lib.Stats")
        .build();
    let stats = || TypeDescriptor::new("Lib.Stats", "Lib");

    let diagnostics = scan(vec![player.clone(), stats()]).unwrap_err();
    insta::assert_snapshot!(diagnostics.render(), @r"
    error: [SyncVar] field type is declared in another module: `Lib.Stats` is declared in `Lib`
      --> Game.Player::Stats
      = hint: declare the type in this module or use a runtime/standard type
    ");

    let config = WeaverConfig::new().with_allowed_module("Lib");
    assert!(scan_with(vec![player, stats()], &config).is_ok());
}

#[test]
fn collection_marked_sync_var_is_a_plain_field() {
    let player = BehaviourBuilder::new(PLAYER)
        .sync_var("Scores", names::SYNC_LIST_INT)
        .build();

    let (scanned, warnings) = scan(vec![player]).unwrap();

    assert_eq!(warnings.kinds(), [DiagnosticKind::SyncListAsSyncVar]);
    assert!(!warnings.has_errors());
    assert!(!scanned.members[0].is_collection());
}

#[test]
fn raw_collection_base_is_rejected() {
    let player = BehaviourBuilder::new(PLAYER)
        .field(FieldDescriptor::new(
            "Items",
            TypeRef::generic(names::SYNC_LIST_STRUCT, vec![names::VECTOR3.into()]),
        ))
        .build();

    let diagnostics = scan(vec![player]).unwrap_err();
    insta::assert_snapshot!(diagnostics.render(), @r"
    error: collection base type cannot be used directly: `Items: Net.SyncListStruct`1<Engine.Vector3>`
      --> Game.Player::Items
      = hint: declare a subclass, e.g. `class SyncListItem : SyncListStruct<Item>`
    ");
}

#[test]
fn static_collection_is_rejected() {
    let player = BehaviourBuilder::new(PLAYER)
        .field(FieldDescriptor::new("Items", names::SYNC_LIST_INT).static_())
        .build();

    assert_eq!(errors(vec![player]), [DiagnosticKind::SyncListStatic]);
}

#[test]
fn hook_must_exist_with_one_matching_parameter() {
    let hooked = |hook: &str| {
        FieldDescriptor::new("Health", names::INT32)
            .with_attribute(Attribute::new(names::SYNC_VAR_ATTR).with_arg("hook", hook))
    };

    let missing = BehaviourBuilder::new(PLAYER).field(hooked("OnHealth")).build();
    let diagnostics = scan(vec![missing]).unwrap_err();
    insta::assert_snapshot!(diagnostics.render(), @r"
    error: hook method `OnHealth` not found
      --> Game.Player::Health
      = hint: declare `void OnHealth(Int32 value)`
    ");

    let arity = BehaviourBuilder::new(PLAYER)
        .field(hooked("OnHealth"))
        .method(void_method("OnHealth", &[("a", names::INT32), ("b", names::INT32)]))
        .build();
    assert_eq!(errors(vec![arity]), [DiagnosticKind::HookArity]);

    let mismatch = BehaviourBuilder::new(PLAYER)
        .field(hooked("OnHealth"))
        .method(void_method("OnHealth", &[("value", names::STRING)]))
        .build();
    assert_eq!(errors(vec![mismatch]), [DiagnosticKind::HookParamType]);
}

#[test]
fn remote_procedure_shape_violations() {
    let player = BehaviourBuilder::new(PLAYER)
        .command(void_method("Jump", &[]))
        .command(void_method("CmdScore", &[]).returning(names::INT32))
        .rpc(void_method("RpcWait", &[]).returning(names::ENUMERATOR))
        .rpc(void_method("RpcStatic", &[]).static_())
        .command({
            let mut m = void_method("CmdGeneric", &[]);
            m.generic_params.push("T".to_string());
            m
        })
        .build();

    assert_eq!(
        errors(vec![player]),
        [
            DiagnosticKind::RemotePrefix,
            DiagnosticKind::RemoteNotVoid,
            DiagnosticKind::RemoteCoroutine,
            DiagnosticKind::RemoteStatic,
            DiagnosticKind::RemoteGeneric,
        ]
    );
}

#[test]
fn parameter_shape_violations() {
    let param = |name: &str, ty: &str| ParamDescriptor::new(name, ty);
    let mut cmd = void_method("CmdAll", &[]);
    cmd.params = vec![
        ParamDescriptor { is_out: true, ..param("a", names::INT32) },
        ParamDescriptor { is_optional: true, ..param("b", names::INT32) },
        ParamDescriptor { by_ref: true, ..param("c", names::INT32) },
        param("d", names::SCRIPTABLE_OBJECT),
        param("e", "Game.Other"),
        param("f", names::NETWORK_IDENTITY),
        param("g", names::NETWORK_CONNECTION),
    ];
    let player = BehaviourBuilder::new(PLAYER).command(cmd).build();

    assert_eq!(
        errors(vec![player, other_behaviour()]),
        [
            DiagnosticKind::ParamOut,
            DiagnosticKind::ParamOptional,
            DiagnosticKind::ParamByRef,
            DiagnosticKind::ParamAbstract,
            DiagnosticKind::ParamComponent,
            DiagnosticKind::ParamConnection,
        ]
    );
}

#[test]
fn targeted_call_takes_connection_first_only() {
    let missing = BehaviourBuilder::new(PLAYER)
        .target_rpc(void_method("TargetHit", &[("amount", names::INT32)]))
        .build();
    assert_eq!(errors(vec![missing]), [DiagnosticKind::TargetRpcConnection]);

    let second = BehaviourBuilder::new(PLAYER)
        .target_rpc(void_method(
            "TargetHit",
            &[
                ("conn", names::NETWORK_CONNECTION),
                ("other", names::LOCAL_CONNECTION_TO_SERVER),
            ],
        ))
        .build();
    assert_eq!(errors(vec![second]), [DiagnosticKind::ParamConnection]);
}

#[test]
fn names_are_unique_per_category() {
    let duplicate = BehaviourBuilder::new(PLAYER)
        .command(void_method("CmdAct", &[]))
        .command(void_method("CmdAct", &[("n", names::INT32)]))
        .build();
    let diagnostics = scan(vec![duplicate]).unwrap_err();
    insta::assert_snapshot!(diagnostics.render(), @r"
    error: `CmdAct` is already declared
      --> Game.Player::CmdAct
      = hint: [Command] names must be unique within a type
    ");

    let fields = BehaviourBuilder::new(PLAYER)
        .sync_var("Health", names::INT32)
        .sync_var("Health", names::INT32)
        .sync_list("Items", names::SYNC_LIST_INT)
        .sync_list("Items", names::SYNC_LIST_INT)
        .build();
    let diagnostics = scan(vec![fields]).unwrap_err();
    insta::assert_snapshot!(diagnostics.render(), @r"
    error: `Health` is already declared
      --> Game.Player::Health
      = hint: [SyncVar] names must be unique within a type
    error: `Items` is already declared
      --> Game.Player::Items
      = hint: synchronized collection names must be unique within a type
    ");

    let across = BehaviourBuilder::new(PLAYER)
        .sync_var("CmdAct", names::INT32)
        .command(void_method("CmdAct", &[]))
        .rpc(void_method("RpcAct", &[]))
        .build();
    let (scanned, _) = scan(vec![across]).unwrap();
    assert_eq!(scanned.members[0].name, "CmdAct");
    assert_eq!(scanned.commands[0].name, "CmdAct");
}

#[test]
fn network_settings_are_read_and_guarded() {
    let settings = Attribute::new(names::NETWORK_SETTINGS_ATTR)
        .with_arg("channel", 2)
        .with_arg("sendInterval", 0.25);
    let player = BehaviourBuilder::new(PLAYER)
        .attribute(settings.clone())
        .build();
    let (scanned, _) = scan(vec![player]).unwrap();
    assert_eq!(scanned.settings.channel, 2);
    assert_eq!(scanned.settings.send_interval, 0.25);

    let conflicting = BehaviourBuilder::new(PLAYER)
        .attribute(settings)
        .method(MethodDescriptor::new(names::GET_NETWORK_CHANNEL).returning(names::INT32))
        .build();
    assert_eq!(errors(vec![conflicting]), [DiagnosticKind::NetworkSettingsConflict]);
}

#[test]
fn event_violations() {
    let mut generic = delegate("Game.GenericDelegate`1", &[]);
    generic.generic_params.push("T".to_string());
    let mut no_invoke = delegate("Game.Silent", &[]);
    no_invoke.methods.clear();

    let mut player = BehaviourBuilder::new(PLAYER)
        .event("Damage", "Game.DamageDelegate")
        .event("EventGeneric", "Game.GenericDelegate`1")
        .event("EventSilent", "Game.Silent")
        .event("EventMissing", "Game.Missing")
        .event("EventOrphan", "Game.DamageDelegate")
        .build();
    player.fields.retain(|f| f.name != "EventOrphan");

    assert_eq!(
        errors(vec![player, delegate("Game.DamageDelegate", &[]), generic, no_invoke]),
        [
            DiagnosticKind::RemotePrefix,
            DiagnosticKind::EventGeneric,
            DiagnosticKind::DelegateNoInvoke,
            DiagnosticKind::UnresolvedType,
            DiagnosticKind::EventNoBackingField,
        ]
    );
}

#[test]
fn network_attributes_outside_behaviour() {
    let helper = BehaviourBuilder::plain("Game.Helper")
        .sync_var("Count", names::INT32)
        .command(void_method("CmdPing", &[]))
        .build();
    let assembly = game(vec![helper]);
    let id = assembly.find("Game.Helper").unwrap();

    insta::assert_snapshot!(check_plain_type(&assembly, id).render(), @r"
    error: network attributes are only valid inside a NetworkBehaviour: [SyncVar] on `Count`
      --> Game.Helper::Count
    error: network attributes are only valid inside a NetworkBehaviour: [Command] on `CmdPing`
      --> Game.Helper::CmdPing
    ");
}
