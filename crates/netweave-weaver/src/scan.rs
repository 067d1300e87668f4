//! Metadata scanner and validator.
//!
//! Classifies a behaviour type's declared members into synchronized fields
//! and collections, remote procedures and synchronized events, enforcing the
//! shapes the generators can handle. All violations of one type are
//! collected before the type is rejected.

use std::collections::HashSet;

use netweave_bytecode::{
    Assembly, FieldDescriptor, MessageCategory, MethodDescriptor, ParamDescriptor, TypeId,
};
use netweave_core::{TypeRef, names, short_name};

use crate::StageResult;
use crate::config::WeaverConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::generate::naming;

/// Send interval the runtime assumes when none is configured.
pub const DEFAULT_SEND_INTERVAL: f32 = 0.1;

/// A synchronized field or collection, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncMember {
    pub name: String,
    pub ty: TypeRef,
    /// Dirty-bit index, assigned by [`crate::dirty_bits::allocate`].
    pub bit: u8,
    pub kind: SyncKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SyncKind {
    Field {
        hook: Option<String>,
        /// Identity field replicated in place of an entity reference.
        shadow: Option<String>,
    },
    Collection,
}

impl SyncMember {
    pub fn mask(&self) -> i32 {
        (1u32 << self.bit) as i32
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.kind, SyncKind::Collection)
    }

    pub fn hook(&self) -> Option<&str> {
        match &self.kind {
            SyncKind::Field { hook, .. } => hook.as_deref(),
            SyncKind::Collection => None,
        }
    }

    pub fn shadow(&self) -> Option<&str> {
        match &self.kind {
            SyncKind::Field { shadow, .. } => shadow.as_deref(),
            SyncKind::Collection => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemoteKind {
    Command,
    Rpc,
    TargetRpc,
}

impl RemoteKind {
    pub const ALL: [RemoteKind; 3] = [RemoteKind::Command, RemoteKind::Rpc, RemoteKind::TargetRpc];

    pub fn attribute(self) -> &'static str {
        match self {
            RemoteKind::Command => names::COMMAND_ATTR,
            RemoteKind::Rpc => names::CLIENT_RPC_ATTR,
            RemoteKind::TargetRpc => names::TARGET_RPC_ATTR,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            RemoteKind::Command => "Cmd",
            RemoteKind::Rpc => "Rpc",
            RemoteKind::TargetRpc => "Target",
        }
    }

    pub fn category(self) -> MessageCategory {
        match self {
            RemoteKind::Command => MessageCategory::Command,
            RemoteKind::Rpc => MessageCategory::Rpc,
            RemoteKind::TargetRpc => MessageCategory::TargetRpc,
        }
    }

    fn label(self) -> &'static str {
        match self {
            RemoteKind::Command => "[Command]",
            RemoteKind::Rpc => "[ClientRpc]",
            RemoteKind::TargetRpc => "[TargetRpc]",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RemoteProcedure {
    pub name: String,
    pub kind: RemoteKind,
    pub channel: i32,
    pub params: Vec<ParamDescriptor>,
}

impl RemoteProcedure {
    /// Parameters marshalled onto the wire; a targeted call's connection is not.
    pub fn wire_params(&self) -> &[ParamDescriptor] {
        match self.kind {
            RemoteKind::TargetRpc => &self.params[1..],
            _ => &self.params,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SyncEvent {
    pub name: String,
    pub delegate: TypeRef,
    pub channel: i32,
    /// Parameters of the delegate's `Invoke`.
    pub params: Vec<ParamDescriptor>,
}

/// Values of the type's `[NetworkSettings]` attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetworkSettings {
    pub channel: i32,
    pub send_interval: f32,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            channel: 0,
            send_interval: DEFAULT_SEND_INTERVAL,
        }
    }
}

impl NetworkSettings {
    pub fn has_custom_send_interval(&self) -> bool {
        (self.send_interval - DEFAULT_SEND_INTERVAL).abs() > f32::EPSILON
    }
}

/// Classified members of one behaviour type.
#[derive(Clone, Debug)]
pub struct ScannedType {
    pub id: TypeId,
    pub name: String,
    pub members: Vec<SyncMember>,
    pub commands: Vec<RemoteProcedure>,
    pub rpcs: Vec<RemoteProcedure>,
    pub target_rpcs: Vec<RemoteProcedure>,
    pub events: Vec<SyncEvent>,
    pub settings: NetworkSettings,
}

impl ScannedType {
    pub fn sync_fields(&self) -> impl Iterator<Item = &SyncMember> {
        self.members.iter().filter(|m| !m.is_collection())
    }

    pub fn collections(&self) -> impl Iterator<Item = &SyncMember> {
        self.members.iter().filter(|m| m.is_collection())
    }

    pub fn remotes(&self) -> impl Iterator<Item = &RemoteProcedure> {
        self.commands
            .iter()
            .chain(&self.rpcs)
            .chain(&self.target_rpcs)
    }

    /// True if registration code is needed.
    pub fn has_routed_members(&self) -> bool {
        self.remotes().next().is_some()
            || !self.events.is_empty()
            || self.collections().next().is_some()
    }

    /// OR of the dirty bits owned by this type (not its bases).
    pub fn own_mask(&self) -> i32 {
        self.members.iter().fold(0, |acc, m| acc | m.mask())
    }
}

/// Scan and validate one behaviour type.
pub fn scan_type(
    assembly: &Assembly,
    id: TypeId,
    config: &WeaverConfig,
) -> StageResult<ScannedType> {
    let ty = assembly.get(id);
    let mut scanner = Scanner {
        assembly,
        config,
        id,
        type_name: &ty.name,
        diagnostics: Diagnostics::new(),
    };

    if !ty.generic_params.is_empty() {
        scanner
            .diagnostics
            .report(DiagnosticKind::GenericBehaviour, Location::ty(&ty.name))
            .emit();
        return Err(scanner.diagnostics);
    }

    let settings = scanner.settings();
    let members = scanner.scan_fields();
    let [commands, rpcs, target_rpcs] = scanner.scan_methods();
    let events = scanner.scan_events();

    if scanner.diagnostics.has_errors() {
        return Err(scanner.diagnostics);
    }

    let scanned = ScannedType {
        id,
        name: ty.name.clone(),
        members,
        commands,
        rpcs,
        target_rpcs,
        events,
        settings,
    };
    Ok((scanned, scanner.diagnostics))
}

/// Reject network attributes on a type that is not a behaviour.
pub fn check_plain_type(assembly: &Assembly, id: TypeId) -> Diagnostics {
    let ty = assembly.get(id);
    let mut diagnostics = Diagnostics::new();
    let is_network = |attrs: &[netweave_core::Attribute]| {
        attrs
            .iter()
            .find(|a| names::NETWORK_MEMBER_ATTRS.contains(&a.name.as_str()))
            .map(|a| a.name.clone())
    };

    let members = ty
        .fields
        .iter()
        .map(|f| (&f.name, is_network(&f.attributes)))
        .chain(ty.methods.iter().map(|m| (&m.name, is_network(&m.attributes))))
        .chain(ty.events.iter().map(|e| (&e.name, is_network(&e.attributes))));
    for (member, attr) in members {
        if let Some(attr) = attr {
            let attr = short_name(&attr);
            diagnostics
                .report(
                    DiagnosticKind::NetworkMemberOutsideBehaviour,
                    Location::member(&ty.name, member),
                )
                .message(format!(
                    "[{}] on `{member}`",
                    attr.strip_suffix("Attribute").unwrap_or(attr)
                ))
                .emit();
        }
    }
    diagnostics
}

/// Number of synchronized members `id` declares itself, without validating them.
///
/// Used for types woven by an earlier run, whose bit counts were not recorded.
pub fn count_sync_members(assembly: &Assembly, id: TypeId) -> u32 {
    assembly
        .get(id)
        .fields
        .iter()
        .filter(|f| !f.is_static)
        .filter(|f| {
            f.attribute(names::SYNC_VAR_ATTR).is_some() || is_collection_type(assembly, &f.ty)
        })
        .count() as u32
}

fn is_collection_type(assembly: &Assembly, ty: &TypeRef) -> bool {
    !ty.array
        && assembly
            .resolve(ty)
            .is_some_and(|id| assembly.is_derived_from(id, names::SYNC_LIST))
}

struct Scanner<'a> {
    assembly: &'a Assembly,
    config: &'a WeaverConfig,
    id: TypeId,
    type_name: &'a str,
    diagnostics: Diagnostics,
}

impl Scanner<'_> {
    fn at(&self, member: &str) -> Location {
        Location::member(self.type_name, member)
    }

    fn settings(&mut self) -> NetworkSettings {
        let ty = self.assembly.get(self.id);
        let Some(attr) = ty.attribute(names::NETWORK_SETTINGS_ATTR) else {
            return NetworkSettings::default();
        };
        let settings = NetworkSettings {
            channel: attr.int("channel").unwrap_or(0) as i32,
            send_interval: attr
                .float("sendInterval")
                .map_or(DEFAULT_SEND_INTERVAL, |v| v as f32),
        };

        let generated = [
            (settings.channel != 0, names::GET_NETWORK_CHANNEL),
            (
                settings.has_custom_send_interval(),
                names::GET_NETWORK_SEND_INTERVAL,
            ),
        ];
        for (needed, method) in generated {
            if needed && ty.has_method(method) {
                self.diagnostics
                    .report(DiagnosticKind::NetworkSettingsConflict, self.at(method))
                    .message(method)
                    .emit();
            }
        }
        settings
    }

    fn scan_fields(&mut self) -> Vec<SyncMember> {
        let assembly = self.assembly;
        let mut members = Vec::new();
        let mut seen_vars = HashSet::new();
        let mut seen_collections = HashSet::new();
        for field in &assembly.get(self.id).fields {
            let loc = self.at(&field.name);
            let collection = is_collection_type(assembly, &field.ty);

            if let Some(attr) = field.attribute(names::SYNC_VAR_ATTR) {
                if !seen_vars.insert(field.name.as_str()) {
                    self.report_duplicate(&field.name, loc, "[SyncVar]");
                    continue;
                }
                if collection {
                    self.diagnostics
                        .report(DiagnosticKind::SyncListAsSyncVar, loc.clone())
                        .message(format!("`{}` is synchronized as a plain field", field.name))
                        .emit();
                }
                if !self.check_sync_var(field, &loc) {
                    continue;
                }
                let hook = attr.str("hook").map(str::to_string);
                if let Some(hook) = &hook {
                    self.check_hook(field, hook, &loc);
                }
                let shadow = field
                    .ty
                    .is(names::GAME_OBJECT)
                    .then(|| naming::shadow_field(&field.name));
                members.push(SyncMember {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                    bit: 0,
                    kind: SyncKind::Field { hook, shadow },
                });
                continue;
            }

            if field.ty.name == names::SYNC_LIST || field.ty.name == names::SYNC_LIST_STRUCT {
                self.diagnostics
                    .report(DiagnosticKind::RawSyncListBase, loc)
                    .message(format!("`{}: {}`", field.name, field.ty))
                    .emit();
                continue;
            }

            if collection {
                if field.is_static {
                    self.diagnostics
                        .report(DiagnosticKind::SyncListStatic, loc)
                        .emit();
                    continue;
                }
                if !seen_collections.insert(field.name.as_str()) {
                    self.report_duplicate(&field.name, loc, "synchronized collection");
                    continue;
                }
                members.push(SyncMember {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                    bit: 0,
                    kind: SyncKind::Collection,
                });
            }
        }
        members
    }

    fn report_duplicate(&mut self, name: &str, loc: Location, category: &str) {
        self.diagnostics
            .report(DiagnosticKind::DuplicateMember, loc)
            .message(name)
            .hint(format!("{category} names must be unique within a type"))
            .emit();
    }

    fn check_sync_var(&mut self, field: &FieldDescriptor, loc: &Location) -> bool {
        let mut ok = true;
        if field.is_static {
            self.diagnostics
                .report(DiagnosticKind::SyncVarStatic, loc.clone())
                .emit();
            ok = false;
        }
        if field.ty.array {
            self.diagnostics
                .report(DiagnosticKind::SyncVarArray, loc.clone())
                .emit();
            return false;
        }
        let Some(tid) = self.assembly.resolve(&field.ty) else {
            self.diagnostics
                .report(DiagnosticKind::UnresolvedType, loc.clone())
                .message(field.ty.to_string())
                .emit();
            return false;
        };

        let decl = self.assembly.get(tid);
        let violation = if field.ty.is_generic_instance() || !decl.generic_params.is_empty() {
            Some(DiagnosticKind::SyncVarGeneric)
        } else if decl.flags.is_interface {
            Some(DiagnosticKind::SyncVarInterface)
        } else if self.assembly.is_assignable_to(tid, names::NETWORK_BEHAVIOUR) {
            Some(DiagnosticKind::SyncVarBehaviour)
        } else if self
            .assembly
            .is_assignable_to(tid, names::SCRIPTABLE_OBJECT)
        {
            Some(DiagnosticKind::SyncVarScriptableObject)
        } else {
            None
        };
        if let Some(kind) = violation {
            self.diagnostics
                .report(kind, loc.clone())
                .message(format!("`{}: {}`", field.name, field.ty))
                .emit();
            return false;
        }

        if !self.module_allowed(&decl.module) {
            self.diagnostics
                .report(DiagnosticKind::SyncVarCrossModule, loc.clone())
                .message(format!("`{}` is declared in `{}`", field.ty, decl.module))
                .emit();
            return false;
        }
        ok
    }

    fn module_allowed(&self, module: &str) -> bool {
        module == self.assembly.main_module()
            || [
                names::RUNTIME_MODULE,
                names::ENGINE_MODULE,
                names::CORLIB_MODULE,
                names::SYSTEM_RUNTIME_MODULE,
            ]
            .contains(&module)
            || self.config.extra_allowed_modules.iter().any(|m| m == module)
    }

    fn check_hook(&mut self, field: &FieldDescriptor, hook: &str, loc: &Location) {
        let assembly = self.assembly;
        let candidates: Vec<&MethodDescriptor> = assembly
            .get(self.id)
            .methods
            .iter()
            .filter(|m| m.name == hook)
            .collect();

        if candidates.is_empty() {
            self.diagnostics
                .report(DiagnosticKind::HookNotFound, loc.clone())
                .message(hook)
                .hint(format!(
                    "declare `void {hook}({} value)`",
                    field.ty.short_name()
                ))
                .emit();
            return;
        }
        let Some(unary) = candidates.iter().find(|m| m.params.len() == 1) else {
            self.diagnostics
                .report(DiagnosticKind::HookArity, loc.clone())
                .message(format!("`{hook}`"))
                .emit();
            return;
        };
        if !candidates
            .iter()
            .any(|m| m.params.len() == 1 && m.params[0].ty == field.ty)
        {
            self.diagnostics
                .report(DiagnosticKind::HookParamType, loc.clone())
                .message(format!(
                    "`{hook}` takes `{}`, field is `{}`",
                    unary.params[0].ty, field.ty
                ))
                .emit();
        }
    }

    /// Commands, broadcast calls and targeted calls, each in declaration order.
    fn scan_methods(&mut self) -> [Vec<RemoteProcedure>; 3] {
        let mut found: [Vec<RemoteProcedure>; 3] = Default::default();
        let mut seen: [HashSet<&str>; 3] = Default::default();

        let assembly = self.assembly;
        for method in &assembly.get(self.id).methods {
            for (slot, kind) in RemoteKind::ALL.into_iter().enumerate() {
                let Some(attr) = method.attribute(kind.attribute()) else {
                    continue;
                };
                let loc = self.at(&method.name);
                if !seen[slot].insert(method.name.as_str()) {
                    self.diagnostics
                        .report(DiagnosticKind::DuplicateMember, loc)
                        .message(&method.name)
                        .hint(format!("{} names must be unique within a type", kind.label()))
                        .emit();
                    continue;
                }
                if self.check_remote(method, kind, &loc) {
                    found[slot].push(RemoteProcedure {
                        name: method.name.clone(),
                        kind,
                        channel: attr.int("channel").unwrap_or(0) as i32,
                        params: method.params.clone(),
                    });
                }
            }
        }
        found
    }

    fn check_remote(&mut self, method: &MethodDescriptor, kind: RemoteKind, loc: &Location) -> bool {
        let errors_before = self.diagnostics.error_count();

        if !method.name.starts_with(kind.prefix()) {
            self.diagnostics
                .report(DiagnosticKind::RemotePrefix, loc.clone())
                .message(format!(
                    "{} `{}` must start with `{}`",
                    kind.label(),
                    method.name,
                    kind.prefix()
                ))
                .emit();
        }
        if !method.generic_params.is_empty() {
            self.diagnostics
                .report(DiagnosticKind::RemoteGeneric, loc.clone())
                .emit();
        }
        if method.return_type.is(names::ENUMERATOR) {
            self.diagnostics
                .report(DiagnosticKind::RemoteCoroutine, loc.clone())
                .emit();
        } else if !method.return_type.is_void() {
            self.diagnostics
                .report(DiagnosticKind::RemoteNotVoid, loc.clone())
                .message(format!("returns `{}`", method.return_type))
                .emit();
        }
        if method.is_static {
            self.diagnostics
                .report(DiagnosticKind::RemoteStatic, loc.clone())
                .emit();
        }

        let targeted = kind == RemoteKind::TargetRpc;
        if targeted && !method.params.first().is_some_and(|p| self.is_connection(&p.ty)) {
            self.diagnostics
                .report(DiagnosticKind::TargetRpcConnection, loc.clone())
                .emit();
        }
        self.check_params(&method.params, targeted, loc);

        self.diagnostics.error_count() == errors_before
    }

    fn is_connection(&self, ty: &TypeRef) -> bool {
        !ty.array
            && self
                .assembly
                .resolve(ty)
                .is_some_and(|id| self.assembly.is_assignable_to(id, names::NETWORK_CONNECTION))
    }

    fn check_params(&mut self, params: &[ParamDescriptor], connection_first: bool, loc: &Location) {
        for (i, p) in params.iter().enumerate() {
            let detail = format!("`{}`", p.name);
            for (flag, kind) in [
                (p.is_out, DiagnosticKind::ParamOut),
                (p.is_optional, DiagnosticKind::ParamOptional),
                (p.by_ref, DiagnosticKind::ParamByRef),
            ] {
                if flag {
                    self.diagnostics
                        .report(kind, loc.clone())
                        .message(detail.clone())
                        .emit();
                }
            }

            if self.is_connection(&p.ty) {
                if !(connection_first && i == 0) {
                    self.diagnostics
                        .report(DiagnosticKind::ParamConnection, loc.clone())
                        .message(detail)
                        .emit();
                }
                continue;
            }

            let Some(tid) = self.assembly.resolve(&p.ty) else {
                self.diagnostics
                    .report(DiagnosticKind::UnresolvedType, loc.clone())
                    .message(p.ty.to_string())
                    .emit();
                continue;
            };
            let decl = self.assembly.get(tid);
            if !p.ty.array && decl.flags.is_abstract {
                self.diagnostics
                    .report(DiagnosticKind::ParamAbstract, loc.clone())
                    .message(format!("`{}: {}`", p.name, p.ty))
                    .emit();
            } else if self.assembly.is_derived_from(tid, names::COMPONENT)
                && decl.name != names::NETWORK_IDENTITY
            {
                self.diagnostics
                    .report(DiagnosticKind::ParamComponent, loc.clone())
                    .message(format!("`{}: {}`", p.name, p.ty))
                    .hint("pass the NetworkIdentity or a GameObject instead")
                    .emit();
            }
        }
    }

    fn scan_events(&mut self) -> Vec<SyncEvent> {
        let assembly = self.assembly;
        let ty = assembly.get(self.id);
        let mut events = Vec::new();
        let mut seen = HashSet::new();

        for event in &ty.events {
            let Some(attr) = event.attribute(names::SYNC_EVENT_ATTR) else {
                continue;
            };
            let loc = self.at(&event.name);
            if !seen.insert(&event.name) {
                self.diagnostics
                    .report(DiagnosticKind::DuplicateMember, loc)
                    .message(&event.name)
                    .emit();
                continue;
            }
            let errors_before = self.diagnostics.error_count();

            if !event.name.starts_with("Event") {
                self.diagnostics
                    .report(DiagnosticKind::RemotePrefix, loc.clone())
                    .message(format!(
                        "[SyncEvent] `{}` must start with `Event`",
                        event.name
                    ))
                    .emit();
            }
            if !ty.has_field(&event.name) {
                self.diagnostics
                    .report(DiagnosticKind::EventNoBackingField, loc.clone())
                    .emit();
            }

            let params = match assembly.resolve(&event.delegate) {
                None => {
                    self.diagnostics
                        .report(DiagnosticKind::UnresolvedType, loc.clone())
                        .message(event.delegate.to_string())
                        .emit();
                    None
                }
                Some(did) => {
                    let delegate = assembly.get(did);
                    if event.delegate.is_generic_instance() || !delegate.generic_params.is_empty() {
                        self.diagnostics
                            .report(DiagnosticKind::EventGeneric, loc.clone())
                            .message(format!("`{}`", event.delegate))
                            .emit();
                        None
                    } else if let Some(invoke) = delegate.method(names::INVOKE) {
                        Some(invoke.params.clone())
                    } else {
                        self.diagnostics
                            .report(DiagnosticKind::DelegateNoInvoke, loc.clone())
                            .message(format!("`{}`", event.delegate))
                            .emit();
                        None
                    }
                }
            };
            if let Some(params) = &params {
                self.check_params(params, false, &loc);
            }

            if let Some(params) = params
                && self.diagnostics.error_count() == errors_before
            {
                events.push(SyncEvent {
                    name: event.name.clone(),
                    delegate: event.delegate.clone(),
                    channel: attr.int("channel").unwrap_or(0) as i32,
                    params,
                });
            }
        }
        events
    }
}
