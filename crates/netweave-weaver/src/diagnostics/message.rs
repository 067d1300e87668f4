use std::fmt;

/// Diagnostic kinds, grouped by the declaration they concern.
///
/// Every error kind is a structural violation: the input declares something
/// the weaver cannot generate plumbing for. Warnings do not block output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Type level
    GenericBehaviour,
    NetworkMemberOutsideBehaviour,
    NetworkSettingsConflict,
    UnresolvedType,

    // Synchronized fields and collections
    SyncVarStatic,
    SyncVarGeneric,
    SyncVarArray,
    SyncVarInterface,
    SyncVarBehaviour,
    SyncVarScriptableObject,
    SyncVarCrossModule,
    SyncListStatic,
    RawSyncListBase,
    SyncListAsSyncVar,
    DirtyBitBudget,

    // Hooks
    HookNotFound,
    HookArity,
    HookParamType,

    // Remote procedures and events
    DuplicateMember,
    RemotePrefix,
    RemoteGeneric,
    RemoteNotVoid,
    RemoteCoroutine,
    RemoteStatic,
    ParamOut,
    ParamOptional,
    ParamByRef,
    ParamAbstract,
    ParamComponent,
    ParamConnection,
    TargetRpcConnection,
    EventGeneric,
    EventNoBackingField,
    DelegateNoInvoke,

    // Generation
    NoMarshalFunction,
    MissingConstructor,
    MalformedTerminator,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::SyncListAsSyncVar => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::RawSyncListBase => {
                Some("declare a subclass, e.g. `class SyncListItem : SyncListStruct<Item>`")
            }
            Self::DirtyBitBudget => Some("at most 32 synchronized members per inheritance chain"),
            Self::SyncVarCrossModule => {
                Some("declare the type in this module or use a runtime/standard type")
            }
            Self::NoMarshalFunction => Some("register a marshalling function for the type"),
            Self::TargetRpcConnection => Some("e.g. `TargetHit(NetworkConnection target, ...)`"),
            _ => None,
        }
    }

    /// Base message for this kind, used when no custom detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::GenericBehaviour => "behaviour types cannot have generic parameters",
            Self::NetworkMemberOutsideBehaviour => {
                "network attributes are only valid inside a NetworkBehaviour"
            }
            Self::NetworkSettingsConflict => "member is generated from [NetworkSettings]",
            Self::UnresolvedType => "type could not be resolved",

            Self::SyncVarStatic => "[SyncVar] field cannot be static",
            Self::SyncVarGeneric => "[SyncVar] field cannot have a generic type",
            Self::SyncVarArray => "[SyncVar] field cannot be an array",
            Self::SyncVarInterface => "[SyncVar] field cannot have an interface type",
            Self::SyncVarBehaviour => "[SyncVar] field cannot hold a NetworkBehaviour",
            Self::SyncVarScriptableObject => "[SyncVar] field cannot hold a ScriptableObject",
            Self::SyncVarCrossModule => "[SyncVar] field type is declared in another module",
            Self::SyncListStatic => "synchronized collection cannot be static",
            Self::RawSyncListBase => "collection base type cannot be used directly",
            Self::SyncListAsSyncVar => "collection field is marked [SyncVar]",
            Self::DirtyBitBudget => "too many synchronized members",

            Self::HookNotFound => "hook method not found",
            Self::HookArity => "hook method must take exactly one parameter",
            Self::HookParamType => "hook parameter type does not match the field",

            Self::DuplicateMember => "duplicate network member",
            Self::RemotePrefix => "network member has the wrong name prefix",
            Self::RemoteGeneric => "remote procedure cannot have generic parameters",
            Self::RemoteNotVoid => "remote procedure must return void",
            Self::RemoteCoroutine => "remote procedure cannot be a coroutine",
            Self::RemoteStatic => "remote procedure cannot be static",
            Self::ParamOut => "parameter cannot be `out`",
            Self::ParamOptional => "parameter cannot be optional",
            Self::ParamByRef => "parameter cannot be passed by reference",
            Self::ParamAbstract => "parameter cannot have an abstract type",
            Self::ParamComponent => "parameter cannot be a component",
            Self::ParamConnection => "NetworkConnection is only valid as the first parameter of a [TargetRpc]",
            Self::TargetRpcConnection => "[TargetRpc] must take a NetworkConnection first",
            Self::EventGeneric => "[SyncEvent] delegate cannot be generic",
            Self::EventNoBackingField => "[SyncEvent] has no backing field",
            Self::DelegateNoInvoke => "delegate type has no Invoke method",

            Self::NoMarshalFunction => "no marshalling function for type",
            Self::MissingConstructor => "no instance constructor to extend",
            Self::MalformedTerminator => "existing body does not end with `ret`",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnresolvedType => "type `{}` could not be resolved".to_string(),
            Self::NetworkSettingsConflict => {
                "`{}` is generated from [NetworkSettings] and must not be declared".to_string()
            }
            Self::HookNotFound => "hook method `{}` not found".to_string(),
            Self::DuplicateMember => "`{}` is already declared".to_string(),
            Self::RemotePrefix => "{}".to_string(),
            Self::NoMarshalFunction => "no marshalling function for type `{}`".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Declaration a diagnostic points at. Containers carry no source spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub type_name: String,
    pub member: Option<String>,
}

impl Location {
    pub fn ty(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            member: None,
        }
    }

    pub fn member(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            member: Some(member.into()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(m) => write!(f, "{}::{}", self.type_name, m),
            None => f.write_str(&self.type_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) location: Location,
    pub(crate) message: String,
    pub(crate) hints: Vec<String>,
}

impl Diagnostic {
    /// Diagnostic with the kind's default message.
    pub fn new(kind: DiagnosticKind, location: Location) -> Self {
        Self {
            kind,
            location,
            message: kind.fallback_message().to_string(),
            hints: Vec::new(),
        }
    }

    /// Replace the message with the kind's template filled with `detail`.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.message = self.kind.message(Some(&detail));
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.severity(), self.message, self.location)
    }
}
