//! Fixture builders for behaviour types.

use netweave_bytecode::{
    Assembly, BodyBuilder, EventDescriptor, FieldDescriptor, MethodBody, MethodDescriptor,
    TypeDescriptor,
};
use netweave_core::{Attribute, names};

use crate::{Diagnostics, Error, MarshalRegistry, Weaver, WeaverConfig, Woven};

/// Main module of fixture assemblies.
pub const GAME: &str = "Game";

pub fn ret_body() -> MethodBody {
    let mut b = BodyBuilder::new();
    b.ret();
    b.finish()
}

/// Instance method returning nothing, with `(name, type)` parameters.
pub fn void_method(name: &str, params: &[(&str, &str)]) -> MethodDescriptor {
    params
        .iter()
        .fold(MethodDescriptor::new(name), |m, (p, ty)| m.with_param(*p, *ty))
        .with_body(ret_body())
}

/// Delegate type whose `Invoke` takes `params`.
pub fn delegate(name: &str, params: &[(&str, &str)]) -> TypeDescriptor {
    let mut invoke = void_method(names::INVOKE, params).virtual_();
    invoke.body = None;
    TypeDescriptor::new(name, GAME)
        .with_base(names::MULTICAST_DELEGATE)
        .with_method(invoke)
}

/// Builds a type deriving from the behaviour root with an instance constructor.
pub struct BehaviourBuilder {
    ty: TypeDescriptor,
}

impl BehaviourBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            ty: TypeDescriptor::new(name, GAME)
                .with_base(names::NETWORK_BEHAVIOUR)
                .with_method(MethodDescriptor::new(names::CTOR).with_body(ret_body())),
        }
    }

    /// A class outside the behaviour hierarchy.
    pub fn plain(name: &str) -> Self {
        let mut builder = Self::new(name);
        builder.ty.base = Some(names::OBJECT.into());
        builder
    }

    pub fn base(mut self, base: &str) -> Self {
        self.ty.base = Some(base.into());
        self
    }

    pub fn without_ctor(mut self) -> Self {
        self.ty.methods.retain(|m| m.name != names::CTOR);
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.ty.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.ty.methods.push(method);
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.ty.attributes.push(attribute);
        self
    }

    pub fn sync_var(self, name: &str, ty: &str) -> Self {
        self.field(
            FieldDescriptor::new(name, ty).with_attribute(Attribute::new(names::SYNC_VAR_ATTR)),
        )
    }

    /// Synchronized field plus a matching `hook(ty value)` method.
    pub fn sync_var_hooked(self, name: &str, ty: &str, hook: &str) -> Self {
        self.field(
            FieldDescriptor::new(name, ty)
                .with_attribute(Attribute::new(names::SYNC_VAR_ATTR).with_arg("hook", hook)),
        )
        .method(void_method(hook, &[("value", ty)]))
    }

    pub fn sync_list(self, name: &str, list: &str) -> Self {
        self.field(FieldDescriptor::new(name, list))
    }

    pub fn command(self, method: MethodDescriptor) -> Self {
        self.method(method.with_attribute(Attribute::new(names::COMMAND_ATTR)))
    }

    pub fn rpc(self, method: MethodDescriptor) -> Self {
        self.method(method.with_attribute(Attribute::new(names::CLIENT_RPC_ATTR)))
    }

    pub fn target_rpc(self, method: MethodDescriptor) -> Self {
        self.method(method.with_attribute(Attribute::new(names::TARGET_RPC_ATTR)))
    }

    /// `[SyncEvent]` event with its backing delegate field.
    pub fn event(self, name: &str, delegate: &str) -> Self {
        let mut builder = self.field(FieldDescriptor::new(name, delegate));
        builder.ty.events.push(
            EventDescriptor::new(name, delegate)
                .with_attribute(Attribute::new(names::SYNC_EVENT_ATTR)),
        );
        builder
    }

    pub fn build(self) -> TypeDescriptor {
        self.ty
    }
}

/// Fixture assembly with the reference declarations and `types`.
pub fn game(types: impl IntoIterator<Item = TypeDescriptor>) -> Assembly {
    let mut assembly = Assembly::new(GAME);
    for ty in types {
        assembly.add_type(ty);
    }
    assembly
}

pub fn weave_with(assembly: Assembly, config: WeaverConfig) -> crate::Result<Woven> {
    let registry = MarshalRegistry::standard();
    Weaver::new(&registry).with_config(config).weave(assembly)
}

pub fn weave_ok(assembly: Assembly) -> Woven {
    match weave_with(assembly, WeaverConfig::default()) {
        Ok(woven) => woven,
        Err(Error::WeaveFailed(diagnostics)) => panic!("weave failed:\n{}", diagnostics.render()),
        Err(e) => panic!("weave failed: {e}"),
    }
}

pub fn weave_err(assembly: Assembly) -> Diagnostics {
    match weave_with(assembly, WeaverConfig::default()) {
        Ok(_) => panic!("weave unexpectedly succeeded"),
        Err(Error::WeaveFailed(diagnostics)) => diagnostics,
        Err(e) => panic!("unexpected error: {e}"),
    }
}
