//! Method-body synthesizers.
//!
//! One [`Generator`] runs per scanned type and appends members in a fixed
//! order: accessors, serializers, remote-call stubs, registration, network
//! settings and the weave marker. A member whose name the type already
//! declares is left alone, so a partially woven type is completed rather
//! than doubled.

mod accessors;
pub mod naming;
mod registration;
mod remote;
mod serialize;
mod settings;

use netweave_bytecode::{
    Assembly, BodyBuilder, FieldDescriptor, FieldRef, MethodBody, MethodDescriptor, MethodRef,
    TypeDescriptor, intrinsics,
};
use netweave_core::{TypeRef, names};

use crate::config::WeaverConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Location};
use crate::marshal::{MarshalFns, Marshalling};
use crate::scan::ScannedType;

/// Appends generated members to one scanned type.
pub struct Generator<'a> {
    assembly: &'a mut Assembly,
    scanned: &'a ScannedType,
    marshalling: &'a dyn Marshalling,
    config: &'a WeaverConfig,
    added: Vec<String>,
}

impl<'a> Generator<'a> {
    pub fn new(
        assembly: &'a mut Assembly,
        scanned: &'a ScannedType,
        marshalling: &'a dyn Marshalling,
        config: &'a WeaverConfig,
    ) -> Self {
        Self {
            assembly,
            scanned,
            marshalling,
            config,
            added: Vec::new(),
        }
    }

    /// Run every generator, stopping at the first violation.
    ///
    /// Returns the names of the methods added to the type.
    pub fn run(mut self) -> Result<Vec<String>, Diagnostic> {
        self.accessors();
        self.serializers()?;
        self.remote_calls()?;
        self.registration()?;
        self.network_settings();
        self.pre_start_client();
        self.marker();
        Ok(self.added)
    }

    fn this_type(&self) -> &TypeDescriptor {
        self.assembly.get(self.scanned.id)
    }

    fn this_type_mut(&mut self) -> &mut TypeDescriptor {
        self.assembly.get_mut(self.scanned.id)
    }

    fn this_ref(&self) -> TypeRef {
        TypeRef::named(&self.scanned.name)
    }

    fn own_field(&self, name: &str) -> FieldRef {
        FieldRef::new(&self.scanned.name, name)
    }

    fn own_method(&self, name: &str) -> MethodRef {
        MethodRef::new(&self.scanned.name, name)
    }

    fn has_method(&self, name: &str) -> bool {
        let present = self.this_type().has_method(name);
        if present {
            log::debug!("{}: `{name}` already present, skipped", self.scanned.name);
        }
        present
    }

    fn add_method(&mut self, method: MethodDescriptor) {
        if self.has_method(&method.name) {
            return;
        }
        log::debug!("{}: generated `{}`", self.scanned.name, method.name);
        self.added.push(method.name.clone());
        self.this_type_mut().methods.push(method);
    }

    fn add_field(&mut self, field: FieldDescriptor) {
        if self.this_type().has_field(&field.name) {
            log::debug!("{}: field `{}` already present, skipped", self.scanned.name, field.name);
            return;
        }
        self.this_type_mut().fields.push(field);
    }

    fn marshal(&self, ty: &TypeRef, member: &str) -> Result<MarshalFns, Diagnostic> {
        self.marshalling.lookup(ty).cloned().ok_or_else(|| {
            Diagnostic::new(
                DiagnosticKind::NoMarshalFunction,
                Location::member(&self.scanned.name, member),
            )
            .message(ty.to_string())
        })
    }

    /// Runtime log line at the top of a generated body, when enabled.
    fn debug_log(&self, b: &mut BodyBuilder, text: String) {
        if self.config.inject_debug_logs {
            b.ld_str(text).call(intrinsics::log_error());
        }
    }

    /// The nearest ancestor implementation of `name` below the behaviour root.
    fn base_method(&self, name: &str) -> Option<MethodRef> {
        let base = self.assembly.base_of(self.scanned.id)?;
        let (owner, _) = self.assembly.find_method(base, name)?;
        let owner = &self.assembly.get(owner).name;
        (owner != names::NETWORK_BEHAVIOUR).then(|| MethodRef::new(owner, name))
    }

    fn marker(&mut self) {
        let mut b = BodyBuilder::new();
        b.ret();
        self.add_method(
            MethodDescriptor::new(names::WEAVE_MARKER)
                .static_()
                .with_body(b.finish()),
        );
    }
}

/// Existing body ready for appending: its terminating `ret` removed.
fn reopen(body: Option<&MethodBody>, location: Location) -> Result<BodyBuilder, Diagnostic> {
    let Some(body) = body else {
        return Ok(BodyBuilder::new());
    };
    let mut body = body.clone();
    if !body.is_empty() && !body.strip_ret() {
        return Err(Diagnostic::new(DiagnosticKind::MalformedTerminator, location));
    }
    Ok(BodyBuilder::extend(body))
}
