//! Routing-id constants and registration code.
//!
//! The static initializer computes every routing id and binds it to its
//! dispatcher, then registers the type itself. Collections are constructed
//! in the instance constructor unless user code already does, and bound to
//! the runtime in `Awake`.

use netweave_bytecode::{Instr, MessageCategory, MethodDescriptor, MethodRef, intrinsics};
use netweave_core::{names, short_name};

use super::{Generator, naming, reopen};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Location};
use crate::hash::routing_id;

impl Generator<'_> {
    pub(super) fn registration(&mut self) -> Result<(), Diagnostic> {
        if !self.scanned.has_routed_members() {
            return Ok(());
        }
        self.static_initializer()?;
        self.constructor()?;
        if self.scanned.collections().next().is_some() {
            self.awake()?;
        }
        Ok(())
    }

    /// Members in registration order, each with its category and runtime hook.
    fn routed(&self) -> Vec<(MessageCategory, &str, MethodRef)> {
        let scanned = self.scanned;
        let mut routed = Vec::new();
        for procedure in scanned.remotes() {
            let register = match procedure.kind.category() {
                MessageCategory::Command => intrinsics::register_command_delegate(),
                _ => intrinsics::register_rpc_delegate(),
            };
            routed.push((procedure.kind.category(), procedure.name.as_str(), register));
        }
        for event in &scanned.events {
            routed.push((
                MessageCategory::SyncEvent,
                event.name.as_str(),
                intrinsics::register_event_delegate(),
            ));
        }
        for list in scanned.collections() {
            routed.push((
                MessageCategory::SyncList,
                list.name.as_str(),
                intrinsics::register_sync_list_delegate(),
            ));
        }
        routed
    }

    fn static_initializer(&mut self) -> Result<(), Diagnostic> {
        let location = Location::member(&self.scanned.name, names::CCTOR);
        let existing = self.this_type().method(names::CCTOR).map(|m| m.body.as_ref());
        let mut b = reopen(existing.flatten(), location)?;

        let type_name = short_name(&self.scanned.name);
        for (category, member, register) in self.routed() {
            let id_field = self.own_field(&naming::routing_field(category, member));
            b.ldc_i4(routing_id(type_name, category.kind(), member))
                .st_sfld(id_field.clone())
                .emit(Instr::LdToken(self.this_ref()))
                .call(intrinsics::type_from_handle())
                .ld_sfld(id_field)
                .emit(Instr::LdNull)
                .emit(Instr::LdFtn(
                    self.own_method(&naming::dispatcher(category, member)),
                ))
                .emit(Instr::NewObj(intrinsics::cmd_delegate_ctor()))
                .call(register);
        }
        b.ld_str(type_name)
            .ldc_i4(self.scanned.settings.channel)
            .call(intrinsics::register_behaviour())
            .ret();
        let body = b.finish();

        let ty = self.this_type_mut();
        ty.flags.before_field_init = false;
        match ty.method_mut(names::CCTOR) {
            Some(cctor) => cctor.body = Some(body),
            None => {
                ty.methods
                    .push(MethodDescriptor::new(names::CCTOR).static_().with_body(body));
                self.added.push(names::CCTOR.to_string());
            }
        }
        Ok(())
    }

    fn constructor(&mut self) -> Result<(), Diagnostic> {
        let location = Location::member(&self.scanned.name, names::CTOR);
        let Some(ctor) = self.this_type().method(names::CTOR) else {
            return Err(Diagnostic::new(DiagnosticKind::MissingConstructor, location));
        };
        let user_body = ctor.body.clone().unwrap_or_default();
        let mut b = reopen(ctor.body.as_ref(), location)?;

        let scanned = self.scanned;
        for list in scanned.collections() {
            let field = self.own_field(&list.name);
            if user_body.stores_field(&field) {
                continue;
            }
            b.ld_arg(0)
                .emit(Instr::NewObj(MethodRef::new(&list.ty.name, names::CTOR)))
                .st_fld(field);
        }
        b.ret();
        let body = b.finish();

        if let Some(ctor) = self.this_type_mut().method_mut(names::CTOR) {
            ctor.body = Some(body);
        }
        Ok(())
    }

    /// Binds each collection to this behaviour and its routing id.
    fn awake(&mut self) -> Result<(), Diagnostic> {
        let location = Location::member(&self.scanned.name, names::AWAKE);
        let existing = self.this_type().method(names::AWAKE);
        let user_defined = existing.is_some();
        let mut b = reopen(existing.and_then(|m| m.body.as_ref()), location)?;

        if !user_defined && let Some(base) = self.base_method(names::AWAKE) {
            b.ld_arg(0).call(base);
        }
        let scanned = self.scanned;
        for list in scanned.collections() {
            b.ld_arg(0)
                .ld_fld(self.own_field(&list.name))
                .ld_arg(0)
                .ld_sfld(self.own_field(&naming::routing_field(
                    MessageCategory::SyncList,
                    &list.name,
                )))
                .call(intrinsics::sync_list_initialize());
        }
        b.ret();
        let body = b.finish();

        let ty = self.this_type_mut();
        match ty.method_mut(names::AWAKE) {
            Some(awake) => awake.body = Some(body),
            None => {
                ty.methods
                    .push(MethodDescriptor::new(names::AWAKE).virtual_().with_body(body));
                self.added.push(names::AWAKE.to_string());
            }
        }
        Ok(())
    }
}
