//! Caller and dispatcher stubs for remote procedures, events and collections.
//!
//! A caller stub checks the local role, frames an outbound message and hands
//! it to the runtime. The dispatcher registered under the same routing id
//! checks the complementary role, unmarshals the arguments in the same order
//! and invokes the real member.

use netweave_bytecode::{
    BodyBuilder, FieldDescriptor, Instr, MessageCategory, MethodDescriptor, MethodRef,
    ParamDescriptor, intrinsics,
};
use netweave_core::{TypeRef, names};

use super::{Generator, naming};
use crate::diagnostics::Diagnostic;
use crate::scan::{RemoteKind, RemoteProcedure, SyncEvent, SyncMember};

/// Which side of the connection a stub must run on.
#[derive(Clone, Copy)]
enum Role {
    Server,
    Client,
}

impl Generator<'_> {
    pub(super) fn remote_calls(&mut self) -> Result<(), Diagnostic> {
        let scanned = self.scanned;
        for procedure in scanned.remotes() {
            self.routing_field(procedure.kind.category(), &procedure.name);
            self.remote_dispatcher(procedure)?;
            self.remote_caller(procedure)?;
        }
        for event in &scanned.events {
            self.routing_field(MessageCategory::SyncEvent, &event.name);
            self.event_dispatcher(event)?;
            self.event_caller(event)?;
        }
        for list in scanned.collections() {
            self.routing_field(MessageCategory::SyncList, &list.name);
            self.list_dispatcher(list);
        }
        Ok(())
    }

    fn routing_field(&mut self, category: MessageCategory, member: &str) {
        self.add_field(
            FieldDescriptor::new(naming::routing_field(category, member), names::INT32).static_(),
        );
    }

    fn remote_dispatcher(&mut self, procedure: &RemoteProcedure) -> Result<(), Diagnostic> {
        let category = procedure.kind.category();
        let mut b = BodyBuilder::new();
        let (role, label) = match procedure.kind {
            RemoteKind::Command => (Role::Server, "Command"),
            RemoteKind::Rpc => (Role::Client, "RPC"),
            RemoteKind::TargetRpc => (Role::Client, "TargetRPC"),
        };
        role_check(&mut b, role, format!("{label} {} called on {}.", procedure.name, role.other()));

        b.ld_arg(0).emit(Instr::CastClass(self.this_ref()));
        if procedure.kind == RemoteKind::TargetRpc {
            b.call(intrinsics::ready_connection());
        }
        self.read_args(&mut b, procedure.wire_params(), &procedure.name)?;
        b.call(self.own_method(&procedure.name)).ret();

        self.add_method(dispatcher(naming::dispatcher(category, &procedure.name), b));
        Ok(())
    }

    fn remote_caller(&mut self, procedure: &RemoteProcedure) -> Result<(), Diagnostic> {
        let category = procedure.kind.category();
        let mut b = BodyBuilder::new();
        let writer = b.local(TypeRef::named(names::NETWORK_WRITER));

        match procedure.kind {
            RemoteKind::Command => {
                self.debug_log(&mut b, format!("Call Command function {}", procedure.name));
                role_check(
                    &mut b,
                    Role::Client,
                    format!("Command function {} called on server.", procedure.name),
                );
                // A host calls straight through.
                let remote = b.label();
                b.ld_arg(0).call(intrinsics::is_server()).br_false(remote).ld_arg(0);
                for i in 0..procedure.params.len() {
                    b.ld_arg(i as u16 + 1);
                }
                b.call(self.own_method(&procedure.name)).ret().mark(remote);
            }
            RemoteKind::Rpc => {
                self.debug_log(&mut b, format!("Call RPC function {}", procedure.name));
                role_check(
                    &mut b,
                    Role::Server,
                    format!("RPC Function {} called on client.", procedure.name),
                );
            }
            RemoteKind::TargetRpc => {
                self.debug_log(&mut b, format!("Call TargetRPC function {}", procedure.name));
                role_check(
                    &mut b,
                    Role::Server,
                    format!("TargetRPC Function {} called on client.", procedure.name),
                );
                let remote = b.label();
                b.ld_arg(1)
                    .emit(Instr::IsInst(TypeRef::named(names::LOCAL_CONNECTION_TO_SERVER)))
                    .br_false(remote)
                    .ld_str(format!(
                        "TargetRPC Function {} called on connection to server",
                        procedure.name
                    ))
                    .call(intrinsics::log_error())
                    .ret()
                    .mark(remote);
            }
        }

        self.write_header(&mut b, writer, category, &procedure.name);
        let skip = usize::from(procedure.kind == RemoteKind::TargetRpc);
        self.write_args(&mut b, writer, &procedure.params, skip, &procedure.name)?;

        let send = match procedure.kind {
            RemoteKind::Command => intrinsics::send_command(),
            RemoteKind::Rpc => intrinsics::send_rpc(),
            RemoteKind::TargetRpc => intrinsics::send_target_rpc(),
        };
        b.ld_arg(0);
        if procedure.kind == RemoteKind::TargetRpc {
            b.ld_arg(1);
        }
        b.ld_loc(writer)
            .ldc_i4(procedure.channel)
            .ld_str(&procedure.name)
            .call(send)
            .ret();

        self.add_method(caller(&procedure.name, &procedure.params, b));
        Ok(())
    }

    fn event_dispatcher(&mut self, event: &SyncEvent) -> Result<(), Diagnostic> {
        let mut b = BodyBuilder::new();
        role_check(
            &mut b,
            Role::Client,
            format!("Event {} called on server.", event.name),
        );

        // No subscribers, nothing to do.
        let subscribed = b.label();
        b.ld_arg(0)
            .emit(Instr::CastClass(self.this_ref()))
            .ld_fld(self.own_field(&event.name))
            .br_true(subscribed)
            .ret()
            .mark(subscribed);

        b.ld_arg(0)
            .emit(Instr::CastClass(self.this_ref()))
            .ld_fld(self.own_field(&event.name));
        self.read_args(&mut b, &event.params, &event.name)?;
        b.call_virt(MethodRef::new(&event.delegate.name, names::INVOKE))
            .ret();

        self.add_method(dispatcher(
            naming::dispatcher(MessageCategory::SyncEvent, &event.name),
            b,
        ));
        Ok(())
    }

    fn event_caller(&mut self, event: &SyncEvent) -> Result<(), Diagnostic> {
        let mut b = BodyBuilder::new();
        let writer = b.local(TypeRef::named(names::NETWORK_WRITER));
        self.debug_log(&mut b, format!("Call Event function {}", event.name));
        role_check(
            &mut b,
            Role::Server,
            format!("Event {} called on client.", event.name),
        );

        self.write_header(&mut b, writer, MessageCategory::SyncEvent, &event.name);
        self.write_args(&mut b, writer, &event.params, 0, &event.name)?;
        b.ld_arg(0)
            .ld_loc(writer)
            .ldc_i4(event.channel)
            .ld_str(&event.name)
            .call(intrinsics::send_event())
            .ret();

        self.add_method(caller(&event.name, &event.params, b));
        Ok(())
    }

    fn list_dispatcher(&mut self, list: &SyncMember) {
        let mut b = BodyBuilder::new();
        role_check(
            &mut b,
            Role::Client,
            format!("SyncList {} called on server.", list.name),
        );
        b.ld_arg(0)
            .emit(Instr::CastClass(self.this_ref()))
            .ld_fld(self.own_field(&list.name))
            .ld_arg(1)
            .call_virt(intrinsics::sync_list_handle_msg())
            .ret();
        self.add_method(dispatcher(
            naming::dispatcher(MessageCategory::SyncList, &list.name),
            b,
        ));
    }

    /// `[size: i16 = 0][tag: i16][routing id: packed][sender identity]`
    fn write_header(&self, b: &mut BodyBuilder, writer: u16, category: MessageCategory, member: &str) {
        b.emit(Instr::NewObj(intrinsics::writer_ctor()))
            .st_loc(writer)
            .ld_loc(writer)
            .ldc_i4(0)
            .call(intrinsics::write_int16())
            .ld_loc(writer)
            .ldc_i4(i32::from(category.tag()))
            .call(intrinsics::write_int16())
            .ld_loc(writer)
            .ld_sfld(self.own_field(&naming::routing_field(category, member)))
            .call(intrinsics::write_packed_u32())
            .ld_loc(writer)
            .ld_arg(0)
            .call(intrinsics::net_id())
            .call(intrinsics::write_instance_id());
    }

    /// Marshal the caller's own arguments from `skip` on.
    fn write_args(
        &self,
        b: &mut BodyBuilder,
        writer: u16,
        params: &[ParamDescriptor],
        skip: usize,
        member: &str,
    ) -> Result<(), Diagnostic> {
        for (i, param) in params.iter().enumerate().skip(skip) {
            let fns = self.marshal(&param.ty, member)?;
            b.ld_loc(writer).ld_arg(i as u16 + 1).call(fns.write);
        }
        Ok(())
    }

    /// Push each argument read from the dispatcher's reader (argument 1).
    fn read_args(
        &self,
        b: &mut BodyBuilder,
        params: &[ParamDescriptor],
        member: &str,
    ) -> Result<(), Diagnostic> {
        for param in params {
            let fns = self.marshal(&param.ty, member)?;
            b.ld_arg(1).call(fns.read);
        }
        Ok(())
    }
}

impl Role {
    fn other(self) -> &'static str {
        match self {
            Role::Server => "client",
            Role::Client => "server",
        }
    }
}

/// Log `message` and return unless the local peer has `role`.
fn role_check(b: &mut BodyBuilder, role: Role, message: String) {
    let active = match role {
        Role::Server => intrinsics::server_active(),
        Role::Client => intrinsics::client_active(),
    };
    let ok = b.label();
    b.call(active)
        .br_true(ok)
        .ld_str(message)
        .call(intrinsics::log_error())
        .ret()
        .mark(ok);
}

/// `static void Invoke*(NetworkBehaviour obj, NetworkReader reader)`
fn dispatcher(name: String, b: BodyBuilder) -> MethodDescriptor {
    MethodDescriptor::new(name)
        .with_param("obj", names::NETWORK_BEHAVIOUR)
        .with_param("reader", names::NETWORK_READER)
        .static_()
        .with_body(b.finish())
}

fn caller(member: &str, params: &[ParamDescriptor], b: BodyBuilder) -> MethodDescriptor {
    let mut method = MethodDescriptor::new(naming::caller(member)).with_body(b.finish());
    method.params = params
        .iter()
        .map(|p| ParamDescriptor::new(&p.name, p.ty.clone()))
        .collect();
    method
}
