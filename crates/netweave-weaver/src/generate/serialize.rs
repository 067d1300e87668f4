//! `OnSerialize` / `OnDeserialize`.
//!
//! Both walk the synchronized members in declaration order; the reader must
//! consume exactly what the writer produced. A delta write carries one
//! packed dirty mask, placed immediately before the first dirty payload or,
//! when nothing is dirty, alone.

use netweave_bytecode::{BodyBuilder, Instr, MethodBody, MethodDescriptor, intrinsics};
use netweave_core::{TypeRef, names};

use super::Generator;
use crate::diagnostics::Diagnostic;
use crate::scan::SyncMember;

impl Generator<'_> {
    pub(super) fn serializers(&mut self) -> Result<(), Diagnostic> {
        if !self.has_method(names::ON_SERIALIZE) {
            let body = self.serialize_body()?;
            self.add_method(
                MethodDescriptor::new(names::ON_SERIALIZE)
                    .with_param("writer", names::NETWORK_WRITER)
                    .with_param("forceAll", names::BOOLEAN)
                    .returning(names::BOOLEAN)
                    .virtual_()
                    .with_body(body),
            );
        }
        if !self.has_method(names::ON_DESERIALIZE) {
            let body = self.deserialize_body()?;
            self.add_method(
                MethodDescriptor::new(names::ON_DESERIALIZE)
                    .with_param("reader", names::NETWORK_READER)
                    .with_param("initialState", names::BOOLEAN)
                    .virtual_()
                    .with_body(body),
            );
        }
        Ok(())
    }

    fn serialize_body(&self) -> Result<MethodBody, Diagnostic> {
        let scanned = self.scanned;
        let mut b = BodyBuilder::new();
        let written = b.local(TypeRef::named(names::BOOLEAN));
        self.debug_log(&mut b, format!("Injected Serialize {}", scanned.name));

        let base_written = self.base_method(names::ON_SERIALIZE).map(|base| {
            let slot = b.local(TypeRef::named(names::BOOLEAN));
            b.ld_arg(0).ld_arg(1).ld_arg(2).call(base).st_loc(slot);
            slot
        });
        let finish = |b: &mut BodyBuilder| {
            b.ld_loc(written);
            if let Some(slot) = base_written {
                b.ld_loc(slot).emit(Instr::Or);
            }
            b.ret();
        };

        if scanned.members.is_empty() {
            finish(&mut b);
            return Ok(b.finish());
        }
        let own_mask = scanned.own_mask();

        let delta = b.label();
        b.ld_arg(2).br_false(delta);
        for member in &scanned.members {
            self.write_member(&mut b, member)?;
        }
        b.ld_arg(0)
            .ldc_i4(own_mask)
            .call(intrinsics::clear_dirty_bits())
            .ldc_i4(1)
            .ret();

        b.mark(delta);
        for member in &scanned.members {
            let clean = b.label();
            b.ld_arg(0)
                .call(intrinsics::dirty_bits())
                .ldc_i4(member.mask())
                .emit(Instr::And)
                .br_false(clean);
            write_mask_once(&mut b, written, own_mask, true);
            self.write_member(&mut b, member)?;
            b.mark(clean);
        }
        // Only writes when no member was dirty.
        write_mask_once(&mut b, written, own_mask, false);
        b.ld_arg(0)
            .ldc_i4(own_mask)
            .call(intrinsics::clear_dirty_bits());
        finish(&mut b);
        Ok(b.finish())
    }

    fn write_member(&self, b: &mut BodyBuilder, member: &SyncMember) -> Result<(), Diagnostic> {
        let write = if member.is_collection() {
            intrinsics::write_sync_list()
        } else {
            self.marshal(&member.ty, &member.name)?.write
        };
        b.ld_arg(1)
            .ld_arg(0)
            .ld_fld(self.own_field(&member.name))
            .call(write);
        Ok(())
    }

    fn deserialize_body(&self) -> Result<MethodBody, Diagnostic> {
        let scanned = self.scanned;
        let mut b = BodyBuilder::new();
        self.debug_log(&mut b, format!("Injected Deserialize {}", scanned.name));
        if let Some(base) = self.base_method(names::ON_DESERIALIZE) {
            b.ld_arg(0).ld_arg(1).ld_arg(2).call(base);
        }
        if scanned.members.is_empty() {
            b.ret();
            return Ok(b.finish());
        }

        let dirty = b.local(TypeRef::named(names::INT32));
        let delta = b.label();
        b.ld_arg(2).br_false(delta);
        for member in &scanned.members {
            self.read_member(&mut b, member, false)?;
        }
        b.ret();

        b.mark(delta);
        b.ld_arg(1)
            .call(intrinsics::read_packed_u32())
            .st_loc(dirty);
        for member in &scanned.members {
            let clean = b.label();
            b.ld_loc(dirty)
                .ldc_i4(member.mask())
                .emit(Instr::And)
                .br_false(clean);
            self.read_member(&mut b, member, true)?;
            b.mark(clean);
        }
        b.ret();
        Ok(b.finish())
    }

    /// Entity references land in their shadow id, resolved later. On a delta
    /// read a hook receives the value instead of the field.
    fn read_member(
        &self,
        b: &mut BodyBuilder,
        member: &SyncMember,
        delta: bool,
    ) -> Result<(), Diagnostic> {
        let field = self.own_field(&member.name);
        if member.is_collection() {
            b.ld_arg(1)
                .ld_arg(0)
                .ld_fld(field)
                .call(intrinsics::read_sync_list_into());
            return Ok(());
        }
        let hook = member.hook().filter(|_| delta).map(|h| self.own_method(h));

        if let Some(shadow) = member.shadow() {
            let shadow = self.own_field(shadow);
            b.ld_arg(0)
                .ld_arg(1)
                .call(intrinsics::read_instance_id())
                .st_fld(shadow.clone());
            if let Some(hook) = hook {
                b.ld_arg(0)
                    .ld_arg(0)
                    .ld_fld(shadow)
                    .call(intrinsics::find_local_object())
                    .call(hook);
            }
            return Ok(());
        }

        let read = self.marshal(&member.ty, &member.name)?.read;
        b.ld_arg(0).ld_arg(1).call(read);
        match hook {
            Some(hook) => b.call(hook),
            None => b.st_fld(field),
        };
        Ok(())
    }
}

/// `if (!written) { writer.WritePackedUInt32(dirty & own); [written = true;] }`
fn write_mask_once(b: &mut BodyBuilder, written: u16, own_mask: i32, set: bool) {
    let skip = b.label();
    b.ld_loc(written)
        .br_true(skip)
        .ld_arg(1)
        .ld_arg(0)
        .call(intrinsics::dirty_bits())
        .ldc_i4(own_mask)
        .emit(Instr::And)
        .call(intrinsics::write_packed_u32());
    if set {
        b.ldc_i4(1).st_loc(written);
    }
    b.mark(skip);
}
