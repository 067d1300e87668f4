//! Property accessors for synchronized fields.

use netweave_bytecode::{BodyBuilder, FieldDescriptor, MethodDescriptor, PropertyDescriptor, intrinsics};
use netweave_core::names;

use super::{Generator, naming};
use crate::scan::SyncMember;

impl Generator<'_> {
    pub(super) fn accessors(&mut self) {
        let scanned = self.scanned;
        for member in scanned.sync_fields() {
            if let Some(shadow) = member.shadow() {
                self.add_field(FieldDescriptor::new(shadow, names::NETWORK_INSTANCE_ID));
            }
            self.getter(member);
            self.setter(member);

            let property = naming::property(&member.name);
            let ty = self.this_type_mut();
            if !ty.properties.iter().any(|p| p.name == property) {
                ty.properties.push(PropertyDescriptor {
                    name: property,
                    ty: member.ty.clone(),
                    getter: Some(naming::getter(&member.name)),
                    setter: Some(naming::setter(&member.name)),
                });
            }
        }
    }

    fn getter(&mut self, member: &SyncMember) {
        let mut b = BodyBuilder::new();
        b.ld_arg(0).ld_fld(self.own_field(&member.name)).ret();
        self.add_method(
            MethodDescriptor::new(naming::getter(&member.name))
                .returning(member.ty.clone())
                .with_body(b.finish()),
        );
    }

    /// Marks the field dirty through the runtime. A hook runs first, only
    /// while a local client observes the server and only outside another
    /// hook, so a hook that assigns the property does not recurse.
    fn setter(&mut self, member: &SyncMember) {
        let mut b = BodyBuilder::new();

        if let Some(hook) = member.hook() {
            let skip = b.label();
            b.call(intrinsics::local_client_active())
                .br_false(skip)
                .ld_arg(0)
                .call(intrinsics::hook_guard())
                .br_true(skip)
                .ld_arg(0)
                .ldc_i4(1)
                .call(intrinsics::set_hook_guard())
                .ld_arg(0)
                .ld_arg(1)
                .call(self.own_method(hook))
                .ld_arg(0)
                .ldc_i4(0)
                .call(intrinsics::set_hook_guard())
                .mark(skip);
        }

        b.ld_arg(0)
            .ld_arg(1)
            .ld_arg(0)
            .ld_flda(self.own_field(&member.name))
            .ldc_i4(member.mask());
        match member.shadow() {
            Some(shadow) => {
                b.ld_arg(0)
                    .ld_flda(self.own_field(shadow))
                    .call(intrinsics::set_sync_var_game_object());
            }
            None => {
                b.call(intrinsics::set_sync_var(&member.ty));
            }
        }
        b.ret();

        self.add_method(
            MethodDescriptor::new(naming::setter(&member.name))
                .with_param("value", member.ty.clone())
                .with_body(b.finish()),
        );
    }
}
