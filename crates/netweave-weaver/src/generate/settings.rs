//! Network settings overrides and entity-reference resolution.

use netweave_bytecode::{BodyBuilder, Instr, MethodDescriptor, intrinsics};
use netweave_core::names;

use super::Generator;

impl Generator<'_> {
    pub(super) fn network_settings(&mut self) {
        let settings = self.scanned.settings;
        if settings.channel != 0 {
            let mut b = BodyBuilder::new();
            b.ldc_i4(settings.channel).ret();
            self.add_method(
                MethodDescriptor::new(names::GET_NETWORK_CHANNEL)
                    .returning(names::INT32)
                    .virtual_()
                    .with_body(b.finish()),
            );
        }
        if settings.has_custom_send_interval() {
            let mut b = BodyBuilder::new();
            b.emit(Instr::LdcR4(settings.send_interval)).ret();
            self.add_method(
                MethodDescriptor::new(names::GET_NETWORK_SEND_INTERVAL)
                    .returning(names::SINGLE)
                    .virtual_()
                    .with_body(b.finish()),
            );
        }
    }

    /// Resolves each non-empty shadow id to a live object, in declaration order.
    pub(super) fn pre_start_client(&mut self) {
        let scanned = self.scanned;
        let shadowed: Vec<_> = scanned
            .sync_fields()
            .filter_map(|m| m.shadow().map(|s| (m, s)))
            .collect();
        if shadowed.is_empty() {
            return;
        }

        let mut b = BodyBuilder::new();
        for (member, shadow) in shadowed {
            let next = b.label();
            b.ld_arg(0)
                .ld_flda(self.own_field(shadow))
                .call(intrinsics::instance_id_is_empty())
                .br_true(next)
                .ld_arg(0)
                .ld_arg(0)
                .ld_fld(self.own_field(shadow))
                .call(intrinsics::find_local_object())
                .st_fld(self.own_field(&member.name))
                .mark(next);
        }
        b.ret();
        self.add_method(
            MethodDescriptor::new(names::PRE_START_CLIENT)
                .virtual_()
                .with_body(b.finish()),
        );
    }
}
