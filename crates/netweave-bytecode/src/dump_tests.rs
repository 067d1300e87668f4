use netweave_core::{Attribute, Colors, TypeRef, names};

use crate::intrinsics;
use crate::{BodyBuilder, FieldDescriptor, MethodDescriptor, TypeDescriptor, dump_body, dump_type};

#[test]
fn body_listing() {
    let mut b = BodyBuilder::new();
    let skip = b.label();
    b.local(TypeRef::named(names::BOOLEAN));
    b.ld_arg(1)
        .br_false(skip)
        .ld_str("hi")
        .call(intrinsics::log_error())
        .mark(skip)
        .ret();

    insta::assert_snapshot!(dump_body(&b.finish(), Colors::OFF), @r#"
    .locals [0] System.Boolean
        ldarg 1
        brfalse L0
        ldstr "hi"
        call Engine.Debug::LogError
    L0:
        ret
    "#);
}

#[test]
fn type_listing() {
    let mut b = BodyBuilder::new();
    b.ldc_i4(2).ret();
    let ty = TypeDescriptor::new("Player", "Game")
        .with_base(names::NETWORK_BEHAVIOUR)
        .with_field(
            FieldDescriptor::new("health", names::INT32)
                .with_attribute(Attribute::new(names::SYNC_VAR_ATTR).with_arg("hook", "OnHealth")),
        )
        .with_method(
            MethodDescriptor::new("GetNetworkChannel")
                .returning(names::INT32)
                .with_body(b.finish()),
        );

    insta::assert_snapshot!(dump_type(&ty, Colors::OFF), @r#"
    type Player : Net.NetworkBehaviour
      field health: System.Int32 [SyncVar(hook: "OnHealth")]
      method GetNetworkChannel() -> System.Int32
            ldc.i4 2
            ret
    "#);
}
