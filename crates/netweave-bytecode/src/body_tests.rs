use netweave_core::{TypeRef, names};

use crate::{BodyBuilder, FieldRef, Instr, Label, MethodBody};

#[test]
fn labels_are_fresh_after_extend() {
    let mut b = BodyBuilder::new();
    let skip = b.label();
    b.ld_arg(1).br_false(skip).ret().mark(skip).ret();
    let body = b.finish();
    assert_eq!(body.max_label(), Some(0));

    let mut b = BodyBuilder::extend(body);
    assert_eq!(b.label(), Label(1));
}

#[test]
fn strip_ret_only_removes_terminator() {
    let mut body = MethodBody::new();
    body.instructions = vec![Instr::Nop, Instr::Ret];
    assert!(body.strip_ret());
    assert_eq!(body.instructions, vec![Instr::Nop]);
    assert!(!body.strip_ret());
}

#[test]
fn locals_are_indexed_in_declaration_order() {
    let mut b = BodyBuilder::new();
    assert_eq!(b.local(TypeRef::named(names::BOOLEAN)), 0);
    assert_eq!(b.local(TypeRef::named(names::INT32)), 1);
    assert_eq!(b.finish().locals.len(), 2);
}

#[test]
fn stores_field_matches_owner_and_name() {
    let field = FieldRef::new("Player", "items");
    let mut b = BodyBuilder::new();
    b.ld_arg(0).emit(Instr::LdNull).st_fld(field.clone()).ret();
    let body = b.finish();

    assert!(body.stores_field(&field));
    assert!(!body.stores_field(&FieldRef::new("Other", "items")));
}
