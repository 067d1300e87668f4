use netweave_core::{TypeRef, names};

use crate::{Assembly, FieldDescriptor, MethodDescriptor, TypeDescriptor};

fn game() -> Assembly {
    let mut asm = Assembly::new("Game");
    asm.add_type(TypeDescriptor::new("Unit", "Game").with_base(names::NETWORK_BEHAVIOUR));
    asm.add_type(
        TypeDescriptor::new("Tank", "Game")
            .with_base("Unit")
            .with_field(FieldDescriptor::new("armor", names::INT32)),
    );
    asm
}

#[test]
fn base_chain_walks_to_root() {
    let asm = game();
    let tank = asm.find("Tank").unwrap();
    let chain: Vec<&str> = asm
        .base_chain(tank)
        .into_iter()
        .map(|id| asm.get(id).name.as_str())
        .collect();
    assert_eq!(
        chain,
        [
            "Unit",
            names::NETWORK_BEHAVIOUR,
            names::MONO_BEHAVIOUR,
            names::BEHAVIOUR,
            names::COMPONENT,
            names::ENGINE_OBJECT,
            names::OBJECT,
        ]
    );
    assert!(asm.is_derived_from(tank, names::NETWORK_BEHAVIOUR));
    assert!(asm.is_derived_from(tank, names::COMPONENT));
    assert!(!asm.is_derived_from(tank, "Tank"));
    assert!(asm.is_assignable_to(tank, "Tank"));
}

#[test]
fn cyclic_bases_terminate() {
    let mut asm = Assembly::bare("Game");
    let a = asm.add_type(TypeDescriptor::new("A", "Game").with_base("B"));
    asm.add_type(TypeDescriptor::new("B", "Game").with_base("A"));
    assert_eq!(asm.base_chain(a).len(), 1);
}

#[test]
fn main_types_excludes_references() {
    let asm = game();
    let names: Vec<&str> = asm
        .main_types()
        .into_iter()
        .map(|id| asm.get(id).name.as_str())
        .collect();
    assert_eq!(names, ["Unit", "Tank"]);
}

#[test]
fn add_type_replaces_in_place() {
    let mut asm = game();
    let before = asm.find("Unit").unwrap();
    let after = asm.add_type(TypeDescriptor::new("Unit", "Game"));
    assert_eq!(before, after);
    assert!(asm.get(after).base.is_none());
}

#[test]
fn find_method_searches_ancestors() {
    let mut asm = game();
    let unit = asm.find("Unit").unwrap();
    asm.get_mut(unit)
        .methods
        .push(MethodDescriptor::new("Awake"));

    let tank = asm.find("Tank").unwrap();
    let (owner, method) = asm.find_method(tank, "Awake").unwrap();
    assert_eq!(owner, unit);
    assert_eq!(method.return_type, TypeRef::void());
    assert!(asm.find_method(tank, "Missing").is_none());
}
