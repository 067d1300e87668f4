#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compiled representation consumed and produced by the weaver.
//!
//! This crate contains:
//! - Stack-machine instructions and method bodies ([`Instr`], [`MethodBody`], [`BodyBuilder`])
//! - Type and member descriptors held in an [`Assembly`] arena
//! - Reference declarations of the host runtime ([`reference_types`])
//! - Container persistence (JSON and checksummed binary)
//! - Runtime entry points called by generated code ([`intrinsics`])
//! - Human-readable listing ([`dump`])

mod assembly;
mod body;
mod container;
mod descriptor;
mod dump;
mod instr;
pub mod intrinsics;
mod message;
mod reference;

#[cfg(test)]
mod assembly_tests;
#[cfg(test)]
mod body_tests;
#[cfg(test)]
mod dump_tests;

pub use assembly::{Assembly, TypeId};
pub use body::{BodyBuilder, MethodBody};
pub use container::{Container, ContainerError, ContainerFormat, MAGIC, VERSION};
pub use descriptor::{
    EventDescriptor, FieldDescriptor, MethodDescriptor, ParamDescriptor, PropertyDescriptor,
    TypeDescriptor, TypeFlags,
};
pub use dump::{dump_assembly, dump_body, dump_type};
pub use instr::{FieldRef, Instr, Label, MethodRef};
pub use message::MessageCategory;
pub use reference::reference_types;
