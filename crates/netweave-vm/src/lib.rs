//! Reference runtime for woven assemblies.
//!
//! Interprets generated method bodies against a simulated host: role flags,
//! a log sink, outbound messages, the routing-id handler table and the
//! local object table. Two VMs sharing one assembly stand in for a server
//! and a client exchanging messages.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

pub use engine::{
    FuelLimits, Handler, Host, ListOp, ObjId, Object, Role, RuntimeError, SendKind, SentMessage,
    Value, Vm, VmBuilder,
};
