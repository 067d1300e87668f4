//! Interpreter and simulated host runtime.
//!
//! The VM executes method bodies of an [`Assembly`] instruction by
//! instruction. Members without a body that the host runtime provides
//! (dirty-bit bookkeeping, message sending, stream codecs, registration)
//! are implemented natively, keyed by owner and name.
//!
//! [`Assembly`]: netweave_bytecode::Assembly

mod error;
mod frame;
mod heap;
mod host;
mod runtime;
mod stream;
mod value;
mod vm;

#[cfg(test)]
mod stream_tests;

pub use error::RuntimeError;
pub use heap::{Instance, ListOp, Object, SyncList};
pub use host::{Handler, Host, Role, SendKind, SentMessage};
pub use stream::{Reader, Wire, Writer, pack_u32, unpack_u32};
pub use value::{ObjId, Value};
pub use vm::{FuelLimits, Vm, VmBuilder};
