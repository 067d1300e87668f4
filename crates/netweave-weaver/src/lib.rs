//! Network-replication weaver.
//!
//! Takes an [`Assembly`] whose behaviour types carry synchronization
//! attributes and synthesizes the plumbing the host runtime expects:
//! - `scan` - classify and validate members of one type
//! - `dirty_bits` - assign dirty-bit positions across the inheritance chain
//! - `generate` - accessors, serialization, remote-call stubs, registration
//! - `rewrite` - redirect user call sites to generated members
//! - `hash` - routing ids binding caller stubs to dispatchers
//! - `weaver` - batch driver: fail loud, commit nothing
//!
//! [`Assembly`]: netweave_bytecode::Assembly

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod diagnostics;
pub mod dirty_bits;
pub mod generate;
pub mod hash;
pub mod marshal;
pub mod rewrite;
pub mod scan;
pub mod weaver;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod generate_tests;
#[cfg(test)]
mod hash_tests;
#[cfg(test)]
mod scan_tests;

pub use config::WeaverConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Location, Severity};
pub use marshal::{MarshalFns, MarshalRegistry, Marshalling};
pub use weaver::{Weaver, Woven};

/// Result type for a weaving stage.
///
/// `Ok` carries the stage output with any warnings it collected; `Err`
/// carries every diagnostic collected once at least one error was found.
pub type StageResult<T> = std::result::Result<(T, Diagnostics), Diagnostics>;

/// Errors that can occur while weaving.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("weaving failed with {} errors", .0.error_count())]
    WeaveFailed(Diagnostics),

    #[error(transparent)]
    Container(#[from] netweave_bytecode::ContainerError),
}

/// Result type for weaver operations.
pub type Result<T> = std::result::Result<T, Error>;
