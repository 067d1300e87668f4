#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the netweave crates.
//!
//! - [`TypeRef`]: by-name reference to a declared type, possibly generic or array
//! - [`Attribute`]: custom attribute attached to a declaration
//! - [`names`]: well-known type, module and member names of the host runtime
//! - [`Colors`]: terminal palette used by dumps and diagnostics

mod attribute;
mod colors;
pub mod names;
mod type_ref;


pub use attribute::{AttrValue, Attribute};
pub use colors::Colors;
pub use type_ref::{TypeRef, short_name};
