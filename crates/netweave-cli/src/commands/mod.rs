pub mod check;
pub mod dump;
pub mod hash;
pub mod run_common;
pub mod weave;
