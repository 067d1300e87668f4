//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Input container (positional, required).
pub fn input_arg() -> Arg {
    Arg::new("input")
        .value_name("IN")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Container to read (.json is JSON, anything else binary)")
}

/// Write output to file (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("OUT")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Where to write the woven container")
}

/// Output container format (--format).
pub fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .value_name("FORMAT")
        .value_parser(["json", "bin"])
        .help("Output format (inferred from the output extension if not specified)")
}

/// Override the main module (--module).
pub fn module_arg() -> Arg {
    Arg::new("module")
        .long("module")
        .value_name("NAME")
        .help("Main module name (defaults to the container's)")
}

/// Extra field-type modules (--allow-module).
pub fn allow_module_arg() -> Arg {
    Arg::new("allow_module")
        .long("allow-module")
        .value_name("NAME")
        .action(ArgAction::Append)
        .help("Also accept synchronized field types from this module (repeatable)")
}

/// Inject runtime trace logs (--debug-logs).
pub fn debug_logs_arg() -> Arg {
    Arg::new("debug_logs")
        .long("debug-logs")
        .action(ArgAction::SetTrue)
        .help("Generated serializers and caller stubs log when entered")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Restrict a dump to one type (--type).
pub fn type_filter_arg() -> Arg {
    Arg::new("type")
        .short('t')
        .long("type")
        .value_name("TYPE")
        .help("Only dump this type")
}

/// Weave before dumping (--woven).
pub fn woven_arg() -> Arg {
    Arg::new("woven")
        .long("woven")
        .action(ArgAction::SetTrue)
        .help("Weave the container first and dump the result")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .global(true)
        .action(ArgAction::Count)
        .help("Log more (-v for info, -vv for debug); RUST_LOG overrides")
}

/// Declaring type name for `hash` (positional).
pub fn hash_type_arg() -> Arg {
    Arg::new("type_name")
        .value_name("TYPE")
        .required(true)
        .help("Declaring type name, without namespace")
}

/// Member kind for `hash` (positional).
pub fn hash_kind_arg() -> Arg {
    Arg::new("kind")
        .value_name("KIND")
        .required(true)
        .value_parser(["Cmd", "Rpc", "TargetRpc", "Event", "List"])
        .help("Member kind")
}

/// Member name for `hash` (positional).
pub fn hash_member_arg() -> Arg {
    Arg::new("member")
        .value_name("MEMBER")
        .required(true)
        .help("Member name")
}
