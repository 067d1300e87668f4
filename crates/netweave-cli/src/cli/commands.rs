//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("netweave")
        .about("Network-replication weaver for behaviour containers")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(check_command())
        .subcommand(weave_command())
        .subcommand(dump_command())
        .subcommand(hash_command())
}

/// Validate a container without writing anything.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate behaviour types and report diagnostics")
        .override_usage("  netweave check <IN> [--strict]")
        .after_help(
            r#"EXAMPLES:
  netweave check game.json            # report errors and warnings
  netweave check game.nwv --strict    # warnings fail too"#,
        )
        .arg(input_arg())
        .arg(module_arg())
        .arg(allow_module_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Weave a container and write the result.
pub fn weave_command() -> Command {
    Command::new("weave")
        .about("Weave a container; writes nothing if any error is reported")
        .override_usage("  netweave weave <IN> -o <OUT> [--format json|bin]")
        .after_help(
            r#"EXAMPLES:
  netweave weave game.json -o game.nwv           # binary output
  netweave weave game.json -o woven.json         # JSON output
  netweave weave game.nwv -o out --format json   # explicit format
  netweave weave game.json -o game.nwv --debug-logs"#,
        )
        .arg(input_arg())
        .arg(output_arg())
        .arg(format_arg())
        .arg(module_arg())
        .arg(allow_module_arg())
        .arg(debug_logs_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Print types with method bodies.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Print types and method bodies of a container")
        .override_usage("  netweave dump <IN> [--type <TYPE>] [--woven]")
        .after_help(
            r#"EXAMPLES:
  netweave dump game.nwv                         # every main-module type
  netweave dump game.json --type Game.Player     # one type
  netweave dump game.json --woven                # after weaving"#,
        )
        .arg(input_arg())
        .arg(type_filter_arg())
        .arg(woven_arg())
        .arg(debug_logs_arg())
        .arg(color_arg())
}

/// Print the routing id of one member.
pub fn hash_command() -> Command {
    Command::new("hash")
        .about("Print the routing id of a member")
        .override_usage("  netweave hash <TYPE> <KIND> <MEMBER>")
        .after_help(
            r#"EXAMPLES:
  netweave hash Player Cmd CmdJump
  netweave hash Player List Items"#,
        )
        .arg(hash_type_arg())
        .arg(hash_kind_arg())
        .arg(hash_member_arg())
}
