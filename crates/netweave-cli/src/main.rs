#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod cli;
mod commands;

use cli::{CheckParams, DumpParams, HashParams, WeaveParams, build_cli, init_logging};

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("weave", m)) => {
            let params = WeaveParams::from_matches(m);
            commands::weave::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("hash", m)) => {
            let params = HashParams::from_matches(m);
            commands::hash::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
