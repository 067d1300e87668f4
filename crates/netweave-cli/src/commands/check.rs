use std::path::PathBuf;

use netweave_weaver::{MarshalRegistry, Weaver, WeaverConfig};

use super::run_common::{fails, load_or_exit, report};

pub struct CheckArgs {
    pub input: PathBuf,
    pub config: WeaverConfig,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let assembly = load_or_exit(&args.input);
    let registry = MarshalRegistry::standard();
    let diagnostics = Weaver::new(&registry)
        .with_config(args.config)
        .check(&assembly);

    report(&diagnostics, args.color);
    if fails(&diagnostics, args.strict) {
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}
