use std::path::PathBuf;

use netweave_bytecode::{Container, ContainerFormat};
use netweave_weaver::{Error, MarshalRegistry, Weaver, WeaverConfig};

use super::run_common::{fails, load_or_exit, report};

pub struct WeaveArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: ContainerFormat,
    pub config: WeaverConfig,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: WeaveArgs) {
    let assembly = load_or_exit(&args.input);
    let registry = MarshalRegistry::standard();
    let weaver = Weaver::new(&registry).with_config(args.config);

    let woven = match weaver.weave(assembly) {
        Ok(woven) => woven,
        Err(Error::WeaveFailed(diagnostics)) => {
            report(&diagnostics, args.color);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    report(&woven.diagnostics, args.color);
    if fails(&woven.diagnostics, args.strict) {
        eprintln!("error: warnings are errors with --strict, nothing written");
        std::process::exit(1);
    }

    let container = Container::from_assembly(&woven.assembly);
    if let Err(e) = container.save(&args.output, args.format) {
        eprintln!("error: cannot write {}: {e}", args.output.display());
        std::process::exit(1);
    }

    for name in &woven.skipped_types {
        log::info!("{name} already woven, left as is");
    }
    log::info!(
        "wove {} types, redirected {} call sites, wrote {} ({:?})",
        woven.woven_types.len(),
        woven.rewritten_sites,
        args.output.display(),
        args.format
    );
}
