use std::path::PathBuf;

use netweave_bytecode::{Assembly, TypeDescriptor, dump_assembly, dump_type};
use netweave_core::{Colors, short_name};
use netweave_weaver::{Error, MarshalRegistry, Weaver, WeaverConfig};

use super::run_common::{load_or_exit, report};

pub struct DumpArgs {
    pub input: PathBuf,
    pub type_name: Option<String>,
    /// Weave with this configuration before dumping.
    pub weave: Option<WeaverConfig>,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let mut assembly = load_or_exit(&args.input);

    if let Some(config) = args.weave {
        let registry = MarshalRegistry::standard();
        match Weaver::new(&registry).with_config(config).weave(assembly) {
            Ok(woven) => {
                report(&woven.diagnostics, args.color);
                assembly = woven.assembly;
            }
            Err(Error::WeaveFailed(diagnostics)) => {
                report(&diagnostics, args.color);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }

    let colors = Colors::new(args.color);
    match &args.type_name {
        None => print!("{}", dump_assembly(&assembly, colors)),
        Some(name) => match find_type(&assembly, name) {
            Some(ty) => print!("{}", dump_type(ty, colors)),
            None => {
                eprintln!("error: no type `{name}` in module `{}`", assembly.main_module());
                std::process::exit(1);
            }
        },
    }
}

/// Main-module type by full name, or by short name when unambiguous.
fn find_type<'a>(assembly: &'a Assembly, name: &str) -> Option<&'a TypeDescriptor> {
    let main = assembly.main_types();
    if let Some(id) = main.iter().find(|&&id| assembly.get(id).name == name) {
        return Some(assembly.get(*id));
    }
    let mut by_short = main
        .iter()
        .map(|&id| assembly.get(id))
        .filter(|ty| short_name(&ty.name) == name);
    match (by_short.next(), by_short.next()) {
        (Some(ty), None) => Some(ty),
        _ => None,
    }
}
