//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors pull the relevant fields
//! - `Into<*Args>` impls bridge dispatch to command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use netweave_bytecode::ContainerFormat;
use netweave_weaver::WeaverConfig;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::hash::HashArgs;
use crate::commands::weave::WeaveArgs;

pub struct CheckParams {
    pub input: PathBuf,
    pub module: Option<String>,
    pub allow_modules: Vec<String>,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: input_path(m),
            module: m.get_one::<String>("module").cloned(),
            allow_modules: allow_modules(m),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            input: p.input,
            config: weaver_config(p.module, p.allow_modules, false),
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct WeaveParams {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: Option<ContainerFormat>,
    pub module: Option<String>,
    pub allow_modules: Vec<String>,
    pub debug_logs: bool,
    pub strict: bool,
    pub color: ColorChoice,
}

impl WeaveParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: input_path(m),
            output: m.get_one::<PathBuf>("output").cloned().unwrap_or_default(),
            format: parse_format(m),
            module: m.get_one::<String>("module").cloned(),
            allow_modules: allow_modules(m),
            debug_logs: m.get_flag("debug_logs"),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<WeaveParams> for WeaveArgs {
    fn from(p: WeaveParams) -> Self {
        let format = p
            .format
            .unwrap_or_else(|| ContainerFormat::from_path(&p.output));
        Self {
            input: p.input,
            output: p.output,
            format,
            config: weaver_config(p.module, p.allow_modules, p.debug_logs),
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub input: PathBuf,
    pub type_name: Option<String>,
    pub woven: bool,
    pub debug_logs: bool,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: input_path(m),
            type_name: m.get_one::<String>("type").cloned(),
            woven: m.get_flag("woven"),
            debug_logs: m.get_flag("debug_logs"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            input: p.input,
            type_name: p.type_name,
            weave: p
                .woven
                .then(|| WeaverConfig::new().with_debug_logs(p.debug_logs)),
            color: p.color.should_colorize(),
        }
    }
}

pub struct HashParams {
    pub type_name: String,
    pub kind: String,
    pub member: String,
}

impl HashParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let get = |id: &str| m.get_one::<String>(id).cloned().unwrap_or_default();
        Self {
            type_name: get("type_name"),
            kind: get("kind"),
            member: get("member"),
        }
    }
}

impl From<HashParams> for HashArgs {
    fn from(p: HashParams) -> Self {
        Self {
            type_name: p.type_name,
            kind: p.kind,
            member: p.member,
        }
    }
}

fn input_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("input").cloned().unwrap_or_default()
}

fn allow_modules(m: &ArgMatches) -> Vec<String> {
    m.get_many::<String>("allow_module")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn weaver_config(module: Option<String>, allowed: Vec<String>, debug_logs: bool) -> WeaverConfig {
    let mut config = WeaverConfig::new().with_debug_logs(debug_logs);
    if let Some(module) = module {
        config = config.with_main_module(module);
    }
    allowed
        .into_iter()
        .fold(config, |config, module| config.with_allowed_module(module))
}

/// Parse --format flag; `None` means infer from the output path.
fn parse_format(m: &ArgMatches) -> Option<ContainerFormat> {
    match m.get_one::<String>("format").map(|s| s.as_str()) {
        Some("json") => Some(ContainerFormat::Json),
        Some("bin") => Some(ContainerFormat::Binary),
        _ => None,
    }
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
