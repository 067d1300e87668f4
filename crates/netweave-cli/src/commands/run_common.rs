//! Loading and reporting shared by the container commands.

use std::path::{Path, PathBuf};

use netweave_bytecode::{Assembly, Container, ContainerError, ContainerFormat};
use netweave_weaver::Diagnostics;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot read {}: {source}", .path.display())]
    Container {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },
}

/// Load a container, choosing the encoding from the file extension.
pub fn load_assembly(path: &Path) -> Result<Assembly, InputError> {
    let container = Container::load(path, ContainerFormat::from_path(path)).map_err(|source| {
        InputError::Container {
            path: path.to_path_buf(),
            source,
        }
    })?;
    log::debug!(
        "loaded {} types of `{}` from {}",
        container.types.len(),
        container.main_module,
        path.display()
    );
    Ok(container.into_assembly())
}

pub fn load_or_exit(path: &Path) -> Assembly {
    load_assembly(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Whether the run should fail given what was reported.
pub fn fails(diagnostics: &Diagnostics, strict: bool) -> bool {
    diagnostics.has_errors() || (strict && diagnostics.has_warnings())
}

pub fn report(diagnostics: &Diagnostics, color: bool) {
    if !diagnostics.is_empty() {
        eprint!("{}", diagnostics.render_colored(color));
    }
}
