//! On-disk container of a main module's type declarations.
//!
//! Two encodings:
//! - JSON (`serde_json`), for fixtures and inspection
//! - binary: 16-byte header (magic, version, CRC32 of payload) followed by a
//!   `postcard` payload
//!
//! Reference declarations are not stored; loading installs them again.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assembly::Assembly;
use crate::descriptor::TypeDescriptor;

pub const MAGIC: [u8; 8] = *b"NWEAVE\0\0";
pub const VERSION: u32 = 1;
const HEADER_SIZE: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON container: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid binary container: {0}")]
    Binary(#[from] postcard::Error),
    #[error("not a netweave container (bad magic)")]
    BadMagic,
    #[error("unsupported container version {0} (expected {VERSION})")]
    UnsupportedVersion(u32),
    #[error("checksum mismatch: header says {expected:#010x}, payload hashes to {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("container truncated: {0} bytes")]
    Truncated(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerFormat {
    Json,
    Binary,
}

impl ContainerFormat {
    /// `.json` files are JSON, everything else binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ContainerFormat::Json,
            _ => ContainerFormat::Binary,
        }
    }
}

/// Serializable form of an [`Assembly`]: the main module and its types.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub main_module: String,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl Container {
    pub fn from_assembly(assembly: &Assembly) -> Self {
        Self {
            main_module: assembly.main_module().to_string(),
            types: assembly
                .main_types()
                .into_iter()
                .map(|id| assembly.get(id).clone())
                .collect(),
        }
    }

    pub fn into_assembly(self) -> Assembly {
        let mut assembly = Assembly::new(self.main_module);
        for ty in self.types {
            assembly.add_type(ty);
        }
        assembly
    }

    pub fn from_json(text: &str) -> Result<Self, ContainerError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ContainerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, ContainerError> {
        if bytes.len() < HEADER_SIZE {
            return Err(ContainerError::Truncated(bytes.len()));
        }
        if bytes[0..8] != MAGIC {
            return Err(ContainerError::BadMagic);
        }
        let version = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        if version != VERSION {
            return Err(ContainerError::UnsupportedVersion(version));
        }
        let expected = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        let payload = &bytes[HEADER_SIZE..];
        let actual = crc32fast::hash(payload);
        if expected != actual {
            return Err(ContainerError::ChecksumMismatch { expected, actual });
        }
        Ok(postcard::from_bytes(payload)?)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, ContainerError> {
        let payload = postcard::to_allocvec(self)?;
        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        out.extend_from_slice(&payload);
        Ok(out)
    }

    pub fn load(path: &Path, format: ContainerFormat) -> Result<Self, ContainerError> {
        match format {
            ContainerFormat::Json => Self::from_json(&std::fs::read_to_string(path)?),
            ContainerFormat::Binary => Self::from_binary(&std::fs::read(path)?),
        }
    }

    pub fn save(&self, path: &Path, format: ContainerFormat) -> Result<(), ContainerError> {
        match format {
            ContainerFormat::Json => std::fs::write(path, self.to_json()?)?,
            ContainerFormat::Binary => std::fs::write(path, self.to_binary()?)?,
        }
        Ok(())
    }
}
