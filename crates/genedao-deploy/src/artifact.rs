//! Contract artifacts: the "contract factory by name" side of a deployment.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::{hex, Bytes};
use serde::Deserialize;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A compiled contract ready for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    /// Contract name as declared in source
    pub name: String,
    /// Creation bytecode
    pub bytecode: Bytes,
}

/// Error types for artifact loading
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// No artifact exists for the contract
    #[error("no artifact found for contract `{0}`")]
    NotFound(String),

    /// More than one artifact has the same contract name
    #[error("contract name `{name}` is ambiguous: {first} and {second}")]
    Ambiguous {
        /// The contract name
        name: String,
        /// First matching artifact
        first: PathBuf,
        /// Second matching artifact
        second: PathBuf,
    },

    /// Failed to read an artifact file or directory
    #[error("failed to read '{path}': {source}")]
    Read {
        /// The path that failed to read
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The artifact is not valid Hardhat JSON
    #[error("failed to parse artifact '{path}': {source}")]
    Parse {
        /// The artifact path
        path: PathBuf,
        /// The underlying JSON error
        source: serde_json::Error,
    },

    /// The artifact carries no deployable bytecode
    #[error("artifact for `{name}` has invalid bytecode: {reason}")]
    InvalidBytecode {
        /// The contract name
        name: String,
        /// Why the bytecode was rejected
        reason: String,
    },
}

/// Looks up compiled contracts by name.
pub trait ArtifactSource {
    /// Loads the artifact of `name`.
    fn load(&self, name: &str) -> Result<ContractArtifact, ArtifactError>;
}

/// Artifacts held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifacts {
    artifacts: HashMap<String, Bytes>,
}

impl InMemoryArtifacts {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the bytecode of `name`.
    pub fn with_artifact(mut self, name: impl Into<String>, bytecode: impl Into<Bytes>) -> Self {
        self.artifacts.insert(name.into(), bytecode.into());
        self
    }
}

impl ArtifactSource for InMemoryArtifacts {
    fn load(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
        let bytecode =
            self.artifacts.get(name).cloned().ok_or_else(|| ArtifactError::NotFound(name.into()))?;
        if bytecode.is_empty() {
            return Err(ArtifactError::InvalidBytecode {
                name: name.into(),
                reason: "bytecode is empty".into(),
            });
        }
        Ok(ContractArtifact { name: name.into(), bytecode })
    }
}

/// The subset of a Hardhat artifact file we read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    bytecode: String,
}

/// Artifacts produced by `hardhat compile`, laid out as `<root>/**/<Name>.sol/<Name>.json`.
#[derive(Debug, Clone)]
pub struct HardhatArtifacts {
    root: PathBuf,
}

impl HardhatArtifacts {
    /// Uses `root` (usually `artifacts/`) as the search directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The search directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Finds the single `<name>.json` below the root, skipping `*.dbg.json` debug files and
    /// the `build-info` directory. Symbolic links are not followed.
    fn find(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let file_name = format!("{name}.json");
        let mut found: Option<PathBuf> = None;

        let entries = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let build_info = entry.file_type().is_dir() && entry.file_name() == "build-info";
                entry.depth() == 0 || !build_info
            });
        for entry in entries {
            let entry = entry.map_err(|err| ArtifactError::Read {
                path: err.path().map_or_else(|| self.root.clone(), Path::to_path_buf),
                source: err.into(),
            })?;
            if !entry.file_type().is_file() || entry.file_name() != file_name.as_str() {
                continue;
            }
            trace!(path = %entry.path().display(), "Artifact candidate");
            if let Some(first) = found.take() {
                return Err(ArtifactError::Ambiguous {
                    name: name.into(),
                    first,
                    second: entry.into_path(),
                });
            }
            found = Some(entry.into_path());
        }

        found.ok_or_else(|| ArtifactError::NotFound(name.into()))
    }
}

impl ArtifactSource for HardhatArtifacts {
    fn load(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
        let path = self.find(name)?;
        debug!(contract = name, path = %path.display(), "Loading artifact");

        let content = fs::read_to_string(&path)
            .map_err(|source| ArtifactError::Read { path: path.clone(), source })?;
        let artifact: HardhatArtifact = serde_json::from_str(&content)
            .map_err(|source| ArtifactError::Parse { path: path.clone(), source })?;

        if artifact.contract_name != name {
            return Err(ArtifactError::NotFound(name.into()));
        }

        let bytecode = decode_bytecode(name, &artifact.bytecode)?;
        Ok(ContractArtifact { name: artifact.contract_name, bytecode })
    }
}

/// Decodes artifact bytecode, rejecting empty (abstract/interface) and unlinked bytecode.
fn decode_bytecode(name: &str, bytecode: &str) -> Result<Bytes, ArtifactError> {
    let invalid =
        |reason: String| ArtifactError::InvalidBytecode { name: name.into(), reason };

    let trimmed = bytecode.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(invalid("bytecode is empty; abstract contracts cannot be deployed".into()));
    }
    if digits.contains("__") {
        return Err(invalid("bytecode contains unlinked library placeholders".into()));
    }

    hex::decode(digits).map(Bytes::from).map_err(|e| invalid(e.to_string()))
}
