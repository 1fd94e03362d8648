//! Tree file loading: format detection, file discovery, parsing, and the
//! name lookup used when wiring a definition into a tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use skilltree_core::SkillTreeError;
use tracing::debug;

use crate::schema::TreeDefinition;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading or wiring a tree definition.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// No tree file with the given base name exists in the directory.
    #[error("tree '{name}' not found in {dir}")]
    MissingTree { name: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A prerequisite name does not match any node declared before it.
    #[error("node '{node}' in tree '{tree}' requires unknown node '{name}'")]
    UnresolvedRef {
        tree: String,
        node: String,
        name: String,
    },

    /// Two nodes in one tree share a name.
    #[error("duplicate node name '{name}' in tree '{tree}'")]
    DuplicateName { tree: String, name: String },

    /// The engine rejected a node configuration.
    #[error(transparent)]
    Tree(#[from] SkillTreeError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Formats
// ===========================================================================

/// Tree file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Every format, in lookup order.
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }

    /// The format named by `path`'s extension.
    pub fn from_path(path: &Path) -> Result<Self, DataLoadError> {
        let ext = path.extension().and_then(|e| e.to_str());
        Self::ALL
            .into_iter()
            .find(|format| Some(format.extension()) == ext)
            .ok_or_else(|| DataLoadError::UnsupportedFormat {
                file: path.to_path_buf(),
            })
    }

    fn parse(self, content: &str) -> Result<TreeDefinition, String> {
        match self {
            Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

// ===========================================================================
// Loading
// ===========================================================================

/// Find the tree file `{name}.ron`, `{name}.toml`, or `{name}.json` in `dir`.
///
/// Exactly one of the three may exist.
pub fn find_tree_file(dir: &Path, name: &str) -> Result<PathBuf, DataLoadError> {
    let mut candidates = Format::ALL
        .into_iter()
        .map(|format| dir.join(format!("{name}.{}", format.extension())))
        .filter(|candidate| candidate.exists());

    let found = candidates.next().ok_or_else(|| DataLoadError::MissingTree {
        name: name.to_string(),
        dir: dir.to_path_buf(),
    })?;
    match candidates.next() {
        Some(other) => Err(DataLoadError::ConflictingFormats { a: found, b: other }),
        None => Ok(found),
    }
}

/// Load a tree definition from a RON, TOML, or JSON file.
pub fn load_tree_definition(path: &Path) -> Result<TreeDefinition, DataLoadError> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let definition = format
        .parse(&content)
        .map_err(|detail| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail,
        })?;

    debug!(
        tree = %definition.name,
        nodes = definition.nodes.len(),
        file = %path.display(),
        ?format,
        "tree definition loaded"
    );
    Ok(definition)
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a prerequisite name among the nodes declared so far.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    tree: &str,
    node: &str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        tree: tree.to_string(),
        node: node.to_string(),
        name: name.to_string(),
    })
}

// ===========================================================================
// Tests
// ===========================================================================
