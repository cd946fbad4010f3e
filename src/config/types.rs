//! Layer types shared by the loader and the store

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// File name of the base layer
pub const BASE_FILE: &str = ".env";

/// File name of the local override layer
pub const LOCAL_FILE: &str = ".env.local";

/// Variable consulted to pick the environment-specific layer
pub const HINT_VAR: &str = "APP_ENV";

/// Flat key/value mapping produced by parsing and merging
pub type EnvMap = BTreeMap<String, String>;

/// Precedence slot a layer file occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerKind {
    /// `.env`
    Base,
    /// `.env.<hint>`
    Environment(String),
    /// `.env.local`
    Local,
}

impl LayerKind {
    /// File name for this layer relative to the base directory
    pub fn file_name(&self) -> String {
        match self {
            LayerKind::Base => BASE_FILE.to_string(),
            LayerKind::Environment(hint) => format!("{BASE_FILE}.{hint}"),
            LayerKind::Local => LOCAL_FILE.to_string(),
        }
    }

    /// Layers to attempt for a hint, lowest precedence first.
    ///
    /// The environment layer is only included for a non-empty hint.
    pub fn ordered(hint: Option<&str>) -> Vec<LayerKind> {
        let mut kinds = vec![LayerKind::Base];
        if let Some(hint) = hint.filter(|h| !h.is_empty()) {
            kinds.push(LayerKind::Environment(hint.to_string()));
        }
        kinds.push(LayerKind::Local);
        kinds
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Base => f.write_str("base"),
            LayerKind::Environment(hint) => write!(f, "environment ({hint})"),
            LayerKind::Local => f.write_str("local"),
        }
    }
}

/// A parsed layer file, alive only while loading
#[derive(Debug, Clone)]
pub struct Layer {
    pub kind: LayerKind,
    pub path: PathBuf,
    pub vars: EnvMap,
}

impl Layer {
    /// Summary kept by the store after the merge
    pub fn summary(&self) -> LoadedLayer {
        LoadedLayer {
            kind: self.kind.clone(),
            path: self.path.clone(),
            keys: self.vars.len(),
        }
    }
}

/// Record of a layer file that was found and merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedLayer {
    pub kind: LayerKind,
    pub path: PathBuf,
    /// Number of distinct keys the file defined
    pub keys: usize,
}
