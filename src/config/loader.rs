//! Layer discovery and merging
//!
//! Layers are loaded from the base directory with the following precedence
//! (highest to lowest):
//! 1. `.env.local`
//! 2. `.env.<APP_ENV>` (only when the hint is set)
//! 3. `.env`
//!
//! Missing files are skipped. Any other read failure is fatal.

use crate::config::parser::parse_str;
use crate::config::types::{EnvMap, HINT_VAR, Layer, LayerKind};
use crate::error::{EnvError, Result};
use crate::sink::EnvironmentSink;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Resolve the environment-name hint.
///
/// The external environment wins over the sink's cache. Empty values count
/// as unset.
pub fn resolve_hint(sink: &dyn EnvironmentSink) -> Option<String> {
    sink.var(HINT_VAR)
        .filter(|v| !v.is_empty())
        .or_else(|| sink.cached(HINT_VAR).filter(|v| !v.is_empty()))
}

/// Read and parse one layer, returning `None` if the file does not exist
pub fn load_layer(base: &Path, kind: LayerKind) -> Result<Option<Layer>> {
    let path = base.join(kind.file_name());

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Layer file not found, skipping");
            return Ok(None);
        }
        Err(source) => return Err(EnvError::Io { path, source }),
    };

    let vars = parse_str(&content);
    debug!(path = %path.display(), layer = %kind, keys = vars.len(), "Loaded layer");

    Ok(Some(Layer { kind, path, vars }))
}

/// Load every layer that exists for `hint`, lowest precedence first
pub fn load_layers(base: &Path, hint: Option<&str>) -> Result<Vec<Layer>> {
    let mut layers = Vec::new();
    for kind in LayerKind::ordered(hint) {
        if let Some(layer) = load_layer(base, kind)? {
            layers.push(layer);
        }
    }
    Ok(layers)
}

/// Shallow merge: each later layer overwrites keys of the earlier ones
pub fn merge(layers: &[Layer]) -> EnvMap {
    let mut merged = EnvMap::new();
    for layer in layers {
        merged.extend(layer.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}
