//! The configuration store
//!
//! [`ConfigStore`] is built once from a base directory and an
//! [`EnvironmentSink`], then only read. Accessors are total: a present value
//! that does not look like the requested type is coerced, never rejected.
//! Validation is the one read that can fail, see
//! [`ConfigStore::require_vars`].

use crate::config::coerce;
use crate::config::{EnvMap, LoadedLayer, load_layers, merge, resolve_hint};
use crate::error::{EnvError, Result};
use crate::sink::EnvironmentSink;
use crate::util::SecretString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Merged, read-only view of the layered `.env` files
#[derive(Debug, Clone)]
pub struct ConfigStore {
    base: PathBuf,
    hint: Option<String>,
    layers: Vec<LoadedLayer>,
    vars: EnvMap,
}

impl ConfigStore {
    /// Load the layers under `base`, merge them and propagate the result into
    /// `sink`.
    ///
    /// Variables already defined in the sink's external environment keep
    /// their value there; every variable is mirrored into the sink's cache.
    /// A missing layer file is not an error, an unreadable one is.
    pub fn load(base: impl AsRef<Path>, sink: &dyn EnvironmentSink) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        let hint = resolve_hint(sink);

        let layers = load_layers(&base, hint.as_deref())?;
        let vars = merge(&layers);

        for (name, value) in &vars {
            if !sink.has(name) {
                sink.set(name, value);
            }
            sink.mirror(name, value);
        }

        info!(
            base = %base.display(),
            hint = hint.as_deref().unwrap_or(""),
            layers = layers.len(),
            keys = vars.len(),
            "Environment loaded"
        );

        Ok(Self {
            base,
            hint,
            layers: layers.iter().map(|l| l.summary()).collect(),
            vars,
        })
    }

    /// Build a store from an already merged mapping, without touching any
    /// files or environment
    pub fn from_vars(base: impl Into<PathBuf>, vars: EnvMap) -> Self {
        Self {
            base: base.into(),
            hint: None,
            layers: Vec::new(),
            vars,
        }
    }

    /// Directory the layers were loaded from
    pub fn base_path(&self) -> &Path {
        &self.base
    }

    /// The `APP_ENV` hint in effect at load time
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Layer files that existed and were merged, lowest precedence first
    pub fn loaded_layers(&self) -> &[LoadedLayer] {
        &self.layers
    }

    /// The merged mapping
    pub fn vars(&self) -> &EnvMap {
        &self.vars
    }

    /// Iterate over merged pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Whether `key` is present, even with an empty value
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Stored value, or `None` if absent
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Stored value, or `default` if absent.
    ///
    /// A key defined as `KEY=` returns `""`, not `default`.
    pub fn get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.raw(key).unwrap_or(default)
    }

    /// Owned variant of [`ConfigStore::get`]
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key, default).to_string()
    }

    /// Leading integer of the stored value; `default` only if absent
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.raw(key).map_or(default, coerce::parse_int)
    }

    /// Leading decimal number of the stored value; `default` only if absent
    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.raw(key).map_or(default, coerce::parse_float)
    }

    /// `true` for `1`, `true`, `on` or `yes` (any case); `default` only if
    /// absent
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.raw(key).map_or(default, coerce::parse_bool)
    }

    /// Comma separated list with trimmed elements.
    ///
    /// Returns `default` when the key is absent or its value is empty.
    pub fn get_array(&self, key: &str, default: Vec<String>) -> Vec<String> {
        match self.raw(key) {
            None | Some("") => default,
            Some(value) => coerce::parse_list(value),
        }
    }

    /// Stored value wrapped so it cannot be logged by accident
    pub fn get_secret(&self, key: &str) -> Option<SecretString> {
        self.raw(key).map(SecretString::new)
    }

    /// Check that every key is present with a non-empty value.
    ///
    /// All missing keys are reported together, in the order given.
    pub fn require_vars<I, S>(&self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let missing: Vec<String> = keys
            .into_iter()
            .filter(|key| self.raw(key.as_ref()).is_none_or(str::is_empty))
            .map(|key| key.as_ref().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EnvError::missing(missing))
        }
    }
}
