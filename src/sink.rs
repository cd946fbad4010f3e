//! Environment sinks
//!
//! A [`ConfigStore`](crate::ConfigStore) reads the `APP_ENV` hint from, and
//! pushes its merged variables into, an [`EnvironmentSink`]. Production code
//! uses [`ProcessEnv`]; tests use [`MemoryEnv`] so they never touch real
//! process state.

use crate::config::EnvMap;
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// Capability interface for the environment a store propagates into.
///
/// "External" is the environment other code and child processes observe.
/// The cache is a process-wide mirror of every loaded variable, readable
/// even where the external environment kept an older definition.
pub trait EnvironmentSink: Send + Sync {
    /// Read a variable from the external environment
    fn var(&self, name: &str) -> Option<String>;

    /// Read a variable from the cache
    fn cached(&self, name: &str) -> Option<String>;

    /// Whether the external environment already defines `name`
    fn has(&self, name: &str) -> bool {
        self.var(name).is_some()
    }

    /// Define a variable in the external environment
    fn set(&self, name: &str, value: &str);

    /// Record a variable in the cache
    fn mirror(&self, name: &str, value: &str);
}

static PROCESS_CACHE: LazyLock<RwLock<EnvMap>> = LazyLock::new(|| RwLock::new(EnvMap::new()));

fn read_cache() -> RwLockReadGuard<'static, EnvMap> {
    PROCESS_CACHE.read().unwrap_or_else(|poisoned| {
        warn!("env cache lock poisoned, recovering");
        poisoned.into_inner()
    })
}

fn write_cache() -> RwLockWriteGuard<'static, EnvMap> {
    PROCESS_CACHE.write().unwrap_or_else(|poisoned| {
        warn!("env cache lock poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Sink backed by the real process environment (`std::env`) and a
/// process-wide variable cache.
///
/// Writing the process environment is only sound while no other thread reads
/// or writes it. Build stores with this sink during startup, before spawning
/// threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Snapshot of every variable mirrored into the process-wide cache
    pub fn cached_vars() -> EnvMap {
        read_cache().clone()
    }
}

/// Whether the OS accepts `name=value` as an environment entry
fn representable(name: &str, value: &str) -> bool {
    !name.is_empty() && !name.contains(['=', '\0']) && !value.contains('\0')
}

impl EnvironmentSink for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn cached(&self, name: &str) -> Option<String> {
        read_cache().get(name).cloned()
    }

    fn has(&self, name: &str) -> bool {
        !name.is_empty() && std::env::var_os(name).is_some()
    }

    fn set(&self, name: &str, value: &str) {
        if !representable(name, value) {
            warn!(name, "Variable cannot be set in the process environment");
            return;
        }
        // SAFETY: see the type-level docs; sinks are written once during
        // store construction at startup.
        unsafe { std::env::set_var(name, value) };
    }

    fn mirror(&self, name: &str, value: &str) {
        write_cache().insert(name.to_string(), value.to_string());
    }
}

/// In-memory sink for tests
#[derive(Debug, Default)]
pub struct MemoryEnv {
    external: RwLock<EnvMap>,
    cache: RwLock<EnvMap>,
}

impl MemoryEnv {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink whose external environment holds the given pairs
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            external: RwLock::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            cache: RwLock::default(),
        }
    }

    /// Pre-populate the cache, as if an earlier load had mirrored `name`
    pub fn with_cached(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
        self
    }

    /// Snapshot of the external environment
    pub fn external_vars(&self) -> EnvMap {
        self.external
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the cache
    pub fn cached_vars(&self) -> EnvMap {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EnvironmentSink for MemoryEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.external
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn cached(&self, name: &str) -> Option<String> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.external
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value.to_string());
    }

    fn mirror(&self, name: &str, value: &str) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value.to_string());
    }
}
