//! One-time store initialization
//!
//! Prefer building a [`ConfigStore`] with [`ConfigStore::load`] in `main` and
//! passing it down. [`get_instance`] exists for code that needs global access.

use crate::error::Result;
use crate::sink::{EnvironmentSink, ProcessEnv};
use crate::store::ConfigStore;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing::debug;

/// A cell holding at most one [`ConfigStore`].
///
/// The first successful [`StoreCell::get_or_load`] wins. Later calls return
/// that same store and ignore their arguments. Racing callers block until
/// the single load finishes. A failed load leaves the cell empty so a later
/// call can retry.
#[derive(Debug, Default)]
pub struct StoreCell {
    store: OnceLock<ConfigStore>,
    init: Mutex<()>,
}

impl StoreCell {
    pub const fn new() -> Self {
        Self {
            store: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The store, if one has been loaded
    pub fn get(&self) -> Option<&ConfigStore> {
        self.store.get()
    }

    /// Return the loaded store, loading it from `base` on first use
    pub fn get_or_load(
        &self,
        base: impl AsRef<Path>,
        sink: &dyn EnvironmentSink,
    ) -> Result<&ConfigStore> {
        if let Some(store) = self.store.get() {
            return Ok(store);
        }

        let _guard = self
            .init
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(store) = self.store.get() {
            return Ok(store);
        }

        debug!(base = %base.as_ref().display(), "Initializing config store");
        let store = ConfigStore::load(base, sink)?;
        Ok(self.store.get_or_init(|| store))
    }
}

static INSTANCE: StoreCell = StoreCell::new();

/// Process-wide store backed by the real process environment.
///
/// **First call wins:** the first successful call loads from `base`; every
/// later call returns that same instance, whatever path it passes. A failed
/// load installs nothing, so the next call tries again.
pub fn get_instance(base: impl AsRef<Path>) -> Result<&'static ConfigStore> {
    INSTANCE.get_or_load(base, &ProcessEnv)
}
