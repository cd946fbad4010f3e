//! Layered `.env` loader
//!
//! Reads `KEY=value` files from a base directory, merges them by precedence,
//! pushes the result into the process environment and serves typed lookups.
//!
//! ## Layers
//!
//! ```text
//! .env  →  .env.<APP_ENV>  →  .env.local
//! ```
//!
//! Later layers override earlier ones. `APP_ENV` is read from the process
//! environment (or the variable cache of an earlier load) and only selects the
//! middle file. Missing files are skipped.
//!
//! ## Reads and validation
//!
//! Typed getters never fail: `get_int("PORT", 80)` on `PORT=80abc` returns
//! `80`, on `PORT=abc` returns `0`, and only returns the default when `PORT`
//! is not defined at all. Use [`ConfigStore::require_vars`] to fail loudly on
//! absent or empty keys.
//!
//! ## Example
//!
//! ```no_run
//! use dotlayer::{ConfigStore, ProcessEnv};
//!
//! let env = ConfigStore::load(".", &ProcessEnv)?;
//! env.require_vars(["DB_HOST", "DB_USERNAME", "DB_PASSWORD"])?;
//!
//! let port = env.get_int("DB_PORT", 5432);
//! let debug = env.get_bool("APP_DEBUG", false);
//! # Ok::<(), dotlayer::EnvError>(())
//! ```

pub mod config;
pub mod error;
pub mod global;
pub mod sink;
pub mod store;
pub mod util;

// Re-export main types
pub use config::{LayerKind, LoadedLayer};
pub use error::{EnvError, Result};
pub use global::{StoreCell, get_instance};
pub use sink::{EnvironmentSink, MemoryEnv, ProcessEnv};
pub use store::ConfigStore;
pub use util::SecretString;
