//! Layered loading tests against real files and an in-memory environment

use dotlayer::{ConfigStore, EnvError, EnvironmentSink, LayerKind, MemoryEnv};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tmp"),
        }
    }

    fn layer(self, name: &str, content: &str) -> Self {
        fs::write(self.dir.path().join(name), content).expect("write layer");
        self
    }

    fn load(&self, env: &MemoryEnv) -> ConfigStore {
        ConfigStore::load(self.dir.path(), env).expect("load")
    }
}

const BASE: &str = r#"
# Application
APP_NAME="Demo App"
APP_DEBUG=true
APP_URL=http://localhost

DB_HOST=localhost
DB_PORT=5432
DB_USERNAME=app
DB_PASSWORD=
"#;

const PRODUCTION: &str = r#"
APP_DEBUG=false
APP_URL=https://demo.example.com
DB_HOST=db.internal
"#;

const LOCAL: &str = r#"
DB_HOST=127.0.0.1
DB_PASSWORD='s3cret pass'
FEATURES=search, export ,beta
"#;

// =============================================================================
// Precedence
// =============================================================================

mod precedence {
    use super::*;

    #[test]
    fn test_base_only_keys_survive() {
        let fixture = Fixture::new().layer(".env", BASE).layer(".env.local", LOCAL);
        let store = fixture.load(&MemoryEnv::new());

        assert_eq!(store.get("APP_NAME", ""), "Demo App");
        assert_eq!(store.get_int("DB_PORT", 0), 5432);
    }

    #[test]
    fn test_local_overrides_base() {
        let fixture = Fixture::new().layer(".env", BASE).layer(".env.local", LOCAL);
        let store = fixture.load(&MemoryEnv::new());

        assert_eq!(store.get("DB_HOST", ""), "127.0.0.1");
        assert_eq!(store.get("DB_PASSWORD", ""), "s3cret pass");
    }

    #[test]
    fn test_hint_layer_sits_between_base_and_local() {
        let fixture = Fixture::new()
            .layer(".env", BASE)
            .layer(".env.production", PRODUCTION)
            .layer(".env.local", LOCAL);
        let store = fixture.load(&MemoryEnv::from_pairs([("APP_ENV", "production")]));

        assert!(!store.get_bool("APP_DEBUG", true));
        assert_eq!(store.get("APP_URL", ""), "https://demo.example.com");
        assert_eq!(store.get("DB_HOST", ""), "127.0.0.1");
        assert_eq!(store.hint(), Some("production"));
    }

    #[test]
    fn test_hint_layer_ignored_without_hint() {
        let fixture = Fixture::new()
            .layer(".env", BASE)
            .layer(".env.production", PRODUCTION);
        let store = fixture.load(&MemoryEnv::new());

        assert!(store.get_bool("APP_DEBUG", false));
        assert_eq!(store.hint(), None);
        assert_eq!(store.loaded_layers().len(), 1);
    }

    #[test]
    fn test_hint_from_cache() {
        let fixture = Fixture::new()
            .layer(".env", BASE)
            .layer(".env.production", PRODUCTION);
        let env = MemoryEnv::new().with_cached("APP_ENV", "production");
        let store = fixture.load(&env);

        assert_eq!(store.get("DB_HOST", ""), "db.internal");
    }

    #[test]
    fn test_hint_layer_may_define_app_env_without_effect() {
        let fixture = Fixture::new()
            .layer(".env", "APP_ENV=staging\nA=base\n")
            .layer(".env.staging", "A=staging\n");
        let store = fixture.load(&MemoryEnv::new());

        assert_eq!(store.get("A", ""), "base");
        assert_eq!(store.get("APP_ENV", ""), "staging");
    }

    #[test]
    fn test_loaded_layers_in_order() {
        let fixture = Fixture::new()
            .layer(".env", BASE)
            .layer(".env.production", PRODUCTION)
            .layer(".env.local", LOCAL);
        let store = fixture.load(&MemoryEnv::from_pairs([("APP_ENV", "production")]));

        let kinds: Vec<_> = store.loaded_layers().iter().map(|l| l.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                LayerKind::Base,
                LayerKind::Environment("production".into()),
                LayerKind::Local,
            ]
        );
        assert_eq!(store.loaded_layers()[2].keys, 3);
        assert_eq!(store.base_path(), fixture.dir.path());
    }

    #[test]
    fn test_no_files_is_empty_store() {
        let fixture = Fixture::new();
        let store = fixture.load(&MemoryEnv::new());

        assert!(store.is_empty());
        assert!(store.loaded_layers().is_empty());
        assert_eq!(store.get("ANYTHING", "default"), "default");
    }

    #[test]
    fn test_only_local_file() {
        let fixture = Fixture::new().layer(".env.local", "ONLY=local\n");
        let store = fixture.load(&MemoryEnv::new());

        assert_eq!(store.get("ONLY", ""), "local");
    }
}

// =============================================================================
// Parsing through the store
// =============================================================================

mod parsing {
    use super::*;

    #[test]
    fn test_quoted_and_unquoted_values() {
        let fixture = Fixture::new().layer(".env", "DQ=\"a b\"\nSQ='a b'\nBARE=a b\n");
        let store = fixture.load(&MemoryEnv::new());

        assert_eq!(store.get("DQ", ""), "a b");
        assert_eq!(store.get("SQ", ""), "a b");
        assert_eq!(store.get("BARE", ""), "a b");
    }

    #[test]
    fn test_boolean_literals() {
        let fixture = Fixture::new().layer(".env", "A=true\nB=TRUE\nC=True\nD=null\n");
        let store = fixture.load(&MemoryEnv::new());

        for key in ["A", "B", "C"] {
            assert_eq!(store.get(key, ""), "true");
            assert!(store.get_bool(key, false));
        }
        assert_eq!(store.get("D", "x"), "");
    }

    #[test]
    fn test_empty_value_present_but_required_fails() {
        let fixture = Fixture::new().layer(".env", "KEY=\n");
        let store = fixture.load(&MemoryEnv::new());

        assert_eq!(store.get("KEY", "x"), "");
        let err = store.require_vars(["KEY"]).unwrap_err();
        assert_eq!(err.missing_keys(), ["KEY"]);
    }

    #[test]
    fn test_array_from_layers() {
        let fixture = Fixture::new().layer(".env", BASE).layer(".env.local", LOCAL);
        let store = fixture.load(&MemoryEnv::new());

        assert_eq!(
            store.get_array("FEATURES", vec![]),
            vec!["search", "export", "beta"]
        );
    }
}

// =============================================================================
// Propagation into the sink
// =============================================================================

mod propagation {
    use super::*;

    #[test]
    fn test_sets_undefined_variables() {
        let fixture = Fixture::new().layer(".env", "DB_HOST=localhost\nDB_PORT=5432\n");
        let env = MemoryEnv::new();
        fixture.load(&env);

        assert_eq!(env.var("DB_HOST").as_deref(), Some("localhost"));
        assert_eq!(env.var("DB_PORT").as_deref(), Some("5432"));
    }

    #[test]
    fn test_does_not_overwrite_external_definitions() {
        let fixture = Fixture::new().layer(".env", "DB_HOST=localhost\n");
        let env = MemoryEnv::from_pairs([("DB_HOST", "from-shell")]);
        let store = fixture.load(&env);

        assert_eq!(env.var("DB_HOST").as_deref(), Some("from-shell"));
        // Cache and store always carry the file value
        assert_eq!(env.cached("DB_HOST").as_deref(), Some("localhost"));
        assert_eq!(store.get("DB_HOST", ""), "localhost");
    }

    #[test]
    fn test_mirrors_every_key_including_empty() {
        let fixture = Fixture::new().layer(".env", "A=1\nB=\n");
        let env = MemoryEnv::from_pairs([("A", "external")]);
        fixture.load(&env);

        let cached = env.cached_vars();
        assert_eq!(cached.get("A").map(String::as_str), Some("1"));
        assert_eq!(cached.get("B").map(String::as_str), Some(""));
        assert_eq!(env.var("B").as_deref(), Some(""));
    }

    #[test]
    fn test_external_env_does_not_leak_into_store() {
        let fixture = Fixture::new().layer(".env", "A=1\n");
        let env = MemoryEnv::from_pairs([("PATH", "/usr/bin")]);
        let store = fixture.load(&env);

        assert!(!store.contains("PATH"));
        assert_eq!(store.len(), 1);
    }
}

// =============================================================================
// Validation
// =============================================================================

mod validation {
    use super::*;

    #[test]
    fn test_only_missing_key_is_reported() {
        let fixture = Fixture::new().layer(".env", "A=1\nC=3\n");
        let store = fixture.load(&MemoryEnv::new());

        match store.require_vars(["A", "B", "C"]) {
            Err(EnvError::MissingRequired { missing }) => assert_eq!(missing, vec!["B"]),
            other => panic!("expected MissingRequired, got {other:?}"),
        }
    }

    #[test]
    fn test_all_present() {
        let fixture = Fixture::new().layer(".env", BASE).layer(".env.local", LOCAL);
        let store = fixture.load(&MemoryEnv::new());

        assert!(
            store
                .require_vars(["DB_HOST", "DB_USERNAME", "DB_PASSWORD"])
                .is_ok()
        );
    }

    #[test]
    fn test_empty_password_without_local_layer() {
        let fixture = Fixture::new().layer(".env", BASE);
        let store = fixture.load(&MemoryEnv::new());

        let err = store
            .require_vars(["DB_HOST", "DB_USERNAME", "DB_PASSWORD"])
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required env vars: DB_PASSWORD");
    }
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_unreadable_layer_aborts_load() {
    let fixture = Fixture::new().layer(".env", BASE);
    fs::create_dir(fixture.dir.path().join(".env.local")).expect("mkdir");

    let env = MemoryEnv::new();
    let err = ConfigStore::load(fixture.dir.path(), &env).unwrap_err();

    assert!(matches!(err, EnvError::Io { ref path, .. } if path.ends_with(".env.local")));
    // Nothing is propagated when loading fails
    assert!(env.external_vars().is_empty());
    assert!(env.cached_vars().is_empty());
}

#[test]
#[serial_test::serial]
fn test_empty_key_is_stored_but_not_exported() {
    use dotlayer::ProcessEnv;

    let fixture = Fixture::new().layer(".env", "=orphan\n");
    let store = ConfigStore::load(fixture.dir.path(), &ProcessEnv).expect("load");

    assert_eq!(store.get("", "default"), "orphan");
    assert!(store.contains(""));
    // The OS cannot hold an empty name, only the cache does
    assert!(std::env::vars_os().all(|(name, _)| !name.is_empty()));
    assert_eq!(
        ProcessEnv::cached_vars().get("").map(String::as_str),
        Some("orphan")
    );
}

#[test]
fn test_exponent_and_fraction_integers() {
    let fixture = Fixture::new().layer(".env", "TIMEOUT=1.5e3\nRETRIES=1e1\nSCALE=2.9\n");
    let store = fixture.load(&MemoryEnv::new());

    assert_eq!(store.get_int("TIMEOUT", 0), 1500);
    assert_eq!(store.get_int("RETRIES", 0), 10);
    assert_eq!(store.get_int("SCALE", 0), 2);
}

#[test]
fn test_lone_quote_value_is_empty() {
    let fixture = Fixture::new().layer(".env", "QUOTE=\"\n");
    let store = fixture.load(&MemoryEnv::new());

    assert_eq!(store.get("QUOTE", "x"), "");
    assert!(store.require_vars(["QUOTE"]).is_err());
}
