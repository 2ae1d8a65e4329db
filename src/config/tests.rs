use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use super::load::{default_config_path, resolve_config_path};
use super::schema::*;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_ripcd_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("RIPCD_CONFIG_PATH", "/tmp/ripcd-test-config.yaml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/ripcd-test-config.yaml")
    );
}

#[test]
fn default_config_path_lives_under_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(p, PathBuf::from("/tmp/home-dir").join(".rip-cd.yaml"));
}

#[test]
fn load_with_no_file_yields_builtin_defaults() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("RIPCD_CONFIG_PATH");
    let _g2 = EnvGuard::set("HOME", "/nonexistent-home-for-ripcd-tests");

    let ws = tempfile::tempdir().unwrap();
    let s = Settings::load(None, Some(ws.path())).unwrap();

    assert_eq!(s.ripper.engine, "xld");
    assert_eq!(s.ripper.quality.format, "flac");
    assert_eq!(s.ripper.quality.compression, 8);
    assert_eq!(s.ripper.quality.max_retry_attempts, 20);
    assert!(s.ripper.quality.accurate_rip.enabled);
    assert_eq!(s.output.dir_template, "{{Artist}} - {{Album}} ({{Year}})");
    assert!(s.integrations.beets.auto_import);
}

#[test]
fn load_merges_partial_file_over_defaults() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("RIPCD_CONFIG_PATH");

    let ws = tempfile::tempdir().unwrap();
    let cfg_path = ws.path().join("config.yaml");
    std::fs::write(
        &cfg_path,
        r#"
ripper:
  quality:
    compression: 4
    verify: false
output:
  dir_template: "{{Artist}}/{{Album}}"
"#,
    )
    .unwrap();

    let s = Settings::load(Some(&cfg_path), Some(ws.path())).unwrap();

    // Keys present in the file win...
    assert_eq!(s.ripper.quality.compression, 4);
    assert!(!s.ripper.quality.verify);
    assert_eq!(s.output.dir_template, "{{Artist}}/{{Album}}");
    // ...absent keys keep the built-in defaults.
    assert_eq!(s.ripper.engine, "xld");
    assert_eq!(s.ripper.quality.format, "flac");
    assert_eq!(s.ripper.quality.error_correction, 10);
    assert!(s.ripper.quality.test_and_copy);
}

#[test]
fn workspace_override_always_wins() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("RIPCD_CONFIG_PATH");

    let ws = tempfile::tempdir().unwrap();
    let cfg_path = ws.path().join("config.yaml");
    std::fs::write(
        &cfg_path,
        r#"
workspace:
  base_dir: "/somewhere/else"
"#,
    )
    .unwrap();

    let s = Settings::load(Some(&cfg_path), Some(ws.path())).unwrap();
    assert_eq!(s.workspace.base_dir, ws.path());
    assert_eq!(s.paths.workspace, ws.path());
}

#[test]
fn env_overrides_config_file() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("RIPCD_CONFIG_PATH");
    let _g2 = EnvGuard::set("RIPCD__RIPPER__QUALITY__COMPRESSION", "2");

    let ws = tempfile::tempdir().unwrap();
    let cfg_path = ws.path().join("config.yaml");
    std::fs::write(
        &cfg_path,
        r#"
ripper:
  quality:
    compression: 5
"#,
    )
    .unwrap();

    let s = Settings::load(Some(&cfg_path), Some(ws.path())).unwrap();
    assert_eq!(s.ripper.quality.compression, 2);
}

#[test]
fn unsupported_extension_is_a_hard_error() {
    let _lock = env_lock();
    let ws = tempfile::tempdir().unwrap();
    let cfg_path = ws.path().join("config.toml");
    std::fs::write(&cfg_path, "engine = 'xld'").unwrap();

    let err = Settings::load(Some(&cfg_path), Some(ws.path())).unwrap_err();
    assert!(err.to_string().contains("unsupported config file format"));
}

#[test]
fn missing_explicit_file_falls_back_to_defaults() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("RIPCD_CONFIG_PATH");

    let ws = tempfile::tempdir().unwrap();
    let s = Settings::load(Some(&ws.path().join("no-such.yaml")), Some(ws.path())).unwrap();
    assert_eq!(s.ripper.engine, "xld");
}

#[test]
fn load_creates_workspace_directories() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("RIPCD_CONFIG_PATH");

    let ws = tempfile::tempdir().unwrap();
    let base = ws.path().join("rips");
    let s = Settings::load(None, Some(&base)).unwrap();

    for dir in [
        &s.paths.workspace,
        &s.paths.metadata,
        &s.paths.schemas,
        &s.paths.output,
        &s.paths.logs,
        &s.paths.temp,
    ] {
        assert!(dir.is_dir(), "{} should exist", dir.display());
    }
    assert_eq!(s.paths.output, base.join("output"));
}

#[test]
fn auto_create_dirs_false_creates_nothing() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("RIPCD_CONFIG_PATH");

    let ws = tempfile::tempdir().unwrap();
    let cfg_path = ws.path().join("config.yaml");
    std::fs::write(&cfg_path, "workspace:\n  auto_create_dirs: false\n").unwrap();

    let base = ws.path().join("never-made");
    let s = Settings::load(Some(&cfg_path), Some(&base)).unwrap();
    assert!(!base.exists());
    assert_eq!(s.paths.metadata, base.join("metadata"));
}

#[test]
fn tilde_base_dir_expands_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("RIPCD_CONFIG_PATH");
    let _g2 = EnvGuard::set("HOME", "/tmp/ripcd-home");

    let expanded = super::load::expand_tilde(std::path::Path::new("~/cd_ripping"));
    assert_eq!(expanded, PathBuf::from("/tmp/ripcd-home/cd_ripping"));
}
