use super::load::{default_config_path, default_state_dir, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
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
fn resolve_config_path_prefers_tapedeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", "/tmp/tapedeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/tapedeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("tapedeck")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("tapedeck")
            .join("config.toml")
    );
}

#[test]
fn default_state_dir_uses_xdg_state_home_then_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(
        default_state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state").join("tapedeck")
    );
    drop(_g1);

    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("state")
            .join("tapedeck")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 100
quit_fade_out_ms = 0

[controls]
scrub_seconds = 9
volume_step = 10

[ui]
header_text = "hello"
time_separator = " / "
show_cover = false

[library]
extensions = ["mp3"]
recursive = true
include_hidden = true
follow_links = false
max_depth = 3

[cover]
max_bytes = 1024
thumbnail_width = 8
thumbnail_height = 4

[session]
path = "/tmp/somewhere/session.toml"
save_on_change = true

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TAPEDECK__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 10);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.time_separator, " / ");
    assert!(!s.ui.show_cover);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.cover.max_bytes, 1024);
    assert_eq!(s.cover.thumbnail_width, 8);
    assert_eq!(s.cover.thumbnail_height, 4);
    assert_eq!(
        s.session.path.as_deref(),
        Some(std::path::Path::new("/tmp/somewhere/session.toml"))
    );
    assert!(s.session.save_on_change);
    assert_eq!(s.logging.level, "debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TAPEDECK__AUDIO__TICK_MS", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 40);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "TAPEDECK_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );
    let _g2 = EnvGuard::remove("TAPEDECK__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 250);
    assert_eq!(s.controls.volume_step, 5);
    assert!(!s.library.recursive);
    assert!(!s.session.save_on_change);
}

#[test]
fn validate_rejects_degenerate_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0;
    assert!(s.validate().is_err());
    s.controls.volume_step = 101;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![" . ".to_string(), String::new()];
    assert!(s.validate().is_err());
}
