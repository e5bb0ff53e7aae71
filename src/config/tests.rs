use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
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
fn resolve_config_path_prefers_unison_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("UNISON_CONFIG_PATH", "/tmp/unison-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/unison-test-config.toml")
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
            .join("unison")
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
            .join("unison")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_falls_back_to_home_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/unison/unison.log")
    );
}

#[test]
fn explicit_log_file_wins_over_state_dir() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");

    let mut s = Settings::default();
    assert_eq!(
        s.log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state/unison/unison.log")
    );

    s.logging.file = Some("/var/tmp/radio.log".into());
    assert_eq!(
        s.log_path().unwrap(),
        std::path::PathBuf::from("/var/tmp/radio.log")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_policy_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[sync]
anchor_unix = 1700000000
location = "/srv/radio"
wrap_timeline = true

[playback]
fault_policy = "stop"

[audio]
quit_fade_out_ms = 123

[ui]
header_text = "hello"
tick_ms = 40

[logging]
level = "debug"
file = "/tmp/unison-test.log"

[library]
extensions = ["mp3"]
recursive = true
include_hidden = true
follow_links = false
max_depth = 3
name_fields = ["artist", "title"]
name_separator = "::"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("UNISON_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("UNISON__SYNC__ANCHOR_UNIX");

    let s = Settings::load().unwrap();
    assert_eq!(s.sync.anchor_unix, 1_700_000_000);
    assert_eq!(s.sync.location, "/srv/radio");
    assert!(s.sync.wrap_timeline);
    assert_eq!(s.playback.fault_policy, FaultPolicySetting::Halt);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.tick_ms, 40);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/unison-test.log"))
    );
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(
        s.library.name_fields,
        vec![TrackNameField::Artist, TrackNameField::Title]
    );
    assert_eq!(s.library.name_separator, "::");
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
[sync]
anchor_unix = 1000
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("UNISON_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("UNISON__SYNC__ANCHOR_UNIX", "2000");

    let s = Settings::load().unwrap();
    assert_eq!(s.sync.anchor_unix, 2000);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "UNISON_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );
    let _g2 = EnvGuard::remove("UNISON__SYNC__ANCHOR_UNIX");

    let s = Settings::load().unwrap();
    assert_eq!(s.sync.anchor_unix, 1_737_572_155);
    assert_eq!(s.sync.location, "media");
    assert!(!s.sync.wrap_timeline);
    assert_eq!(s.playback.fault_policy, FaultPolicySetting::Skip);
}

#[test]
fn validate_rejects_unusable_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.ui.tick_ms = 0;
    assert!(s.validate().is_err());
    s.ui.tick_ms = 100;

    s.sync.location = "   ".to_string();
    assert!(s.validate().is_err());
    s.sync.location = "media".to_string();

    s.library.extensions = vec![".".to_string(), " ".to_string()];
    assert!(s.validate().is_err());
}

#[test]
fn settings_serialize_to_toml_and_back() {
    let s = Settings::default();
    let text = toml::to_string_pretty(&s).unwrap();
    assert!(text.contains("[sync]"));
    assert!(text.contains("anchor_unix = 1737572155"));

    let parsed: Settings = toml::from_str(&text).unwrap();
    assert_eq!(parsed.sync.location, s.sync.location);
    assert_eq!(parsed.library.name_fields, s.library.name_fields);
}
