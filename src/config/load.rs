use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `UNISON__`) on top of it, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("UNISON")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.ui.tick_ms == 0 {
            return Err("ui.tick_ms must be >= 1".to_string());
        }
        if self.sync.location.trim().is_empty() {
            return Err("sync.location must not be empty".to_string());
        }
        let has_extension = self
            .library
            .extensions
            .iter()
            .any(|e| !e.trim().trim_start_matches('.').is_empty());
        if !has_extension {
            return Err("library.extensions must name at least one extension".to_string());
        }
        Ok(())
    }

    /// Log file to write to: the configured one, or the XDG state default.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.logging.file.clone().or_else(default_log_path)
    }
}

/// Resolve the config path from `UNISON_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("UNISON_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/unison/config.toml`
/// or `~/.config/unison/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("unison").join("config.toml"))
}

/// Compute the default log path under `$XDG_STATE_HOME/unison/unison.log`
/// or `~/.local/state/unison/unison.log`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("unison").join("unison.log"))
}
