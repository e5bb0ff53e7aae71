use std::fs::{self, File, OpenOptions};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config;

/// Install the global subscriber.
///
/// The terminal belongs to the TUI, so events go to the log file. With no
/// resolvable log path, or one that cannot be opened, logging stays disabled
/// and the radio keeps going.
pub fn init_logging(settings: &config::Settings) {
    let file = match open_log_file(settings) {
        Ok(Some(file)) => file,
        Ok(None) => return,
        Err(e) => {
            eprintln!("unison: logging disabled: {e:#}");
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.as_str()));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
    {
        eprintln!("unison: logging disabled: {e}");
    }
}

/// Open the configured log file for appending, creating its directory.
fn open_log_file(settings: &config::Settings) -> anyhow::Result<Option<File>> {
    let Some(path) = settings.log_path() else {
        return Ok(None);
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn log_file_and_directory_are_created() {
        let dir = tempdir().unwrap();
        let mut settings = config::Settings::default();
        settings.logging.file = Some(dir.path().join("state").join("unison.log"));

        assert!(open_log_file(&settings).unwrap().is_some());
        assert!(dir.path().join("state").join("unison.log").is_file());
    }

    #[test]
    fn unusable_log_path_disables_logging_without_failing() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"regular file").unwrap();

        let mut settings = config::Settings::default();
        settings.logging.file = Some(blocker.join("unison.log"));

        assert!(open_log_file(&settings).is_err());
        // Returns normally; startup carries on without a subscriber.
        init_logging(&settings);
    }
}
