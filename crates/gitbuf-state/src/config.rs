//! On-disk settings, persisted as a small versioned JSON file under the
//! platform state directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs, io};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// `-N` passed to the log snapshot commands.
    pub log_max_count: usize,
    /// Line cap of the process-log buffer.
    pub process_log_max_lines: usize,
    /// Delay before a save triggers a refresh.
    pub refresh_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_max_count: 32,
            process_log_max_lines: 5000,
            refresh_debounce_ms: 300,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
struct ConfigFileV1 {
    version: u32,
    log_max_count: Option<usize>,
    process_log_max_lines: Option<usize>,
    refresh_debounce_ms: Option<u64>,
}

const CONFIG_FILE_VERSION: u32 = 1;

pub fn load() -> Config {
    let Some(path) = default_config_path() else {
        return Config::default();
    };
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Config {
    let Ok(contents) = fs::read_to_string(path) else {
        return Config::default();
    };
    let Ok(file) = serde_json::from_str::<ConfigFileV1>(&contents) else {
        return Config::default();
    };
    if file.version != CONFIG_FILE_VERSION {
        return Config::default();
    }

    let defaults = Config::default();
    Config {
        log_max_count: file.log_max_count.unwrap_or(defaults.log_max_count),
        process_log_max_lines: file
            .process_log_max_lines
            .unwrap_or(defaults.process_log_max_lines),
        refresh_debounce_ms: file
            .refresh_debounce_ms
            .unwrap_or(defaults.refresh_debounce_ms),
    }
}

pub fn persist(config: &Config) -> io::Result<()> {
    let Some(path) = default_config_path() else {
        return Ok(());
    };
    persist_to_path(config, &path)
}

pub fn persist_to_path(config: &Config, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = ConfigFileV1 {
        version: CONFIG_FILE_VERSION,
        log_max_count: Some(config.log_max_count),
        process_log_max_lines: Some(config.process_log_max_lines),
        refresh_debounce_ms: Some(config.refresh_debounce_ms),
    };
    let contents = serde_json::to_vec(&file).expect("config serializes");

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)?;

    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            // Windows can't overwrite an existing file via rename.
            let copy_res = fs::copy(&tmp_path, path);
            let _ = fs::remove_file(&tmp_path);
            match copy_res {
                Ok(_) => Ok(()),
                Err(copy_err) => Err(io::Error::new(
                    copy_err.kind(),
                    format!("rename failed: {rename_err}; copy failed: {copy_err}"),
                )),
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    // Avoid writing to the user state dir during unit tests.
    if cfg!(test) {
        return None;
    }
    Some(state_dir()?.join("config.json"))
}

fn state_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        if let Some(state_home) = env::var_os("XDG_STATE_HOME") {
            return Some(PathBuf::from(state_home).join("gitbuf"));
        }
        let home = env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".local/state/gitbuf"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = env::var_os("HOME")?;
        Some(PathBuf::from(home).join("Library/Application Support/gitbuf"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = env::var_os("LOCALAPPDATA").or_else(|| env::var_os("APPDATA"))?;
        Some(PathBuf::from(appdata).join("gitbuf"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".gitbuf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!(
            "gitbuf-config-test-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::create_dir_all(&dir);
        dir.join("config.json")
    }

    #[test]
    fn round_trips_through_disk() {
        let path = temp_path("roundtrip");
        let config = Config {
            log_max_count: 64,
            process_log_max_lines: 1000,
            refresh_debounce_ms: 150,
        };
        persist_to_path(&config, &path).expect("persist succeeds");
        assert_eq!(load_from_path(&path), config);
    }

    #[test]
    fn missing_or_malformed_files_fall_back_to_defaults() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        assert_eq!(load_from_path(&path), Config::default());

        fs::write(&path, "not json").unwrap();
        assert_eq!(load_from_path(&path), Config::default());
    }

    #[test]
    fn unknown_versions_fall_back_to_defaults() {
        let path = temp_path("version");
        fs::write(&path, r#"{"version": 99, "log_max_count": 7}"#).unwrap();
        assert_eq!(load_from_path(&path), Config::default());
    }

    #[test]
    fn partial_files_keep_defaults_for_missing_fields() {
        let path = temp_path("partial");
        fs::write(&path, r#"{"version": 1, "log_max_count": 7}"#).unwrap();
        let config = load_from_path(&path);
        assert_eq!(config.log_max_count, 7);
        assert_eq!(
            config.refresh_debounce_ms,
            Config::default().refresh_debounce_ms
        );
    }
}
