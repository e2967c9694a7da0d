//! Coordinator configuration

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Base URL the original deployment points at. Plain HTTP; the
/// coordinator logs a warning whenever the configured URL is not HTTPS.
pub const DEFAULT_API_URL: &str = "http://20.119.41.172:4000";

/// How long to wait after injecting the bridge before messaging it, so it
/// can register its listener first. A heuristic, not a guarantee.
pub const DEFAULT_INJECTION_SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Remote authentication service base URL
    pub api_base_url: Url,
    /// Settle delay between bridge injection and the first message to it
    pub injection_settle: Duration,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let api_base_url = Url::parse(DEFAULT_API_URL).expect("DEFAULT_API_URL is valid");

        Self {
            database_path: data_dir.join("aegis.db"),
            api_base_url,
            injection_settle: DEFAULT_INJECTION_SETTLE,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("AEGIS"))
            .unwrap_or_else(|| PathBuf::from(".aegis"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Simple dirs implementation for common directories
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
