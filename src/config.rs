use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Which variant of the client is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Remote store is authoritative once logged in; local data is the fallback.
    #[default]
    Synced,
    /// Never talks to the API.
    LocalOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub api_url: String,
    pub mode: Mode,
}

/// Values given on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub api_url: Option<String>,
    pub offline: bool,
}

impl Config {
    pub fn resolve(overrides: Overrides) -> Self {
        Self::resolve_with(overrides, |key| env::var(key).ok())
    }

    pub fn resolve_with(overrides: Overrides, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = overrides
            .data_dir
            .or_else(|| lookup("HYDROTIME_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let api_url = overrides
            .api_url
            .or_else(|| lookup("HYDROTIME_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let offline = overrides.offline
            || lookup("HYDROTIME_OFFLINE").is_some_and(|value| is_truthy(&value));

        Self {
            data_dir,
            api_url,
            mode: if offline { Mode::LocalOnly } else { Mode::Synced },
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
