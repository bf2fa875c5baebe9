use std::path::{Path, PathBuf};

pub const DEFAULT_HOME: &str = ".crude";
pub const STATE_FILE: &str = "state.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Resolved runtime configuration for the CLI host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub home: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home: PathBuf::from(DEFAULT_HOME),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn new(home: impl Into<PathBuf>, log_level: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            log_level: log_level.into(),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn state_file(&self) -> PathBuf {
        self.home.join(STATE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_file_lives_under_home() {
        let config = AppConfig::new("/tmp/node0", "debug");
        assert_eq!(config.state_file(), PathBuf::from("/tmp/node0/state.json"));
        assert_eq!(AppConfig::default().home(), Path::new(DEFAULT_HOME));
    }
}
