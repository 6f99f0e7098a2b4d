use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub store: StoreConfig,
    pub chat: ChatConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// JSON document with the store connection parameters.
    pub credentials: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("messx-creds.json"),
        }
    }
}

const DEFAULT_HISTORY_LIMIT: usize = 30;
const MAX_HISTORY_LIMIT: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    pub history_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ChatConfig {
    /// History size clamped to `1..=200`; zero falls back to the default.
    pub fn normalized_history_limit(&self) -> usize {
        match self.history_limit {
            0 => DEFAULT_HISTORY_LIMIT,
            value => value.min(MAX_HISTORY_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:9000".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_limit_is_normalized() {
        let limit = |history_limit| ChatConfig { history_limit }.normalized_history_limit();

        assert_eq!(limit(0), DEFAULT_HISTORY_LIMIT);
        assert_eq!(limit(10), 10);
        assert_eq!(limit(10_000), MAX_HISTORY_LIMIT);
    }
}
