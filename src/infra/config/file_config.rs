use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{AppConfig, ChatConfig, LogConfig, ServerConfig, StoreConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub store: Option<FileStoreConfig>,
    pub chat: Option<FileChatConfig>,
    pub server: Option<FileServerConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(store) = self.store {
            store.merge_into(&mut config.store);
        }

        if let Some(chat) = self.chat {
            chat.merge_into(&mut config.chat);
        }

        if let Some(server) = self.server {
            server.merge_into(&mut config.server);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileStoreConfig {
    pub credentials: Option<PathBuf>,
}

impl FileStoreConfig {
    fn merge_into(self, config: &mut StoreConfig) {
        if let Some(credentials) = self.credentials {
            config.credentials = credentials;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileChatConfig {
    pub history_limit: Option<usize>,
}

impl FileChatConfig {
    fn merge_into(self, config: &mut ChatConfig) {
        if let Some(history_limit) = self.history_limit {
            config.history_limit = history_limit;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileServerConfig {
    pub bind: Option<String>,
}

impl FileServerConfig {
    fn merge_into(self, config: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
    }
}
