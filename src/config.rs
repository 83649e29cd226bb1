/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use crate::error::JournalError;
use crate::models::settings::{AppSettings, Language};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub journal: JournalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    pub data_dir: String,
}

/// 저장된 설정이 없을 때 쓰는 기본값
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalConfig {
    pub default_currency: String,
    pub default_language: Language,
    pub total_portfolio: f64,
}

impl Config {
    /// 작업 디렉터리의 `config.json`에서 설정 로드
    pub fn load() -> Result<Self, JournalError> {
        Self::load_from(Path::new("config.json"))
    }

    /// 파일에서 설정 로드, 파일이 없으면 기본값 사용
    pub fn load_from(config_path: &Path) -> Result<Self, JournalError> {
        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| JournalError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| JournalError::ConfigError(format!("Failed to read config file: {}", e)))?;

            serde_json::from_str(&contents)
                .map_err(|e| JournalError::ConfigError(format!("Failed to parse config file: {}", e)))?
        } else {
            Config::default()
        };

        // 환경 변수 우선
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// 환경 변수로 실행 시점 필드 덮어쓰기
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = var("JOURNAL_HOST") { self.server.host = v; }
        if let Some(v) = var("JOURNAL_PORT") {
            match v.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => log::warn!("JOURNAL_PORT 무시: {}", v),
            }
        }
        if let Some(v) = var("JOURNAL_DATA_DIR") { self.storage.data_dir = v; }
        if let Some(v) = var("JOURNAL_LOG_LEVEL") { self.logging.level = v; }
        if let Some(v) = var("JOURNAL_CURRENCY") { self.journal.default_currency = v.to_uppercase(); }
    }

    pub fn validate(&self) -> Result<(), JournalError> {
        self.socket_addr()?;
        if self.storage.data_dir.trim().is_empty() {
            return Err(JournalError::ConfigError("storage.data_dir is empty".to_string()));
        }
        if self.journal.default_currency.trim().is_empty() {
            return Err(JournalError::ConfigError("journal.default_currency is empty".to_string()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, JournalError> {
        let ip: IpAddr = self.server.host.parse()
            .map_err(|e| JournalError::ConfigError(format!("Invalid server host {}: {}", self.server.host, e)))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// 저장된 설정이 없을 때 쓰는 기본 앱 설정
    pub fn default_settings(&self) -> AppSettings {
        AppSettings {
            language: self.journal.default_language,
            total_portfolio: self.journal.total_portfolio,
            currency: self.journal.default_currency.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3030,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
            journal: JournalConfig {
                default_currency: "USD".to_string(),
                default_language: Language::Zh,
                total_portfolio: 100_000.0,
            },
        }
    }
}
