/**
* filename : storage
* author : HAMA
* date: 2025. 5. 14.
* description: 데이터 디렉터리 기반 JSON 저장소 (키별 파일 1개)
**/

pub mod trade_csv;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::error::JournalError;
use crate::journal::keywords::KeywordRegistry;
use crate::journal::principles::PrincipleBook;
use crate::models::principle::{Principle, PrincipleCategory};
use crate::models::settings::AppSettings;

const TRADES_FILE: &str = "trades.json";
const SETTINGS_FILE: &str = "settings.json";
const KEYWORDS_FILE: &str = "keywords.json";
const PRINCIPLES_FILE: &str = "principles.json";
const CATEGORIES_FILE: &str = "categories.json";

#[derive(Debug, Clone)]
pub struct JournalStorage {
    data_dir: PathBuf,
}

impl JournalStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        JournalStorage { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 거래 저장소 파일 경로 (FileTradeRepository 용)
    pub fn trades_path(&self) -> PathBuf {
        self.data_dir.join(TRADES_FILE)
    }

    /// 저장된 설정 파일 존재 여부
    pub async fn has_settings(&self) -> bool {
        fs::metadata(self.data_dir.join(SETTINGS_FILE)).await.is_ok()
    }

    pub async fn load_settings(&self) -> AppSettings {
        self.load_or(SETTINGS_FILE, AppSettings::default).await
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> Result<(), JournalError> {
        self.save(SETTINGS_FILE, settings).await
    }

    pub async fn load_keywords(&self) -> KeywordRegistry {
        self.load_or(KEYWORDS_FILE, KeywordRegistry::new).await
    }

    pub async fn save_keywords(&self, keywords: &KeywordRegistry) -> Result<(), JournalError> {
        self.save(KEYWORDS_FILE, keywords).await
    }

    /// 원칙 수첩 로드. 원칙 파일이 아직 없으면 예시 수첩을 만들어 저장한다
    pub async fn load_principle_book(&self) -> PrincipleBook {
        if fs::metadata(self.data_dir.join(PRINCIPLES_FILE)).await.is_err() {
            let book = PrincipleBook::demo();
            match self.save_principle_book(&book).await {
                Ok(()) => log::info!("예시 원칙 수첩 생성: {}", self.data_dir.display()),
                Err(e) => log::warn!("예시 원칙 수첩 저장 실패: {}", e),
            }
            return book;
        }

        let principles: Vec<Principle> = self.load_or(PRINCIPLES_FILE, Vec::new).await;
        let categories: Vec<PrincipleCategory> = self.load_or(CATEGORIES_FILE, PrincipleCategory::defaults).await;
        PrincipleBook::from_parts(principles, categories)
    }

    pub async fn save_principle_book(&self, book: &PrincipleBook) -> Result<(), JournalError> {
        self.save(PRINCIPLES_FILE, book.principles()).await?;
        self.save(CATEGORIES_FILE, book.categories()).await
    }

    // 파일이 없으면 기본값, 읽기/파싱 실패 시 로그 후 기본값
    async fn load_or<T, F>(&self, name: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.data_dir.join(name);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return default(),
            Err(e) => {
                log::error!("저장 데이터 읽기 실패 ({}): {}", path.display(), e);
                return default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                log::error!("저장 데이터 파싱 실패 ({}): {}", path.display(), e);
                default()
            }
        }
    }

    // 저장마다 고유한 tmp 파일에 쓴 뒤 rename
    async fn save<T: Serialize + Sync + ?Sized>(&self, name: &str, value: &T) -> Result<(), JournalError> {
        let json = serde_json::to_vec_pretty(value)?;

        fs::create_dir_all(&self.data_dir).await.map_err(|e| {
            JournalError::StorageError(format!("Failed to create {}: {}", self.data_dir.display(), e))
        })?;

        let path = self.data_dir.join(name);
        let tmp = self.data_dir.join(format!("{}.{}.tmp", name, Uuid::new_v4()));

        fs::write(&tmp, json).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}
