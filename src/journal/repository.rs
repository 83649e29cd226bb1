use std::collections::HashMap;
use std::path::{Path, PathBuf};
use async_trait::async_trait;

use crate::error::JournalError;
use crate::models::trade::{Trade, TradeId};

/// 거래 저장소 인터페이스
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// 거래 저장 (같은 id가 있으면 덮어씀)
    async fn save(&mut self, trade: &Trade) -> Result<(), JournalError>;

    /// 거래 업데이트
    async fn update(&mut self, trade: &Trade) -> Result<(), JournalError>;

    /// ID로 거래 찾기
    async fn find_by_id(&self, trade_id: &TradeId) -> Result<Option<Trade>, JournalError>;

    /// 모든 거래 가져오기 (생성 순서)
    async fn find_all(&self) -> Result<Vec<Trade>, JournalError>;

    /// 거래 삭제
    async fn delete(&mut self, trade_id: &TradeId) -> Result<(), JournalError>;
}

/// 메모리 기반 거래 저장소 구현
#[derive(Clone, Default)]
pub struct InMemoryTradeRepository {
    trades: HashMap<String, Trade>,  // TradeId.0 -> Trade
    order: Vec<String>,              // 삽입 순서
}

impl InMemoryTradeRepository {
    pub fn new() -> Self {
        InMemoryTradeRepository {
            trades: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn with_trades(trades: Vec<Trade>) -> Self {
        let mut repo = Self::new();
        for trade in trades {
            repo.insert(trade);
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, trade: Trade) {
        let id_key = trade.id.0.clone();
        if self.trades.insert(id_key.clone(), trade).is_none() {
            self.order.push(id_key);
        }
    }

    fn snapshot(&self) -> Vec<Trade> {
        self.order
            .iter()
            .filter_map(|id| self.trades.get(id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TradeRepository for InMemoryTradeRepository {
    async fn save(&mut self, trade: &Trade) -> Result<(), JournalError> {
        self.insert(trade.clone());
        Ok(())
    }

    async fn update(&mut self, trade: &Trade) -> Result<(), JournalError> {
        let id_key = &trade.id.0;

        match self.trades.get_mut(id_key) {
            Some(existing) => {
                *existing = trade.clone();
                Ok(())
            }
            None => Err(JournalError::TradeNotFound(trade.id.clone())),
        }
    }

    async fn find_by_id(&self, trade_id: &TradeId) -> Result<Option<Trade>, JournalError> {
        Ok(self.trades.get(&trade_id.0).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Trade>, JournalError> {
        Ok(self.snapshot())
    }

    async fn delete(&mut self, trade_id: &TradeId) -> Result<(), JournalError> {
        if self.trades.remove(&trade_id.0).is_none() {
            return Err(JournalError::TradeNotFound(trade_id.clone()));
        }
        self.order.retain(|id| id != &trade_id.0);
        Ok(())
    }
}

/// JSON 파일 기반 거래 저장소
///
/// 메모리 저장소를 감싸고, 변경이 있을 때마다 전체 목록을 파일에 다시 쓴다.
pub struct FileTradeRepository {
    path: PathBuf,
    inner: InMemoryTradeRepository,
}

impl FileTradeRepository {
    /// 파일이 있으면 읽어들이고, 없으면 빈 저장소로 시작
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();

        let trades: Vec<Trade> = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    JournalError::StorageError(format!("Failed to parse {}: {}", path.display(), e))
                })?
            }
        } else {
            Vec::new()
        };

        log::info!("거래 저장소 로드: {} ({}건)", path.display(), trades.len());

        Ok(FileTradeRepository {
            path,
            inner: InMemoryTradeRepository::with_trades(trades),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> Result<(), JournalError> {
        let json = serde_json::to_vec_pretty(&self.inner.snapshot())?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // tmp 파일에 쓴 뒤 rename
        let tmp = self.path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    // 파일 기록에 실패하면 메모리 상태를 변경 전으로 되돌린다
    async fn commit(&mut self, backup: InMemoryTradeRepository) -> Result<(), JournalError> {
        if let Err(e) = self.persist().await {
            log::error!("거래 저장소 기록 실패 ({}): {}", self.path.display(), e);
            self.inner = backup;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl TradeRepository for FileTradeRepository {
    async fn save(&mut self, trade: &Trade) -> Result<(), JournalError> {
        let backup = self.inner.clone();
        self.inner.save(trade).await?;
        self.commit(backup).await
    }

    async fn update(&mut self, trade: &Trade) -> Result<(), JournalError> {
        let backup = self.inner.clone();
        self.inner.update(trade).await?;
        self.commit(backup).await
    }

    async fn find_by_id(&self, trade_id: &TradeId) -> Result<Option<Trade>, JournalError> {
        self.inner.find_by_id(trade_id).await
    }

    async fn find_all(&self) -> Result<Vec<Trade>, JournalError> {
        self.inner.find_all().await
    }

    async fn delete(&mut self, trade_id: &TradeId) -> Result<(), JournalError> {
        let backup = self.inner.clone();
        self.inner.delete(trade_id).await?;
        self.commit(backup).await
    }
}
