//! 일지 관리자 통합 테스트
//!
//! 거래 생명주기, 저장소 오류 전파, 파일 저장소 재시작 복원 검증

use async_trait::async_trait;
use mockall::mock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use trade_journal::analytics::{FilterCriteria, StatusFilter};
use trade_journal::error::JournalError;
use trade_journal::journal::{
    BasicTradeValidator, FileTradeRepository, InMemoryTradeRepository, TradeJournal, TradeRepository,
};
use trade_journal::models::trade::{Direction, Trade, TradeClose, TradeDraft, TradeId, TradeStatus, TradeUpdate};

mock! {
    pub Repository {}

    #[async_trait]
    impl TradeRepository for Repository {
        async fn save(&mut self, trade: &Trade) -> Result<(), JournalError>;
        async fn update(&mut self, trade: &Trade) -> Result<(), JournalError>;
        async fn find_by_id(&self, trade_id: &TradeId) -> Result<Option<Trade>, JournalError>;
        async fn find_all(&self) -> Result<Vec<Trade>, JournalError>;
        async fn delete(&mut self, trade_id: &TradeId) -> Result<(), JournalError>;
    }
}

/// 첫 조회만 느린 저장소 (동시 요청 재현용)
struct SlowFirstRead {
    inner: InMemoryTradeRepository,
    slow: AtomicBool,
}

impl SlowFirstRead {
    fn new() -> Self {
        SlowFirstRead { inner: InMemoryTradeRepository::new(), slow: AtomicBool::new(false) }
    }

    fn arm(&self) {
        self.slow.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TradeRepository for SlowFirstRead {
    async fn save(&mut self, trade: &Trade) -> Result<(), JournalError> {
        self.inner.save(trade).await
    }

    async fn update(&mut self, trade: &Trade) -> Result<(), JournalError> {
        self.inner.update(trade).await
    }

    async fn find_by_id(&self, trade_id: &TradeId) -> Result<Option<Trade>, JournalError> {
        if self.slow.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        self.inner.find_by_id(trade_id).await
    }

    async fn find_all(&self) -> Result<Vec<Trade>, JournalError> {
        self.inner.find_all().await
    }

    async fn delete(&mut self, trade_id: &TradeId) -> Result<(), JournalError> {
        self.inner.delete(trade_id).await
    }
}

fn journal() -> TradeJournal {
    let repository = Arc::new(RwLock::new(InMemoryTradeRepository::new()));
    let mut journal = TradeJournal::new(repository);
    journal.add_validator(Box::new(BasicTradeValidator::new()));
    journal
}

fn draft(asset: &str) -> TradeDraft {
    TradeDraft::new(asset, Direction::Long, 100.0, 1000.0, "breakout above range")
        .with_keywords(["fed", "earnings"])
}

#[tokio::test]
async fn test_trade_lifecycle() {
    let journal = journal();

    // 생성
    let trade = journal.create_trade(draft("AAPL")).await.unwrap();
    assert_eq!(trade.status, TradeStatus::Open);

    let stats = journal.stats().await.unwrap().stats;
    assert_eq!(stats.open_positions, 1);
    assert_eq!(stats.total_pnl, 0.0);

    // 청산
    let closed = journal
        .close_trade(&trade.id, TradeClose::new(120.0).with_notes("took profit at target"))
        .await
        .unwrap();
    assert_eq!(closed.status, TradeStatus::Closed);
    assert_eq!(closed.exit_price, Some(120.0));
    assert!(closed.updated_at > trade.updated_at);

    let stats = journal.stats().await.unwrap().stats;
    assert_eq!(stats.open_positions, 0);
    assert!((stats.total_pnl - 200.0).abs() < 1e-9);

    // 두 번 청산할 수 없음
    let again = journal.close_trade(&trade.id, TradeClose::new(130.0)).await;
    assert!(matches!(again, Err(JournalError::InvalidState(_))));

    // 삭제
    journal.delete_trade(&trade.id).await.unwrap();
    assert!(journal.get_trade(&trade.id).await.unwrap().is_none());
    assert_eq!(journal.stats().await.unwrap().stats.total_trades, 0);
}

#[tokio::test]
async fn test_validation_rejects_bad_draft() {
    let journal = journal();

    let zero_entry = TradeDraft::new("AAPL", Direction::Long, 0.0, 1000.0, "thesis");
    assert!(matches!(journal.create_trade(zero_entry).await, Err(JournalError::InvalidParameter(_))));

    let no_thesis = TradeDraft::new("AAPL", Direction::Long, 10.0, 1000.0, "  ");
    assert!(matches!(journal.create_trade(no_thesis).await, Err(JournalError::InvalidParameter(_))));

    assert!(journal.list_trades().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_keywords_registered_once() {
    let journal = journal();
    journal.create_trade(draft("AAPL")).await.unwrap();
    journal.create_trade(draft("MSFT").with_keywords(["fed", "ai"])).await.unwrap();

    let keywords = journal.keywords();
    let registry = keywords.read().await;
    assert_eq!(registry.all(), ["fed", "earnings", "ai"]);
}

#[tokio::test]
async fn test_update_trade() {
    let journal = journal();
    let trade = journal.create_trade(draft("AAPL")).await.unwrap();

    let update = TradeUpdate { thesis: Some("mean reversion".to_string()), ..Default::default() };
    let updated = journal.update_trade(&trade.id, update).await.unwrap();
    assert_eq!(updated.thesis, "mean reversion");
    assert_eq!(updated.created_at, trade.created_at);

    // 미청산 거래에 청산가만 넣는 편집은 거부
    let exit_only = TradeUpdate { exit_price: Some(110.0), ..Default::default() };
    let result = journal.update_trade(&trade.id, exit_only).await;
    assert!(matches!(result, Err(JournalError::InvalidState(_))));

    let missing = journal.update_trade(&TradeId::from("nope"), TradeUpdate::default()).await;
    assert!(matches!(missing, Err(JournalError::TradeNotFound(_))));
}

#[tokio::test]
async fn test_review_scopes_stats() {
    let journal = journal();
    let a = journal.create_trade(draft("AAPL")).await.unwrap();
    journal.create_trade(draft("MSFT")).await.unwrap();
    journal.close_trade(&a.id, TradeClose::new(90.0)).await.unwrap();

    let review = journal
        .review(&FilterCriteria::new().status(StatusFilter::Closed))
        .await
        .unwrap();

    assert_eq!(review.trades.len(), 1);
    assert_eq!(review.stats.closed_trades, 1);
    assert_eq!(review.stats.win_rate, 0.0);
    assert!((review.stats.total_pnl + 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_repository_error_propagates() {
    let mut repo = MockRepository::new();
    repo.expect_save()
        .times(1)
        .returning(|_| Err(JournalError::StorageError("disk full".to_string())));
    repo.expect_find_all().never();

    let journal = TradeJournal::new(Arc::new(RwLock::new(repo)));
    let result = journal.create_trade(draft("AAPL")).await;

    assert!(matches!(result, Err(JournalError::StorageError(_))));
    let keywords = journal.keywords();
    assert!(keywords.read().await.is_empty());
}

#[tokio::test]
async fn test_stats_error_propagates() {
    let mut repo = MockRepository::new();
    repo.expect_find_all()
        .returning(|| Err(JournalError::StorageError("unreadable".to_string())));

    let journal = TradeJournal::new(Arc::new(RwLock::new(repo)));

    assert!(matches!(journal.stats().await, Err(JournalError::StorageError(_))));
}

#[tokio::test]
async fn test_file_repository_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trades.json");

    let created = {
        let repository = Arc::new(RwLock::new(FileTradeRepository::open(&path).unwrap()));
        let journal = TradeJournal::new(repository);
        let trade = journal.create_trade(draft("AAPL")).await.unwrap();
        journal.close_trade(&trade.id, TradeClose::new(120.0)).await.unwrap()
    };

    let reopened = FileTradeRepository::open(&path).unwrap();
    let trades = reopened.find_all().await.unwrap();
    assert_eq!(trades, vec![created]);
}

#[tokio::test]
async fn test_edit_during_close_keeps_the_close() {
    let repository = Arc::new(RwLock::new(SlowFirstRead::new()));
    let journal = Arc::new(TradeJournal::new(repository.clone()));
    let trade = journal.create_trade(draft("AAPL")).await.unwrap();

    repository.read().await.arm();

    // 편집이 먼저 시작되어 느린 조회에 걸린 상태에서 청산 요청
    let edit = {
        let journal = journal.clone();
        let id = trade.id.clone();
        tokio::spawn(async move {
            let update = TradeUpdate { thesis: Some("edited".to_string()), ..Default::default() };
            journal.update_trade(&id, update).await
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    let closed = journal.close_trade(&trade.id, TradeClose::new(120.0)).await;
    let edited = edit.await.unwrap();

    assert!(closed.is_ok());
    assert!(edited.is_ok());

    let stored = journal.get_trade(&trade.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TradeStatus::Closed);
    assert_eq!(stored.exit_price, Some(120.0));
    assert_eq!(stored.thesis, "edited");
}

#[tokio::test]
async fn test_concurrent_closes_only_one_wins() {
    let repository = Arc::new(RwLock::new(SlowFirstRead::new()));
    let journal = TradeJournal::new(repository.clone());
    let trade = journal.create_trade(draft("TSLA")).await.unwrap();

    repository.read().await.arm();

    let (first, second) = tokio::join!(
        journal.close_trade(&trade.id, TradeClose::new(110.0)),
        journal.close_trade(&trade.id, TradeClose::new(90.0)),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results.iter().filter(|r| matches!(r, Err(JournalError::InvalidState(_)))).count(),
        1
    );

    let stored = journal.get_trade(&trade.id).await.unwrap().unwrap();
    let winner = results.iter().find_map(|r| r.as_ref().ok()).unwrap();
    assert_eq!(stored.exit_price, winner.exit_price);
}
