use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analytics::{analyze, apply_filters, review_stats, FilterCriteria};
use crate::error::JournalError;
use crate::journal::keywords::KeywordRegistry;
use crate::journal::repository::TradeRepository;
use crate::journal::validator::TradeValidator;
use crate::models::stats::{Review, StatsReport};
use crate::models::trade::{Trade, TradeClose, TradeDraft, TradeId, TradeUpdate};
use crate::utils::logging;

/// 거래 일지 관리자 - 거래 생명주기 관리
pub struct TradeJournal {
    repository: Arc<RwLock<dyn TradeRepository>>,
    validators: Vec<Box<dyn TradeValidator>>,
    keywords: Arc<RwLock<KeywordRegistry>>,
}

impl TradeJournal {
    pub fn new(repository: Arc<RwLock<dyn TradeRepository>>) -> Self {
        TradeJournal {
            repository,
            validators: Vec::new(),
            keywords: Arc::new(RwLock::new(KeywordRegistry::new())),
        }
    }

    /// 기존 키워드 등록부 공유
    pub fn with_keywords(mut self, keywords: Arc<RwLock<KeywordRegistry>>) -> Self {
        self.keywords = keywords;
        self
    }

    /// 검증기 추가
    pub fn add_validator(&mut self, validator: Box<dyn TradeValidator>) {
        self.validators.push(validator);
    }

    pub fn keywords(&self) -> Arc<RwLock<KeywordRegistry>> {
        self.keywords.clone()
    }

    /// 거래 생성 (status = open)
    pub async fn create_trade(&self, draft: TradeDraft) -> Result<Trade, JournalError> {
        self.validate(&draft)?;

        let trade = Trade::open(draft);
        {
            let mut repo = self.repository.write().await;
            repo.save(&trade).await?;
        }
        self.register_keywords(&trade).await;

        logging::log_trade_created(&trade);
        Ok(trade)
    }

    /// 거래 청산. open 상태에서만 가능
    ///
    /// 조회, 상태 확인, 기록을 하나의 쓰기 잠금 안에서 처리한다.
    pub async fn close_trade(&self, trade_id: &TradeId, close: TradeClose) -> Result<Trade, JournalError> {
        for validator in &self.validators {
            validator.validate_close(&close)?;
        }

        let trade = {
            let mut repo = self.repository.write().await;
            let mut trade = repo
                .find_by_id(trade_id)
                .await?
                .ok_or_else(|| JournalError::TradeNotFound(trade_id.clone()))?;

            if !trade.is_open() {
                return Err(JournalError::InvalidState(format!("Trade {} is already closed", trade_id)));
            }

            trade.close(close);
            repo.update(&trade).await?;
            trade
        };

        logging::log_trade_closed(&trade);
        Ok(trade)
    }

    /// 거래 편집 (id, created_at 제외)
    ///
    /// 청산과 같은 쓰기 잠금을 잡으므로 동시에 들어온 청산을 되돌리지 않는다.
    pub async fn update_trade(&self, trade_id: &TradeId, update: TradeUpdate) -> Result<Trade, JournalError> {
        let trade = {
            let mut repo = self.repository.write().await;
            let mut trade = repo
                .find_by_id(trade_id)
                .await?
                .ok_or_else(|| JournalError::TradeNotFound(trade_id.clone()))?;

            if let Some(exit_price) = update.exit_price {
                if trade.is_open() {
                    return Err(JournalError::InvalidState(
                        format!("Trade {} is open; close it to record an exit price", trade_id)
                    ));
                }
                let close = TradeClose::new(exit_price);
                for validator in &self.validators {
                    validator.validate_close(&close)?;
                }
            }

            trade.apply(update);
            self.validate(&trade.to_draft())?;
            repo.update(&trade).await?;
            trade
        };
        self.register_keywords(&trade).await;

        log::info!("거래 수정: {} ({})", trade.id, trade.asset);
        Ok(trade)
    }

    pub async fn delete_trade(&self, trade_id: &TradeId) -> Result<(), JournalError> {
        {
            let mut repo = self.repository.write().await;
            repo.delete(trade_id).await?;
        }
        logging::log_trade_deleted(trade_id);
        Ok(())
    }

    pub async fn get_trade(&self, trade_id: &TradeId) -> Result<Option<Trade>, JournalError> {
        let repo = self.repository.read().await;
        repo.find_by_id(trade_id).await
    }

    pub async fn list_trades(&self) -> Result<Vec<Trade>, JournalError> {
        let repo = self.repository.read().await;
        repo.find_all().await
    }

    /// 현재 스냅샷에 대한 포트폴리오 통계
    pub async fn stats(&self) -> Result<StatsReport, JournalError> {
        let trades = self.list_trades().await?;
        Ok(analyze(&trades))
    }

    /// 필터 적용 후 복기 요약
    pub async fn review(&self, criteria: &FilterCriteria) -> Result<Review, JournalError> {
        let trades = self.list_trades().await?;
        let filtered = apply_filters(&trades, criteria);
        let stats = review_stats(&filtered);
        Ok(Review { trades: filtered, stats })
    }

    fn validate(&self, draft: &TradeDraft) -> Result<(), JournalError> {
        for validator in &self.validators {
            validator.validate(draft)?;
        }
        Ok(())
    }

    async fn register_keywords(&self, trade: &Trade) {
        let mut keywords = self.keywords.write().await;
        let added = keywords.extend(trade.macro_context.iter().cloned());
        if added > 0 {
            log::debug!("키워드 {}개 등록", added);
        }
    }
}
