//! 투자 일지 라이브러리
//!
//! 거래 기록, 포트폴리오 통계, 복기 필터, 원칙 수첩을 제공하는 일지 엔진입니다.

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod journal;
pub mod models;
pub mod storage;
pub mod utils;

// 핵심 타입 재노출
pub use crate::analytics::{analyze, apply_filters, compute_stats, FilterCriteria, PnlFilter, StatusFilter};
pub use crate::error::JournalError;
pub use crate::journal::{TradeJournal, TradeRepository};
pub use crate::models::stats::{PortfolioStats, ReviewStats, StatsReport};
pub use crate::models::trade::{Direction, Trade, TradeId, TradeStatus};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, JournalError>;
