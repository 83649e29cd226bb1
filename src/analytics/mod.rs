//! 성과 분석 모듈
//!
//! 단일 거래 손익, 포트폴리오 통계, 복기 필터 제공

pub mod filter;
pub mod pnl;
pub mod stats;

pub use filter::{apply_filters, review_stats, FilterCriteria, PnlFilter, StatusFilter};
pub use pnl::{pnl, pnl_percentage, weighted_pnl};
pub use stats::{analyze, compute_stats};
