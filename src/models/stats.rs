use serde::{Deserialize, Serialize};

use crate::models::trade::{Trade, TradeId};

/// 거래 목록에서 매번 다시 계산되는 포트폴리오 성과 스냅샷
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_pnl: f64,
    pub total_pnl_percentage: f64,
    pub win_rate: f64,
    pub open_positions: usize,
    pub total_trades: usize,
    pub average_return: f64,
}

/// 통계와 기여도가 0으로 처리된 청산 거래 목록
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    #[serde(flatten)]
    pub stats: PortfolioStats,
    pub flagged: Vec<TradeId>,
}

/// 복기 화면 요약 (필터링된 거래 기준)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_trades: usize,
    pub closed_trades: usize,
    pub total_pnl: f64,
    pub win_rate: f64,
}

/// 복기 결과: 필터링된 거래와 그 요약
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub trades: Vec<Trade>,
    pub stats: ReviewStats,
}
