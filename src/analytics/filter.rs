//! 복기 필터
//!
//! 검색어, 키워드, 상태, 손익 조건으로 거래 목록을 좁힌다.
//! 각 조건은 거래 하나만 보고 독립적으로 판정되므로 적용 순서와 무관하다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::stats::analyze;
use crate::models::stats::ReviewStats;
use crate::models::trade::{Trade, TradeStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PnlFilter {
    #[default]
    All,
    Profit,
    Loss,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub search_term: Option<String>,
    pub keywords: Vec<String>,
    pub status: StatusFilter,
    pub pnl_filter: PnlFilter,
    /// 종목 정확히 일치 (대소문자 무시)
    pub asset: Option<String>,
    /// trade_date 기준 포함 구간
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn pnl(mut self, pnl_filter: PnlFilter) -> Self {
        self.pnl_filter = pnl_filter;
        self
    }

    pub fn asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some((start, end));
        self
    }

    /// 모든 활성 조건을 AND로 결합
    pub fn matches(&self, trade: &Trade) -> bool {
        self.matches_search(trade)
            && self.matches_keywords(trade)
            && self.matches_status(trade)
            && self.matches_pnl(trade)
            && self.matches_asset(trade)
            && self.matches_date(trade)
    }

    fn matches_search(&self, trade: &Trade) -> bool {
        match self.search_term.as_deref() {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                trade.asset.to_lowercase().contains(&term) || trade.thesis.to_lowercase().contains(&term)
            }
        }
    }

    fn matches_keywords(&self, trade: &Trade) -> bool {
        self.keywords.is_empty() || self.keywords.iter().any(|k| trade.has_keyword(k))
    }

    fn matches_status(&self, trade: &Trade) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Open => trade.status == TradeStatus::Open,
            StatusFilter::Closed => trade.status == TradeStatus::Closed,
        }
    }

    // Uses the unweighted per-unit P&L; trades without an exit never match.
    fn matches_pnl(&self, trade: &Trade) -> bool {
        if self.pnl_filter == PnlFilter::All {
            return true;
        }

        match trade.pnl() {
            Some(pnl) if self.pnl_filter == PnlFilter::Profit => pnl > 0.0,
            Some(pnl) => pnl < 0.0,
            None => false,
        }
    }

    fn matches_asset(&self, trade: &Trade) -> bool {
        match self.asset.as_deref() {
            None | Some("") => true,
            Some(asset) => trade.asset.eq_ignore_ascii_case(asset),
        }
    }

    fn matches_date(&self, trade: &Trade) -> bool {
        match self.date_range {
            None => true,
            Some((start, end)) => trade.trade_date >= start && trade.trade_date <= end,
        }
    }
}

/// 조건에 맞는 거래만 새 목록으로 반환 (입력 순서 유지)
pub fn apply_filters(trades: &[Trade], criteria: &FilterCriteria) -> Vec<Trade> {
    trades
        .iter()
        .filter(|trade| criteria.matches(trade))
        .cloned()
        .collect()
}

/// 필터링된 거래 목록의 복기 요약
pub fn review_stats(trades: &[Trade]) -> ReviewStats {
    let report = analyze(trades);
    ReviewStats {
        total_trades: trades.len(),
        closed_trades: trades.iter().filter(|t| t.is_closed()).count(),
        total_pnl: report.stats.total_pnl,
        win_rate: report.stats.win_rate,
    }
}
