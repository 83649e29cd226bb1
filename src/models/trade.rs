use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::analytics::pnl;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TradeId(pub String);

impl TradeId {
    pub fn generate() -> Self {
        TradeId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TradeId {
    fn from(s: &str) -> Self {
        TradeId(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Open => write!(f, "open"),
            TradeStatus::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    #[default]
    #[serde(alias = "现货")]
    Spot,
    #[serde(alias = "合约")]
    Futures,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: TradeId,
    pub asset: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    pub status: TradeStatus,
    #[serde(default)]
    pub macro_context: Vec<String>,
    pub thesis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_mortem_notes: Option<String>,
    pub trade_date: NaiveDate,
    #[serde(default)]
    pub vix_index: f64,
    #[serde(default)]
    pub instrument_type: InstrumentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trade {
    /// 입력 폼 데이터로 새 (미청산) 거래 생성
    pub fn open(draft: TradeDraft) -> Self {
        let now = Utc::now();
        Trade {
            id: TradeId::generate(),
            asset: draft.asset,
            direction: draft.direction,
            entry_price: draft.entry_price,
            amount: draft.amount,
            portfolio_percentage: draft.portfolio_percentage,
            take_profit: draft.take_profit,
            stop_loss: draft.stop_loss,
            exit_price: None,
            status: TradeStatus::Open,
            macro_context: draft.macro_context,
            thesis: draft.thesis,
            post_mortem_notes: None,
            trade_date: draft.trade_date.unwrap_or_else(|| now.date_naive()),
            vix_index: round_vix(draft.vix_index),
            instrument_type: draft.instrument_type,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// 청산 완료 + 청산가 존재
    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed && self.exit_price.is_some()
    }

    /// 단위당 실현 손익 (청산가가 없으면 None)
    pub fn pnl(&self) -> Option<f64> {
        self.exit_price
            .map(|exit| pnl::pnl(self.entry_price, exit, self.direction))
    }

    pub fn pnl_percentage(&self) -> Option<f64> {
        self.exit_price
            .map(|exit| pnl::pnl_percentage(self.entry_price, exit, self.direction))
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.macro_context.iter().any(|k| k == keyword)
    }

    /// 청산 적용. `open` 상태에서 한 번만 유효
    pub fn close(&mut self, close: TradeClose) {
        self.exit_price = Some(close.exit_price);
        self.post_mortem_notes = close
            .post_mortem_notes
            .filter(|notes| !notes.trim().is_empty());
        self.status = TradeStatus::Closed;
        self.touch();
    }

    /// 편집 가능한 필드만 갱신 (id, created_at 제외)
    pub fn apply(&mut self, update: TradeUpdate) {
        if let Some(asset) = update.asset {
            self.asset = asset;
        }
        if let Some(direction) = update.direction {
            self.direction = direction;
        }
        if let Some(entry_price) = update.entry_price {
            self.entry_price = entry_price;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(pct) = update.portfolio_percentage {
            self.portfolio_percentage = Some(pct);
        }
        if let Some(tp) = update.take_profit {
            self.take_profit = Some(tp);
        }
        if let Some(sl) = update.stop_loss {
            self.stop_loss = Some(sl);
        }
        if let Some(exit_price) = update.exit_price {
            self.exit_price = Some(exit_price);
        }
        if let Some(keywords) = update.macro_context {
            self.macro_context = keywords;
        }
        if let Some(thesis) = update.thesis {
            self.thesis = thesis;
        }
        if let Some(notes) = update.post_mortem_notes {
            self.post_mortem_notes = Some(notes);
        }
        if let Some(date) = update.trade_date {
            self.trade_date = date;
        }
        if let Some(vix) = update.vix_index {
            self.vix_index = round_vix(vix);
        }
        if let Some(instrument_type) = update.instrument_type {
            self.instrument_type = instrument_type;
        }
        self.touch();
    }

    /// 현재 상태를 폼 데이터로 되돌림 (편집 후 재검증용)
    pub fn to_draft(&self) -> TradeDraft {
        TradeDraft {
            asset: self.asset.clone(),
            direction: self.direction,
            entry_price: self.entry_price,
            amount: self.amount,
            portfolio_percentage: self.portfolio_percentage,
            take_profit: self.take_profit,
            stop_loss: self.stop_loss,
            macro_context: self.macro_context.clone(),
            thesis: self.thesis.clone(),
            trade_date: Some(self.trade_date),
            vix_index: self.vix_index,
            instrument_type: self.instrument_type,
        }
    }

    fn touch(&mut self) {
        let now = Utc::now();
        // updated_at must move forward even within one clock tick
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
    }
}

fn round_vix(vix: f64) -> f64 {
    (vix * 100.0).round() / 100.0
}

/// 거래 입력 폼 데이터
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeDraft {
    pub asset: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub amount: f64,
    #[serde(default)]
    pub portfolio_percentage: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub macro_context: Vec<String>,
    pub thesis: String,
    #[serde(default)]
    pub trade_date: Option<NaiveDate>,
    #[serde(default)]
    pub vix_index: f64,
    #[serde(default)]
    pub instrument_type: InstrumentType,
}

impl TradeDraft {
    pub fn new(
        asset: impl Into<String>,
        direction: Direction,
        entry_price: f64,
        amount: f64,
        thesis: impl Into<String>,
    ) -> Self {
        TradeDraft {
            asset: asset.into(),
            direction,
            entry_price,
            amount,
            portfolio_percentage: None,
            take_profit: None,
            stop_loss: None,
            macro_context: Vec::new(),
            thesis: thesis.into(),
            trade_date: None,
            vix_index: 0.0,
            instrument_type: InstrumentType::Spot,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.macro_context = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_plan(mut self, take_profit: f64, stop_loss: f64) -> Self {
        self.take_profit = Some(take_profit);
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_trade_date(mut self, date: NaiveDate) -> Self {
        self.trade_date = Some(date);
        self
    }

    pub fn with_vix(mut self, vix: f64) -> Self {
        self.vix_index = vix;
        self
    }

    pub fn with_instrument_type(mut self, instrument_type: InstrumentType) -> Self {
        self.instrument_type = instrument_type;
        self
    }
}

/// 청산 결과
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeClose {
    pub exit_price: f64,
    #[serde(default)]
    pub post_mortem_notes: Option<String>,
}

impl TradeClose {
    pub fn new(exit_price: f64) -> Self {
        TradeClose { exit_price, post_mortem_notes: None }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.post_mortem_notes = Some(notes.into());
        self
    }
}

/// 부분 편집 요청. None 필드는 그대로 유지
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeUpdate {
    pub asset: Option<String>,
    pub direction: Option<Direction>,
    pub entry_price: Option<f64>,
    pub amount: Option<f64>,
    pub portfolio_percentage: Option<f64>,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
    pub exit_price: Option<f64>,
    pub macro_context: Option<Vec<String>>,
    pub thesis: Option<String>,
    pub post_mortem_notes: Option<String>,
    pub trade_date: Option<NaiveDate>,
    pub vix_index: Option<f64>,
    pub instrument_type: Option<InstrumentType>,
}
