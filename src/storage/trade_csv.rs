use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::JournalError;
use crate::models::trade::{Direction, InstrumentType, Trade, TradeId, TradeStatus};

const KEYWORD_SEPARATOR: char = ';';

/// 거래 목록을 CSV 파일로 내보내기
pub fn export_trades(path: impl AsRef<Path>, trades: &[Trade]) -> Result<usize, JournalError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())
        .map_err(|e| JournalError::StorageError(e.to_string()))?;

    for trade in trades {
        wtr.serialize(CsvRow::from(trade))
            .map_err(|e| JournalError::StorageError(e.to_string()))?;
    }
    wtr.flush()?;

    log::info!("CSV 내보내기: {} ({}건)", path.as_ref().display(), trades.len());
    Ok(trades.len())
}

/// CSV 파일에서 거래 읽기. id/생성시각이 비어 있으면 새로 부여
pub fn import_trades(path: impl AsRef<Path>) -> Result<Vec<Trade>, JournalError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path.as_ref())
        .map_err(|e| JournalError::StorageError(e.to_string()))?;

    let mut result = Vec::new();
    for (line, rec) in rdr.deserialize().enumerate() {
        let row: CsvRow = rec.map_err(|e| JournalError::ParseError(format!("row {}: {}", line + 1, e)))?;
        result.push(row.into_trade()?);
    }
    Ok(result)
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    asset: String,
    direction: Direction,
    entry_price: f64,
    amount: f64,
    #[serde(default)]
    exit_price: Option<f64>,
    status: TradeStatus,
    #[serde(default)]
    macro_context: String,
    thesis: String,
    #[serde(default)]
    post_mortem_notes: Option<String>,
    trade_date: NaiveDate,
    #[serde(default)]
    vix_index: Option<f64>,
    #[serde(default)]
    instrument_type: Option<InstrumentType>,
    #[serde(default)]
    portfolio_percentage: Option<f64>,
    #[serde(default)]
    take_profit: Option<f64>,
    #[serde(default)]
    stop_loss: Option<f64>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<&Trade> for CsvRow {
    fn from(trade: &Trade) -> Self {
        CsvRow {
            id: Some(trade.id.0.clone()),
            asset: trade.asset.clone(),
            direction: trade.direction,
            entry_price: trade.entry_price,
            amount: trade.amount,
            exit_price: trade.exit_price,
            status: trade.status,
            macro_context: trade.macro_context.join(&KEYWORD_SEPARATOR.to_string()),
            thesis: trade.thesis.clone(),
            post_mortem_notes: trade.post_mortem_notes.clone(),
            trade_date: trade.trade_date,
            vix_index: Some(trade.vix_index),
            instrument_type: Some(trade.instrument_type),
            portfolio_percentage: trade.portfolio_percentage,
            take_profit: trade.take_profit,
            stop_loss: trade.stop_loss,
            created_at: Some(trade.created_at),
            updated_at: Some(trade.updated_at),
        }
    }
}

impl CsvRow {
    fn into_trade(self) -> Result<Trade, JournalError> {
        if self.status == TradeStatus::Closed && self.exit_price.is_none() {
            log::warn!("CSV 행 {}: closed 상태지만 청산가 없음", self.asset);
        }
        if self.status == TradeStatus::Open && self.exit_price.is_some() {
            return Err(JournalError::ParseError(format!(
                "open trade {} cannot carry an exit price", self.asset
            )));
        }

        let now = Utc::now();
        let created_at = self.created_at.unwrap_or(now);

        Ok(Trade {
            id: self.id.filter(|id| !id.is_empty()).map(TradeId).unwrap_or_else(TradeId::generate),
            asset: self.asset,
            direction: self.direction,
            entry_price: self.entry_price,
            amount: self.amount,
            portfolio_percentage: self.portfolio_percentage,
            take_profit: self.take_profit,
            stop_loss: self.stop_loss,
            exit_price: self.exit_price,
            status: self.status,
            macro_context: self
                .macro_context
                .split(KEYWORD_SEPARATOR)
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            thesis: self.thesis,
            post_mortem_notes: self.post_mortem_notes.filter(|n| !n.is_empty()),
            trade_date: self.trade_date,
            vix_index: self.vix_index.unwrap_or(0.0),
            instrument_type: self.instrument_type.unwrap_or_default(),
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::{TradeClose, TradeDraft};
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_export_then_import_preserves_trades() {
        let mut closed = Trade::open(
            TradeDraft::new("ETHUSDT", Direction::Short, 2000.0, 500.0, "overbought, fading")
                .with_keywords(["fomc", "risk-off"]),
        );
        closed.close(TradeClose::new(1800.0).with_notes("worked"));
        let open = Trade::open(TradeDraft::new("SPY", Direction::Long, 500.0, 1000.0, "trend"));

        let dir = tempdir().unwrap();
        let path = dir.path().join("export.csv");
        assert_eq!(export_trades(&path, &[closed.clone(), open.clone()]).unwrap(), 2);

        let imported = import_trades(&path).unwrap();
        assert_eq!(imported, vec![closed, open]);
    }

    #[test]
    fn test_import_fills_missing_id_and_timestamps() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path();
        std::fs::write(
            path,
            "asset,direction,entry_price,amount,exit_price,status,macro_context,thesis,trade_date\n\
             BTC,long,100,1000,120,closed,fed; cpi ,halving,2024-04-20\n",
        )
        .unwrap();

        let trades = import_trades(path).unwrap();
        assert_eq!(trades.len(), 1);
        assert!(!trades[0].id.0.is_empty());
        assert_eq!(trades[0].macro_context, vec!["fed", "cpi"]);
        assert_eq!(trades[0].exit_price, Some(120.0));
        assert_eq!(trades[0].created_at, trades[0].updated_at);
    }

    #[test]
    fn test_import_rejects_open_trade_with_exit() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path();
        std::fs::write(
            path,
            "asset,direction,entry_price,amount,exit_price,status,macro_context,thesis,trade_date\n\
             BTC,long,100,1000,120,open,,x,2024-04-20\n",
        )
        .unwrap();

        assert!(matches!(import_trades(path), Err(JournalError::ParseError(_))));
    }
}
