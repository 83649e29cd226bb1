//! 로깅 유틸리티
//!
//! 로그 초기화 및 일지 이벤트 로그 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::JournalError;
use crate::models::trade::{Trade, TradeId};

/// 로깅 시스템 초기화
///
/// `RUST_LOG`가 설정되어 있으면 설정 파일의 레벨보다 우선한다.
pub fn init(default_level: &str) -> Result<(), JournalError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    let level_filter = parse_level(&log_level);

    builder
      .filter_level(level_filter)
      .format_timestamp_millis()
      .try_init()
      .map_err(|e| JournalError::ConfigError(format!("Failed to init logger: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

/// 로그 레벨 파싱 (알 수 없는 값은 Info)
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 거래 생성 로그
pub fn log_trade_created(trade: &Trade) {
    log::info!("거래 생성: {} - 종목: {} - 방향: {} - 진입가: {} - 금액: {}",
               trade.id, trade.asset, trade.direction, trade.entry_price, trade.amount);
}

/// 거래 청산 로그
pub fn log_trade_closed(trade: &Trade) {
    log::info!("거래 청산: {} - 종목: {} - 청산가: {:?} - 손익: {:?}",
               trade.id, trade.asset, trade.exit_price, trade.pnl());
}

/// 거래 삭제 로그
pub fn log_trade_deleted(trade_id: &TradeId) {
    log::info!("거래 삭제: {}", trade_id);
}

/// 오류 로그
pub fn log_error(context: &str, error: &JournalError) {
    log::error!("오류 발생 - {}: {}", context, error);
}
