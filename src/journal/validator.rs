use crate::error::JournalError;
use crate::models::trade::{TradeClose, TradeDraft};

/// 거래 입력 검증기 인터페이스
pub trait TradeValidator: Send + Sync {
    /// 신규/편집 거래 검증
    fn validate(&self, draft: &TradeDraft) -> Result<(), JournalError>;

    /// 청산 입력 검증
    fn validate_close(&self, _close: &TradeClose) -> Result<(), JournalError> {
        Ok(())
    }
}

/// 기본 입력 검증기 (필수 항목, 양수 가격/금액, VIX 범위)
#[derive(Debug, Clone, Default)]
pub struct BasicTradeValidator;

impl BasicTradeValidator {
    pub fn new() -> Self {
        BasicTradeValidator
    }
}

impl TradeValidator for BasicTradeValidator {
    fn validate(&self, draft: &TradeDraft) -> Result<(), JournalError> {
        if draft.asset.trim().is_empty() {
            return Err(JournalError::InvalidParameter("Asset is required".to_string()));
        }

        if draft.thesis.trim().is_empty() {
            return Err(JournalError::InvalidParameter("Thesis is required".to_string()));
        }

        positive("Entry price", draft.entry_price)?;
        positive("Amount", draft.amount)?;

        if !draft.vix_index.is_finite() || !(0.0..=100.0).contains(&draft.vix_index) {
            return Err(JournalError::InvalidParameter(
                format!("VIX index must be within 0-100, got {}", draft.vix_index)
            ));
        }

        if let Some(pct) = draft.portfolio_percentage {
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(JournalError::InvalidParameter(
                    format!("Portfolio percentage must be within 0-100, got {}", pct)
                ));
            }
        }

        for (name, level) in [("Take profit", draft.take_profit), ("Stop loss", draft.stop_loss)] {
            if let Some(price) = level {
                if !price.is_finite() || price < 0.0 {
                    return Err(JournalError::InvalidParameter(format!("{} cannot be negative", name)));
                }
            }
        }

        Ok(())
    }

    fn validate_close(&self, close: &TradeClose) -> Result<(), JournalError> {
        positive("Exit price", close.exit_price)
    }
}

fn positive(name: &str, value: f64) -> Result<(), JournalError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(JournalError::InvalidParameter(format!("{} must be positive", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::Direction;
    use rstest::rstest;

    fn draft() -> TradeDraft {
        TradeDraft::new("BTC", Direction::Long, 100.0, 1000.0, "breakout").with_vix(20.0)
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(BasicTradeValidator::new().validate(&draft()).is_ok());
    }

    #[rstest]
    #[case::empty_asset(TradeDraft { asset: "  ".into(), ..draft() })]
    #[case::empty_thesis(TradeDraft { thesis: String::new(), ..draft() })]
    #[case::zero_entry(TradeDraft { entry_price: 0.0, ..draft() })]
    #[case::nan_amount(TradeDraft { amount: f64::NAN, ..draft() })]
    #[case::negative_amount(TradeDraft { amount: -5.0, ..draft() })]
    #[case::vix_out_of_range(TradeDraft { vix_index: 120.0, ..draft() })]
    #[case::portfolio_pct(TradeDraft { portfolio_percentage: Some(150.0), ..draft() })]
    #[case::negative_stop(TradeDraft { stop_loss: Some(-1.0), ..draft() })]
    fn test_invalid_drafts_rejected(#[case] draft: TradeDraft) {
        let result = BasicTradeValidator::new().validate(&draft);
        assert!(matches!(result, Err(JournalError::InvalidParameter(_))));
    }

    #[test]
    fn test_close_requires_positive_exit() {
        let validator = BasicTradeValidator::new();
        assert!(validator.validate_close(&TradeClose::new(10.0)).is_ok());
        assert!(validator.validate_close(&TradeClose::new(0.0)).is_err());
        assert!(validator.validate_close(&TradeClose::new(f64::INFINITY)).is_err());
    }
}
