/**
* filename : pnl
* author : HAMA
* date: 2025. 5. 11.
* description: 단일 거래 손익 계산 (대시보드와 거래 카드가 같은 구현을 공유)
**/

use crate::models::trade::Direction;

/// 방향을 반영한 단위당 손익
pub fn pnl(entry_price: f64, exit_price: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Long => exit_price - entry_price,
        Direction::Short => entry_price - exit_price,
    }
}

/// 진입가 대비 손익률 (%). 진입가가 0이면 0
pub fn pnl_percentage(entry_price: f64, exit_price: f64, direction: Direction) -> f64 {
    if entry_price == 0.0 {
        return 0.0;
    }

    finite_or_zero(pnl(entry_price, exit_price, direction) / entry_price * 100.0)
}

/// 금액 가중 손익: `pnl * (amount / entry_price)`
///
/// 진입가가 0이거나 입력 또는 결과가 유한하지 않으면 `None`.
/// 호출 측은 이를 기여도 0으로 처리한다.
pub fn weighted_pnl(entry_price: f64, exit_price: f64, amount: f64, direction: Direction) -> Option<f64> {
    if entry_price == 0.0 || !entry_price.is_finite() || !exit_price.is_finite() || !amount.is_finite() {
        return None;
    }

    let weighted = pnl(entry_price, exit_price, direction) * (amount / entry_price);
    if weighted.is_finite() {
        Some(weighted)
    } else {
        None
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, 120.0, Direction::Long, 20.0)]
    #[case(100.0, 80.0, Direction::Long, -20.0)]
    #[case(50.0, 60.0, Direction::Short, -10.0)]
    #[case(50.0, 40.0, Direction::Short, 10.0)]
    #[case(10.0, 10.0, Direction::Long, 0.0)]
    fn test_directional_pnl(
        #[case] entry: f64,
        #[case] exit: f64,
        #[case] direction: Direction,
        #[case] expected: f64,
    ) {
        assert_eq!(pnl(entry, exit, direction), expected);
    }

    #[test]
    fn test_pnl_percentage() {
        assert_eq!(pnl_percentage(100.0, 120.0, Direction::Long), 20.0);
        assert_eq!(pnl_percentage(50.0, 60.0, Direction::Short), -20.0);
    }

    #[test]
    fn test_pnl_percentage_zero_entry_is_guarded() {
        assert_eq!(pnl_percentage(0.0, 10.0, Direction::Long), 0.0);
        assert_eq!(pnl_percentage(0.0, 0.0, Direction::Short), 0.0);
    }

    #[test]
    fn test_weighted_pnl() {
        assert_eq!(weighted_pnl(100.0, 120.0, 1000.0, Direction::Long), Some(200.0));
        assert_eq!(weighted_pnl(50.0, 60.0, 500.0, Direction::Short), Some(-100.0));
    }

    #[test]
    fn test_weighted_pnl_rejects_degenerate_inputs() {
        assert_eq!(weighted_pnl(0.0, 120.0, 1000.0, Direction::Long), None);
        assert_eq!(weighted_pnl(100.0, f64::NAN, 1000.0, Direction::Long), None);
        assert_eq!(weighted_pnl(100.0, 120.0, f64::INFINITY, Direction::Long), None);
        assert_eq!(weighted_pnl(1e-320, 1e300, 1e300, Direction::Long), None);
    }
}
