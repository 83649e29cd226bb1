/**
* filename : stats
* author : HAMA
* date: 2025. 5. 11.
* description: 포트폴리오 통계 엔진
**/

use crate::analytics::pnl::{finite_or_zero, weighted_pnl};
use crate::models::stats::{PortfolioStats, StatsReport};
use crate::models::trade::Trade;

/// 거래 목록으로부터 포트폴리오 통계 계산
///
/// 순수 함수이며 입력 순서와 무관하게 같은 결과를 낸다.
/// 비정상 수치(진입가 0 등)는 0으로 기여하고 경고 로그만 남긴다.
pub fn compute_stats(trades: &[Trade]) -> PortfolioStats {
    analyze(trades).stats
}

/// [`compute_stats`] 결과와 기여도가 0으로 처리된 청산 거래 id 목록
pub fn analyze(trades: &[Trade]) -> StatsReport {
    let mut weighted = Vec::with_capacity(trades.len());
    let mut invested = Vec::with_capacity(trades.len());
    let mut flagged = Vec::new();
    let mut closed_count = 0usize;
    let mut open_positions = 0usize;

    for trade in trades {
        if trade.is_open() {
            open_positions += 1;
        }

        let Some(exit_price) = closed_exit(trade) else {
            continue;
        };
        closed_count += 1;

        match weighted_pnl(trade.entry_price, exit_price, trade.amount, trade.direction) {
            Some(value) => {
                weighted.push(value);
                invested.push(trade.amount);
            }
            None => {
                log::warn!(
                    "데이터 품질 경고 - 거래 {} ({}): 진입가 {} / 청산가 {} / 금액 {} 계산 불가, 0으로 처리",
                    trade.id, trade.asset, trade.entry_price, exit_price, trade.amount
                );
                flagged.push(trade.id.clone());
            }
        }
    }

    let wins = weighted.iter().filter(|&&value| value > 0.0).count();
    let total_pnl = finite_or_zero(canonical_sum(&mut weighted));
    let total_invested = finite_or_zero(canonical_sum(&mut invested));

    let total_pnl_percentage = if total_invested > 0.0 {
        finite_or_zero(total_pnl / total_invested * 100.0)
    } else {
        0.0
    };

    let (win_rate, average_return) = if closed_count > 0 {
        (
            wins as f64 / closed_count as f64 * 100.0,
            finite_or_zero(total_pnl / closed_count as f64),
        )
    } else {
        (0.0, 0.0)
    };

    flagged.sort();

    StatsReport {
        stats: PortfolioStats {
            total_pnl,
            total_pnl_percentage,
            win_rate,
            open_positions,
            total_trades: trades.len(),
            average_return,
        },
        flagged,
    }
}

/// 청산 완료 거래의 청산가
pub(crate) fn closed_exit(trade: &Trade) -> Option<f64> {
    if trade.is_closed() {
        trade.exit_price
    } else {
        None
    }
}

// Sum in a fixed order so the float result does not depend on input order.
fn canonical_sum(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    values.iter().sum()
}
