//! 번역 테이블 (zh / en)
//!
//! 없는 키는 키 자체를 그대로 반환한다.

use std::collections::HashMap;
use lazy_static::lazy_static;

use crate::models::settings::Language;

type Table = HashMap<&'static str, &'static str>;

lazy_static! {
    static ref ZH: Table = [
        ("dashboard", "仪表盘"),
        ("journal", "投资手帐"),
        ("review", "复盘分析"),
        ("totalPnl", "总盈亏"),
        ("winRate", "胜率"),
        ("openPositions", "持仓中"),
        ("totalTrades", "总交易"),
        ("averageReturn", "平均收益"),
        ("closedTrades", "已平仓交易"),
        ("asset", "标的"),
        ("direction", "方向"),
        ("long", "做多"),
        ("short", "做空"),
        ("entryPrice", "买入价格"),
        ("exitPrice", "平仓价格"),
        ("amount", "投入金额"),
        ("status", "状态"),
        ("open", "持仓中"),
        ("closed", "已平仓"),
        ("profit", "盈利"),
        ("loss", "亏损"),
        ("tradeSaved", "交易已保存"),
        ("tradeDeleted", "交易已删除"),
        ("tradeClosed", "交易已平仓"),
        ("noTrades", "暂无交易记录"),
        ("noResults", "没有找到符合条件的交易"),
        ("principleSaved", "原则已保存"),
        ("principleDeleted", "原则已删除"),
        ("generalPrinciple", "通用原则"),
        ("learnedPrinciple", "复盘提炼"),
        ("riskManagement", "风险管理"),
        ("mindset", "心态纪律"),
        ("entryStrategy", "入场策略"),
        ("exitStrategy", "出场策略"),
        ("positionSizing", "仓位管理"),
    ]
    .into_iter()
    .collect();

    static ref EN: Table = [
        ("dashboard", "Dashboard"),
        ("journal", "Journal"),
        ("review", "Review"),
        ("totalPnl", "Total P&L"),
        ("winRate", "Win Rate"),
        ("openPositions", "Open Positions"),
        ("totalTrades", "Total Trades"),
        ("averageReturn", "Avg Return"),
        ("closedTrades", "Closed Trades"),
        ("asset", "Asset"),
        ("direction", "Direction"),
        ("long", "Long"),
        ("short", "Short"),
        ("entryPrice", "Entry Price"),
        ("exitPrice", "Exit Price"),
        ("amount", "Amount"),
        ("status", "Status"),
        ("open", "Open"),
        ("closed", "Closed"),
        ("profit", "Profit"),
        ("loss", "Loss"),
        ("tradeSaved", "Trade saved successfully"),
        ("tradeDeleted", "Trade deleted successfully"),
        ("tradeClosed", "Trade closed successfully"),
        ("noTrades", "No trades yet"),
        ("noResults", "No trades found"),
        ("principleSaved", "Principle saved successfully"),
        ("principleDeleted", "Principle deleted successfully"),
        ("generalPrinciple", "General Principle"),
        ("learnedPrinciple", "Learned from Trade"),
        ("riskManagement", "Risk Management"),
        ("mindset", "Mindset & Discipline"),
        ("entryStrategy", "Entry Strategy"),
        ("exitStrategy", "Exit Strategy"),
        ("positionSizing", "Position Sizing"),
    ]
    .into_iter()
    .collect();
}

/// 번역 조회
pub fn t<'a>(key: &'a str, language: Language) -> &'a str {
    let table: &Table = match language {
        Language::Zh => &ZH,
        Language::En => &EN,
    };
    table.get(key).copied().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(t("winRate", Language::En), "Win Rate");
        assert_eq!(t("winRate", Language::Zh), "胜率");
    }

    #[test]
    fn test_missing_key_falls_back() {
        assert_eq!(t("doesNotExist", Language::En), "doesNotExist");
    }

    #[test]
    fn test_tables_have_same_keys() {
        let mut zh: Vec<_> = ZH.keys().collect();
        let mut en: Vec<_> = EN.keys().collect();
        zh.sort();
        en.sort();
        assert_eq!(zh, en);
    }
}
