//! 투자 원칙 수첩
//!
//! 카테고리별 원칙 관리와 복기 노트로부터 원칙 추출

use chrono::{Duration, Utc};

use crate::error::JournalError;
use crate::models::principle::{Principle, PrincipleCategory, PrincipleDraft, PrincipleKind};
use crate::models::trade::{Trade, TradeId};

// (내용, 카테고리, 종류, 출처 거래, 며칠 전)
const DEMO_PRINCIPLES: [(&str, &str, PrincipleKind, Option<&str>, i64); 5] = [
    ("永远不要在亏损的头寸上加仓。亏损说明判断有误，加仓只会放大错误。", "risk-management", PrincipleKind::General, None, 7),
    ("只在上升趋势中买入。即使宏观背景有利，也绝不买入处于下降趋势的标的。", "entry-strategy", PrincipleKind::Learned, Some("demo-trade-1"), 3),
    ("单笔交易风险不超过总资金的2%。保护本金永远是第一位的。", "position-sizing", PrincipleKind::General, None, 14),
    ("避免在重大不确定性事件（如财报）前建立大的头寸。", "risk-management", PrincipleKind::Learned, Some("demo-trade-2"), 1),
    ("市场永远是对的。当市场证明你的判断错误时，立即止损，不要固执己见。", "mindset", PrincipleKind::General, None, 21),
];

#[derive(Debug, Clone)]
pub struct PrincipleBook {
    principles: Vec<Principle>,
    categories: Vec<PrincipleCategory>,
}

impl PrincipleBook {
    /// 기본 카테고리로 빈 수첩 생성
    pub fn new() -> Self {
        PrincipleBook {
            principles: Vec::new(),
            categories: PrincipleCategory::defaults(),
        }
    }

    /// 저장된 원칙이 없을 때 쓰는 예시 수첩 (기본 카테고리 + 예시 원칙 5개)
    pub fn demo() -> Self {
        let now = Utc::now();
        let principles = DEMO_PRINCIPLES
            .iter()
            .map(|&(content, category, kind, source, days_ago)| {
                let mut principle = Principle::new(PrincipleDraft {
                    content: content.to_string(),
                    category: category.to_string(),
                    kind,
                    source_trade_id: source.map(TradeId::from),
                });
                principle.created_at = now - Duration::days(days_ago);
                principle.updated_at = principle.created_at;
                principle
            })
            .collect();

        PrincipleBook {
            principles,
            categories: PrincipleCategory::defaults(),
        }
    }

    pub fn from_parts(principles: Vec<Principle>, categories: Vec<PrincipleCategory>) -> Self {
        PrincipleBook { principles, categories }
    }

    pub fn principles(&self) -> &[Principle] {
        &self.principles
    }

    pub fn categories(&self) -> &[PrincipleCategory] {
        &self.categories
    }

    /// 카테고리 필터 (None이면 전체)
    pub fn list(&self, category: Option<&str>) -> Vec<Principle> {
        self.principles
            .iter()
            .filter(|p| category.map_or(true, |c| c == "all" || p.category == c))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Principle> {
        self.principles.iter().find(|p| p.id == id)
    }

    pub fn add(&mut self, draft: PrincipleDraft) -> Result<Principle, JournalError> {
        self.check_draft(&draft)?;

        let principle = Principle::new(draft);
        log::info!("원칙 추가: {} [{}]", principle.id, principle.category);
        self.principles.push(principle.clone());
        Ok(principle)
    }

    pub fn update(&mut self, id: &str, draft: PrincipleDraft) -> Result<Principle, JournalError> {
        self.check_draft(&draft)?;

        let principle = self
            .principles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| JournalError::PrincipleNotFound(id.to_string()))?;

        principle.content = draft.content.trim().to_string();
        principle.category = draft.category;
        principle.kind = draft.kind;
        principle.source_trade_id = draft.source_trade_id;
        principle.updated_at = Utc::now();

        Ok(principle.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<(), JournalError> {
        let before = self.principles.len();
        self.principles.retain(|p| p.id != id);

        if self.principles.len() == before {
            return Err(JournalError::PrincipleNotFound(id.to_string()));
        }
        Ok(())
    }

    /// 청산된 거래의 복기 노트를 "learned" 원칙으로 추출
    pub fn extract_from_trade(&mut self, trade: &Trade, category: &str) -> Result<Principle, JournalError> {
        let notes = trade
            .post_mortem_notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .ok_or_else(|| {
                JournalError::InvalidState(format!("Trade {} has no post-mortem notes", trade.id))
            })?;

        self.add(PrincipleDraft {
            content: notes.to_string(),
            category: category.to_string(),
            kind: PrincipleKind::Learned,
            source_trade_id: Some(trade.id.clone()),
        })
    }

    /// 카테고리 추가. id는 이름에서 슬러그로 생성
    pub fn add_category(&mut self, name: &str, color: &str) -> Result<PrincipleCategory, JournalError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(JournalError::InvalidParameter("Category name is required".to_string()));
        }
        if !is_hex_color(color) {
            return Err(JournalError::InvalidParameter(format!("Invalid color: {}", color)));
        }

        let id = slugify(name);
        if id.is_empty() {
            return Err(JournalError::InvalidParameter(format!("Invalid category name: {}", name)));
        }
        if self.categories.iter().any(|c| c.id == id) {
            return Err(JournalError::DuplicateCategory(id));
        }

        let category = PrincipleCategory::new(id, name, color);
        self.categories.push(category.clone());
        Ok(category)
    }

    fn check_draft(&self, draft: &PrincipleDraft) -> Result<(), JournalError> {
        if draft.content.trim().is_empty() {
            return Err(JournalError::InvalidParameter("Principle content is required".to_string()));
        }
        if !self.categories.iter().any(|c| c.id == draft.category) {
            return Err(JournalError::CategoryNotFound(draft.category.clone()));
        }
        Ok(())
    }
}

impl Default for PrincipleBook {
    fn default() -> Self {
        Self::new()
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::{Direction, TradeClose, TradeDraft};

    #[test]
    fn test_add_requires_known_category() {
        let mut book = PrincipleBook::new();

        assert!(book.add(PrincipleDraft::general("Cut losers fast", "mindset")).is_ok());
        assert!(matches!(
            book.add(PrincipleDraft::general("x", "unknown")),
            Err(JournalError::CategoryNotFound(_))
        ));
        assert!(matches!(
            book.add(PrincipleDraft::general("   ", "mindset")),
            Err(JournalError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_list_by_category() {
        let mut book = PrincipleBook::new();
        book.add(PrincipleDraft::general("a", "mindset")).unwrap();
        book.add(PrincipleDraft::general("b", "risk-management")).unwrap();

        assert_eq!(book.list(None).len(), 2);
        assert_eq!(book.list(Some("all")).len(), 2);
        assert_eq!(book.list(Some("mindset"))[0].content, "a");
    }

    #[test]
    fn test_update_and_delete() {
        let mut book = PrincipleBook::new();
        let p = book.add(PrincipleDraft::general("old", "mindset")).unwrap();

        let updated = book.update(&p.id, PrincipleDraft::general("new", "exit-strategy")).unwrap();
        assert_eq!(updated.content, "new");
        assert_eq!(updated.category, "exit-strategy");
        assert_eq!(updated.created_at, p.created_at);

        book.delete(&p.id).unwrap();
        assert!(matches!(book.delete(&p.id), Err(JournalError::PrincipleNotFound(_))));
    }

    #[test]
    fn test_extract_from_trade() {
        let mut book = PrincipleBook::new();
        let mut trade = Trade::open(TradeDraft::new("BTC", Direction::Long, 100.0, 1000.0, "x"));

        assert!(matches!(
            book.extract_from_trade(&trade, "mindset"),
            Err(JournalError::InvalidState(_))
        ));

        trade.close(TradeClose::new(90.0).with_notes("  Never average down  "));
        let p = book.extract_from_trade(&trade, "risk-management").unwrap();

        assert_eq!(p.kind, PrincipleKind::Learned);
        assert_eq!(p.content, "Never average down");
        assert_eq!(p.source_trade_id, Some(trade.id.clone()));
    }

    #[test]
    fn test_demo_book() {
        let book = PrincipleBook::demo();

        assert_eq!(book.principles().len(), 5);
        assert_eq!(book.categories().len(), 5);
        assert_eq!(book.list(Some("risk-management")).len(), 2);
        assert!(book
            .principles()
            .iter()
            .all(|p| book.categories().iter().any(|c| c.id == p.category)));

        let learned: Vec<_> = book.principles().iter().filter(|p| p.kind == PrincipleKind::Learned).collect();
        assert_eq!(learned.len(), 2);
        assert_eq!(learned[0].source_trade_id, Some(TradeId::from("demo-trade-1")));
    }

    #[test]
    fn test_add_category() {
        let mut book = PrincipleBook::new();
        let c = book.add_category("Macro Timing!", "#123abc").unwrap();
        assert_eq!(c.id, "macro-timing");

        assert!(matches!(
            book.add_category("macro timing", "#000000"),
            Err(JournalError::DuplicateCategory(_))
        ));
        assert!(book.add_category("Other", "red").is_err());
    }
}
