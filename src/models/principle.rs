use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::trade::TradeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrincipleKind {
    /// 일반 투자 원칙
    #[default]
    General,
    /// 복기에서 도출된 원칙
    Learned,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Principle {
    pub id: String,
    pub content: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: PrincipleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_trade_id: Option<TradeId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principle {
    pub fn new(draft: PrincipleDraft) -> Self {
        let now = Utc::now();
        Principle {
            id: Uuid::new_v4().to_string(),
            content: draft.content.trim().to_string(),
            category: draft.category,
            kind: draft.kind,
            source_trade_id: draft.source_trade_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrincipleDraft {
    pub content: String,
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: PrincipleKind,
    #[serde(default)]
    pub source_trade_id: Option<TradeId>,
}

impl PrincipleDraft {
    pub fn general(content: impl Into<String>, category: impl Into<String>) -> Self {
        PrincipleDraft {
            content: content.into(),
            category: category.into(),
            kind: PrincipleKind::General,
            source_trade_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrincipleCategory {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl PrincipleCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        PrincipleCategory {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            created_at: Utc::now(),
        }
    }

    /// 기본 카테고리 목록
    pub fn defaults() -> Vec<PrincipleCategory> {
        vec![
            PrincipleCategory::new("risk-management", "风险管理", "#ef4444"),
            PrincipleCategory::new("mindset", "心态纪律", "#3b82f6"),
            PrincipleCategory::new("entry-strategy", "入场策略", "#10b981"),
            PrincipleCategory::new("exit-strategy", "出场策略", "#f59e0b"),
            PrincipleCategory::new("position-sizing", "仓位管理", "#8b5cf6"),
        ]
    }
}
