/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use thiserror::Error;

use crate::models::trade::TradeId;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Trade not found: {0}")]
    TradeNotFound(TradeId),

    #[error("Principle not found: {0}")]
    PrincipleNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl JournalError {
    /// 잘못된 입력으로 인한 오류인지 여부
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            JournalError::InvalidParameter(_)
                | JournalError::ParseError(_)
                | JournalError::DuplicateCategory(_)
                | JournalError::CategoryNotFound(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            JournalError::TradeNotFound(_) | JournalError::PrincipleNotFound(_)
        )
    }
}
