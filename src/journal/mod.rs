//! 거래 일지 모듈
//!
//! 거래 저장소, 입력 검증, 키워드 등록부, 원칙 수첩, 일지 관리자

pub mod keywords;
pub mod manager;
pub mod principles;
pub mod repository;
pub mod validator;

pub use keywords::KeywordRegistry;
pub use manager::TradeJournal;
pub use principles::PrincipleBook;
pub use repository::{FileTradeRepository, InMemoryTradeRepository, TradeRepository};
pub use validator::{BasicTradeValidator, TradeValidator};
