//! 공용 유틸리티
//!
//! 로깅, 표시용 포맷팅, 번역

pub mod format;
pub mod i18n;
pub mod logging;

pub use format::{format_currency, format_number, format_percentage};
pub use i18n::t;
