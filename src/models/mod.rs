pub mod principle;
pub mod settings;
pub mod stats;
pub mod trade;
