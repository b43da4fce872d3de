//! Data models shared by the extraction, validation and grouping stages.

pub mod config;
pub mod nfe;
pub mod slip;
pub mod validation;
