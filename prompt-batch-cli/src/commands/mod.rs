//! CLI command implementations

pub mod auth;
pub mod config;
pub mod preview;
pub mod records;
pub mod templates;
pub mod wizard;
