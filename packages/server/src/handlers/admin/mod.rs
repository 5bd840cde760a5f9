//! Password-protected enterprise dashboard.

pub mod analytics;
pub mod auth;
pub mod platform;
pub mod settings;
pub mod system;
pub mod user;
