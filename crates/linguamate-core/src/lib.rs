//! Cross-cutting utilities shared by LinguaMate services.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
