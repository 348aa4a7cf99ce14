//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Data persistence
//! - Adapters: Chat client implementations

pub mod config;
pub mod storage;
pub mod adapters;
