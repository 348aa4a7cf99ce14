//! Application layer - Runtime glue around the plugin core
//!
//! This layer contains:
//! - Services: Help rendering
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing and event dispatching

pub mod errors;
pub mod services;
pub mod messaging;
