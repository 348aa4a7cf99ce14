//! Domain layer - Values and seams shared with external collaborators
//!
//! This layer contains:
//! - Entities: Rooms, events and command invocations
//! - Traits: Abstractions for infrastructure (Bot, Store)

pub mod entities;
pub mod traits;
