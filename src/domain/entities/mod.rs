//! Domain entities - Chat protocol values seen by the dispatch core

pub mod room;
pub mod event;
pub mod command;

pub use room::{Room, PowerLevels};
pub use event::{RoomEvent, MESSAGE_EVENT};
pub use command::CommandInvocation;
