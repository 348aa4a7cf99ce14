//! roombot - a chat bot whose features live in plugins.
//!
//! Plugins declare commands, event hooks and timers; the
//! [`plugins::PluginLoader`] merges them at startup and dispatches incoming
//! commands, room events and timer ticks, containing any plugin failure.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;
