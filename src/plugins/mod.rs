//! Plugin system - registration and dispatch core
//!
//! Plugins declare commands, event hooks and timers in a [`Plugin`]
//! descriptor. The [`PluginLoader`] merges all descriptors at startup and
//! routes commands, events and timer ticks to them.

pub mod access;
pub mod builtin;
pub mod data;
pub mod isolation;
pub mod manager;
pub mod resolver;
pub mod trait_def;

pub use data::{data_key, PluginData};
pub use manager::{CommandOutcome, PluginInfo, PluginLoader, SharedPluginLoader};
pub use resolver::{ratio, CommandTable};
pub use trait_def::{CommandSpec, DispatchConfig, HandlerResult, HookSpec, Plugin, TimerSpec};
