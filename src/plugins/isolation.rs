//! Fault isolation for plugin handlers.
//!
//! Every handler runs through [`isolate`]: an `Err` or a panic is logged
//! with the handler's location and turned into a plain `false`.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::error;

use super::trait_def::HandlerResult;
use crate::application::errors::PluginError;

/// Identifies the handler being run, for log context
#[derive(Debug, Clone, Copy)]
pub enum HandlerSite<'a> {
    Command {
        plugin: &'a str,
        word: &'a str,
        room_id: &'a str,
        sender: &'a str,
    },
    Hook {
        plugin: &'a str,
        event_type: &'a str,
        room_id: &'a str,
        event_id: &'a str,
    },
    Timer {
        plugin: &'a str,
        name: &'a str,
    },
}

impl fmt::Display for HandlerSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerSite::Command { plugin, word, room_id, sender } => {
                write!(f, "command '{}' of plugin '{}' in {} from {}", word, plugin, room_id, sender)
            }
            HandlerSite::Hook { plugin, event_type, room_id, event_id } => {
                write!(f, "hook '{}' of plugin '{}' in {} for {}", event_type, plugin, room_id, event_id)
            }
            HandlerSite::Timer { plugin, name } => {
                write!(f, "timer '{}' of plugin '{}'", name, plugin)
            }
        }
    }
}

/// Run a handler future, containing any failure.
///
/// Returns whether the handler completed successfully. Build the handler
/// call inside `handler` (e.g. `async move { (spec.handler)(arg).await }`)
/// so a panic while creating the future is caught too.
pub async fn isolate<F>(site: HandlerSite<'_>, handler: F) -> bool
where
    F: Future<Output = HandlerResult>,
{
    let err = match AssertUnwindSafe(handler).catch_unwind().await {
        Ok(Ok(())) => return true,
        Ok(Err(err)) => err,
        Err(payload) => PluginError::Panicked(panic_message(payload.as_ref())),
    };

    error!("Plugin failed to catch exception caused by {}: {}", site, err);
    false
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
