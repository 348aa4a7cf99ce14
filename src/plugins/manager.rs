//! Plugin loader - aggregates plugin declarations and dispatches to them

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::access::{self, Access};
use super::isolation::{isolate, HandlerSite};
use super::resolver::CommandTable;
use super::trait_def::{CommandSpec, DispatchConfig, HookSpec, Plugin, TimerSpec};
use crate::domain::entities::{CommandInvocation, Room, RoomEvent};
use crate::domain::traits::{Bot, Store};

/// Minimum seconds between timer sweeps
pub const DEFAULT_TIMER_INTERVAL_SECS: u64 = 30;

/// Result of [`PluginLoader::run_command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A handler ran. It may still have failed internally.
    Executed,
    /// No matching command, or the command is not valid in this room
    NotFound,
    /// The sender's permission level is too low
    Forbidden,
}

/// Plugin information for listing
#[derive(Debug, Clone, serde::Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub category: String,
    pub description: String,
    pub commands: Vec<String>,
    pub hooks: Vec<String>,
    pub timers: Vec<String>,
}

/// Owns every plugin and the merged command, hook and timer tables.
///
/// The tables are built once in [`PluginLoader::load`] and only read
/// afterwards, so a loader can be shared behind an `Arc` without locking.
pub struct PluginLoader {
    plugins: Vec<Plugin>,
    commands: CommandTable,
    hooks: HashMap<String, Vec<HookSpec>>,
    timers: Vec<TimerSpec>,
    config: DispatchConfig,
}

/// Loader shared with the runtime
pub type SharedPluginLoader = Arc<PluginLoader>;

impl PluginLoader {
    /// Merge `plugins`, in order, into the dispatch tables.
    ///
    /// Plugins are keyed by name: a later plugin with the same name replaces
    /// the earlier one. Each plugin's data handle is attached to `store` and
    /// its stored data is read; a failing read leaves that plugin without data.
    pub async fn load(plugins: Vec<Plugin>, store: Arc<dyn Store>, config: DispatchConfig) -> Self {
        let mut loader = Self {
            plugins: Vec::new(),
            commands: CommandTable::new(),
            hooks: HashMap::new(),
            timers: Vec::new(),
            config,
        };

        let mut index: HashMap<String, usize> = HashMap::new();
        for plugin in plugins {
            match index.get(plugin.name()) {
                Some(&position) => {
                    warn!("Plugin '{}' registered twice, keeping the later one", plugin.name());
                    loader.plugins[position] = plugin;
                }
                None => {
                    index.insert(plugin.name().to_string(), loader.plugins.len());
                    loader.plugins.push(plugin);
                }
            }
        }

        let mut plugins = std::mem::take(&mut loader.plugins);
        for plugin in &mut plugins {
            loader.merge(plugin);
            plugin.data().attach(store.clone());
            let data = load_data(plugin).await;
            plugin.set_plugin_data(data);
            log_loaded(plugin);
        }
        loader.plugins = plugins;

        info!(
            "Loaded {} plugins: {} commands, {} hook types, {} timers",
            loader.plugins.len(),
            loader.commands.len(),
            loader.hooks.len(),
            loader.timers.len()
        );
        loader
    }

    fn merge(&mut self, plugin: &Plugin) {
        for spec in plugin.commands() {
            if let Some(previous) = self.commands.insert(spec.clone()) {
                warn!(
                    "Command '{}' of plugin '{}' overrides the one from plugin '{}'",
                    spec.word, spec.plugin, previous.plugin
                );
            }
        }

        for hook in plugin.hooks() {
            self.hooks
                .entry(hook.event_type.clone())
                .or_default()
                .push(hook.clone());
        }

        self.timers.extend(plugin.timers().iter().cloned());
    }

    /// Resolve, authorize and run a command.
    ///
    /// At most one handler runs. Its failure is logged, never returned.
    pub async fn run_command(&self, invocation: CommandInvocation) -> CommandOutcome {
        let word = invocation.word();
        debug!("Running command {} with args {:?}", word, invocation.args);

        let Some(resolved) = self.commands.resolve(&word, self.config.fuzzy_threshold) else {
            debug!("Command '{}' not found", word);
            return CommandOutcome::NotFound;
        };
        let spec: Arc<CommandSpec> = resolved.spec;

        match access::check(&spec, &invocation.room, invocation.sender()) {
            Access::OutOfScope => {
                debug!("Command '{}' not valid in {}", spec.word, invocation.room_id());
                return CommandOutcome::NotFound;
            }
            Access::Insufficient { required, actual } => {
                debug!(
                    "{} has level {} in {}, '{}' requires {}",
                    invocation.sender(), actual, invocation.room_id(), spec.word, required
                );
                return CommandOutcome::Forbidden;
            }
            Access::Granted => {}
        }

        let room_id = invocation.room.room_id.clone();
        let sender = invocation.event.sender.clone();
        let site = HandlerSite::Command {
            plugin: &spec.plugin,
            word: &spec.word,
            room_id: &room_id,
            sender: &sender,
        };
        let handler = spec.handler.clone();
        isolate(site, async move { handler(invocation).await }).await;

        CommandOutcome::Executed
    }

    /// Run every hook registered for `event_type` whose rooms admit `room`.
    ///
    /// Hooks run one after another in registration order.
    pub async fn run_hooks(&self, client: Arc<dyn Bot>, event_type: &str, room: &Room, event: &RoomEvent) {
        let Some(hooks) = self.hooks.get(event_type) else {
            return;
        };

        for hook in hooks {
            if !access::room_permitted(hook.room_ids.as_deref(), &room.room_id) {
                continue;
            }

            let site = HandlerSite::Hook {
                plugin: &hook.plugin,
                event_type,
                room_id: &room.room_id,
                event_id: &event.event_id,
            };
            let handler = hook.handler.clone();
            let (client, room_id, event) = (client.clone(), room.room_id.clone(), event.clone());
            isolate(site, async move { handler(client, room_id, event).await }).await;
        }
    }

    /// Run all timers if the interval has passed since `last_run`.
    ///
    /// Returns the new watermark: the time the sweep finished, or
    /// `last_run` unchanged if no sweep was due. `None` means timers never ran.
    pub async fn run_timers(&self, client: Arc<dyn Bot>, last_run: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        self.run_timers_with(client, last_run, Utc::now).await
    }

    /// [`run_timers`](Self::run_timers) reading time from `clock`.
    ///
    /// The clock is read once to decide whether a sweep is due and again
    /// after the last timer returned, so slow timers push the next sweep back.
    pub async fn run_timers_with<C>(
        &self,
        client: Arc<dyn Bot>,
        last_run: Option<DateTime<Utc>>,
        clock: C,
    ) -> Option<DateTime<Utc>>
    where
        C: Fn() -> DateTime<Utc>,
    {
        if !self.timers_due(last_run, clock()) {
            return last_run;
        }

        debug!("Running {} timers", self.timers.len());
        for timer in &self.timers {
            let site = HandlerSite::Timer {
                plugin: &timer.plugin,
                name: &timer.name,
            };
            let handler = timer.handler.clone();
            let client = client.clone();
            isolate(site, async move { handler(client).await }).await;
        }

        Some(clock())
    }

    fn timers_due(&self, last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let Some(last_run) = last_run else {
            return true;
        };
        // negative spans (clock went backwards) never count as elapsed
        match now.signed_duration_since(last_run).to_std() {
            Ok(elapsed) => elapsed >= self.config.timer_interval(),
            Err(_) => false,
        }
    }

    /// Merged command table
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Hooks keyed by event type
    pub fn hooks(&self) -> &HashMap<String, Vec<HookSpec>> {
        &self.hooks
    }

    pub fn timers(&self) -> &[TimerSpec] {
        &self.timers
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Find a plugin by name
    pub fn plugin(&self, name: &str) -> Option<&Plugin> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    /// (word, help text) for every command, in registration order
    pub fn help_texts(&self) -> Vec<(String, String)> {
        self.commands
            .iter()
            .map(|spec| (spec.word.clone(), spec.help.clone()))
            .collect()
    }

    /// List all plugins
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugins
            .iter()
            .map(|plugin| PluginInfo {
                name: plugin.name().to_string(),
                category: plugin.category().to_string(),
                description: plugin.description().to_string(),
                commands: plugin.commands().iter().map(|c| c.word.clone()).collect(),
                hooks: event_types(plugin).into_iter().map(str::to_string).collect(),
                timers: plugin.timers().iter().map(|t| t.name.clone()).collect(),
            })
            .collect()
    }
}

async fn load_data(plugin: &Plugin) -> Option<String> {
    match plugin.data().read().await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to load data of plugin '{}': {}", plugin.name(), e);
            None
        }
    }
}

/// Distinct hooked event types, first declaration order
fn event_types(plugin: &Plugin) -> Vec<&str> {
    let mut types: Vec<&str> = Vec::new();
    for hook in plugin.hooks() {
        if !types.contains(&hook.event_type.as_str()) {
            types.push(&hook.event_type);
        }
    }
    types
}

fn log_loaded(plugin: &Plugin) {
    info!("Loaded plugin {}:", plugin.name());
    if !plugin.commands().is_empty() {
        let words: Vec<&str> = plugin.commands().iter().map(|c| c.word.as_str()).collect();
        info!("  Commands: {}", words.join(", "));
    }
    if !plugin.hooks().is_empty() {
        info!("  Hooks:    {}", event_types(plugin).join(", "));
    }
    if !plugin.timers().is_empty() {
        let names: Vec<&str> = plugin.timers().iter().map(|t| t.name.as_str()).collect();
        info!("  Timers:   {}", names.join(", "));
    }
}
