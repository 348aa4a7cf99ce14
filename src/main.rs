use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use roombot::application::messaging::MessageDispatcher;
use roombot::domain::entities::{PowerLevels, Room, RoomEvent};
use roombot::domain::traits::{Bot, Store};
use roombot::infrastructure::adapters::console::ConsoleAdapter;
use roombot::infrastructure::config::Config;
use roombot::infrastructure::storage::JsonStore;
use roombot::plugins::{builtin, CommandOutcome, PluginLoader};

/// How often the console loop offers timers a chance to run
const TICK_SECONDS: u64 = 5;

#[derive(Parser)]
#[command(name = "roombot")]
#[command(about = "A chat bot driven by plugins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Command prefix (overrides config)
    #[arg(short, long)]
    prefix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console
    Run,
    /// List loaded plugins
    Plugins,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config);
    if let Some(prefix) = cli.prefix {
        config.bot.prefix = prefix;
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_level(&config.logging.level).into()),
        )
        .init();

    match cli.command {
        Commands::Run => {
            run_bot(config);
        }
        Commands::Plugins => {
            list_plugins(config);
        }
        Commands::Version => {
            println!("roombot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn load_config(path: &str) -> Config {
    let mut config = if std::path::Path::new(path).exists() {
        Config::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };
    config.apply_env();
    config
}

fn log_level(level: &str) -> tracing::Level {
    level.parse().unwrap_or(tracing::Level::INFO)
}

fn runtime() -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => Some(rt),
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            None
        }
    }
}

async fn load_plugins(config: &Config) -> Option<PluginLoader> {
    let store: Arc<dyn Store> = match JsonStore::open(&config.storage.path).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open storage {}: {}", config.storage.path.display(), e);
            return None;
        }
    };

    let plugins = vec![builtin::plugin()];
    Some(PluginLoader::load(plugins, store, config.dispatch.clone()).await)
}

fn list_plugins(config: Config) {
    let Some(rt) = runtime() else { return };
    rt.block_on(async {
        let Some(loader) = load_plugins(&config).await else { return };
        for info in loader.list_plugins() {
            println!("{} ({}) - {}", info.name, info.category, info.description);
            if !info.commands.is_empty() {
                println!("  Commands: {}", info.commands.join(", "));
            }
            if !info.hooks.is_empty() {
                println!("  Hooks:    {}", info.hooks.join(", "));
            }
            if !info.timers.is_empty() {
                println!("  Timers:   {}", info.timers.join(", "));
            }
        }
    });
}

fn run_bot(config: Config) {
    tracing::info!("Starting {}", config.bot.name);

    let Some(rt) = runtime() else { return };
    rt.block_on(async {
        let Some(loader) = load_plugins(&config).await else { return };
        tracing::info!("Plugin system initialized with {} plugins", loader.plugins().len());

        let dispatcher = MessageDispatcher::new(config.bot.prefix.clone(), Arc::new(loader))
            .with_forbidden_notice(config.bot.notify_forbidden);
        let client: Arc<dyn Bot> = Arc::new(
            ConsoleAdapter::new()
                .with_name(config.bot.name.clone())
                .with_room(config.console.room_id.clone()),
        );

        run_console_bot(&config, &dispatcher, client).await;
    });
}

async fn run_console_bot(config: &Config, dispatcher: &MessageDispatcher, client: Arc<dyn Bot>) {
    let console = &config.console;
    let room = Room::new(console.room_id.clone()).with_power_levels(
        PowerLevels::new().with_user(console.user_id.clone(), console.power_level),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(TICK_SECONDS));

    tracing::info!("Reading messages for {} as {}", room.room_id, console.user_id);
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let input = match line {
                    Ok(Some(input)) => input,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Failed to read input: {}", e);
                        break;
                    }
                };
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }

                let event = RoomEvent::message(console.user_id.clone(), input);
                if dispatcher.handle_event(client.clone(), &room, event).await == Some(CommandOutcome::NotFound) {
                    tracing::debug!("No command matched '{}'", input);
                }
                dispatcher.tick(client.clone()).await;
            }
            _ = ticker.tick() => {
                dispatcher.tick(client.clone()).await;
            }
        }
    }

    tracing::info!("Input closed, shutting down");
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => eprintln!("Failed to render config: {}", e),
    }
}
