use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use tablet_bot::application::commands::{CommandRegistry, CreateReminderHandler, GreetHandler};
use tablet_bot::application::conversation::{ConversationMachine, UserSessions};
use tablet_bot::application::errors::BotError;
use tablet_bot::application::messaging::MessageParser;
use tablet_bot::application::relay::EventRelay;
use tablet_bot::domain::traits::{Bot, StateStore};
use tablet_bot::infrastructure::adapters::TelegramAdapter;
use tablet_bot::infrastructure::backend::HttpReminderBackend;
use tablet_bot::infrastructure::config::{Config, StoreLocation};
use tablet_bot::infrastructure::events::HttpEventStream;
use tablet_bot::infrastructure::storage::{MemoryStateStore, SqliteStateStore};

#[derive(Parser)]
#[command(name = "tablet-bot")]
#[command(about = "Telegram bot that reminds you to take your tablets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => fatal(format!("Failed to start runtime: {}", e)),
            };
            rt.block_on(run_bot(cli.config, cli.token));
        }
        Commands::Version => {
            println!("tablet-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn fatal(message: impl std::fmt::Display) -> ! {
    tracing::error!("{}", message);
    std::process::exit(1);
}

fn load_config(config_path: &str, token_override: Option<String>) -> Config {
    let mut config = if std::path::Path::new(config_path).exists() {
        match Config::load(config_path) {
            Ok(config) => config,
            Err(e) => fatal(format!("Failed to load config: {}", e)),
        }
    } else {
        tracing::info!("No config file at {}, using environment", config_path);
        Config::default()
    };
    config.apply_env();

    if let Some(token) = token_override {
        config.bot.token = Some(token);
    }

    if let Err(e) = config.validate() {
        fatal(format!("Invalid configuration: {}", e));
    }
    config
}

fn open_store(config: &Config) -> Result<Arc<dyn StateStore>, BotError> {
    match config.store.location()? {
        StoreLocation::Memory => {
            tracing::warn!("Using in-memory state store, conversations are lost on restart");
            Ok(Arc::new(MemoryStateStore::new()))
        }
        StoreLocation::Sqlite(path) => {
            tracing::info!("Opening state store at {}", path.display());
            Ok(Arc::new(SqliteStateStore::open(path)?))
        }
    }
}

async fn run_bot(config_path: String, token_override: Option<String>) {
    let config = load_config(&config_path, token_override);
    tracing::info!("Starting {}", config.bot.name);

    // Values are present after validate()
    let token = config.bot.token.clone().unwrap_or_default();
    let backend_url = config.backend.url.clone().unwrap_or_default();
    let events_url = config.events.url.clone().unwrap_or_default();

    // State store
    let store = match open_store(&config) {
        Ok(store) => store,
        Err(e) => fatal(format!("Failed to open state store: {}", e)),
    };
    match tokio::time::timeout(config.store.timeout(), store.ping()).await {
        Ok(Ok(())) => tracing::info!("State store ready"),
        Ok(Err(e)) => fatal(format!("State store unreachable: {}", e)),
        Err(_) => fatal("State store did not answer in time"),
    }

    // Command registry
    let backend = match HttpReminderBackend::new(
        backend_url,
        Duration::from_secs(config.backend.timeout_seconds),
    ) {
        Ok(backend) => Arc::new(backend),
        Err(e) => fatal(e),
    };
    let registry = CommandRegistry::builder()
        .register(GreetHandler::new())
        .register(CreateReminderHandler::new(backend))
        .build();
    let missing = registry.missing();
    if !missing.is_empty() {
        fatal(format!("No handler registered for {:?}", missing));
    }

    // Telegram
    let telegram = Arc::new(TelegramAdapter::new(token));
    let info = match telegram.fetch_bot_info().await {
        Ok(info) => info,
        Err(e) => fatal(format!("Failed to fetch bot info: {}", e)),
    };
    tracing::info!("Bot started: {} (@{}, id {})", info.name, info.username, info.id);
    if let Err(e) = telegram.register_commands().await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    // Event stream
    let events = match HttpEventStream::connect(&events_url, &config.events.stream).await {
        Ok(events) => events,
        Err(e) => fatal(e),
    };

    let sessions = UserSessions::new(store, config.store.timeout(), config.store.state_ttl());
    let machine = ConversationMachine::new(sessions, Arc::new(registry))
        .with_backend_errors_exposed(config.bot.expose_backend_errors);
    let parser = MessageParser::new(config.bot.prefix.clone()).with_bot_username(info.username);

    let bot: Arc<dyn Bot> = telegram.clone();
    let relay = EventRelay::new(events, bot);

    let mut updates = tokio::spawn(run_update_loop(
        telegram,
        machine,
        parser,
        config.bot.poll_timeout_seconds,
    ));
    let mut relay = tokio::spawn(relay.run());

    // Both tasks run for the life of the process; either one stopping is fatal
    tokio::select! {
        result = &mut updates => {
            relay.abort();
            match result {
                Ok(()) => fatal("Update loop stopped"),
                Err(e) => fatal(format!("Update loop crashed: {}", e)),
            }
        }
        result = &mut relay => {
            updates.abort();
            match result {
                Ok(Ok(())) => fatal("Event relay stopped"),
                Ok(Err(e)) => fatal(format!("Event relay stopped: {}", e)),
                Err(e) => fatal(format!("Event relay crashed: {}", e)),
            }
        }
    }
}

async fn run_update_loop(
    telegram: Arc<TelegramAdapter>,
    machine: ConversationMachine,
    parser: MessageParser,
    timeout_seconds: u64,
) {
    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        match telegram.get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                }
                for update in &updates {
                    let Some(msg) = &update.message else { continue };
                    let Some(text) = msg.text.as_deref() else { continue };
                    let Some(from) = &msg.from else { continue };

                    let chat_update = parser.parse(msg.chat.id, from.id, text);
                    machine.process(telegram.as_ref(), &chat_update).await;
                }

                // Update offset
                offset = TelegramAdapter::get_next_offset(&updates, offset);
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => fatal(format!("Failed to render config: {}", e)),
    }
}
