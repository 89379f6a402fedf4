//! Binary entrypoint for the chatcommand CLI.
//!
//! Commands:
//! - `console [--name <character>] [--privilege <level>]` - read chat lines from stdin and dispatch them
//! - `init` - create a starter `config.toml` and a plugin settings file with every command's defaults
//! - `commands [--privilege <level>]` - print the help listing visible at a privilege
//! - `check` - build the registry from config and settings, reporting any fatal problem
//!
//! See the library crate docs for module‑level details: `chatcommand::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use chatcommand::command::{
    Actor, CommandRegistry, Dispatcher, Outbox, PluginCatalog, PluginSettings, Privilege, Recipient, Services,
};
use chatcommand::config::Config;
use chatcommand::locale::MessageCatalog;
use chatcommand::world::{Character, InMemoryWorld, Presence, World};
use chatcommand::{handlers, metrics};

#[derive(Parser)]
#[command(name = "chatcommand")]
#[command(about = "Chat command framework for game servers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch stdin lines as one actor and print the replies
    Console {
        /// Character to play; created on the fly when not seeded in config
        #[arg(short, long, default_value = "Admin")]
        name: String,
        /// Privilege of the console actor (normal, gm, admin or a number)
        #[arg(short, long, default_value = "admin")]
        privilege: Privilege,
        /// Locale used for replies (defaults to server.default_locale)
        #[arg(short, long)]
        locale: Option<String>,
    },
    /// Write a default configuration and plugin settings file
    Init,
    /// List the commands available at a privilege level
    Commands {
        #[arg(short, long, default_value = "admin")]
        privilege: Privilege,
    },
    /// Validate configuration and plugin settings
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(None, cli.verbose);
            info!("Initializing new chatcommand configuration");
            let cfg = Config::default();
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);

            let mut catalog = PluginCatalog::new();
            catalog.extend(handlers::builtin()?);
            let settings = catalog.default_settings()?;
            settings.save(&cfg.plugins.settings_path).await?;
            info!(
                "Plugin settings for {} commands written to {}",
                catalog.len(),
                cfg.plugins.settings_path
            );
        }
        Commands::Console { name, privilege, locale } => {
            let config = load_config(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            info!("Starting chatcommand v{}", env!("CARGO_PKG_VERSION"));
            run_console(config, &name, privilege, locale).await?;
        }
        Commands::Commands { privilege } => {
            let config = load_config(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            let registry = build_registry(&config).await?;
            let prefix = config.command_prefix()?;
            for d in registry.list_for(privilege) {
                println!("{:<40} {}", d.usage_with_prefix(prefix), d.help_text());
            }
        }
        Commands::Check => {
            let config = load_config(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            let registry = build_registry(&config).await?;
            let enabled = registry.iter().filter(|d| d.is_enabled()).count();
            println!(
                "ok: {} commands registered, {} enabled, prefix '{}'",
                registry.len(),
                enabled,
                config.server.command_prefix
            );
        }
    }

    Ok(())
}

async fn load_config(path: &str) -> Result<Config> {
    let config = Config::load(path).await?;
    config.validate()?;
    Ok(config)
}

async fn build_registry(config: &Config) -> Result<CommandRegistry> {
    let settings = PluginSettings::load_or_default(&config.plugins.settings_path).await?;
    let mut catalog = PluginCatalog::new();
    catalog.extend(handlers::builtin()?);
    Ok(catalog.build(&settings)?)
}

async fn load_messages(config: &Config) -> Result<MessageCatalog> {
    let mut messages = MessageCatalog::builtin().with_default_locale(&config.server.default_locale);
    if let Some(path) = &config.messages.path {
        messages.load_file(path).await?;
        info!("Loaded message templates from {}", path);
    }
    Ok(messages)
}

async fn run_console(config: Config, name: &str, privilege: Privilege, locale: Option<String>) -> Result<()> {
    let registry = Arc::new(build_registry(&config).await?);
    let messages = Arc::new(load_messages(&config).await?);

    let world = Arc::new(InMemoryWorld::new());
    for seed in &config.world.characters {
        let mut character = Character::new(&seed.account, &seed.name);
        character.level = seed.level;
        character.free_points = seed.free_points;
        world.insert(character).await;
    }
    let character = match config.world.characters.iter().find(|s| s.name.eq_ignore_ascii_case(name)) {
        Some(seed) => seed.name.clone(),
        None => {
            warn!("No seeded character named {}; creating one", name);
            world.insert(Character::new("console", name)).await;
            name.to_string()
        }
    };

    let locale = locale.unwrap_or_else(|| config.server.default_locale.clone());
    let (outbox, mut outgoing) = Outbox::channel();
    let services = Arc::new(Services::new(world.clone(), messages, outbox));
    let dispatcher = Dispatcher::new(registry, services).with_prefix(config.command_prefix()?);

    let character_id = match world.find_character(&character).await {
        Some(c) => c.id,
        None => anyhow::bail!("character {} vanished from the world", character),
    };
    let actor = Actor::new(character, privilege, locale, character_id);

    // Mark the console character online so notifications addressed to it arrive.
    if let Some(mut c) = world.character(character_id).await {
        c.presence = Some(Presence {
            actor: actor.id,
            locale: actor.locale.clone(),
        });
        world.save_character(&c).await?;
    }

    println!(
        "{} console as {} ({}). Type {}help, or Ctrl-D to quit.",
        config.server.name,
        actor.name,
        actor.privilege,
        config.server.command_prefix
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if dispatcher.is_command(line) {
            dispatcher.dispatch(&actor, line).await;
        } else {
            println!("[chat] {}: {}", actor.name, line);
        }
        while let Ok(message) = outgoing.try_recv() {
            match message.recipient {
                Recipient::Broadcast => println!("[all] {}", message.text),
                Recipient::Actor(id) if id == actor.id => println!("{}", message.text),
                Recipient::Actor(id) => println!("[to {}] {}", id, message.text),
            }
        }
    }

    let stats = metrics::snapshot();
    info!(
        "console closed: {} commands ({} handled, {} not found, {} unauthorized, {} parse failures, {} handler errors)",
        stats.total(),
        stats.handled,
        stats.not_found,
        stats.unauthorized,
        stats.parse_failed,
        stats.handler_errors
    );
    Ok(())
}

fn init_logging(config: Option<&Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let file = config
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| std::fs::OpenOptions::new().create(true).append(true).open(path).ok());

    match file {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Mirror to the console only when someone is watching it
            let is_tty = atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
