//! Voice shopping assistant, text front end
//!
//! Reads one utterance per line from stdin. Logs go to stderr.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use voice_shop_agent::{ShoppingSession, ShoppingSessionConfig};
use voice_shop_cli::{
    build_backend, build_registry, language_hint, render_list, render_outcome, render_suggestions, CliCommand,
    ConsoleNotifier, HELP,
};
use voice_shop_config::{load_settings, Settings, ENV_VAR};
use voice_shop_text_processing::CommandInterpreter;
use voice_shop_tools::Dispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.toml > config/default.toml > defaults
    let env = std::env::var(ENV_VAR).ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };

    init_tracing(&settings);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?settings.environment,
        config_env = env.as_deref().unwrap_or("default"),
        "Starting voice shopping assistant"
    );

    let registry = Arc::new(build_registry(&settings)?);
    let backend = build_backend(&settings)?;
    let dispatcher = Dispatcher::new(backend.clone(), Arc::new(ConsoleNotifier));
    let session = ShoppingSession::new(
        CommandInterpreter::new(registry.clone()),
        dispatcher,
        ShoppingSessionConfig::from_settings(&settings),
    )?;

    let mut language = settings.interpreter.default_language.clone();
    println!("Voice shopping assistant ({}). Type :help for commands.", language);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match CliCommand::parse(&line) {
            CliCommand::Empty => continue,
            CliCommand::Quit => break,
            CliCommand::Help => println!("{}", HELP),
            CliCommand::Lang(None) => {
                println!("Language: {} ({})", language, registry.resolve(&language).language().name())
            },
            CliCommand::Lang(Some(tag)) => {
                let profile = registry.resolve(&tag);
                println!("Language set to {} ({})", tag, profile.language().name());
                language = tag;
            },
            CliCommand::List => match backend.list_items().await {
                Ok(items) => println!("{}", render_list(&items)),
                Err(e) => eprintln!("Could not load list: {}", e),
            },
            CliCommand::Clear => match backend.clear().await {
                Ok(_) => println!("Shopping list cleared."),
                Err(e) => eprintln!("Could not clear list: {}", e),
            },
            CliCommand::Suggest => match backend.suggestions().await {
                Ok(suggestions) => println!("{}", render_suggestions(&suggestions)),
                Err(e) => eprintln!("Could not load suggestions: {}", e),
            },
            CliCommand::Unrecognized(name) => println!("Unknown command :{}. Type :help.", name),
            CliCommand::Utterance(text) => {
                let (command, outcome) = session.handle(&text, Some(language.as_str())).await?;
                let rendered = render_outcome(&command, &outcome);
                if !rendered.is_empty() {
                    println!("{}", rendered);
                }
                if command.is_unknown() {
                    let current = registry.resolve(&language).language();
                    if let Some(hint) = language_hint(&text, current) {
                        println!("{}", hint);
                    }
                }
            },
        }
    }

    session.end("input closed").await;
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.observability.log_level.clone().into());

    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
