//! FairBooking Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;
use teloxide::{prelude::*, types::{CallbackQuery, Message, Update}};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn, error};

use FairBooking::{
    config::Settings,
    utils::logging,
    database::{create_pool, run_migrations, DatabaseService},
    services::ServiceFactory,
    state::{DialogueEngine, StateStorage},
    middleware::RateLimitMiddleware,
    handlers::{handle_callback_query, handle_command, handle_message, Command},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);
const CONVERSATION_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", FairBooking::info());

    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;

    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    let database_service = DatabaseService::new(db_pool);
    let services = ServiceFactory::new(database_service);

    let health = services.health_check().await;
    if !health.is_healthy() {
        warn!(issues = ?health.get_issues(), "Service health check reported issues");
    }

    // Initialize state management
    let state_storage = StateStorage::from_config(&settings.dialogue, settings.redis.as_ref()).await?;
    spawn_conversation_cleanup(state_storage.clone());
    let engine = DialogueEngine::new(services, state_storage, &settings);

    let rate_limiter = RateLimitMiddleware::new(&settings.rate_limit, &settings.bot.admin_ids)?;
    spawn_rate_limit_cleanup(rate_limiter.clone());

    let bot = Bot::new(&settings.bot.token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register the command list");
    }

    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(engine), Arc::new(rate_limiter)])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .enable_ctrlc_handler()
        .build();

    info!("FairBooking bot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("FairBooking bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(dptree::endpoint(handle_messages)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

fn spawn_rate_limit_cleanup(rate_limiter: RateLimitMiddleware) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            rate_limiter.cleanup();
        }
    });
}

fn spawn_conversation_cleanup(storage: StateStorage) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CONVERSATION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match storage.cleanup_expired().await {
                Ok(0) => {}
                Ok(count) => info!(removed = count, "Removed expired conversations"),
                Err(e) => error!(error = %e, "Conversation cleanup failed"),
            }
        }
    });
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    engine: Arc<DialogueEngine>,
    rate_limiter: Arc<RateLimitMiddleware>,
) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, &engine, &rate_limiter).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    engine: Arc<DialogueEngine>,
    rate_limiter: Arc<RateLimitMiddleware>,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, &engine, &rate_limiter).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    engine: Arc<DialogueEngine>,
    rate_limiter: Arc<RateLimitMiddleware>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;
    if let Err(e) = handle_callback_query(bot, query, &engine, &rate_limiter).await {
        error!(
            user_id = user_id,
            error = %e,
            severity = %e.severity(),
            recoverable = e.is_recoverable(),
            "Error handling callback query"
        );
        return Err(e.into());
    }

    Ok(())
}
