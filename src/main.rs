use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;

use glossary_bot::bot::{self, Command, Reply};
use glossary_bot::config::Config;
use glossary_bot::glossary::telegram::parse_category_callback;
use glossary_bot::glossary::{seed, Database, Glossary, TelegramClient};
use glossary_bot::telegram_log::TelegramLogLayer;

struct BotState {
    glossary: Glossary,
    telegram: TelegramClient,
}

impl BotState {
    async fn deliver(&self, chat_id: ChatId, replies: Vec<Reply>) {
        for reply in replies {
            // Send errors are already logged by the client; keep going with the rest.
            let _ = match reply {
                Reply::Text(text) => self.telegram.send_message(chat_id, &text).await,
                Reply::Html(html) => self.telegram.send_html(chat_id, &html).await,
                Reply::CategoryKeyboard { text, categories } => {
                    self.telegram.send_category_keyboard(chat_id, &text, &categories).await
                }
            };
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "glossary.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.telegram_bot_token);

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("glossary.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    let registry = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        );

    if let Some(log_chat_id) = config.log_chat_id {
        let tg_layer = TelegramLogLayer::new(bot.clone(), log_chat_id, "glossary_bot");
        registry.with(tg_layer).init();
    } else {
        registry.init();
    }

    info!("🚀 Starting glossary bot...");
    info!("Loaded config from {config_path}");

    let database = match Database::open(&config.database_path) {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {:?}: {e}", config.database_path);
            std::process::exit(1);
        }
    };

    let seed_terms = match &config.seed_path {
        Some(path) => match seed::load_seed_file(path) {
            Ok(terms) => terms,
            Err(e) => {
                error!("Failed to load seed file {:?}: {e}", path);
                std::process::exit(1);
            }
        },
        None => seed::default_terms(),
    };
    // Seeding finishes before the dispatcher starts, so queries never race the writer.
    if let Err(e) = seed::populate_if_empty(&database, &seed_terms) {
        error!("Failed to seed glossary: {e}");
        std::process::exit(1);
    }

    let state = Arc::new(BotState {
        glossary: Glossary::new(Arc::new(database)),
        telegram: TelegramClient::new(bot.clone()),
    });

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .branch(dptree::entry().filter_command::<Command>().endpoint(handle_command))
                .branch(dptree::endpoint(handle_text)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    info!("Bot started");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn sender_id(msg: &Message) -> Option<i64> {
    msg.from.as_ref().map(|u| u.id.0 as i64)
}

async fn handle_command(msg: Message, cmd: Command, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(user_id) = sender_id(&msg) else {
        return Ok(());
    };
    info!("Command {:?} from user {}", cmd, user_id);

    let replies = bot::handle_command(&state.glossary, user_id, cmd).await;
    state.deliver(msg.chat.id, replies).await;
    Ok(())
}

async fn handle_text(msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let (Some(user_id), Some(text)) = (sender_id(&msg), msg.text()) else {
        return Ok(());
    };
    // Unknown commands are not quiz answers.
    if text.starts_with('/') {
        return Ok(());
    }

    let replies = bot::handle_text(&state.glossary, user_id, text.trim()).await;
    state.deliver(msg.chat.id, replies).await;
    Ok(())
}

async fn handle_callback(q: CallbackQuery, state: Arc<BotState>) -> ResponseResult<()> {
    let _ = state.telegram.answer_callback(q.id.clone()).await;

    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        return Ok(());
    };
    let Some(index) = q.data.as_deref().and_then(parse_category_callback) else {
        warn!("Unexpected callback data {:?}", q.data);
        return Ok(());
    };

    let replies = bot::handle_category(&state.glossary, index);
    state.deliver(chat_id, replies).await;
    Ok(())
}
