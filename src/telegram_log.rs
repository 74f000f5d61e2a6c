//! Tracing layer that mirrors the bot's own log lines into a Telegram chat.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Telegram rejects messages longer than 4096 chars.
const MAX_LOG_CHARS: usize = 4000;
const FLUSH_INTERVAL: Duration = Duration::from_secs(5);
const MAX_BUFFERED: usize = 50;

enum LogMessage {
    /// WARN/ERROR, sent at once.
    Urgent(String),
    /// INFO, batched.
    Info(String),
}

pub struct TelegramLogLayer {
    tx: mpsc::UnboundedSender<LogMessage>,
    target_prefix: &'static str,
}

impl TelegramLogLayer {
    /// Only events whose target starts with `target_prefix` are forwarded, so
    /// the HTTP client's own logging while sending cannot feed back into the layer.
    pub fn new(bot: Bot, chat_id: ChatId, target_prefix: &'static str) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<LogMessage>();

        tokio::spawn(async move {
            let mut info_buffer: Vec<String> = Vec::new();
            let mut interval = tokio::time::interval(FLUSH_INTERVAL);

            loop {
                tokio::select! {
                    msg = rx.recv() => {
                        match msg {
                            Some(LogMessage::Urgent(text)) => send_log(&bot, chat_id, &text).await,
                            Some(LogMessage::Info(text)) => {
                                info_buffer.push(text);
                                if info_buffer.len() >= MAX_BUFFERED {
                                    flush_buffer(&bot, chat_id, &mut info_buffer).await;
                                }
                            }
                            None => {
                                flush_buffer(&bot, chat_id, &mut info_buffer).await;
                                break;
                            }
                        }
                    }
                    _ = interval.tick() => flush_buffer(&bot, chat_id, &mut info_buffer).await,
                }
            }
        });

        Self { tx, target_prefix }
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_LOG_CHARS {
        let truncated: String = text.chars().take(MAX_LOG_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

async fn send_log(bot: &Bot, chat_id: ChatId, text: &str) {
    if let Err(e) = bot.send_message(chat_id, truncate(text)).await {
        eprintln!("Failed to send log to Telegram: {e}");
    }
}

async fn flush_buffer(bot: &Bot, chat_id: ChatId, buffer: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }
    let combined = buffer.join("\n");
    buffer.clear();
    send_log(bot, chat_id, &combined).await;
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else if self.message.is_empty() {
            self.message = format!("{} = {:?}", field.name(), value);
        } else {
            self.message.push_str(&format!(", {} = {:?}", field.name(), value));
        }
    }
}

impl<S: Subscriber> Layer<S> for TelegramLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = *metadata.level();

        if level > Level::INFO || !metadata.target().starts_with(self.target_prefix) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let msg = match level {
            Level::ERROR => LogMessage::Urgent(format!("❌ {}", visitor.message)),
            Level::WARN => LogMessage::Urgent(format!("⚠️ {}", visitor.message)),
            _ => LogMessage::Info(visitor.message),
        };

        if self.tx.send(msg).is_err() {
            eprintln!("Log channel closed, message dropped");
        }
    }
}
