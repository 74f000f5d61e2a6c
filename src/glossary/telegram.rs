//! Telegram client using teloxide.

use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tracing::warn;

/// Callback data prefix for category buttons.
pub const CATEGORY_CALLBACK_PREFIX: &str = "cat:";

/// Callback data for the category at `index` in the sorted category list.
///
/// Telegram caps callback data at 64 bytes, which long Cyrillic category
/// names can exceed, so buttons carry the index instead of the name.
pub fn category_callback_data(index: usize) -> String {
    format!("{CATEGORY_CALLBACK_PREFIX}{index}")
}

/// Inverse of [`category_callback_data`].
pub fn parse_category_callback(data: &str) -> Option<usize> {
    data.strip_prefix(CATEGORY_CALLBACK_PREFIX)?.parse().ok()
}

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Send plain text.
    pub async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), String> {
        self.bot.send_message(chat_id, text).await.map(|_| ()).map_err(|e| {
            let msg = format!("Failed to send: {e}");
            warn!("{}", msg);
            msg
        })
    }

    /// Send text already rendered as Telegram HTML.
    pub async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<(), String> {
        self.bot
            .send_message(chat_id, html)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to send: {e}");
                warn!("{}", msg);
                msg
            })
    }

    /// Send a prompt with one button per category.
    pub async fn send_category_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        categories: &[String],
    ) -> Result<(), String> {
        let rows: Vec<Vec<InlineKeyboardButton>> = categories
            .iter()
            .enumerate()
            .map(|(i, name)| vec![InlineKeyboardButton::callback(name.clone(), category_callback_data(i))])
            .collect();

        self.bot
            .send_message(chat_id, text)
            .reply_markup(InlineKeyboardMarkup::new(rows))
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to send keyboard: {e}");
                warn!("{}", msg);
                msg
            })
    }

    /// Acknowledge a button press so the client stops its spinner.
    pub async fn answer_callback(&self, id: CallbackQueryId) -> Result<(), String> {
        self.bot.answer_callback_query(id).await.map(|_| ()).map_err(|e| {
            let msg = format!("Failed to answer callback: {e}");
            warn!("{}", msg);
            msg
        })
    }
}
