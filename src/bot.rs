//! Bot commands and the replies they produce.
//!
//! Handlers here only talk to [`Glossary`] and return [`Reply`] values; the
//! dispatcher in `main.rs` delivers them through the Telegram client.

use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use crate::glossary::{Glossary, GlossaryError, Grade};

pub const GREETING: &str = "Привет! Я глоссарий по низкоуглеродной энергетике.\n\n\
    Вот список команд, которые я поддерживаю:\n\
    /search [термин] - Поиск термина на русском или китайском языке.\n\
    /random - Показать случайный термин.\n\
    /category - Выбрать категорию терминов.\n\
    /quiz - Пройти викторину по терминам.\n\
    /help - Получить справку по боту.";
pub const SEARCH_USAGE: &str = "Пожалуйста, укажите термин для поиска. Пример: /search природный газ";
pub const SEARCH_NOT_FOUND: &str = "Термин не найден в базе данных.";
pub const GLOSSARY_EMPTY: &str = "Глоссарий пуст.";
pub const NO_CATEGORIES: &str = "Категории не найдены.";
pub const CHOOSE_CATEGORY: &str = "Выберите категорию:";
pub const CATEGORY_EMPTY: &str = "Термины в этой категории не найдены.";
pub const QUIZ_ALREADY_ACTIVE: &str = "Викторина уже активна. Ответьте на текущий вопрос.";
pub const QUIZ_CORRECT: &str = "Правильно! 🎉";
pub const INTERNAL_ERROR: &str = "Произошла ошибка. Попробуйте позже.";

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды глоссария:")]
pub enum Command {
    #[command(description = "приветствие и список команд")]
    Start,
    #[command(description = "справка по боту")]
    Help,
    #[command(description = "поиск термина на русском или китайском языке")]
    Search(String),
    #[command(description = "случайный термин")]
    Random,
    #[command(description = "выбрать категорию терминов")]
    Category,
    #[command(description = "викторина по терминам")]
    Quiz,
}

/// One outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Telegram HTML, as produced by the formatter.
    Html(String),
    /// Prompt text plus one button per category, in list order.
    CategoryKeyboard { text: String, categories: Vec<String> },
}

fn text(s: &str) -> Reply {
    Reply::Text(s.to_string())
}

/// Replies for a parsed command from `user_id`.
pub async fn handle_command(glossary: &Glossary, user_id: i64, cmd: Command) -> Vec<Reply> {
    match cmd {
        Command::Start | Command::Help => vec![text(GREETING)],
        Command::Search(query) => search(glossary, &query),
        Command::Random => match glossary.random_term() {
            Ok(Some(term)) => vec![Reply::Html(glossary.format_term(Some(&term)))],
            Ok(None) => vec![text(GLOSSARY_EMPTY)],
            Err(_) => vec![text(INTERNAL_ERROR)],
        },
        Command::Category => match glossary.list_categories() {
            Ok(categories) if categories.is_empty() => vec![text(NO_CATEGORIES)],
            Ok(categories) => vec![Reply::CategoryKeyboard {
                text: CHOOSE_CATEGORY.to_string(),
                categories,
            }],
            Err(_) => vec![text(INTERNAL_ERROR)],
        },
        Command::Quiz => match glossary.start_quiz(user_id).await {
            Ok(question) => vec![Reply::Text(question)],
            Err(GlossaryError::QuizAlreadyActive) => vec![text(QUIZ_ALREADY_ACTIVE)],
            Err(GlossaryError::EmptyGlossary) => vec![text(GLOSSARY_EMPTY)],
            Err(e) => {
                warn!("Quiz start for user {} failed: {}", user_id, e);
                vec![text(INTERNAL_ERROR)]
            }
        },
    }
}

fn search(glossary: &Glossary, query: &str) -> Vec<Reply> {
    if query.trim().is_empty() {
        return vec![text(SEARCH_USAGE)];
    }
    match glossary.search_term(query) {
        Ok(terms) if terms.is_empty() => vec![text(SEARCH_NOT_FOUND)],
        Ok(terms) => terms
            .iter()
            .map(|t| Reply::Html(glossary.format_term(Some(t))))
            .collect(),
        Err(_) => vec![text(INTERNAL_ERROR)],
    }
}

/// Replies for a non-command text message. Empty unless it answers a pending quiz.
pub async fn handle_text(glossary: &Glossary, user_id: i64, message: &str) -> Vec<Reply> {
    match glossary.answer_quiz(user_id, message).await {
        Some(Grade::Correct) => vec![text(QUIZ_CORRECT)],
        Some(Grade::Incorrect { correct_answer }) => vec![Reply::Text(format!(
            "Неправильно. Правильный ответ: {}",
            correct_answer
        ))],
        None => Vec::new(),
    }
}

/// Replies for a press on the category button at `index`.
pub fn handle_category(glossary: &Glossary, index: usize) -> Vec<Reply> {
    let categories = match glossary.list_categories() {
        Ok(c) => c,
        Err(_) => return vec![text(INTERNAL_ERROR)],
    };
    let Some(name) = categories.get(index) else {
        info!("Category button {} is stale ({} categories)", index, categories.len());
        return vec![text(CATEGORY_EMPTY)];
    };

    match glossary.terms_in_category(name) {
        Ok(terms) if terms.is_empty() => vec![text(CATEGORY_EMPTY)],
        Ok(terms) => terms
            .iter()
            .map(|t| Reply::Html(glossary.format_term(Some(t))))
            .collect(),
        Err(_) => vec![text(INTERNAL_ERROR)],
    }
}
