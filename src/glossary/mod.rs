//! Glossary module - term lookup and quizzes over the low-carbon energy glossary.

pub mod database;
pub mod error;
pub mod format;
pub mod language;
pub mod quiz;
pub mod resolver;
pub mod seed;
pub mod service;
pub mod store;
pub mod telegram;
pub mod term;

#[cfg(test)]
mod tests;

pub use database::Database;
pub use error::GlossaryError;
pub use quiz::{Grade, QuizEngine, QuizSession};
pub use service::Glossary;
pub use store::TermStore;
pub use telegram::TelegramClient;
pub use term::{Term, TermInput};
