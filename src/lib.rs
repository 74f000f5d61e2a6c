pub mod bot;
pub mod config;
pub mod glossary;
pub mod telegram_log;
