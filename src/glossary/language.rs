//! Script detection for search queries.

use regex::Regex;
use std::sync::LazyLock;

/// Which headword field a query should be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Only Cyrillic letters, whitespace and hyphens.
    Russian,
    /// Contains at least one CJK unified ideograph.
    Chinese,
    /// Anything else, including empty input and mixed scripts.
    Unknown,
}

static RUSSIAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[а-яА-ЯёЁ\s\-]+$").expect("static regex"));

static CHINESE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{4E00}-\x{9FFF}]").expect("static regex"));

/// Classify a query by script. The input is trimmed first.
///
/// The Russian test runs first, so digits or Latin letters anywhere in the
/// query (e.g. `CO2 выбросы`) push it to `Unknown`.
pub fn classify(input: &str) -> Script {
    let input = input.trim();
    if RUSSIAN.is_match(input) {
        Script::Russian
    } else if CHINESE.is_match(input) {
        Script::Chinese
    } else {
        Script::Unknown
    }
}
