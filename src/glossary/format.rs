//! Rendering terms as Telegram HTML messages.
//!
//! Field values are escaped so `<`, `>`, `&` in stored text cannot break the
//! markup.

use tracing::warn;

use crate::glossary::term::Term;

pub const NOT_FOUND: &str = "Термин не найден.";
pub const FORMAT_ERROR: &str = "Ошибка при форматировании термина.";

/// Escape a string for Telegram's HTML parse mode.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render a term as five labelled lines. Empty fields keep their line.
///
/// A record with an empty headword or category renders as [`FORMAT_ERROR`]
/// instead of failing, so one bad row never aborts a batch of results.
pub fn format_term(term: Option<&Term>) -> String {
    let Some(term) = term else {
        return NOT_FOUND.to_string();
    };

    if !term.is_well_formed() {
        warn!("Malformed glossary record {}", term.id);
        return FORMAT_ERROR.to_string();
    }

    format!(
        "<b>Русский:</b> {}\n\
         <b>Китайский:</b> {} ({})\n\
         <b>Описание:</b> {}\n\
         <b>Пример:</b> {}\n\
         <b>Категория:</b> {}\n",
        html_escape(&term.russian_term),
        html_escape(&term.chinese_term),
        html_escape(&term.pinyin),
        html_escape(&term.description),
        html_escape(&term.example),
        html_escape(&term.category),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(html_escape("天然气"), "天然气");
    }
}
