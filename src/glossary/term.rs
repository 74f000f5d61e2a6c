//! Glossary term records.

use serde::Deserialize;

use crate::glossary::error::{GlossaryError, Result};

/// A stored glossary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub id: i64,
    pub russian_term: String,
    pub chinese_term: String,
    pub pinyin: String,
    pub description: String,
    pub example: String,
    pub category: String,
}

impl Term {
    /// Headwords and category must be non-empty. Rows read back from a
    /// hand-edited database can violate this.
    pub fn is_well_formed(&self) -> bool {
        !self.russian_term.trim().is_empty()
            && !self.chinese_term.trim().is_empty()
            && !self.category.trim().is_empty()
    }
}

/// Fields supplied when inserting a term. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermInput {
    pub russian_term: String,
    pub chinese_term: String,
    #[serde(default)]
    pub pinyin: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: String,
    pub category: String,
}

impl TermInput {
    pub fn new(
        russian_term: &str,
        chinese_term: &str,
        pinyin: &str,
        description: &str,
        example: &str,
        category: &str,
    ) -> Self {
        Self {
            russian_term: russian_term.to_string(),
            chinese_term: chinese_term.to_string(),
            pinyin: pinyin.to_string(),
            description: description.to_string(),
            example: example.to_string(),
            category: category.to_string(),
        }
    }

    /// Copy with surrounding whitespace stripped from every field.
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.russian_term.trim(),
            self.chinese_term.trim(),
            self.pinyin.trim(),
            self.description.trim(),
            self.example.trim(),
            self.category.trim(),
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.russian_term.trim().is_empty() {
            return Err(GlossaryError::InvalidTerm("russian_term is empty".into()));
        }
        if self.chinese_term.trim().is_empty() {
            return Err(GlossaryError::InvalidTerm("chinese_term is empty".into()));
        }
        if self.category.trim().is_empty() {
            return Err(GlossaryError::InvalidTerm("category is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_fields() {
        let ok = TermInput::new("природный газ", "天然气", "", "", "", "Энергетический переход");
        assert!(ok.validate().is_ok());

        let mut bad = ok.clone();
        bad.russian_term = "  ".into();
        assert!(matches!(bad.validate(), Err(GlossaryError::InvalidTerm(_))));

        let mut bad = ok.clone();
        bad.category = String::new();
        assert!(matches!(bad.validate(), Err(GlossaryError::InvalidTerm(_))));
    }

    #[test]
    fn test_trimmed_strips_every_field() {
        let padded = TermInput::new(" природный газ ", "天然气\n", " tiānrán qì", "", " ", "\tЭнергетический переход ");
        assert_eq!(
            padded.trimmed(),
            TermInput::new("природный газ", "天然气", "tiānrán qì", "", "", "Энергетический переход")
        );
    }

    #[test]
    fn test_input_optional_fields_default() {
        let input: TermInput = serde_json::from_str(
            r#"{"russian_term": "таксономия", "chinese_term": "分类法", "category": "Углеродное регулирование"}"#,
        )
        .unwrap();
        assert_eq!(input.pinyin, "");
        assert_eq!(input.example, "");
    }
}
