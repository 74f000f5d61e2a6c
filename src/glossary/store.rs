//! Persistence interface for glossary terms.

use crate::glossary::error::Result;
use crate::glossary::term::{Term, TermInput};

/// Storage backend for glossary terms.
///
/// `insert` is the only mutator. Everything else is a read-only query, so an
/// implementation shared behind `Arc` must be safe for concurrent reads.
pub trait TermStore: Send + Sync {
    /// Append a term and return its assigned id.
    fn insert(&self, term: &TermInput) -> Result<i64>;

    /// Every term, ordered by id.
    fn select_all(&self) -> Result<Vec<Term>>;

    /// Terms whose category equals `category` exactly.
    fn select_by_category(&self, category: &str) -> Result<Vec<Term>>;

    /// Distinct categories, sorted.
    fn select_distinct_categories(&self) -> Result<Vec<String>>;

    /// One uniformly chosen term, or `None` when the store is empty.
    fn select_random(&self) -> Result<Option<Term>>;

    fn count_all(&self) -> Result<usize>;

    /// Terms whose Russian headword contains `needle`, ignoring case.
    fn match_russian(&self, needle: &str) -> Result<Vec<Term>> {
        let needle = needle.to_lowercase();
        Ok(self
            .select_all()?
            .into_iter()
            .filter(|t| t.russian_term.to_lowercase().contains(&needle))
            .collect())
    }

    /// Terms whose Chinese headword contains `needle` literally.
    fn match_chinese(&self, needle: &str) -> Result<Vec<Term>> {
        Ok(self
            .select_all()?
            .into_iter()
            .filter(|t| t.chinese_term.contains(needle))
            .collect())
    }

    /// Terms matching either headword.
    fn match_either(&self, needle: &str) -> Result<Vec<Term>> {
        let lowered = needle.to_lowercase();
        Ok(self
            .select_all()?
            .into_iter()
            .filter(|t| {
                t.russian_term.to_lowercase().contains(&lowered) || t.chinese_term.contains(needle)
            })
            .collect())
    }
}
