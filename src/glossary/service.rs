//! The glossary service: everything the chat transport calls.

use std::sync::Arc;
use tracing::{info, warn};

use crate::glossary::error::Result;
use crate::glossary::format;
use crate::glossary::quiz::{Grade, QuizEngine};
use crate::glossary::resolver;
use crate::glossary::store::TermStore;
use crate::glossary::term::Term;

/// Term lookups plus the quiz engine, over one shared store.
pub struct Glossary {
    store: Arc<dyn TermStore>,
    quiz: QuizEngine,
}

impl Glossary {
    pub fn new(store: Arc<dyn TermStore>) -> Self {
        let quiz = QuizEngine::new(store.clone());
        Self { store, quiz }
    }

    pub fn search_term(&self, text: &str) -> Result<Vec<Term>> {
        resolver::search(self.store.as_ref(), text)
            .inspect_err(|e| warn!("Search for {:?} failed: {}", text, e))
    }

    pub fn random_term(&self) -> Result<Option<Term>> {
        let term = self
            .store
            .select_random()
            .inspect_err(|e| warn!("Random pick failed: {}", e))?;
        match &term {
            Some(t) => info!("Random term: {} ({})", t.id, t.russian_term),
            None => info!("Random term requested but glossary is empty"),
        }
        Ok(term)
    }

    pub fn list_categories(&self) -> Result<Vec<String>> {
        let categories = self
            .store
            .select_distinct_categories()
            .inspect_err(|e| warn!("Listing categories failed: {}", e))?;
        info!("Categories: {:?}", categories);
        Ok(categories)
    }

    pub fn terms_in_category(&self, name: &str) -> Result<Vec<Term>> {
        let terms = self
            .store
            .select_by_category(name)
            .inspect_err(|e| warn!("Category lookup {:?} failed: {}", name, e))?;
        info!("Category {:?}: {} term(s)", name, terms.len());
        Ok(terms)
    }

    pub fn format_term(&self, term: Option<&Term>) -> String {
        format::format_term(term)
    }

    /// Returns the question text for a new quiz.
    pub async fn start_quiz(&self, user_id: i64) -> Result<String> {
        self.quiz.start(user_id).await.map(|q| q.text)
    }

    /// `None` when the user has no pending question.
    pub async fn answer_quiz(&self, user_id: i64, text: &str) -> Option<Grade> {
        self.quiz.grade(user_id, text).await
    }

    pub fn quiz(&self) -> &QuizEngine {
        &self.quiz
    }
}
