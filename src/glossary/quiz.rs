//! Per-user quiz sessions.
//!
//! Each user has at most one pending question. Asking for a new one while a
//! question is pending is rejected; the next free-text message from that user
//! is graded and closes the session whether or not it was right.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::glossary::error::{GlossaryError, Result};
use crate::glossary::store::TermStore;

/// Quiz state for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    /// True while the question is unanswered.
    pub active: bool,
    /// The Russian headword the user has to type.
    pub expected_answer: String,
    pub term_id: i64,
    pub asked_at: DateTime<Utc>,
}

/// A question handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub term_id: i64,
}

/// Outcome of grading an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Incorrect { correct_answer: String },
}

/// Owns the session table. Shared by reference with the transport.
pub struct QuizEngine {
    store: Arc<dyn TermStore>,
    sessions: Mutex<HashMap<i64, QuizSession>>,
}

impl QuizEngine {
    pub fn new(store: Arc<dyn TermStore>) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Draw a random term and ask for its Russian translation.
    ///
    /// Fails with `QuizAlreadyActive` if the user has a pending question (the
    /// pending session is left as is) and with `EmptyGlossary` if there is
    /// nothing to ask.
    pub async fn start(&self, user_id: i64) -> Result<Question> {
        if self.is_active(user_id).await {
            info!("Quiz already active for user {}", user_id);
            return Err(GlossaryError::QuizAlreadyActive);
        }

        // Drawn without the table lock so other users' quizzes are not held up
        // by the SQLite read.
        let term = self.store.select_random()?.ok_or(GlossaryError::EmptyGlossary)?;
        let text = format!("Как переводится термин '{}' на русский язык?", term.chinese_term);

        let mut sessions = self.sessions.lock().await;
        if sessions.get(&user_id).is_some_and(|s| s.active) {
            info!("Quiz already active for user {}", user_id);
            return Err(GlossaryError::QuizAlreadyActive);
        }
        sessions.insert(
            user_id,
            QuizSession {
                active: true,
                expected_answer: term.russian_term,
                term_id: term.id,
                asked_at: Utc::now(),
            },
        );
        info!("Quiz started for user {} (term {})", user_id, term.id);

        Ok(Question { text, term_id: term.id })
    }

    /// Grade `answer` against the user's pending question.
    ///
    /// Returns `None` when no question is pending, meaning the message is not
    /// a quiz answer. Otherwise the session is removed from the table.
    pub async fn grade(&self, user_id: i64, answer: &str) -> Option<Grade> {
        let session = {
            let mut sessions = self.sessions.lock().await;
            if !sessions.get(&user_id).is_some_and(|s| s.active) {
                return None;
            }
            sessions.remove(&user_id)?
        };

        let elapsed = (Utc::now() - session.asked_at).num_seconds();
        if normalize(answer) == normalize(&session.expected_answer) {
            info!("User {} answered term {} correctly after {}s", user_id, session.term_id, elapsed);
            Some(Grade::Correct)
        } else {
            info!("User {} answered term {} incorrectly after {}s", user_id, session.term_id, elapsed);
            Some(Grade::Incorrect {
                correct_answer: session.expected_answer,
            })
        }
    }

    /// Snapshot of the user's pending session.
    pub async fn session(&self, user_id: i64) -> Option<QuizSession> {
        self.sessions.lock().await.get(&user_id).cloned()
    }

    pub async fn is_active(&self, user_id: i64) -> bool {
        self.sessions
            .lock()
            .await
            .get(&user_id)
            .is_some_and(|s| s.active)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
