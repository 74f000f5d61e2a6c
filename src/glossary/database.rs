//! SQLite-backed term store.

use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::glossary::error::Result;
use crate::glossary::store::TermStore;
use crate::glossary::term::{Term, TermInput};

const TERM_COLUMNS: &str =
    "id, russian_term, chinese_term, pinyin, description, example, category";

/// Persistent SQLite database holding the glossary table.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Create a new in-memory database.
    pub fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    /// Open (or create) a database file at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self::with_connection(conn)?;
        info!("Opened glossary database {:?} ({} terms)", path, db.count_all()?);
        Ok(db)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self { conn: Mutex::new(conn) };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock();
        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS glossary (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                russian_term TEXT NOT NULL,
                chinese_term TEXT NOT NULL,
                pinyin TEXT,
                description TEXT,
                example TEXT,
                category TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_glossary_category ON glossary(category);
        "#)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // Poisoning is ignored: every statement is atomic on the SQLite side.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert several terms in one transaction. Nothing is written if any
    /// term is invalid.
    pub fn insert_many(&self, terms: &[TermInput]) -> Result<usize> {
        for term in terms {
            term.validate()?;
        }

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO glossary (russian_term, chinese_term, pinyin, description, example, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for t in terms {
                stmt.execute(params![
                    t.russian_term,
                    t.chinese_term,
                    t.pinyin,
                    t.description,
                    t.example,
                    t.category
                ])?;
            }
        }
        tx.commit()?;
        Ok(terms.len())
    }

    /// Whether a term with exactly this Russian headword exists.
    pub fn contains_russian_term(&self, russian_term: &str) -> Result<bool> {
        let conn = self.lock();
        let found = conn
            .query_row(
                "SELECT 1 FROM glossary WHERE russian_term = ?1 LIMIT 1",
                params![russian_term],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert `term` with its fields trimmed, unless a term with the same
    /// trimmed Russian headword is already stored. `None` means skipped.
    pub fn insert_if_absent(&self, term: &TermInput) -> Result<Option<i64>> {
        let term = term.trimmed();
        if self.contains_russian_term(&term.russian_term)? {
            debug!("Skipping {:?}: already present", term.russian_term);
            return Ok(None);
        }
        self.insert(&term).map(Some)
    }

    fn query_terms(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<Term>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, term_from_row)?;
        let terms = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(terms)
    }
}

/// Nullable text columns read back as empty strings.
fn term_from_row(row: &Row<'_>) -> rusqlite::Result<Term> {
    Ok(Term {
        id: row.get(0)?,
        russian_term: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        chinese_term: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        pinyin: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        example: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        category: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

impl TermStore for Database {
    fn insert(&self, term: &TermInput) -> Result<i64> {
        term.validate()?;
        let conn = self.lock();
        conn.execute(
            "INSERT INTO glossary (russian_term, chinese_term, pinyin, description, example, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                term.russian_term,
                term.chinese_term,
                term.pinyin,
                term.description,
                term.example,
                term.category
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Inserted term {} ({})", id, term.russian_term);
        Ok(id)
    }

    fn select_all(&self) -> Result<Vec<Term>> {
        self.query_terms(&format!("SELECT {TERM_COLUMNS} FROM glossary ORDER BY id"), [])
    }

    fn select_by_category(&self, category: &str) -> Result<Vec<Term>> {
        self.query_terms(
            &format!("SELECT {TERM_COLUMNS} FROM glossary WHERE category = ?1 ORDER BY id"),
            params![category],
        )
    }

    fn select_distinct_categories(&self) -> Result<Vec<String>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM glossary WHERE category IS NOT NULL ORDER BY category",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let categories = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    fn select_random(&self) -> Result<Option<Term>> {
        let conn = self.lock();
        let term = conn
            .query_row(
                &format!("SELECT {TERM_COLUMNS} FROM glossary ORDER BY RANDOM() LIMIT 1"),
                [],
                term_from_row,
            )
            .optional()?;
        Ok(term)
    }

    fn count_all(&self) -> Result<usize> {
        let conn = self.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM glossary", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn match_chinese(&self, needle: &str) -> Result<Vec<Term>> {
        // instr() is a literal byte match, which is what Chinese text wants.
        self.query_terms(
            &format!("SELECT {TERM_COLUMNS} FROM glossary WHERE instr(chinese_term, ?1) > 0 ORDER BY id"),
            params![needle],
        )
    }
}
