//! Behaviour tests for the glossary: search, categories, random picks,
//! quizzes and formatting.
//!
//! Run with: cargo test glossary

use std::sync::Arc;

use super::*;
use super::format::{FORMAT_ERROR, NOT_FOUND};

fn input(ru: &str, zh: &str, pinyin: &str, category: &str) -> TermInput {
    TermInput::new(ru, zh, pinyin, "", "", category)
}

fn gas() -> TermInput {
    TermInput::new(
        "природный газ",
        "天然气",
        "tiānrán qì",
        "Горючее ископаемое, используемое для производства энергии.",
        "Природный газ является самым экологически чистым ископаемым топливом.",
        "Энергетический переход",
    )
}

fn store_with(terms: &[TermInput]) -> Arc<Database> {
    let db = Database::new().unwrap();
    for t in terms {
        db.insert(t).unwrap();
    }
    Arc::new(db)
}

fn glossary_with(terms: &[TermInput]) -> Glossary {
    Glossary::new(store_with(terms))
}

fn seeded() -> Glossary {
    glossary_with(&seed::default_terms())
}

// =============================================================================
// SEARCH TESTS
// =============================================================================

mod search {
    use super::*;

    #[test]
    fn test_every_russian_headword_finds_its_term() {
        let glossary = seeded();
        for term in glossary.search_term("").unwrap() {
            let hits = glossary.search_term(&term.russian_term).unwrap();
            assert!(hits.contains(&term), "{} not found by its headword", term.russian_term);
        }
    }

    #[test]
    fn test_every_chinese_headword_finds_its_term() {
        let glossary = seeded();
        for term in glossary.search_term("").unwrap() {
            let hits = glossary.search_term(&term.chinese_term).unwrap();
            assert!(hits.contains(&term), "{} not found by its headword", term.chinese_term);
        }
    }

    #[test]
    fn test_russian_is_case_insensitive() {
        let glossary = glossary_with(&[gas()]);
        assert_eq!(glossary.search_term("ПРИРОДНЫЙ").unwrap().len(), 1);
        assert_eq!(glossary.search_term("Природный Газ").unwrap().len(), 1);
    }

    #[test]
    fn test_substring_not_anchored() {
        let glossary = glossary_with(&[gas()]);
        assert_eq!(glossary.search_term("родный").unwrap().len(), 1);
        assert_eq!(glossary.search_term("然").unwrap().len(), 1);
    }

    #[test]
    fn test_query_is_trimmed() {
        let glossary = glossary_with(&[gas()]);
        assert_eq!(glossary.search_term("  природный газ  ").unwrap().len(), 1);
    }

    #[test]
    fn test_or_scan_examples() {
        let glossary = glossary_with(&[
            gas(),
            input("водородная энергетика", "氢能", "qīng néng", "Вторичные источники энергии"),
        ]);

        let hits = glossary.search_term("природный").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].russian_term, "природный газ");

        let hits = glossary.search_term("气").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chinese_term, "天然气");

        assert!(glossary.search_term("xyz").unwrap().is_empty());
    }

    #[test]
    fn test_empty_query_scans_both_fields() {
        let glossary = seeded();
        assert_eq!(glossary.search_term("").unwrap().len(), 12);
    }

    #[test]
    fn test_russian_query_ignores_chinese_field() {
        // A Cyrillic query only looks at russian_term, even if the Chinese
        // field happens to contain the same text.
        let glossary = glossary_with(&[input("водород", "氢 нефть", "", "Прочее")]);
        assert!(glossary.search_term("нефть").unwrap().is_empty());
        assert_eq!(glossary.search_term("氢").unwrap().len(), 1);
    }

    #[test]
    fn test_mixed_script_falls_back_to_either() {
        let glossary = glossary_with(&[input("CO2 выбросы", "二氧化碳排放", "", "Прочее")]);
        assert_eq!(glossary.search_term("co2 выбросы").unwrap().len(), 1);
    }

    #[test]
    fn test_multiple_hits_in_id_order() {
        let glossary = seeded();
        let hits = glossary.search_term("碳").unwrap();
        assert!(hits.len() > 1);
        assert!(hits.windows(2).all(|w| w[0].id < w[1].id));
    }
}

// =============================================================================
// CATEGORY AND RANDOM TESTS
// =============================================================================

mod browse {
    use super::*;

    #[test]
    fn test_categories_are_distinct_for_any_order() {
        let a = input("а", "一", "", "Альфа");
        let b = input("б", "二", "", "Бета");
        let c = input("в", "三", "", "Альфа");

        for order in [[&a, &b, &c], [&c, &b, &a], [&b, &a, &c]] {
            let terms: Vec<TermInput> = order.iter().map(|t| (*t).clone()).collect();
            let glossary = glossary_with(&terms);
            assert_eq!(glossary.list_categories().unwrap(), vec!["Альфа", "Бета"]);
        }
    }

    #[test]
    fn test_seed_categories() {
        let glossary = seeded();
        let categories = glossary.list_categories().unwrap();
        assert_eq!(categories.len(), 3);
        assert!(categories.contains(&"Энергетический переход".to_string()));
    }

    #[test]
    fn test_terms_in_category_exact_match() {
        let glossary = seeded();
        let terms = glossary.terms_in_category("Вторичные источники энергии").unwrap();
        assert_eq!(terms.len(), 2);
        assert!(terms.iter().all(|t| t.category == "Вторичные источники энергии"));

        assert!(glossary.terms_in_category("Вторичные").unwrap().is_empty());
        assert!(glossary.terms_in_category("нет такой").unwrap().is_empty());
    }

    #[test]
    fn test_random_on_empty_store() {
        let glossary = glossary_with(&[]);
        assert!(glossary.random_term().unwrap().is_none());
        assert!(glossary.list_categories().unwrap().is_empty());
    }

    #[test]
    fn test_random_is_member_of_store() {
        let glossary = seeded();
        let all = glossary.search_term("").unwrap();
        for _ in 0..20 {
            let term = glossary.random_term().unwrap().unwrap();
            assert!(all.contains(&term));
        }
    }
}

// =============================================================================
// QUIZ TESTS
// =============================================================================

mod quiz_flow {
    use super::*;

    #[tokio::test]
    async fn test_question_mentions_chinese_term() {
        let glossary = glossary_with(&[gas()]);
        let question = glossary.start_quiz(1).await.unwrap();
        assert_eq!(question, "Как переводится термин '天然气' на русский язык?");
    }

    #[tokio::test]
    async fn test_correct_answer_normalized() {
        let glossary = glossary_with(&[gas()]);
        glossary.start_quiz(1).await.unwrap();
        assert_eq!(glossary.answer_quiz(1, "  Природный ГАЗ ").await, Some(Grade::Correct));
        assert!(!glossary.quiz().is_active(1).await);
    }

    #[tokio::test]
    async fn test_incorrect_answer_reveals_and_closes() {
        let glossary = glossary_with(&[gas()]);
        glossary.start_quiz(1).await.unwrap();
        assert_eq!(
            glossary.answer_quiz(1, "нефть").await,
            Some(Grade::Incorrect { correct_answer: "природный газ".to_string() })
        );
        // No retry: the next message is not graded.
        assert_eq!(glossary.answer_quiz(1, "природный газ").await, None);
        // And a new quiz can start.
        assert!(glossary.start_quiz(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_answer_without_session_is_ignored() {
        let glossary = glossary_with(&[gas()]);
        assert_eq!(glossary.answer_quiz(7, "природный газ").await, None);
        assert!(glossary.quiz().session(7).await.is_none());
    }

    #[tokio::test]
    async fn test_double_start_rejected_without_change() {
        let glossary = seeded();
        glossary.start_quiz(1).await.unwrap();
        let before = glossary.quiz().session(1).await.unwrap();

        for _ in 0..5 {
            assert!(matches!(
                glossary.start_quiz(1).await,
                Err(GlossaryError::QuizAlreadyActive)
            ));
        }
        assert_eq!(glossary.quiz().session(1).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_session_records_term() {
        let store = store_with(&[gas()]);
        let engine = QuizEngine::new(store.clone());
        let question = engine.start(5).await.unwrap();

        let session = engine.session(5).await.unwrap();
        assert!(session.active);
        assert_eq!(session.expected_answer, "природный газ");
        assert_eq!(session.term_id, question.term_id);
        assert_eq!(store.select_all().unwrap()[0].id, session.term_id);
    }

    #[tokio::test]
    async fn test_empty_glossary() {
        let glossary = glossary_with(&[]);
        assert!(matches!(glossary.start_quiz(1).await, Err(GlossaryError::EmptyGlossary)));
        assert!(!glossary.quiz().is_active(1).await);
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let glossary = glossary_with(&[gas()]);
        glossary.start_quiz(1).await.unwrap();
        glossary.start_quiz(2).await.unwrap();

        assert_eq!(glossary.answer_quiz(1, "природный газ").await, Some(Grade::Correct));
        assert!(glossary.quiz().is_active(2).await);
        assert!(matches!(
            glossary.start_quiz(2).await,
            Err(GlossaryError::QuizAlreadyActive)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_starts_single_winner() {
        let glossary = Arc::new(seeded());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let g = glossary.clone();
            handles.push(tokio::spawn(async move { g.start_quiz(42).await.is_ok() }));
        }

        let mut winners = 0;
        for h in handles {
            if h.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}

// =============================================================================
// STORAGE FAILURE TESTS
// =============================================================================

mod storage_failure {
    use super::*;

    /// A glossary whose table was dropped behind its back by another
    /// connection, as a hand-edited database file would be.
    fn broken() -> (tempfile::TempDir, Glossary) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glossary.db");
        let db = Database::open(&path).unwrap();
        db.insert(&gas()).unwrap();

        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("DROP TABLE glossary")
            .unwrap();
        (dir, Glossary::new(Arc::new(db)))
    }

    #[test]
    fn test_lookups_report_storage_error() {
        let (_dir, glossary) = broken();
        assert!(matches!(glossary.search_term("газ"), Err(GlossaryError::Storage(_))));
        assert!(matches!(glossary.search_term("天然气"), Err(GlossaryError::Storage(_))));
        assert!(matches!(glossary.random_term(), Err(GlossaryError::Storage(_))));
        assert!(matches!(glossary.list_categories(), Err(GlossaryError::Storage(_))));
        assert!(matches!(
            glossary.terms_in_category("Энергетический переход"),
            Err(GlossaryError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_quiz_start_leaves_no_session() {
        let (_dir, glossary) = broken();
        assert!(matches!(glossary.start_quiz(1).await, Err(GlossaryError::Storage(_))));
        assert!(glossary.quiz().session(1).await.is_none());
        assert_eq!(glossary.answer_quiz(1, "природный газ").await, None);
    }

    #[tokio::test]
    async fn test_bot_replies_generic_error() {
        use crate::bot::{self, Command, INTERNAL_ERROR, Reply};

        let (_dir, glossary) = broken();
        let failure = vec![Reply::Text(INTERNAL_ERROR.to_string())];
        for cmd in [
            Command::Search("газ".into()),
            Command::Random,
            Command::Category,
            Command::Quiz,
        ] {
            assert_eq!(bot::handle_command(&glossary, 1, cmd).await, failure);
        }
        assert_eq!(bot::handle_category(&glossary, 0), failure);
    }
}

// =============================================================================
// FORMATTING TESTS
// =============================================================================

mod formatting {
    use super::*;

    fn term() -> Term {
        Term {
            id: 7,
            russian_term: "природный газ".into(),
            chinese_term: "天然气".into(),
            pinyin: "tiānrán qì".into(),
            description: "Горючее ископаемое.".into(),
            example: "Пример.".into(),
            category: "Энергетический переход".into(),
        }
    }

    #[test]
    fn test_none_is_not_found() {
        assert_eq!(format::format_term(None), NOT_FOUND);
    }

    #[test]
    fn test_full_layout() {
        assert_eq!(
            format::format_term(Some(&term())),
            "<b>Русский:</b> природный газ\n\
             <b>Китайский:</b> 天然气 (tiānrán qì)\n\
             <b>Описание:</b> Горючее ископаемое.\n\
             <b>Пример:</b> Пример.\n\
             <b>Категория:</b> Энергетический переход\n"
        );
    }

    #[test]
    fn test_empty_fields_keep_their_lines() {
        let mut t = term();
        t.pinyin.clear();
        t.description.clear();
        t.example.clear();

        let out = format::format_term(Some(&t));
        assert_eq!(out.lines().count(), 5);
        assert!(out.contains("<b>Китайский:</b> 天然气 ()\n"));
        assert!(out.contains("<b>Описание:</b> \n"));
    }

    #[test]
    fn test_field_values_escaped() {
        let mut t = term();
        t.description = "<script> & co".into();
        let out = format::format_term(Some(&t));
        assert!(out.contains("&lt;script&gt; &amp; co"));
    }

    #[test]
    fn test_malformed_record_falls_back() {
        let mut t = term();
        t.russian_term.clear();
        assert_eq!(format::format_term(Some(&t)), FORMAT_ERROR);

        let mut t = term();
        t.category = "  ".into();
        assert_eq!(format::format_term(Some(&t)), FORMAT_ERROR);
    }

    #[test]
    fn test_deterministic() {
        let t = term();
        assert_eq!(format::format_term(Some(&t)), format::format_term(Some(&t)));
        assert_eq!(format::format_term(None), format::format_term(None));
    }

    #[test]
    fn test_bad_row_does_not_abort_batch() {
        let mut bad = term();
        bad.chinese_term.clear();
        let batch = [term(), bad, term()];
        let rendered: Vec<String> = batch.iter().map(|t| format::format_term(Some(t))).collect();
        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[1], FORMAT_ERROR);
        assert_ne!(rendered[2], FORMAT_ERROR);
    }
}
