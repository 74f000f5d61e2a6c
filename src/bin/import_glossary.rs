//! Import glossary terms from a JSON file into the SQLite database.
//!
//! Usage: cargo run --bin import_glossary <terms.json> <glossary.db>
//!
//! The JSON file is either an array of terms or `{"terms": [...]}`; each term
//! has `russian_term`, `chinese_term`, `category` and optionally `pinyin`,
//! `description`, `example`. Run it while the bot is stopped.

use std::path::Path;

use glossary_bot::glossary::seed::load_seed_file;
use glossary_bot::glossary::{Database, GlossaryError, TermStore};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <terms.json> <glossary.db>", args[0]);
        eprintln!();
        eprintln!("Import glossary terms into the bot database.");
        eprintln!("Terms whose Russian headword is already present are skipped.");
        std::process::exit(1);
    }

    let terms_path = Path::new(&args[1]);
    let db_path = Path::new(&args[2]);

    println!("Reading terms from {:?}...", terms_path);
    let terms = match load_seed_file(terms_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };
    println!("Terms in file: {}", terms.len());

    let db = match Database::open(db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("ERROR: failed to open {:?}: {e}", db_path);
            std::process::exit(1);
        }
    };

    let mut imported = 0;
    let mut skipped = 0;
    let mut invalid = 0;

    for term in &terms {
        match db.insert_if_absent(term) {
            Ok(Some(id)) => {
                imported += 1;
                println!("  + {} ({}) -> id {}", term.russian_term.trim(), term.chinese_term.trim(), id);
            }
            Ok(None) => skipped += 1,
            Err(GlossaryError::InvalidTerm(msg)) => {
                invalid += 1;
                eprintln!("  ! skipping {:?}: {msg}", term.russian_term);
            }
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        }
    }

    println!("Imported {} term(s), {} already present, {} invalid", imported, skipped, invalid);
    match db.count_all() {
        Ok(n) => println!("Total terms in {:?}: {}", db_path, n),
        Err(e) => eprintln!("ERROR: {e}"),
    }
}
