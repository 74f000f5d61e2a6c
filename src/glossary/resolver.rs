//! Query resolution: picks a match strategy from the query's script.

use tracing::info;

use crate::glossary::error::Result;
use crate::glossary::language::{Script, classify};
use crate::glossary::store::TermStore;
use crate::glossary::term::Term;

/// Search both headwords for `query`. An empty result means "not found".
pub fn search(store: &dyn TermStore, query: &str) -> Result<Vec<Term>> {
    let query = query.trim();
    let script = classify(query);

    let results = match script {
        Script::Russian => store.match_russian(query)?,
        Script::Chinese => store.match_chinese(query)?,
        Script::Unknown => store.match_either(query)?,
    };

    info!("Search {:?} by {:?}: {} result(s)", query, script, results.len());
    Ok(results)
}
