//! Start-up population of the question bank from the data directory.

use quiz_core::{ingest_dir, load, LoadReport, QuestionRepository};

use crate::config::Config;
use crate::db::SqliteRepository;

/// Populate the bank when it is empty, or rebuild it when `reingest` is set.
///
/// Returns `None` when nothing was loaded.
pub fn prepare(repo: &SqliteRepository, config: &Config) -> quiz_core::Result<Option<LoadReport>> {
    if config.reingest {
        let cleared = repo.clear_questions()?;
        tracing::info!(cleared, "cleared question bank for reingest");
    } else if repo.total_questions()? > 0 {
        tracing::info!("question bank already populated");
        return Ok(None);
    }

    if !config.data_dir.is_dir() {
        tracing::warn!(
            data_dir = %config.data_dir.display(),
            "data directory not found, starting with an empty question bank"
        );
        return Ok(None);
    }

    let results = ingest_dir(&config.data_dir, &config.parser_config())?;
    load(repo, results).map(Some)
}
