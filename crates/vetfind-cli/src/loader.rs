//! Reading record exports from disk into a [`ResultStore`].

use std::path::Path;

use anyhow::Context;
use vetfind_engine::{parse_record_set, LoadSummary, ResultStore};

async fn read_export(path: &Path) -> anyhow::Result<(ResultStore, LoadSummary)> {
    tracing::debug!(path = %path.display(), "reading record export");
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read record export {}", path.display()))?;
    let documents = parse_record_set(&raw)
        .with_context(|| format!("failed to decode record export {}", path.display()))?;

    let mut store = ResultStore::new();
    let summary = store.load(documents);
    Ok((store, summary))
}

/// Loads the export at `path` into a fresh store.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a record set.
/// Individual malformed documents are dropped, not propagated.
pub(crate) async fn load_store(path: &Path) -> anyhow::Result<ResultStore> {
    let (store, summary) = read_export(path).await?;
    if summary.dropped_count() > 0 {
        eprintln!(
            "warning: dropped {} malformed record(s); run `inspect` for details",
            summary.dropped_count()
        );
    }
    Ok(store)
}

/// Prints how many documents were kept and why the others were dropped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a record set.
pub(crate) async fn run_inspect(path: &Path) -> anyhow::Result<()> {
    let (store, summary) = read_export(path).await?;

    println!("Records: {}", path.display());
    println!("Loaded:  {}", summary.loaded);
    println!("Dropped: {}", summary.dropped_count());

    let located = store
        .canonical()
        .iter()
        .filter(|r| r.coordinates.is_some())
        .count();
    let with_hours = store
        .canonical()
        .iter()
        .filter(|r| r.hours.is_some())
        .count();
    println!("With coordinates: {located}");
    println!("With hours:       {with_hours}");

    if summary.dropped.is_empty() {
        return Ok(());
    }

    println!();
    let header = format!("{:<10}{:<28}REASON", "POSITION", "ID");
    println!("{header}");
    for dropped in &summary.dropped {
        let id = dropped.id.as_deref().unwrap_or("\u{2014}");
        println!("{:<10}{:<28}{}", dropped.position, id, dropped.reason);
    }

    Ok(())
}
