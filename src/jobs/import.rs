//! Import as a background job.

use crate::config::ImportLayout;
use crate::core::ingest::{ImportSummary, import_file};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Run an import off the caller's thread. Cancellation is honoured between
/// rows; the rows stored before it stay committed.
pub fn spawn_import(
    db_path: String,
    file: PathBuf,
    layout: ImportLayout,
    cancel: CancellationToken,
) -> JoinHandle<AppResult<ImportSummary>> {
    tokio::task::spawn_blocking(move || {
        let pool = DbPool::new(&db_path)?;
        import_file(&pool.conn, &file, &layout, &cancel)
    })
}

pub fn run_import_blocking(
    db_path: String,
    file: PathBuf,
    layout: ImportLayout,
    cancel: CancellationToken,
) -> AppResult<ImportSummary> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c.cancel();
            }
        });

        spawn_import(db_path, file, layout, cancel)
            .await
            .map_err(|e| AppError::Worker(e.to_string()))?
    })
}
