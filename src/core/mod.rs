pub mod aggregate;
pub mod ingest;
pub mod log;
pub mod overtime;
pub mod punch;
pub mod reconcile;

pub use aggregate::{aggregate, aggregate_records};
pub use ingest::{
    ImportSummary, RawRow, RowError, SourceRows, import_file, import_rows, normalize,
};
pub use overtime::classify;
pub use reconcile::{Reconciliation, reconcile, reconcile_punches};
