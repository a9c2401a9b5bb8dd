//! Task state: requests, the working table, the corpus and progress snapshots

mod corpus;
mod record_status;
mod request;
mod snapshot;
mod table;

pub use corpus::Corpus;
pub use record_status::RecordStatus;
pub use request::{SearchParams, TaskRequest};
pub use snapshot::{FatalReason, ItemPhase, ItemProgress, ProgressSnapshot, Stage};
pub use table::{
    truncate_preview, RecordOutcome, RowView, TableError, TaskRecord, WorkingTable, PREVIEW_CHARS,
};
