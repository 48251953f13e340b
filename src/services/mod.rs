pub mod dedup;
pub mod history_index;
pub mod identity_ledger;
pub mod index_merger;
pub mod journal_writer;
pub mod markdown;

pub use dedup::Deduplicator;
pub use history_index::HistoryIndex;
pub use identity_ledger::IdentityLedger;
pub use index_merger::{merge_into, IndexDocument, IndexMerger};
pub use journal_writer::JournalWriter;
