//! Best-score records, attempt history and score tables.
//!
//! - **Merge**: pure reconciliation of one attempt against the stored best
//! - **Table**: dense per-song rows for own and rival leaderboards

mod merge;
mod record;
mod table;

pub use merge::*;
pub use record::*;
pub use table::*;
