//! Activity log: counting and timing activities with their dated entries.

mod activity;
mod entry;
mod store;

pub use activity::{ActivityKind, CountingActivity, TimingActivity};
pub use entry::{CountingEntry, TimingEntry};
pub use store::ActivityLog;
