mod boundary;
mod engine;

pub use boundary::select_new;
pub use engine::{SyncEngine, SyncPlan, SyncReport};
