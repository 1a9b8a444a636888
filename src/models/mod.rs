pub mod record;

pub use record::{FailureKind, ItemOutcome, ItemStatus, ResultRecord};
