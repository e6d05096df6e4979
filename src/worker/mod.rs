mod job;
mod validate;

pub use job::{Worker, WorkerConfig};
pub use validate::{SkipReason, parse_notification};
