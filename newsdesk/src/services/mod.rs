mod answer;
mod sync;

pub use answer::AnswerService;
pub use sync::{SyncReport, SyncService};
