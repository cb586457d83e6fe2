pub mod chat;
pub mod import;
pub mod posts;
pub mod sync;
