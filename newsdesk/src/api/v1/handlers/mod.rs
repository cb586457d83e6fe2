pub mod chat;
pub mod health;
pub mod import;
pub mod posts;
pub mod sync;

pub use health::health_check;
