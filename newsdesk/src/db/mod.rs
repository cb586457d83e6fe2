mod connection;
mod posts;
mod schema;
mod traits;

pub use connection::Database;
pub use posts::LibSqlPostStore;
pub use traits::PostStore;
