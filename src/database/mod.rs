pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod record;
pub mod schema;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use record::{Record, RecordError};
pub use store::{PrizeStore, StoreHandle};
