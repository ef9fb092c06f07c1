pub mod api;
pub mod error;
pub mod store;
pub mod types;

pub use api::{SignalApi, SignalClient};
pub use error::{ApiError, ApiResult};
pub use store::{Credential, FileStore, KeyValueStore, MemoryStore};
pub use types::*;
