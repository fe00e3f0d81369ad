//! Typed access to the local key-value store.
//!
//! Each entity lives as one JSON list under a well-known key. Repositories
//! load the list, change it in memory and write the whole list back; there is
//! no atomicity across keys. A single session owns the store at a time, so
//! interleaved read-modify-write cycles are not guarded against.

mod collections;
mod error;
mod file_store;
pub mod keys;
mod kv_store;
mod quizzes;
mod record_list;
mod results;
mod users;

pub use collections::{CollectionError, CollectionRepository};
pub use error::{StoreError, StoreResult};
pub use file_store::FileStore;
pub use kv_store::{
    read_json, read_list, read_records, write_json, write_list, KeyValueStore, MemoryStore,
};
pub use quizzes::{QuizRepository, QuizStoreError};
pub use record_list::{Record, RecordList};
pub use results::ResultRepository;
pub use users::UserRepository;

use uuid::Uuid;

pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}
