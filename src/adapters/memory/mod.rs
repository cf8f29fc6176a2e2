//! Process-local store used for `database_target = "memory"` and tests

pub mod store;

pub use store::MemoryStore;
