//! praxis-store
//!
//! The repository layer. [`Store`] is the narrow contract every engine
//! service goes through; [`sqlite::SqliteStore`] is the production
//! implementation, [`memory::MemoryStore`] an in-memory stand-in with
//! snapshot transactions and fault injection for tests.

pub mod error;
pub mod memory;
pub mod sqlite;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{FormFilter, FormPatch, Store};
