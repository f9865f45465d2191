//! talentrisk-db: Employee storage.
//!
//! [`EmployeeStore`] abstracts the backend (MongoDB or in-memory);
//! [`EmployeeRepository`] sits on top and is the only component that writes,
//! so every stored record carries a current risk score.

pub mod document;
pub mod error;
pub mod store;
pub mod memory;
pub mod mongo;
pub mod repository;
pub mod sample;

pub use document::EmployeeDocument;
pub use error::{DbError, Result};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use repository::EmployeeRepository;
pub use sample::sample_roster;
pub use store::{EmployeeFilter, EmployeeStore};
