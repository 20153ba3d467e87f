//! In-memory student records: types, validation, and the lock-guarded store.

mod service;
pub mod types;

pub use service::StudentStore;
pub use types::{IdStrategy, InvalidField, StoreError, Student, StudentInput};
