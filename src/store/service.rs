//! Mutex-guarded student collection.

use crate::store::types::{IdStrategy, Student, StoreError, StudentInput};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory student collection behind a single exclusive lock.
///
/// Every operation, reads included, takes the same lock for the duration of the traversal or
/// mutation and releases it before returning. Share one instance through an `Arc`.
pub struct StudentStore {
    inner: Mutex<Inner>,
    id_strategy: IdStrategy,
}

#[derive(Default)]
struct Inner {
    students: Vec<Student>,
    last_id: u64,
}

impl Inner {
    fn position(&self, id: &str) -> Option<usize> {
        self.students.iter().position(|student| student.id == id)
    }

    fn next_id(&mut self, strategy: IdStrategy) -> String {
        match strategy {
            IdStrategy::Sequence => {
                self.last_id += 1;
                self.last_id.to_string()
            }
            IdStrategy::CurrentCount => (self.students.len() + 1).to_string(),
        }
    }
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}

impl StudentStore {
    /// Create an empty store using the given id allocation scheme.
    pub fn new(id_strategy: IdStrategy) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            id_strategy,
        }
    }

    // Critical sections never leave partial state, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and append a new record, returning the stored copy.
    pub fn create(&self, input: StudentInput) -> Result<Student, StoreError> {
        let age = input.validate()?;
        let mut inner = self.lock();
        let student = Student {
            id: inner.next_id(self.id_strategy),
            name: input.name,
            age,
            email: input.email,
        };
        inner.students.push(student.clone());
        Ok(student)
    }

    /// All records in current sequence order.
    pub fn list(&self) -> Vec<Student> {
        self.lock().students.clone()
    }

    /// First record whose id matches.
    pub fn get(&self, id: &str) -> Result<Student, StoreError> {
        let inner = self.lock();
        inner
            .students
            .iter()
            .find(|student| student.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// Replace the non-id fields of a record.
    ///
    /// The record is removed from its position and re-appended, so it moves to the end of
    /// [`StudentStore::list`].
    pub fn update(&self, id: &str, input: StudentInput) -> Result<Student, StoreError> {
        let age = input.validate()?;
        let mut inner = self.lock();
        let index = inner.position(id).ok_or(StoreError::NotFound)?;
        let previous = inner.students.remove(index);
        let student = Student {
            id: previous.id,
            name: input.name,
            age,
            email: input.email,
        };
        inner.students.push(student.clone());
        Ok(student)
    }

    /// Remove a record and return its last values.
    pub fn delete(&self, id: &str) -> Result<Student, StoreError> {
        let mut inner = self.lock();
        let index = inner.position(id).ok_or(StoreError::NotFound)?;
        Ok(inner.students.remove(index))
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().students.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
