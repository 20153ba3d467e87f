//! Record types and error definitions for the student store.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A stored student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned identifier, stable for the lifetime of the record.
    pub id: String,
    /// Display name (never empty once stored).
    pub name: String,
    /// Age in years.
    pub age: u64,
    /// Contact address (never empty once stored).
    pub email: String,
}

/// Client-supplied fields for create and update.
///
/// Missing or `null` fields fall back to their empty value so that validation, not
/// deserialization, decides which field is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentInput {
    /// Requested name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Requested age; negative values are rejected.
    #[serde(deserialize_with = "null_as_default")]
    pub age: i64,
    /// Requested email.
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidField {
    /// `name` was empty.
    Name,
    /// `age` was negative.
    Age,
    /// `email` was empty.
    Email,
}

impl std::fmt::Display for InvalidField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field = match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Email => "email",
        };
        write!(f, "invalid {field}")
    }
}

/// Errors returned by [`crate::store::StudentStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Input was rejected before the store was touched.
    #[error("{0}")]
    InvalidInput(InvalidField),
    /// No record carries the requested id.
    #[error("student not found")]
    NotFound,
}

/// How new record identifiers are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// Counter that only ever increases; ids are never reissued.
    #[default]
    Sequence,
    /// `len + 1` at insertion time. Reissues an id still in use after a deletion.
    CurrentCount,
}

impl std::str::FromStr for IdStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequence" => Ok(Self::Sequence),
            "count" => Ok(Self::CurrentCount),
            _ => Err(()),
        }
    }
}

impl StudentInput {
    /// Check fields in order (name, age, email); the first failure wins.
    pub fn validate(&self) -> Result<u64, StoreError> {
        if self.name.is_empty() {
            return Err(StoreError::InvalidInput(InvalidField::Name));
        }
        let age =
            u64::try_from(self.age).map_err(|_| StoreError::InvalidInput(InvalidField::Age))?;
        if self.email.is_empty() {
            return Err(StoreError::InvalidInput(InvalidField::Email));
        }
        Ok(age)
    }
}
