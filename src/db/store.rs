use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Meal;

/// Errors raised by a [`CalendarStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("A meal already exists for {0}")]
    Conflict(NaiveDate),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to prepare database directory '{0}': {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Store error: {0}")]
    Internal(String),
}

/// Date-keyed storage for meals. At most one meal exists per date.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn get(&self, date: NaiveDate) -> Result<Option<Meal>, StoreError>;

    /// Meals ordered by date, skipping `skip` and returning at most `limit`.
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Meal>, StoreError>;

    /// Meals between `from` and `to` inclusive, ordered by date.
    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Meal>, StoreError>;

    /// Inserts new meals. Fails with [`StoreError::Conflict`] and writes
    /// nothing if any date is already taken.
    async fn insert_batch(&self, meals: &[Meal]) -> Result<(), StoreError>;

    /// Returns whether a meal was removed.
    async fn delete(&self, date: NaiveDate) -> Result<bool, StoreError>;

    /// Returns the number of meals removed.
    async fn delete_range(&self, from: NaiveDate, to: NaiveDate) -> Result<u64, StoreError>;

    /// Opens an exclusive write session. Waits until no other session, in
    /// this process or another one sharing the database, is open.
    async fn begin_write(&self) -> Result<Box<dyn CalendarWrite + '_>, StoreError>;
}

/// A read-modify-write session over the calendar.
///
/// Reads see the session's own saved meals. Nothing becomes visible to
/// other readers until [`CalendarWrite::commit`]; dropping the session
/// discards every change.
#[async_trait]
pub trait CalendarWrite: Send {
    async fn get(&mut self, date: NaiveDate) -> Result<Option<Meal>, StoreError>;

    /// Inserts or replaces every meal.
    async fn save_batch(&mut self, meals: &[Meal]) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
