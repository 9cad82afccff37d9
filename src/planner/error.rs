//! Planner error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::StoreError;

/// Errors returned by [`Planner`](super::Planner) operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// No meal is stored for the date
    #[error("No meal planned for {0}")]
    NotFound(NaiveDate),

    /// A meal is already stored for the date
    #[error("A meal is already planned for {0}")]
    AlreadyExists(NaiveDate),

    /// An update that changes nothing
    #[error("Nothing to update for {0}")]
    EmptyUpdate(NaiveDate),

    /// Not a valid ISO week
    #[error("Week {week} of {year} does not exist")]
    InvalidWeek { year: i32, week: u32 },

    /// The calendar cannot grow past this date
    #[error("Cannot extend the calendar past {0}")]
    DateOutOfRange(NaiveDate),

    /// The calendar store failed; never retried
    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for PlannerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(date) => PlannerError::AlreadyExists(date),
            other => PlannerError::Storage(other),
        }
    }
}
