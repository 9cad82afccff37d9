//! Calendar operations on top of a [`CalendarStore`].
//!
//! Read-modify-write operations run inside one store write session, opened
//! before the first read and committed after the final batch write. The
//! session excludes every other writer on the same calendar, including other
//! processes sharing a database file, so a shift's forward search and cascade
//! never interleave with another change.

mod classifier;
mod error;
mod reminders;
mod shift;
mod slots;
mod swap;

pub use classifier::Classifier;
pub use error::PlannerError;
#[allow(unused_imports)]
pub use reminders::Reminder;

use chrono::{Days, NaiveDate, Weekday};
use std::collections::HashSet;

use crate::db::{CalendarStore, CalendarWrite};
use crate::models::{Meal, MealUpdate, SwapMode};

/// Monday and Sunday of an ISO week.
pub fn week_bounds(year: i32, week: u32) -> Result<(NaiveDate, NaiveDate), PlannerError> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
        .ok_or(PlannerError::InvalidWeek { year, week })?;
    let sunday = monday
        .checked_add_days(Days::new(6))
        .ok_or(PlannerError::DateOutOfRange(monday))?;
    Ok((monday, sunday))
}

pub struct Planner<S> {
    store: S,
    classifier: Classifier,
}

impl<S: CalendarStore> Planner<S> {
    pub fn new(store: S, classifier: Classifier) -> Self {
        Self { store, classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub async fn get(&self, date: NaiveDate) -> Result<Option<Meal>, PlannerError> {
        Ok(self.store.get(date).await?)
    }

    pub async fn get_or_not_found(&self, date: NaiveDate) -> Result<Meal, PlannerError> {
        self.get(date).await?.ok_or(PlannerError::NotFound(date))
    }

    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Meal>, PlannerError> {
        Ok(self.store.list(skip, limit).await?)
    }

    /// Meals of an ISO week, at most seven.
    pub async fn week(&self, year: i32, week: u32) -> Result<Vec<Meal>, PlannerError> {
        let (from, to) = week_bounds(year, week)?;
        Ok(self.store.list_range(from, to).await?)
    }

    pub async fn create(&self, meal: Meal) -> Result<Meal, PlannerError> {
        self.store.insert_batch(std::slice::from_ref(&meal)).await?;
        tracing::info!("Planned meals for {}", meal.date);
        Ok(meal)
    }

    /// Inserts all meals or none of them.
    pub async fn create_many(&self, meals: Vec<Meal>) -> Result<Vec<Meal>, PlannerError> {
        let mut seen = HashSet::new();
        if let Some(dup) = meals.iter().find(|m| !seen.insert(m.date)) {
            return Err(PlannerError::AlreadyExists(dup.date));
        }

        self.store.insert_batch(&meals).await?;
        tracing::info!("Planned meals for {} day(s)", meals.len());
        Ok(meals)
    }

    pub async fn update(&self, date: NaiveDate, update: &MealUpdate) -> Result<Meal, PlannerError> {
        if update.is_empty() {
            return Err(PlannerError::EmptyUpdate(date));
        }

        let mut write = self.store.begin_write().await?;
        let mut meal = write.get(date).await?.ok_or(PlannerError::NotFound(date))?;
        update.apply(&mut meal);
        write.save_batch(std::slice::from_ref(&meal)).await?;
        write.commit().await?;
        tracing::info!("Updated meals for {}", date);
        Ok(meal)
    }

    pub async fn delete(&self, date: NaiveDate) -> Result<(), PlannerError> {
        if !self.store.delete(date).await? {
            return Err(PlannerError::NotFound(date));
        }
        tracing::info!("Removed meals for {}", date);
        Ok(())
    }

    /// Returns the number of days removed.
    pub async fn delete_week(&self, year: i32, week: u32) -> Result<u64, PlannerError> {
        let (from, to) = week_bounds(year, week)?;
        let removed = self.store.delete_range(from, to).await?;
        tracing::info!("Removed {} day(s) of week {} of {}", removed, week, year);
        Ok(removed)
    }

    /// Exchanges the slots selected by `mode` between two planned days.
    pub async fn swap(
        &self,
        date_a: NaiveDate,
        date_b: NaiveDate,
        mode: SwapMode,
    ) -> Result<(Meal, Meal), PlannerError> {
        let mut write = self.store.begin_write().await?;
        let swapped = swap::swap(&mut *write, date_a, date_b, mode).await?;
        write.commit().await?;

        tracing::info!("Swapped {} between {} and {}", mode, date_a, date_b);
        Ok(swapped)
    }

    /// Pushes the slots selected by `mode` one day forward. Returns the
    /// touched days in ascending order, or nothing if `date` has no meal.
    pub async fn shift(&self, date: NaiveDate, mode: SwapMode) -> Result<Vec<Meal>, PlannerError> {
        let mut write = self.store.begin_write().await?;
        let touched = shift::shift(&mut *write, &self.classifier, date, mode).await?;
        write.commit().await?;

        if !touched.is_empty() {
            tracing::info!(
                "Shifted {} from {} across {} day(s)",
                mode,
                date,
                touched.len()
            );
        }
        Ok(touched)
    }

    /// Thaw list for tomorrow and undecided slots for the next two days.
    pub async fn reminders(&self, today: NaiveDate) -> Result<Vec<Reminder>, PlannerError> {
        let mut reminders = Vec::new();

        let Some(tomorrow) = today.succ_opt() else {
            return Ok(reminders);
        };
        let tomorrow_meal = self.get(tomorrow).await?;

        if let Some(meal) = &tomorrow_meal {
            let items = meal.frozen_items();
            if !items.is_empty() {
                reminders.push(Reminder::Thaw {
                    date: tomorrow,
                    items,
                });
            }
        }

        let day_after_meal = match tomorrow.succ_opt() {
            Some(day_after) => self.get(day_after).await?,
            None => None,
        };

        for (meal, urgent) in [(tomorrow_meal, true), (day_after_meal, false)] {
            let Some(meal) = meal else { continue };
            let slots = self.classifier.variable_slots(&meal);
            if !slots.is_empty() {
                reminders.push(Reminder::Undecided {
                    date: meal.date,
                    slots,
                    urgent,
                });
            }
        }

        Ok(reminders)
    }
}
