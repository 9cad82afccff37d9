use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tokio::sync::{RwLock, RwLockWriteGuard};

use super::store::{CalendarStore, CalendarWrite, StoreError};
use crate::models::Meal;

/// Where an injected failure strikes inside a write session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Read,
    Write,
}

/// In-memory calendar for tests.
#[derive(Default)]
pub struct MemoryCalendar {
    meals: RwLock<BTreeMap<NaiveDate, Meal>>,
    failure: Option<Failure>,
}

impl MemoryCalendar {
    pub fn with_meals(meals: impl IntoIterator<Item = Meal>) -> Self {
        let map = meals.into_iter().map(|m| (m.date, m)).collect();
        Self {
            meals: RwLock::new(map),
            failure: None,
        }
    }

    /// Makes every write session fail at `failure`.
    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }
}

#[async_trait]
impl CalendarStore for MemoryCalendar {
    async fn get(&self, date: NaiveDate) -> Result<Option<Meal>, StoreError> {
        Ok(self.meals.read().await.get(&date).cloned())
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Meal>, StoreError> {
        let meals = self.meals.read().await;
        Ok(meals
            .values()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Meal>, StoreError> {
        if from > to {
            return Ok(Vec::new());
        }
        let meals = self.meals.read().await;
        Ok(meals.range(from..=to).map(|(_, m)| m.clone()).collect())
    }

    async fn insert_batch(&self, new_meals: &[Meal]) -> Result<(), StoreError> {
        let mut meals = self.meals.write().await;
        if let Some(taken) = new_meals.iter().find(|m| meals.contains_key(&m.date)) {
            return Err(StoreError::Conflict(taken.date));
        }
        for meal in new_meals {
            meals.insert(meal.date, meal.clone());
        }
        Ok(())
    }

    async fn delete(&self, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self.meals.write().await.remove(&date).is_some())
    }

    async fn delete_range(&self, from: NaiveDate, to: NaiveDate) -> Result<u64, StoreError> {
        if from > to {
            return Ok(0);
        }
        let mut meals = self.meals.write().await;
        let dates: Vec<NaiveDate> = meals.range(from..=to).map(|(d, _)| *d).collect();
        for date in &dates {
            meals.remove(date);
        }
        Ok(dates.len() as u64)
    }

    async fn begin_write(&self) -> Result<Box<dyn CalendarWrite + '_>, StoreError> {
        Ok(Box::new(MemoryWrite {
            meals: self.meals.write().await,
            staged: BTreeMap::new(),
            failure: self.failure,
        }))
    }
}

/// Holds the calendar's write lock and stages saves until commit.
struct MemoryWrite<'a> {
    meals: RwLockWriteGuard<'a, BTreeMap<NaiveDate, Meal>>,
    staged: BTreeMap<NaiveDate, Meal>,
    failure: Option<Failure>,
}

impl<'a> MemoryWrite<'a> {
    fn check(&self, at: Failure) -> Result<(), StoreError> {
        if self.failure == Some(at) {
            return Err(StoreError::Internal(format!("injected {:?} failure", at)));
        }
        Ok(())
    }
}

#[async_trait]
impl<'a> CalendarWrite for MemoryWrite<'a> {
    async fn get(&mut self, date: NaiveDate) -> Result<Option<Meal>, StoreError> {
        self.check(Failure::Read)?;
        Ok(self
            .staged
            .get(&date)
            .or_else(|| self.meals.get(&date))
            .cloned())
    }

    async fn save_batch(&mut self, meals: &[Meal]) -> Result<(), StoreError> {
        self.check(Failure::Write)?;
        for meal in meals {
            self.staged.insert(meal.date, meal.clone());
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryWrite {
            mut meals, staged, ..
        } = *self;
        meals.extend(staged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[tokio::test]
    async fn test_insert_batch_conflict_writes_nothing() {
        let store = MemoryCalendar::with_meals([Meal::new(date(2), "Pizza", "Soup")]);

        let result = store
            .insert_batch(&[
                Meal::new(date(1), "Paella", "Soup"),
                Meal::new(date(2), "Paella", "Soup"),
            ])
            .await;

        assert!(matches!(result, Err(StoreError::Conflict(d)) if d == date(2)));
        assert!(store.get(date(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_range_and_delete_range() {
        let store = MemoryCalendar::with_meals(
            (1..=10).map(|d| Meal::new(date(d), format!("L{}", d), "Soup")),
        );

        let range = store.list_range(date(3), date(5)).await.unwrap();
        assert_eq!(range.len(), 3);
        assert_eq!(range[0].date, date(3));

        let removed = store.delete_range(date(3), date(5)).await.unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.list(0, 100).await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_list_paginates_in_date_order() {
        let store = MemoryCalendar::with_meals(
            (1..=5).rev().map(|d| Meal::new(date(d), "Paella", "Soup")),
        );

        let page = store.list(1, 2).await.unwrap();
        let dates: Vec<NaiveDate> = page.iter().map(|m| m.date).collect();
        assert_eq!(dates, vec![date(2), date(3)]);
    }

    #[tokio::test]
    async fn test_write_session_stages_until_commit() {
        let store = MemoryCalendar::with_meals([Meal::new(date(1), "Paella", "Soup")]);

        {
            let mut write = store.begin_write().await.unwrap();
            write
                .save_batch(&[Meal::new(date(1), "Pizza", "Salad")])
                .await
                .unwrap();
            assert_eq!(write.get(date(1)).await.unwrap().unwrap().lunch1, "Pizza");
        }
        assert_eq!(store.get(date(1)).await.unwrap().unwrap().lunch1, "Paella");

        let mut write = store.begin_write().await.unwrap();
        write
            .save_batch(&[Meal::new(date(2), "Lentils", "Fish")])
            .await
            .unwrap();
        write.commit().await.unwrap();
        assert_eq!(store.get(date(2)).await.unwrap().unwrap().lunch1, "Lentils");
    }

    #[tokio::test]
    async fn test_failing_session() {
        let store = MemoryCalendar::with_meals([Meal::new(date(1), "Paella", "Soup")])
            .failing(Failure::Write);

        let mut write = store.begin_write().await.unwrap();
        assert!(write.get(date(1)).await.unwrap().is_some());
        let result = write.save_batch(&[Meal::new(date(1), "Pizza", "Salad")]).await;
        assert!(matches!(result, Err(StoreError::Internal(_))));
    }
}
