use chrono::NaiveDate;

use super::error::PlannerError;
use super::slots::attributes_for_mode;
use crate::db::CalendarWrite;
use crate::models::{Meal, MealField, SwapMode};

/// Exchanges every attribute in `fields` between `a` and `b`.
pub fn swap_meals(a: &mut Meal, b: &mut Meal, fields: &[MealField]) {
    for field in fields {
        a.swap_field(b, *field);
    }
}

/// Swaps the slots selected by `mode` between two stored days and saves
/// both in one batch. The caller commits `write`.
pub(super) async fn swap<W: CalendarWrite + ?Sized>(
    write: &mut W,
    date_a: NaiveDate,
    date_b: NaiveDate,
    mode: SwapMode,
) -> Result<(Meal, Meal), PlannerError> {
    let mut a = write
        .get(date_a)
        .await?
        .ok_or(PlannerError::NotFound(date_a))?;
    let mut b = write
        .get(date_b)
        .await?
        .ok_or(PlannerError::NotFound(date_b))?;

    if date_a == date_b {
        return Ok((a, b));
    }

    swap_meals(&mut a, &mut b, &attributes_for_mode(mode));
    write.save_batch(&[a.clone(), b.clone()]).await?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CalendarStore, Failure, MemoryCalendar, StoreError};
    use crate::models::Slot;

    const MODES: [SwapMode; 5] = [
        SwapMode::All,
        SwapMode::Lunch,
        SwapMode::Lunch1,
        SwapMode::Lunch2,
        SwapMode::Dinner,
    ];

    const FIELDS: [MealField; 6] = [
        MealField::Lunch1,
        MealField::Lunch1Frozen,
        MealField::Lunch2,
        MealField::Lunch2Frozen,
        MealField::Dinner,
        MealField::DinnerFrozen,
    ];

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn first() -> Meal {
        Meal::new(date(1), "Paella", "Soup")
            .with_lunch2("Fruit")
            .with_frozen(Slot::Lunch1)
    }

    fn second() -> Meal {
        Meal::new(date(8), "Pizza", "Omelette").with_frozen(Slot::Dinner)
    }

    async fn run(
        store: &MemoryCalendar,
        date_a: NaiveDate,
        date_b: NaiveDate,
        mode: SwapMode,
    ) -> Result<(Meal, Meal), PlannerError> {
        let mut write = store.begin_write().await?;
        let swapped = swap(&mut *write, date_a, date_b, mode).await?;
        write.commit().await?;
        Ok(swapped)
    }

    /// `after` still agrees with `before` on `field`.
    fn field_unchanged(before: &Meal, after: &Meal, field: MealField) -> bool {
        let mut merged = before.clone();
        merged.copy_field_from(after, field);
        merged == *before
    }

    #[tokio::test]
    async fn test_swap_all_exchanges_every_attribute() {
        let store = MemoryCalendar::with_meals([first(), second()]);

        let (a, b) = run(&store, date(1), date(8), SwapMode::All).await.unwrap();

        assert_eq!(a.date, date(1));
        assert_eq!(a.lunch1, "Pizza");
        assert!(!a.lunch1_frozen);
        assert_eq!(a.lunch2, None);
        assert_eq!(a.dinner, "Omelette");
        assert!(a.dinner_frozen);

        assert_eq!(b.date, date(8));
        assert_eq!(b.lunch1, "Paella");
        assert!(b.lunch1_frozen);
        assert_eq!(b.lunch2.as_deref(), Some("Fruit"));
        assert_eq!(b.dinner, "Soup");
        assert!(!b.dinner_frozen);

        assert_eq!(store.get(date(1)).await.unwrap().unwrap(), a);
        assert_eq!(store.get(date(8)).await.unwrap().unwrap(), b);
    }

    #[tokio::test]
    async fn test_swap_twice_restores_original() {
        for mode in MODES {
            let store = MemoryCalendar::with_meals([first(), second()]);

            run(&store, date(1), date(8), mode).await.unwrap();
            let (a, b) = run(&store, date(1), date(8), mode).await.unwrap();

            assert_eq!(a, first(), "mode {}", mode);
            assert_eq!(b, second(), "mode {}", mode);
        }
    }

    #[tokio::test]
    async fn test_swap_leaves_unselected_fields_alone() {
        for mode in MODES {
            let store = MemoryCalendar::with_meals([first(), second()]);
            let selected = attributes_for_mode(mode);

            let (a, b) = run(&store, date(1), date(8), mode).await.unwrap();

            for field in FIELDS {
                if selected.contains(&field) {
                    assert!(field_unchanged(&second(), &a, field), "{} {}", mode, field);
                    assert!(field_unchanged(&first(), &b, field), "{} {}", mode, field);
                } else {
                    assert!(field_unchanged(&first(), &a, field), "{} {}", mode, field);
                    assert!(field_unchanged(&second(), &b, field), "{} {}", mode, field);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_swap_missing_date_is_not_found() {
        let store = MemoryCalendar::with_meals([first()]);

        let err = run(&store, date(1), date(8), SwapMode::All)
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::NotFound(d) if d == date(8)));

        let err = run(&store, date(3), date(1), SwapMode::All)
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::NotFound(d) if d == date(3)));

        assert_eq!(store.get(date(1)).await.unwrap().unwrap(), first());
    }

    #[tokio::test]
    async fn test_swap_with_itself_changes_nothing() {
        let store = MemoryCalendar::with_meals([first()]);

        let (a, b) = run(&store, date(1), date(1), SwapMode::All).await.unwrap();

        assert_eq!(a, first());
        assert_eq!(b, first());
    }

    #[tokio::test]
    async fn test_storage_failures_pass_through_without_writes() {
        for failure in [Failure::Read, Failure::Write] {
            let store = MemoryCalendar::with_meals([first(), second()]).failing(failure);

            let err = run(&store, date(1), date(8), SwapMode::All)
                .await
                .unwrap_err();

            assert!(
                matches!(err, PlannerError::Storage(StoreError::Internal(_))),
                "{:?}",
                failure
            );
            assert_eq!(store.get(date(1)).await.unwrap().unwrap(), first());
            assert_eq!(store.get(date(8)).await.unwrap().unwrap(), second());
        }
    }
}
