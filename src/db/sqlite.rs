use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool, Transaction};

use super::store::{CalendarStore, CalendarWrite, StoreError};
use crate::models::Meal;

/// Takes the database write lock up front, so a session's reads and its
/// final writes see the same calendar.
const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

/// Dates are stored as day numbers (0001-01-01 is day 1) so that SQL ordering matches
/// calendar ordering for every year chrono supports.
fn day_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

pub struct SqliteCalendar {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MealRow {
    date: i32,
    lunch1: String,
    lunch1_frozen: bool,
    lunch2: Option<String>,
    lunch2_frozen: bool,
    dinner: String,
    dinner_frozen: bool,
}

impl TryFrom<MealRow> for Meal {
    type Error = StoreError;

    fn try_from(row: MealRow) -> Result<Self, Self::Error> {
        let date = NaiveDate::from_num_days_from_ce_opt(row.date)
            .ok_or_else(|| StoreError::Internal(format!("Invalid day number {}", row.date)))?;

        Ok(Meal {
            date,
            lunch1: row.lunch1,
            lunch1_frozen: row.lunch1_frozen,
            lunch2: row.lunch2,
            lunch2_frozen: row.lunch2_frozen,
            dinner: row.dinner,
            dinner_frozen: row.dinner_frozen,
        })
    }
}

fn hydrate(rows: Vec<MealRow>) -> Result<Vec<Meal>, StoreError> {
    rows.into_iter().map(Meal::try_from).collect()
}

async fn fetch_meal<'e, E>(executor: E, date: NaiveDate) -> Result<Option<Meal>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<MealRow> = sqlx::query_as("SELECT * FROM meals WHERE date = ?")
        .bind(day_number(date))
        .fetch_optional(executor)
        .await?;

    row.map(Meal::try_from).transpose()
}

async fn upsert(conn: &mut SqliteConnection, meal: &Meal) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO meals (date, lunch1, lunch1_frozen, lunch2, lunch2_frozen, dinner, dinner_frozen)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(date) DO UPDATE SET
            lunch1 = excluded.lunch1,
            lunch1_frozen = excluded.lunch1_frozen,
            lunch2 = excluded.lunch2,
            lunch2_frozen = excluded.lunch2_frozen,
            dinner = excluded.dinner,
            dinner_frozen = excluded.dinner_frozen
        "#,
    )
    .bind(day_number(meal.date))
    .bind(&meal.lunch1)
    .bind(meal.lunch1_frozen)
    .bind(&meal.lunch2)
    .bind(meal.lunch2_frozen)
    .bind(&meal.dinner)
    .bind(meal.dinner_frozen)
    .execute(conn)
    .await?;
    Ok(())
}

impl SqliteCalendar {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CalendarStore for SqliteCalendar {
    async fn get(&self, date: NaiveDate) -> Result<Option<Meal>, StoreError> {
        fetch_meal(&self.pool, date).await
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Meal>, StoreError> {
        let rows: Vec<MealRow> =
            sqlx::query_as("SELECT * FROM meals ORDER BY date LIMIT ? OFFSET ?")
                .bind(limit as i64)
                .bind(skip as i64)
                .fetch_all(&self.pool)
                .await?;

        hydrate(rows)
    }

    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Meal>, StoreError> {
        let rows: Vec<MealRow> =
            sqlx::query_as("SELECT * FROM meals WHERE date >= ? AND date <= ? ORDER BY date")
                .bind(day_number(from))
                .bind(day_number(to))
                .fetch_all(&self.pool)
                .await?;

        hydrate(rows)
    }

    async fn insert_batch(&self, meals: &[Meal]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;

        for meal in meals {
            let result = sqlx::query(
                r#"
                INSERT INTO meals (date, lunch1, lunch1_frozen, lunch2, lunch2_frozen, dinner, dinner_frozen)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(day_number(meal.date))
            .bind(&meal.lunch1)
            .bind(meal.lunch1_frozen)
            .bind(&meal.lunch2)
            .bind(meal.lunch2_frozen)
            .bind(&meal.dinner)
            .bind(meal.dinner_frozen)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(_) => {}
                // Dropping the transaction rolls back earlier inserts
                Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                    return Err(StoreError::Conflict(meal.date));
                }
                Err(e) => return Err(e.into()),
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, date: NaiveDate) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM meals WHERE date = ?")
            .bind(day_number(date))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_range(&self, from: NaiveDate, to: NaiveDate) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM meals WHERE date >= ? AND date <= ?")
            .bind(day_number(from))
            .bind(day_number(to))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn begin_write(&self) -> Result<Box<dyn CalendarWrite + '_>, StoreError> {
        let tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;
        Ok(Box::new(SqliteWrite { tx }))
    }
}

/// A write session on one pooled connection inside an immediate transaction.
struct SqliteWrite {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl CalendarWrite for SqliteWrite {
    async fn get(&mut self, date: NaiveDate) -> Result<Option<Meal>, StoreError> {
        fetch_meal(&mut *self.tx, date).await
    }

    async fn save_batch(&mut self, meals: &[Meal]) -> Result<(), StoreError> {
        for meal in meals {
            upsert(&mut *self.tx, meal).await?;
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
