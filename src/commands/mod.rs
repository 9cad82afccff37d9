mod config_cmd;
mod meal;
mod plan;

pub use config_cmd::ConfigCommand;
pub use meal::MealCommand;
pub use plan::{ShiftCommand, SwapCommand};

use chrono::{Datelike, Days, NaiveDate};
use clap::ValueEnum;

use crate::models::Meal;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", s))
}

/// Accepts `today`, `tomorrow` or a `YYYY-MM-DD` date.
fn parse_day(s: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    match s.to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| "Tomorrow is out of range".to_string()),
        _ => parse_date(s),
    }
}

/// ISO (year, week) to operate on: explicit values win, `next` moves one week
/// past today.
fn resolve_week(
    week: Option<u32>,
    year: Option<i32>,
    next: bool,
    today: NaiveDate,
) -> Result<(i32, u32), String> {
    let reference = if next {
        today
            .checked_add_days(Days::new(7))
            .ok_or_else(|| "Next week is out of range".to_string())?
    } else {
        today
    };
    let iso = reference.iso_week();
    Ok((year.unwrap_or(iso.year()), week.unwrap_or(iso.week())))
}

fn print_meals(meals: &[Meal], format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(meals)?);
        }
        OutputFormat::Text => {
            if meals.is_empty() {
                println!("No meals found");
                return Ok(());
            }
            for (i, meal) in meals.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", meal);
            }
            println!("\nTotal: {} day(s)", meals.len());
        }
    }
    Ok(())
}
