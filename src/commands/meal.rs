use chrono::Local;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::{parse_date, parse_day, print_meals, resolve_week, OutputFormat};
use crate::db::CalendarStore;
use crate::models::{Meal, MealUpdate, Slot};
use crate::planner::Planner;

#[derive(Args)]
pub struct MealCommand {
    #[command(subcommand)]
    pub command: MealSubcommand,
}

#[derive(Subcommand)]
pub enum MealSubcommand {
    /// Plan the meals of a day
    Add {
        /// Date (YYYY-MM-DD)
        #[arg(long, short)]
        date: String,

        /// First lunch dish (defaults to the empty placeholder)
        #[arg(long)]
        lunch1: Option<String>,

        /// Second lunch dish
        #[arg(long)]
        lunch2: Option<String>,

        /// Dinner dish (defaults to the empty placeholder)
        #[arg(long)]
        dinner: Option<String>,

        /// First lunch comes from the freezer
        #[arg(long)]
        lunch1_frozen: bool,

        /// Second lunch comes from the freezer
        #[arg(long)]
        lunch2_frozen: bool,

        /// Dinner comes from the freezer
        #[arg(long)]
        dinner_frozen: bool,
    },

    /// Plan many days from a YAML or JSON file
    Import {
        /// File holding a list of meals
        file: PathBuf,
    },

    /// Show the meals of one day
    Show {
        /// "today", "tomorrow" or a date (YYYY-MM-DD)
        day: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List planned days
    List {
        /// Number of days to skip
        #[arg(long, default_value_t = 0)]
        skip: u32,

        /// Maximum number of days to show
        #[arg(long, default_value_t = 100)]
        limit: u32,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the meals of an ISO week (defaults to the current one)
    Week {
        /// ISO week number
        #[arg(long, short)]
        week: Option<u32>,

        /// ISO year
        #[arg(long, short)]
        year: Option<i32>,

        /// Use next week
        #[arg(long, conflicts_with = "week")]
        next: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change the meals of a planned day
    Update {
        /// Date (YYYY-MM-DD)
        date: String,

        #[arg(long)]
        lunch1: Option<String>,

        #[arg(long, conflicts_with = "no_lunch2")]
        lunch2: Option<String>,

        /// Remove the second lunch
        #[arg(long)]
        no_lunch2: bool,

        #[arg(long)]
        dinner: Option<String>,

        #[arg(long, value_name = "BOOL")]
        lunch1_frozen: Option<bool>,

        #[arg(long, value_name = "BOOL")]
        lunch2_frozen: Option<bool>,

        #[arg(long, value_name = "BOOL")]
        dinner_frozen: Option<bool>,
    },

    /// Remove a planned day
    Delete {
        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// Remove every planned day of an ISO week
    DeleteWeek {
        /// ISO week number (defaults to the current week)
        #[arg(long, short)]
        week: Option<u32>,

        /// ISO year
        #[arg(long, short)]
        year: Option<i32>,
    },

    /// Show what to thaw and which meals are still undecided
    Reminders {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl MealCommand {
    pub async fn run<S: CalendarStore>(
        &self,
        planner: &Planner<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let today = Local::now().date_naive();

        match &self.command {
            MealSubcommand::Add {
                date,
                lunch1,
                lunch2,
                dinner,
                lunch1_frozen,
                lunch2_frozen,
                dinner_frozen,
            } => {
                let date = parse_date(date)?;
                let empty = planner.classifier().empty();

                let mut meal = Meal::new(
                    date,
                    lunch1.as_deref().unwrap_or(empty),
                    dinner.as_deref().unwrap_or(empty),
                );
                meal.lunch2.clone_from(lunch2);
                meal.set_frozen(Slot::Lunch1, *lunch1_frozen);
                meal.set_frozen(Slot::Lunch2, *lunch2_frozen);
                meal.set_frozen(Slot::Dinner, *dinner_frozen);

                let created = planner.create(meal).await?;
                println!("Planned:");
                print!("{}", created);
                Ok(())
            }

            MealSubcommand::Import { file } => {
                let contents = std::fs::read_to_string(file)
                    .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
                let meals: Vec<Meal> = serde_yaml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse '{}': {}", file.display(), e))?;

                let created = planner.create_many(meals).await?;
                println!("Planned {} day(s)", created.len());
                Ok(())
            }

            MealSubcommand::Show { day, format } => {
                let date = parse_day(day, today)?;
                let meal = planner.get_or_not_found(date).await?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&meal)?),
                    OutputFormat::Text => print!("{}", meal),
                }
                Ok(())
            }

            MealSubcommand::List {
                skip,
                limit,
                format,
            } => {
                let meals = planner.list(*skip, *limit).await?;
                print_meals(&meals, format)
            }

            MealSubcommand::Week {
                week,
                year,
                next,
                format,
            } => {
                let (year, week) = resolve_week(*week, *year, *next, today)?;
                let meals = planner.week(year, week).await?;
                print_meals(&meals, format)
            }

            MealSubcommand::Update {
                date,
                lunch1,
                lunch2,
                no_lunch2,
                dinner,
                lunch1_frozen,
                lunch2_frozen,
                dinner_frozen,
            } => {
                let date = parse_date(date)?;
                let update = MealUpdate {
                    lunch1: lunch1.clone(),
                    lunch1_frozen: *lunch1_frozen,
                    lunch2: if *no_lunch2 {
                        Some(None)
                    } else {
                        lunch2.clone().map(Some)
                    },
                    lunch2_frozen: *lunch2_frozen,
                    dinner: dinner.clone(),
                    dinner_frozen: *dinner_frozen,
                };

                let updated = planner.update(date, &update).await?;
                println!("Updated:");
                print!("{}", updated);
                Ok(())
            }

            MealSubcommand::Delete { date } => {
                let date = parse_date(date)?;
                planner.delete(date).await?;
                println!("Removed meals for {}", date);
                Ok(())
            }

            MealSubcommand::DeleteWeek { week, year } => {
                let (year, week) = resolve_week(*week, *year, false, today)?;
                let removed = planner.delete_week(year, week).await?;
                println!("Removed {} day(s) from week {} of {}", removed, week, year);
                Ok(())
            }

            MealSubcommand::Reminders { format } => {
                let reminders = planner.reminders(today).await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&reminders)?);
                    }
                    OutputFormat::Text => {
                        if reminders.is_empty() {
                            println!("Nothing to prepare");
                        }
                        for reminder in &reminders {
                            println!("{}", reminder);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
