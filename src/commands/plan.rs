use clap::Args;

use super::{parse_date, print_meals, OutputFormat};
use crate::db::CalendarStore;
use crate::models::SwapMode;
use crate::planner::Planner;

/// Exchange meals between two planned days
#[derive(Args)]
pub struct SwapCommand {
    /// First date (YYYY-MM-DD)
    pub first: String,

    /// Second date (YYYY-MM-DD)
    pub second: String,

    /// Slots to exchange (all, lunch, lunch_1, lunch_2, dinner)
    #[arg(long, short, default_value = "all")]
    pub mode: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SwapCommand {
    pub async fn run<S: CalendarStore>(
        &self,
        planner: &Planner<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let first = parse_date(&self.first)?;
        let second = parse_date(&self.second)?;
        let mode: SwapMode = self.mode.parse().map_err(|e: String| e)?;

        let (a, b) = planner.swap(first, second, mode).await?;
        print_meals(&[a, b], &self.format)
    }
}

/// Push a day's meals forward, moving later meals along
#[derive(Args)]
pub struct ShiftCommand {
    /// Date to shift from (YYYY-MM-DD)
    pub date: String,

    /// Slots to shift (all, lunch, lunch_1, lunch_2, dinner)
    #[arg(long, short, default_value = "all")]
    pub mode: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ShiftCommand {
    pub async fn run<S: CalendarStore>(
        &self,
        planner: &Planner<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let date = parse_date(&self.date)?;
        let mode: SwapMode = self.mode.parse().map_err(|e: String| e)?;

        let touched = planner.shift(date, mode).await?;
        if touched.is_empty() {
            if let OutputFormat::Text = self.format {
                println!("No meals planned for {}, nothing to shift", date);
                return Ok(());
            }
        }
        print_meals(&touched, &self.format)
    }
}
