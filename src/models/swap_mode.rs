use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Slot;

/// Which slots a swap or shift operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapMode {
    All,
    Lunch,
    #[serde(rename = "lunch_1")]
    Lunch1,
    #[serde(rename = "lunch_2")]
    Lunch2,
    Dinner,
}

impl SwapMode {
    /// Slots selected by this mode, in calendar order.
    pub fn slots(&self) -> &'static [Slot] {
        match self {
            SwapMode::All => &[Slot::Lunch1, Slot::Lunch2, Slot::Dinner],
            SwapMode::Lunch => &[Slot::Lunch1, Slot::Lunch2],
            SwapMode::Lunch1 => &[Slot::Lunch1],
            SwapMode::Lunch2 => &[Slot::Lunch2],
            SwapMode::Dinner => &[Slot::Dinner],
        }
    }
}

impl fmt::Display for SwapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapMode::All => write!(f, "all"),
            SwapMode::Lunch => write!(f, "lunch"),
            SwapMode::Lunch1 => write!(f, "lunch_1"),
            SwapMode::Lunch2 => write!(f, "lunch_2"),
            SwapMode::Dinner => write!(f, "dinner"),
        }
    }
}

impl FromStr for SwapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(SwapMode::All),
            "lunch" => Ok(SwapMode::Lunch),
            "lunch_1" | "lunch1" => Ok(SwapMode::Lunch1),
            "lunch_2" | "lunch2" => Ok(SwapMode::Lunch2),
            "dinner" => Ok(SwapMode::Dinner),
            _ => Err(format!(
                "Invalid mode '{}'. Valid options: all, lunch, lunch_1, lunch_2, dinner",
                s
            )),
        }
    }
}
