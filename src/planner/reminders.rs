use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::models::Slot;

/// Something the cook has to act on before a planned day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reminder {
    /// Frozen dishes to take out of the freezer
    Thaw { date: NaiveDate, items: Vec<String> },
    /// Slots still holding the variable placeholder
    Undecided {
        date: NaiveDate,
        slots: Vec<Slot>,
        urgent: bool,
    },
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reminder::Thaw { date, items } => {
                write!(f, "Thaw for {}: {}", date, items.join(", "))
            }
            Reminder::Undecided {
                date,
                slots,
                urgent,
            } => {
                let names: Vec<String> = slots.iter().map(|s| s.to_string()).collect();
                let plural = if slots.len() > 1 { "s" } else { "" };
                write!(f, "Define variable meal{} [{}]: {}", plural, date, names.join(", "))?;
                if *urgent {
                    write!(f, " (urgent)")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_display() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let thaw = Reminder::Thaw {
            date,
            items: vec!["lentils (L1)".to_string(), "fish (D)".to_string()],
        };
        assert_eq!(thaw.to_string(), "Thaw for 2024-01-02: lentils (L1), fish (D)");

        let one = Reminder::Undecided {
            date,
            slots: vec![Slot::Dinner],
            urgent: false,
        };
        assert_eq!(one.to_string(), "Define variable meal [2024-01-02]: dinner");

        let many = Reminder::Undecided {
            date,
            slots: vec![Slot::Lunch1, Slot::Dinner],
            urgent: true,
        };
        assert_eq!(
            many.to_string(),
            "Define variable meals [2024-01-02]: lunch1, dinner (urgent)"
        );
    }
}
