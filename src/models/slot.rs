use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three meal slots of a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Lunch1,
    Lunch2,
    Dinner,
}

impl Slot {
    /// Every slot, in calendar order.
    pub const ALL: [Slot; 3] = [Slot::Lunch1, Slot::Lunch2, Slot::Dinner];

    /// Short tag used in reminder texts.
    pub fn tag(&self) -> &'static str {
        match self {
            Slot::Lunch1 => "L1",
            Slot::Lunch2 => "L2",
            Slot::Dinner => "D",
        }
    }

    pub fn content_field(&self) -> MealField {
        match self {
            Slot::Lunch1 => MealField::Lunch1,
            Slot::Lunch2 => MealField::Lunch2,
            Slot::Dinner => MealField::Dinner,
        }
    }

    pub fn frozen_field(&self) -> MealField {
        match self {
            Slot::Lunch1 => MealField::Lunch1Frozen,
            Slot::Lunch2 => MealField::Lunch2Frozen,
            Slot::Dinner => MealField::DinnerFrozen,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Lunch1 => write!(f, "lunch1"),
            Slot::Lunch2 => write!(f, "lunch2"),
            Slot::Dinner => write!(f, "dinner"),
        }
    }
}

/// A single stored attribute of a [`Meal`](super::Meal).
///
/// Swap and shift move values attribute by attribute, so content and its
/// frozen flag are distinct identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealField {
    Lunch1,
    Lunch1Frozen,
    Lunch2,
    Lunch2Frozen,
    Dinner,
    DinnerFrozen,
}

impl MealField {
    pub fn slot(&self) -> Slot {
        match self {
            MealField::Lunch1 | MealField::Lunch1Frozen => Slot::Lunch1,
            MealField::Lunch2 | MealField::Lunch2Frozen => Slot::Lunch2,
            MealField::Dinner | MealField::DinnerFrozen => Slot::Dinner,
        }
    }

    pub fn is_frozen_flag(&self) -> bool {
        matches!(
            self,
            MealField::Lunch1Frozen | MealField::Lunch2Frozen | MealField::DinnerFrozen
        )
    }
}

impl fmt::Display for MealField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_frozen_flag() {
            write!(f, "{}_frozen", self.slot())
        } else {
            write!(f, "{}", self.slot())
        }
    }
}
