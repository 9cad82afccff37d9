use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

use super::slot::{MealField, Slot};

/// The meals planned for one calendar day.
///
/// `lunch2` is the only slot that may be absent. The other slots always hold
/// text, possibly one of the configured placeholder values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub date: NaiveDate,
    pub lunch1: String,
    #[serde(default)]
    pub lunch1_frozen: bool,
    #[serde(default)]
    pub lunch2: Option<String>,
    #[serde(default)]
    pub lunch2_frozen: bool,
    pub dinner: String,
    #[serde(default)]
    pub dinner_frozen: bool,
}

impl Meal {
    pub fn new(date: NaiveDate, lunch1: impl Into<String>, dinner: impl Into<String>) -> Self {
        Self {
            date,
            lunch1: lunch1.into(),
            lunch1_frozen: false,
            lunch2: None,
            lunch2_frozen: false,
            dinner: dinner.into(),
            dinner_frozen: false,
        }
    }

    /// A day whose every slot holds `empty`.
    pub fn empty(date: NaiveDate, empty: &str) -> Self {
        Self::new(date, empty, empty).with_lunch2(empty)
    }

    pub fn with_lunch2(mut self, lunch2: impl Into<String>) -> Self {
        self.lunch2 = Some(lunch2.into());
        self
    }

    pub fn with_frozen(mut self, slot: Slot) -> Self {
        self.set_frozen(slot, true);
        self
    }

    pub fn content(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Lunch1 => Some(&self.lunch1),
            Slot::Lunch2 => self.lunch2.as_deref(),
            Slot::Dinner => Some(&self.dinner),
        }
    }

    pub fn set_content(&mut self, slot: Slot, content: impl Into<String>) {
        let content = content.into();
        match slot {
            Slot::Lunch1 => self.lunch1 = content,
            Slot::Lunch2 => self.lunch2 = Some(content),
            Slot::Dinner => self.dinner = content,
        }
    }

    pub fn is_frozen(&self, slot: Slot) -> bool {
        match slot {
            Slot::Lunch1 => self.lunch1_frozen,
            Slot::Lunch2 => self.lunch2_frozen,
            Slot::Dinner => self.dinner_frozen,
        }
    }

    pub fn set_frozen(&mut self, slot: Slot, frozen: bool) {
        match slot {
            Slot::Lunch1 => self.lunch1_frozen = frozen,
            Slot::Lunch2 => self.lunch2_frozen = frozen,
            Slot::Dinner => self.dinner_frozen = frozen,
        }
    }

    /// Exchanges one attribute with `other`.
    pub fn swap_field(&mut self, other: &mut Meal, field: MealField) {
        match field {
            MealField::Lunch1 => mem::swap(&mut self.lunch1, &mut other.lunch1),
            MealField::Lunch1Frozen => mem::swap(&mut self.lunch1_frozen, &mut other.lunch1_frozen),
            MealField::Lunch2 => mem::swap(&mut self.lunch2, &mut other.lunch2),
            MealField::Lunch2Frozen => mem::swap(&mut self.lunch2_frozen, &mut other.lunch2_frozen),
            MealField::Dinner => mem::swap(&mut self.dinner, &mut other.dinner),
            MealField::DinnerFrozen => mem::swap(&mut self.dinner_frozen, &mut other.dinner_frozen),
        }
    }

    /// Overwrites one attribute with the value `other` holds.
    pub fn copy_field_from(&mut self, other: &Meal, field: MealField) {
        match field {
            MealField::Lunch1 => self.lunch1.clone_from(&other.lunch1),
            MealField::Lunch1Frozen => self.lunch1_frozen = other.lunch1_frozen,
            MealField::Lunch2 => self.lunch2.clone_from(&other.lunch2),
            MealField::Lunch2Frozen => self.lunch2_frozen = other.lunch2_frozen,
            MealField::Dinner => self.dinner.clone_from(&other.dinner),
            MealField::DinnerFrozen => self.dinner_frozen = other.dinner_frozen,
        }
    }

    /// Resets a slot to `empty` and unfreezes it.
    pub fn clear_slot(&mut self, slot: Slot, empty: &str) {
        self.set_content(slot, empty);
        self.set_frozen(slot, false);
    }

    /// Frozen dishes of the day, e.g. `lentils (L1)`, for thaw reminders.
    pub fn frozen_items(&self) -> Vec<String> {
        Slot::ALL
            .iter()
            .filter(|slot| self.is_frozen(**slot))
            .filter_map(|slot| {
                self.content(*slot)
                    .map(|content| format!("{} ({})", content.to_lowercase(), slot.tag()))
            })
            .collect()
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.date, self.date.format("%A"))?;
        for slot in Slot::ALL {
            let content = self.content(slot).unwrap_or("-");
            let frozen = if self.is_frozen(slot) { " [frozen]" } else { "" };
            writeln!(f, "  {:7} {}{}", slot, content, frozen)?;
        }
        Ok(())
    }
}

/// A partial change to a stored [`Meal`].
///
/// `lunch2: Some(None)` removes the second lunch; no other slot can be
/// emptied this way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealUpdate {
    pub lunch1: Option<String>,
    pub lunch1_frozen: Option<bool>,
    pub lunch2: Option<Option<String>>,
    pub lunch2_frozen: Option<bool>,
    pub dinner: Option<String>,
    pub dinner_frozen: Option<bool>,
}

impl MealUpdate {
    pub fn is_empty(&self) -> bool {
        *self == MealUpdate::default()
    }

    pub fn apply(&self, meal: &mut Meal) {
        if let Some(lunch1) = &self.lunch1 {
            meal.lunch1.clone_from(lunch1);
        }
        if let Some(frozen) = self.lunch1_frozen {
            meal.lunch1_frozen = frozen;
        }
        if let Some(lunch2) = &self.lunch2 {
            meal.lunch2.clone_from(lunch2);
        }
        if let Some(frozen) = self.lunch2_frozen {
            meal.lunch2_frozen = frozen;
        }
        if let Some(dinner) = &self.dinner {
            meal.dinner.clone_from(dinner);
        }
        if let Some(frozen) = self.dinner_frozen {
            meal.dinner_frozen = frozen;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_meal_new() {
        let meal = Meal::new(date(1), "Paella", "Soup");

        assert_eq!(meal.lunch1, "Paella");
        assert_eq!(meal.lunch2, None);
        assert_eq!(meal.dinner, "Soup");
        assert!(!meal.lunch1_frozen && !meal.lunch2_frozen && !meal.dinner_frozen);
    }

    #[test]
    fn test_empty_meal_fills_every_slot() {
        let meal = Meal::empty(date(3), "<empty>");

        for slot in Slot::ALL {
            assert_eq!(meal.content(slot), Some("<empty>"));
            assert!(!meal.is_frozen(slot));
        }
    }

    #[test]
    fn test_swap_field_exchanges_only_that_field() {
        let mut a = Meal::new(date(1), "Paella", "Soup").with_frozen(Slot::Lunch1);
        let mut b = Meal::new(date(2), "Pizza", "Salad").with_lunch2("Fruit");

        a.swap_field(&mut b, MealField::Lunch2);

        assert_eq!(a.lunch2.as_deref(), Some("Fruit"));
        assert_eq!(b.lunch2, None);
        assert_eq!(a.lunch1, "Paella");
        assert!(a.lunch1_frozen);
        assert!(!b.lunch1_frozen);
    }

    #[test]
    fn test_copy_field_from() {
        let source = Meal::new(date(1), "Paella", "Soup").with_frozen(Slot::Dinner);
        let mut target = Meal::new(date(2), "Pizza", "Salad");

        target.copy_field_from(&source, MealField::Dinner);
        target.copy_field_from(&source, MealField::DinnerFrozen);

        assert_eq!(target.dinner, "Soup");
        assert!(target.dinner_frozen);
        assert_eq!(target.lunch1, "Pizza");
    }

    #[test]
    fn test_clear_slot_unfreezes() {
        let mut meal = Meal::new(date(1), "Paella", "Soup").with_frozen(Slot::Lunch1);
        meal.clear_slot(Slot::Lunch1, "<empty>");

        assert_eq!(meal.lunch1, "<empty>");
        assert!(!meal.lunch1_frozen);
    }

    #[test]
    fn test_frozen_items() {
        let meal = Meal::new(date(1), "Lentils", "Fish Stew")
            .with_frozen(Slot::Lunch1)
            .with_frozen(Slot::Lunch2)
            .with_frozen(Slot::Dinner);

        // lunch2 is frozen but absent, so it is skipped
        assert_eq!(meal.frozen_items(), vec!["lentils (L1)", "fish stew (D)"]);
    }

    #[test]
    fn test_meal_update_apply() {
        let mut meal = Meal::new(date(1), "Paella", "Soup").with_lunch2("Fruit");
        let update = MealUpdate {
            lunch2: Some(None),
            dinner: Some("Omelette".to_string()),
            dinner_frozen: Some(true),
            ..Default::default()
        };

        update.apply(&mut meal);

        assert_eq!(meal.lunch1, "Paella");
        assert_eq!(meal.lunch2, None);
        assert_eq!(meal.dinner, "Omelette");
        assert!(meal.dinner_frozen);
        assert!(!update.is_empty());
        assert!(MealUpdate::default().is_empty());
    }

    #[test]
    fn test_meal_json_defaults() {
        let json = r#"{"date":"2024-01-01","lunch1":"Paella","dinner":"Soup"}"#;
        let meal: Meal = serde_json::from_str(json).unwrap();

        assert_eq!(meal, Meal::new(date(1), "Paella", "Soup"));
    }

    #[test]
    fn test_meal_display() {
        let meal = Meal::new(date(1), "Paella", "Soup").with_frozen(Slot::Dinner);
        let output = format!("{}", meal);

        assert!(output.contains("2024-01-01"));
        assert!(output.contains("Paella"));
        assert!(output.contains("Soup [frozen]"));
    }
}
