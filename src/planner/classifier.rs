use crate::models::{Meal, MealField, Slot};

/// Decides which slot contents may be overwritten by a shift.
///
/// A slot is overridable when it holds the empty placeholder or, unless
/// disabled, the variable ("to be decided") placeholder. Both comparisons
/// ignore case. An absent second lunch is overridable.
#[derive(Debug, Clone)]
pub struct Classifier {
    empty: String,
    empty_folded: String,
    variable_folded: String,
    variable_overridable: bool,
}

impl Classifier {
    pub fn new(empty: impl Into<String>, variable: impl Into<String>) -> Self {
        let empty = empty.into();
        let empty_folded = empty.to_lowercase();
        Self {
            empty,
            empty_folded,
            variable_folded: variable.into().to_lowercase(),
            variable_overridable: true,
        }
    }

    /// When false, only the empty placeholder counts as overridable.
    pub fn with_variable_overridable(mut self, overridable: bool) -> Self {
        self.variable_overridable = overridable;
        self
    }

    /// The placeholder written into cleared slots.
    pub fn empty(&self) -> &str {
        &self.empty
    }

    pub fn is_empty_value(&self, value: &str) -> bool {
        value.to_lowercase() == self.empty_folded
    }

    pub fn is_variable_value(&self, value: &str) -> bool {
        value.to_lowercase() == self.variable_folded
    }

    /// Frozen flags share the verdict of their slot's content.
    pub fn is_overridable(&self, meal: &Meal, field: MealField) -> bool {
        match meal.content(field.slot()) {
            None => true,
            Some(value) => {
                self.is_empty_value(value)
                    || (self.variable_overridable && self.is_variable_value(value))
            }
        }
    }

    /// True when every content field in `fields` is overridable.
    pub fn is_overridable_record(&self, meal: &Meal, fields: &[MealField]) -> bool {
        fields
            .iter()
            .filter(|f| !f.is_frozen_flag())
            .all(|f| self.is_overridable(meal, *f))
    }

    /// Slots still marked as "to be decided".
    pub fn variable_slots(&self, meal: &Meal) -> Vec<Slot> {
        Slot::ALL
            .into_iter()
            .filter(|slot| meal.content(*slot).is_some_and(|v| self.is_variable_value(v)))
            .collect()
    }
}
