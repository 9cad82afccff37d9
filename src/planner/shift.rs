//! Pushing a day's meals forward in time.
//!
//! A shift runs in two passes. The search walks forward from the origin
//! collecting days until it reaches one whose selected slots are all
//! overridable, or a date with no meal (an empty day is synthesised there).
//! The cascade then moves every selected attribute one day forward along that
//! chain, starting from its far end, and clears the origin. Nothing is
//! written until both passes have finished.

use chrono::NaiveDate;

use super::classifier::Classifier;
use super::error::PlannerError;
use super::slots::attributes_for_mode;
use crate::db::CalendarWrite;
use crate::models::{Meal, MealField, SwapMode};

pub(super) async fn shift<W: CalendarWrite + ?Sized>(
    write: &mut W,
    classifier: &Classifier,
    date: NaiveDate,
    mode: SwapMode,
) -> Result<Vec<Meal>, PlannerError> {
    let Some(origin) = write.get(date).await? else {
        tracing::debug!("Nothing to shift on {}", date);
        return Ok(Vec::new());
    };

    let fields = attributes_for_mode(mode);
    let mut chain = find_chain(write, classifier, origin, &fields).await?;

    cascade(&mut chain, &fields);
    for slot in mode.slots() {
        chain[0].clear_slot(*slot, classifier.empty());
    }

    write.save_batch(&chain).await?;
    Ok(chain)
}

/// Collects `origin` and the following days up to and including the first
/// one that can absorb the cascade. The result is ascending by date and has
/// at least two elements.
async fn find_chain<W: CalendarWrite + ?Sized>(
    write: &mut W,
    classifier: &Classifier,
    origin: Meal,
    fields: &[MealField],
) -> Result<Vec<Meal>, PlannerError> {
    let mut current = origin.date;
    let mut chain = vec![origin];

    loop {
        let next = current
            .succ_opt()
            .ok_or(PlannerError::DateOutOfRange(current))?;

        match write.get(next).await? {
            None => {
                tracing::debug!("No meal on {}, adding an empty day", next);
                chain.push(Meal::empty(next, classifier.empty()));
                return Ok(chain);
            }
            Some(meal) if classifier.is_overridable_record(&meal, fields) => {
                tracing::debug!("{} can absorb the shift", next);
                chain.push(meal);
                return Ok(chain);
            }
            Some(meal) => {
                tracing::debug!("{} is taken, continuing", next);
                chain.push(meal);
                current = next;
            }
        }
    }
}

/// Moves `fields` one day forward along an ascending chain. The last day's
/// values are overwritten; the first day keeps its own.
pub fn cascade(chain: &mut [Meal], fields: &[MealField]) {
    for i in (1..chain.len()).rev() {
        let (earlier, later) = chain.split_at_mut(i);
        let source = &earlier[i - 1];
        for field in fields {
            later[0].copy_field_from(source, *field);
        }
    }
}
