use crate::models::{MealField, SwapMode};

/// Attributes touched by `mode`: each selected slot's content followed by
/// its frozen flag, slots in calendar order.
pub fn attributes_for_mode(mode: SwapMode) -> Vec<MealField> {
    mode.slots()
        .iter()
        .flat_map(|slot| [slot.content_field(), slot.frozen_field()])
        .collect()
}
