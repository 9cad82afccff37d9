mod meal;
mod slot;
mod swap_mode;

pub use meal::{Meal, MealUpdate};
pub use slot::{MealField, Slot};
pub use swap_mode::SwapMode;
