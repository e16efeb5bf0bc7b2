//! Domain models for the diet plan system.

mod meal;
mod record;

pub use meal::*;
pub use record::*;
