//! The fixed daily meal schedule.

use serde::{Deserialize, Serialize};

use super::record::{ClientRecord, Field};

/// One of the six meal slots of a daily plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Meal {
    EarlyMorning,
    Breakfast,
    MidMorning,
    Lunch,
    EveningSnacks,
    Dinner,
}

impl Meal {
    /// Meal slots in plan order. Document rows and export rows follow this order.
    pub const SCHEDULE: [Meal; 6] = [
        Meal::EarlyMorning,
        Meal::Breakfast,
        Meal::MidMorning,
        Meal::Lunch,
        Meal::EveningSnacks,
        Meal::Dinner,
    ];

    /// The record field holding this meal's description.
    pub fn field(self) -> Field {
        match self {
            Meal::EarlyMorning => Field::EarlyMorning,
            Meal::Breakfast => Field::Breakfast,
            Meal::MidMorning => Field::MidMorning,
            Meal::Lunch => Field::Lunch,
            Meal::EveningSnacks => Field::EveningSnacks,
            Meal::Dinner => Field::Dinner,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Meal::EarlyMorning => "Early Morning",
            Meal::Breakfast => "Breakfast",
            Meal::MidMorning => "Mid Morning",
            Meal::Lunch => "Lunch",
            Meal::EveningSnacks => "Evening Snacks",
            Meal::Dinner => "Dinner",
        }
    }

    /// Time window shown next to the meal.
    pub fn time(self) -> &'static str {
        match self {
            Meal::EarlyMorning => "7:00 AM",
            Meal::Breakfast => "8:30 AM",
            Meal::MidMorning => "10:30 AM",
            Meal::Lunch => "12:00-1:30 PM",
            Meal::EveningSnacks => "5:00-6:00 PM",
            Meal::Dinner => "8:00-9:00 PM",
        }
    }

    /// Static advisory note for the slot.
    pub fn note(self) -> &'static str {
        match self {
            Meal::EarlyMorning => "On empty stomach",
            Meal::Breakfast => "Main meal",
            Meal::MidMorning => "Light snack",
            Meal::Lunch => "Complete meal",
            Meal::EveningSnacks => "Light & healthy",
            Meal::Dinner => "Light dinner",
        }
    }

    /// The prescribed food for this slot, possibly blank.
    pub fn description(self, record: &ClientRecord) -> &str {
        record.get(self.field())
    }
}
