//! Client intake record.

use serde::{Deserialize, Serialize};

/// A named field of the intake form.
///
/// Variants are declared in form order; iteration over [`Field::ALL`] and the
/// ordering of validation reports follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Age,
    Sex,
    Height,
    Weight,
    Bmi,
    Complications,
    Goals,
    EarlyMorning,
    MidMorning,
    Breakfast,
    Lunch,
    EveningSnacks,
    Dinner,
    FoodsToAvoid,
    Notes,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 16] = [
        Field::Name,
        Field::Age,
        Field::Sex,
        Field::Height,
        Field::Weight,
        Field::Bmi,
        Field::Complications,
        Field::Goals,
        Field::EarlyMorning,
        Field::MidMorning,
        Field::Breakfast,
        Field::Lunch,
        Field::EveningSnacks,
        Field::Dinner,
        Field::FoodsToAvoid,
        Field::Notes,
    ];

    /// The camelCase key used by the host form and the JSON record format.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Age => "age",
            Field::Sex => "sex",
            Field::Height => "height",
            Field::Weight => "weight",
            Field::Bmi => "bmi",
            Field::Complications => "complications",
            Field::Goals => "goals",
            Field::EarlyMorning => "earlyMorning",
            Field::MidMorning => "midMorning",
            Field::Breakfast => "breakfast",
            Field::Lunch => "lunch",
            Field::EveningSnacks => "eveningSnacks",
            Field::Dinner => "dinner",
            Field::FoodsToAvoid => "foodsToAvoid",
            Field::Notes => "notes",
        }
    }

    /// Look up a field by its camelCase key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Whether the field is a user input (everything except the derived BMI).
    pub fn is_user_input(self) -> bool {
        self != Field::Bmi
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Client sex as offered by the form's select control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }

    /// Display label for the select control.
    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Sex> {
        Sex::ALL.iter().copied().find(|s| s.as_str() == value)
    }
}

/// One client's intake data.
///
/// Every value is kept as text, including the numeric ones; numeric checks
/// happen at validation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientRecord {
    pub name: String,
    pub age: String,
    pub sex: String,
    /// Height in centimetres
    pub height: String,
    /// Weight in kilograms
    pub weight: String,
    /// Derived from weight and height, never entered directly
    pub bmi: String,
    pub complications: String,
    pub goals: String,
    pub early_morning: String,
    pub mid_morning: String,
    pub breakfast: String,
    pub lunch: String,
    pub evening_snacks: String,
    pub dinner: String,
    pub foods_to_avoid: String,
    pub notes: String,
}

impl ClientRecord {
    /// Create an empty record (all fields blank).
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field value.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Age => &self.age,
            Field::Sex => &self.sex,
            Field::Height => &self.height,
            Field::Weight => &self.weight,
            Field::Bmi => &self.bmi,
            Field::Complications => &self.complications,
            Field::Goals => &self.goals,
            Field::EarlyMorning => &self.early_morning,
            Field::MidMorning => &self.mid_morning,
            Field::Breakfast => &self.breakfast,
            Field::Lunch => &self.lunch,
            Field::EveningSnacks => &self.evening_snacks,
            Field::Dinner => &self.dinner,
            Field::FoodsToAvoid => &self.foods_to_avoid,
            Field::Notes => &self.notes,
        }
    }

    /// Replace a field value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    /// Whether every field is blank.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Parse a record from its JSON form (camelCase keys, missing keys blank).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Age => &mut self.age,
            Field::Sex => &mut self.sex,
            Field::Height => &mut self.height,
            Field::Weight => &mut self.weight,
            Field::Bmi => &mut self.bmi,
            Field::Complications => &mut self.complications,
            Field::Goals => &mut self.goals,
            Field::EarlyMorning => &mut self.early_morning,
            Field::MidMorning => &mut self.mid_morning,
            Field::Breakfast => &mut self.breakfast,
            Field::Lunch => &mut self.lunch,
            Field::EveningSnacks => &mut self.evening_snacks,
            Field::Dinner => &mut self.dinner,
            Field::FoodsToAvoid => &mut self.foods_to_avoid,
            Field::Notes => &mut self.notes,
        }
    }
}
