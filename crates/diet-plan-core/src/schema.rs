//! Declarative field schema and record validation.
//!
//! Each field carries a [`FieldRule`]: whether it is required, an optional
//! maximum length, and an optional value check. Rules only ever look at a
//! single field's value, so validating a record is a fold over [`SCHEMA`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ClientRecord, Field, Sex};

/// Value check applied to a non-empty field after the length check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueCheck {
    /// Any text is accepted.
    Text,
    /// Must parse as an integer within `min..=max`.
    IntegerRange {
        min: i64,
        max: i64,
        message: &'static str,
    },
    /// Must be one of the [`Sex`] options.
    SexOption { message: &'static str },
}

/// Validation rule for one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub field: Field,
    /// Message reported when the field is empty; `None` for optional fields.
    pub required: Option<&'static str>,
    /// Maximum length in characters, with the message reported above it.
    pub max_chars: Option<(usize, &'static str)>,
    pub check: ValueCheck,
}

const MEAL_TOO_LONG: (usize, &str) = (200, "Meal description must be less than 200 characters");

const fn optional(field: Field) -> FieldRule {
    FieldRule {
        field,
        required: None,
        max_chars: None,
        check: ValueCheck::Text,
    }
}

const fn required(field: Field, message: &'static str) -> FieldRule {
    FieldRule {
        field,
        required: Some(message),
        max_chars: None,
        check: ValueCheck::Text,
    }
}

/// The intake form schema, in form order.
pub static SCHEMA: [FieldRule; 16] = [
    FieldRule {
        max_chars: Some((100, "Name must be less than 100 characters")),
        ..required(Field::Name, "Client name is required")
    },
    FieldRule {
        check: ValueCheck::IntegerRange {
            min: 1,
            max: 120,
            message: "Age must be a valid number between 1 and 120",
        },
        ..required(Field::Age, "Age is required")
    },
    FieldRule {
        check: ValueCheck::SexOption {
            message: "Gender must be one of: male, female, other",
        },
        ..required(Field::Sex, "Gender is required")
    },
    required(Field::Height, "Height is required"),
    required(Field::Weight, "Weight is required"),
    optional(Field::Bmi),
    optional(Field::Complications),
    FieldRule {
        max_chars: Some((500, "Goals must be less than 500 characters")),
        ..required(Field::Goals, "Health goals are required")
    },
    FieldRule {
        max_chars: Some(MEAL_TOO_LONG),
        ..required(Field::EarlyMorning, "Early morning meal is required")
    },
    FieldRule {
        max_chars: Some(MEAL_TOO_LONG),
        ..optional(Field::MidMorning)
    },
    FieldRule {
        max_chars: Some(MEAL_TOO_LONG),
        ..required(Field::Breakfast, "Breakfast is required")
    },
    FieldRule {
        max_chars: Some(MEAL_TOO_LONG),
        ..required(Field::Lunch, "Lunch is required")
    },
    FieldRule {
        max_chars: Some(MEAL_TOO_LONG),
        ..optional(Field::EveningSnacks)
    },
    FieldRule {
        max_chars: Some(MEAL_TOO_LONG),
        ..required(Field::Dinner, "Dinner is required")
    },
    optional(Field::FoodsToAvoid),
    FieldRule {
        max_chars: Some((1000, "Notes must be less than 1000 characters")),
        ..optional(Field::Notes)
    },
];

/// Look up the rule for a field.
pub fn rule(field: Field) -> &'static FieldRule {
    // SCHEMA is declared in Field::ALL order.
    &SCHEMA[field as usize]
}

impl FieldRule {
    /// Check a single value against this rule.
    pub fn check_value(&self, value: &str) -> Result<(), &'static str> {
        if value.is_empty() {
            return match self.required {
                Some(message) => Err(message),
                None => Ok(()),
            };
        }

        if let Some((max, message)) = self.max_chars {
            if value.chars().count() > max {
                return Err(message);
            }
        }

        match self.check {
            ValueCheck::Text => Ok(()),
            ValueCheck::IntegerRange { min, max, message } => match value.trim().parse::<i64>() {
                Ok(n) if (min..=max).contains(&n) => Ok(()),
                _ => Err(message),
            },
            ValueCheck::SexOption { message } => Sex::parse(value).map(|_| ()).ok_or(message),
        }
    }
}

/// Per-field outcome of validating a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: BTreeMap<Field, String>,
}

impl ValidationReport {
    /// Whole-record validity.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a failing field, `None` when it passed.
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Failing fields with their messages, in form order.
    pub fn errors(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Validate a single field value.
pub fn validate_field(field: Field, value: &str) -> Result<(), &'static str> {
    rule(field).check_value(value)
}

/// Validate a whole record.
pub fn validate(record: &ClientRecord) -> ValidationReport {
    let errors = SCHEMA
        .iter()
        .filter_map(|rule| {
            rule.check_value(record.get(rule.field))
                .err()
                .map(|message| (rule.field, message.to_string()))
        })
        .collect();

    ValidationReport { errors }
}
