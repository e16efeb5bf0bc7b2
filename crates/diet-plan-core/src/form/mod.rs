//! Live form state for one intake session.

mod bmi;

pub use bmi::*;

use tracing::debug;

use crate::models::{ClientRecord, Field};
use crate::schema::{self, ValidationReport};

/// Shown under the form when it has been edited but can't be submitted.
pub const INCOMPLETE_FORM_MESSAGE: &str =
    "Please fill in all required fields correctly before generating the PDF.";

/// The record being edited plus its derived validation and dirty status.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    record: ClientRecord,
    /// `None` until the first mutation after mount or reset
    report: Option<ValidationReport>,
    dirty: bool,
}

impl FormState {
    /// Create an empty, pristine form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one field value.
    ///
    /// Editing weight or height re-derives BMI before validation runs, so any
    /// reader after this call sees the updated BMI.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        debug!(field = field.key(), len = value.len(), "set field");
        self.record.set(field, value);

        if matches!(field, Field::Weight | Field::Height) {
            self.derive_bmi();
        }

        self.report = Some(schema::validate(&self.record));
        self.dirty = true;
    }

    /// Set a field by its form key. Returns `false` for unknown keys.
    pub fn set_field_by_key(&mut self, key: &str, value: impl Into<String>) -> bool {
        match Field::from_key(key) {
            Some(field) => {
                self.set_field(field, value);
                true
            }
            None => false,
        }
    }

    fn derive_bmi(&mut self) {
        if let Some(bmi) = derive_bmi(&self.record.weight, &self.record.height) {
            debug!(bmi = %bmi, "derived bmi");
            self.record.bmi = bmi;
        }
    }

    /// Restore the empty form. Does nothing when the form is pristine.
    pub fn reset(&mut self) {
        if !self.dirty {
            return;
        }
        debug!("reset form");
        *self = Self::default();
    }

    /// Whether the reset control is enabled.
    pub fn can_reset(&self) -> bool {
        self.dirty
    }

    /// Owned copy of the current record.
    pub fn snapshot(&self) -> ClientRecord {
        self.record.clone()
    }

    /// Borrow the current record.
    pub fn record(&self) -> &ClientRecord {
        &self.record
    }

    pub fn value(&self, field: Field) -> &str {
        self.record.get(field)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whole-record validity. A pristine form is never valid since the empty
    /// record fails its required fields.
    pub fn is_valid(&self) -> bool {
        match &self.report {
            Some(report) => report.is_valid(),
            None => schema::validate(&self.record).is_valid(),
        }
    }

    /// Whether the generate/export controls are enabled.
    pub fn can_generate(&self) -> bool {
        self.is_valid()
    }

    /// Inline message for a field, if its last validation failed.
    pub fn error(&self, field: Field) -> Option<&str> {
        self.report.as_ref().and_then(|r| r.error(field))
    }

    /// Last validation results; `None` before the first edit.
    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    /// Form-level status line, shown once the user has edited an invalid form.
    pub fn status_message(&self) -> Option<&'static str> {
        (self.dirty && !self.is_valid()).then_some(INCOMPLETE_FORM_MESSAGE)
    }
}
