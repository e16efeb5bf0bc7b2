//! Structured JSON export.

use serde::{Deserialize, Serialize};

use super::{client_id, iso_date, ExportContext};
use crate::models::{ClientRecord, Meal};

/// Full JSON export of one plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanExport {
    pub metadata: ExportMetadata,
    pub client_information: ClientInformation,
    pub meal_plan: MealPlan,
    pub additional_information: AdditionalInformation,
    pub plan_validation: PlanValidation,
}

/// Export metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// Export timestamp
    pub export_date: String,
    /// Export format version
    pub export_version: String,
    pub application_name: String,
    /// Identifier derived from the client name
    pub client_id: String,
    pub plan_type: String,
    pub data_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientInformation {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,
    pub bmi: String,
    pub health_complications: String,
    pub health_goals: String,
}

/// One meal slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealEntry {
    pub time: String,
    pub description: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub early_morning: MealEntry,
    pub breakfast: MealEntry,
    pub mid_morning: MealEntry,
    pub lunch: MealEntry,
    pub evening_snacks: MealEntry,
    pub dinner: MealEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInformation {
    pub foods_to_avoid: String,
    pub special_notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanValidation {
    /// `YYYY-MM-DD`
    pub valid_from: String,
    /// `YYYY-MM-DD`, `valid_from` plus the validity period
    pub valid_until: String,
    pub created_by: String,
}

impl MealEntry {
    fn new(meal: Meal, record: &ClientRecord) -> Self {
        Self {
            time: meal.time().to_string(),
            description: meal.description(record).to_string(),
            notes: meal.note().to_string(),
        }
    }
}

impl PlanExport {
    /// Build the export for a record.
    pub fn from_record(record: &ClientRecord, ctx: &ExportContext) -> Self {
        let config = &ctx.config;

        Self {
            metadata: ExportMetadata {
                export_date: ctx.export_timestamp(),
                export_version: config.export_version.clone(),
                application_name: config.application_name.clone(),
                client_id: client_id(&record.name),
                plan_type: "daily-meal-plan".to_string(),
                data_format: "json".to_string(),
            },
            client_information: ClientInformation {
                name: record.name.clone(),
                age: record.age.clone(),
                gender: record.sex.clone(),
                height: record.height.clone(),
                weight: record.weight.clone(),
                bmi: record.bmi.clone(),
                health_complications: record.complications.clone(),
                health_goals: record.goals.clone(),
            },
            meal_plan: MealPlan {
                early_morning: MealEntry::new(Meal::EarlyMorning, record),
                breakfast: MealEntry::new(Meal::Breakfast, record),
                mid_morning: MealEntry::new(Meal::MidMorning, record),
                lunch: MealEntry::new(Meal::Lunch, record),
                evening_snacks: MealEntry::new(Meal::EveningSnacks, record),
                dinner: MealEntry::new(Meal::Dinner, record),
            },
            additional_information: AdditionalInformation {
                foods_to_avoid: record.foods_to_avoid.clone(),
                special_notes: record.notes.clone(),
            },
            plan_validation: PlanValidation {
                valid_from: iso_date(ctx.valid_from()),
                valid_until: iso_date(ctx.valid_until()),
                created_by: config.created_by.clone(),
            },
        }
    }

    /// Export to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Export a record as JSON text.
pub fn export_json(
    record: &ClientRecord,
    ctx: &ExportContext,
) -> Result<String, serde_json::Error> {
    PlanExport::from_record(record, ctx).to_json()
}
