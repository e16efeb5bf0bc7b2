//! Sectioned CSV export.
//!
//! The layout is a single flat table: four sections, each introduced by a
//! `SECTION,<title>` row and separated by a blank row. Row and column order is
//! fixed.

use super::{iso_date, ExportContext};
use crate::models::{ClientRecord, Meal};

/// A CSV table under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Start a section: blank separator (except before the first), marker
    /// row, then the column header row.
    pub fn section(&mut self, title: &str, header: &[&str]) {
        if !self.rows.is_empty() {
            self.row([""]);
        }
        self.row(["SECTION", title]);
        self.row(header.iter().copied());
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Serialize; rows are joined with `\n`, no trailing newline.
    pub fn to_csv(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| escape_csv(cell))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Escape a string for CSV output.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Build the sectioned table for a record.
pub fn plan_table(record: &ClientRecord, ctx: &ExportContext) -> CsvTable {
    let config = &ctx.config;
    let mut table = CsvTable::new();

    table.section("CLIENT INFORMATION", &["Field", "Value"]);
    table.row(["Name", record.name.as_str()]);
    table.row(["Age", record.age.as_str()]);
    table.row(["Gender", record.sex.as_str()]);
    table.row(["Height (cm)", record.height.as_str()]);
    table.row(["Weight (kg)", record.weight.as_str()]);
    table.row(["BMI", record.bmi.as_str()]);
    table.row(["Health Complications", record.complications.as_str()]);
    table.row(["Health Goals", record.goals.as_str()]);

    table.section("DAILY MEAL PLAN", &["Meal Time", "Time", "Description", "Notes"]);
    for meal in Meal::SCHEDULE {
        table.row([meal.label(), meal.time(), meal.description(record), meal.note()]);
    }

    table.section("ADDITIONAL INFORMATION", &["Field", "Value"]);
    table.row(["Foods to Avoid", record.foods_to_avoid.as_str()]);
    table.row(["Special Notes", record.notes.as_str()]);

    table.section("EXPORT METADATA", &["Field", "Value"]);
    table.row(["Export Date".to_string(), ctx.export_timestamp()]);
    table.row(["Plan Valid From".to_string(), iso_date(ctx.valid_from())]);
    table.row(["Plan Valid Until".to_string(), iso_date(ctx.valid_until())]);
    table.row(["Created By", config.created_by.as_str()]);
    table.row(["Application", config.application_name.as_str()]);
    table.row(["Version", config.export_version.as_str()]);

    table
}

/// Export a record as CSV text.
pub fn export_csv(record: &ClientRecord, ctx: &ExportContext) -> String {
    plan_table(record, ctx).to_csv()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanConfig;
    use chrono::{TimeZone, Utc};

    fn ctx() -> ExportContext {
        ExportContext::at(
            Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
            PlanConfig::default(),
        )
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_csv(""), "");
    }

    #[test]
    fn test_layout() {
        let csv = export_csv(&ClientRecord::new(), &ctx());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 33);
        assert_eq!(lines[0], "SECTION,CLIENT INFORMATION");
        assert_eq!(lines[1], "Field,Value");
        assert_eq!(lines[2], "Name,");
        assert_eq!(lines[3], "Age,");
        assert_eq!(lines[9], "Health Goals,");
        assert_eq!(lines[10], "");
        assert_eq!(lines[11], "SECTION,DAILY MEAL PLAN");
        assert_eq!(lines[12], "Meal Time,Time,Description,Notes");
        assert_eq!(lines[13], "Early Morning,7:00 AM,,On empty stomach");
        assert_eq!(lines[18], "Dinner,8:00-9:00 PM,,Light dinner");
        assert_eq!(lines[19], "");
        assert_eq!(lines[20], "SECTION,ADDITIONAL INFORMATION");
        assert_eq!(lines[23], "Special Notes,");
        assert_eq!(lines[24], "");
        assert_eq!(lines[25], "SECTION,EXPORT METADATA");
        assert_eq!(lines[27], "Export Date,2025-01-15T10:00:00.000Z");
        assert_eq!(lines[28], "Plan Valid From,2025-01-15");
        assert_eq!(lines[29], "Plan Valid Until,2025-02-12");
        assert_eq!(lines[30], "Created By,Priya - Certified Nutritionist");
        assert_eq!(lines[32], "Version,1.0.0");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_quotes_values() {
        let mut record = ClientRecord::new();
        record.goals = "lose weight, gain muscle".into();
        record.notes = "say \"no\" to sugar".into();
        record.evening_snacks = "Light & healthy".into();

        let csv = export_csv(&record, &ctx());
        assert!(csv.contains("Health Goals,\"lose weight, gain muscle\""));
        assert!(csv.contains("Special Notes,\"say \"\"no\"\" to sugar\""));
        assert!(csv.contains("Evening Snacks,5:00-6:00 PM,Light & healthy,Light & healthy"));
    }

    #[test]
    fn test_meal_rows_follow_schedule() {
        let table = plan_table(&ClientRecord::new(), &ctx());
        let labels: Vec<&str> = table.rows()[13..19]
            .iter()
            .map(|r| r[0].as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["Early Morning", "Breakfast", "Mid Morning", "Lunch", "Evening Snacks", "Dinner"]
        );
    }
}
