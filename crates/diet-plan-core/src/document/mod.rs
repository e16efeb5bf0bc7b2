//! Mapping of a client record onto the fixed single-page plan document.
//!
//! The document is a description, not a rendered file: a rendering backend
//! (see [`DocumentRenderer`]) turns it into bytes. Mapping never fails; every
//! field has a literal fallback so an empty record still yields a complete
//! page.

mod render;

pub use render::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PlanConfig;
use crate::models::{ClientRecord, Field, Meal};

pub const NOT_PROVIDED: &str = "Not provided";
pub const NOT_CALCULATED: &str = "Not calculated";
pub const AS_PRESCRIBED: &str = "As prescribed";

/// General advice printed on every plan.
pub const INSTRUCTIONS: [&str; 6] = [
    "Drink 8-10 glasses of water daily",
    "Eat meals at regular intervals",
    "Chew food slowly and properly",
    "Avoid processed and junk foods",
    "Include physical activity as recommended",
    "Report weekly for progress monitoring",
];

pub const VALIDITY_NOTICE: [&str; 2] = [
    "This diet plan is valid for 4 weeks from the date of creation.",
    "Please follow up weekly for progress monitoring and adjustments.",
];

pub const MEAL_TABLE_HEADERS: [&str; 3] = ["Timing", "Food Items", "Notes"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    A4,
}

/// A labelled value in the client block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub clinic_name: String,
    pub tagline: String,
    pub date_caption: String,
    /// Creation date, "Month D, YYYY"
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfoBlock {
    pub title: String,
    pub rows: Vec<InfoRow>,
}

/// One row of the meal table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRow {
    pub meal: Meal,
    pub label: String,
    pub time: String,
    pub food: String,
    pub note: String,
    /// Alternate background band (odd rows)
    pub banded: bool,
}

impl MealRow {
    /// Timing cell text: label over time window.
    pub fn timing(&self) -> String {
        format!("{}\n({})", self.label, self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<MealRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlock {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterBlock {
    pub notice: Vec<String>,
    /// "Additional Notes: ..." when the record has notes
    pub notes: Option<String>,
    pub signature: String,
    pub credentials: Vec<String>,
}

/// A top-level block of the page, in layout order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Header(HeaderBlock),
    ClientInfo(ClientInfoBlock),
    MealTable(MealTable),
    Instructions(ListBlock),
    FoodsToAvoid(TextBlock),
    Footer(FooterBlock),
}

/// The complete page description handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub page_size: PageSize,
    pub sections: Vec<Section>,
}

impl PlanDocument {
    pub fn header(&self) -> Option<&HeaderBlock> {
        self.sections.iter().find_map(|s| match s {
            Section::Header(h) => Some(h),
            _ => None,
        })
    }

    pub fn client_info(&self) -> Option<&ClientInfoBlock> {
        self.sections.iter().find_map(|s| match s {
            Section::ClientInfo(c) => Some(c),
            _ => None,
        })
    }

    pub fn meal_table(&self) -> Option<&MealTable> {
        self.sections.iter().find_map(|s| match s {
            Section::MealTable(t) => Some(t),
            _ => None,
        })
    }

    pub fn instructions(&self) -> Option<&ListBlock> {
        self.sections.iter().find_map(|s| match s {
            Section::Instructions(l) => Some(l),
            _ => None,
        })
    }

    pub fn foods_to_avoid(&self) -> Option<&TextBlock> {
        self.sections.iter().find_map(|s| match s {
            Section::FoodsToAvoid(t) => Some(t),
            _ => None,
        })
    }

    pub fn footer(&self) -> Option<&FooterBlock> {
        self.sections.iter().find_map(|s| match s {
            Section::Footer(f) => Some(f),
            _ => None,
        })
    }

    /// Value of a client block row by label.
    pub fn client_value(&self, label: &str) -> Option<&str> {
        self.client_info()?
            .rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

/// Format a date as shown on the plan ("March 5, 2025").
pub fn format_plan_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

type SectionBuilder = fn(&ClientRecord, &PlanConfig, NaiveDate) -> Option<Section>;

/// Page layout: builders run in order, `None` leaves the section out.
const LAYOUT: [SectionBuilder; 6] = [
    header_section,
    client_info_section,
    meal_table_section,
    instructions_section,
    foods_to_avoid_section,
    footer_section,
];

/// Client block rows that only appear when the field has a value.
const OPTIONAL_CLIENT_ROWS: [(Field, &str); 2] = [
    (Field::Complications, "Health Issues"),
    (Field::Goals, "Goals"),
];

fn header_section(_: &ClientRecord, config: &PlanConfig, date: NaiveDate) -> Option<Section> {
    Some(Section::Header(HeaderBlock {
        clinic_name: config.clinic_name.clone(),
        tagline: config.tagline.clone(),
        date_caption: "Diet Plan Created".to_string(),
        date: format_plan_date(date),
    }))
}

fn client_info_section(record: &ClientRecord, _: &PlanConfig, _: NaiveDate) -> Option<Section> {
    let row = |label: &str, value: String| InfoRow {
        label: label.to_string(),
        value,
    };

    let mut rows = vec![
        row("Name", or_fallback(&record.name, NOT_PROVIDED)),
        row("Age", or_fallback(&record.age, NOT_PROVIDED)),
        row("Gender", or_fallback(&record.sex, NOT_PROVIDED)),
        row("Height", or_fallback(&record.height, NOT_PROVIDED)),
        row("BMI", or_fallback(&record.bmi, NOT_CALCULATED)),
    ];

    rows.extend(
        OPTIONAL_CLIENT_ROWS
            .iter()
            .filter(|(field, _)| !record.get(*field).is_empty())
            .map(|(field, label)| row(label, record.get(*field).to_string())),
    );

    Some(Section::ClientInfo(ClientInfoBlock {
        title: "Client Information".to_string(),
        rows,
    }))
}

fn meal_table_section(record: &ClientRecord, _: &PlanConfig, _: NaiveDate) -> Option<Section> {
    let rows = Meal::SCHEDULE
        .iter()
        .enumerate()
        .map(|(index, meal)| MealRow {
            meal: *meal,
            label: meal.label().to_string(),
            time: meal.time().to_string(),
            food: or_fallback(meal.description(record), AS_PRESCRIBED),
            note: meal.note().to_string(),
            banded: index % 2 == 1,
        })
        .collect();

    Some(Section::MealTable(MealTable {
        title: "Daily Diet Plan".to_string(),
        headers: MEAL_TABLE_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    }))
}

fn instructions_section(_: &ClientRecord, _: &PlanConfig, _: NaiveDate) -> Option<Section> {
    Some(Section::Instructions(ListBlock {
        title: "Important Instructions".to_string(),
        items: INSTRUCTIONS.iter().map(|i| i.to_string()).collect(),
    }))
}

fn foods_to_avoid_section(record: &ClientRecord, _: &PlanConfig, _: NaiveDate) -> Option<Section> {
    (!record.foods_to_avoid.is_empty()).then(|| {
        Section::FoodsToAvoid(TextBlock {
            title: "Foods to Avoid".to_string(),
            text: record.foods_to_avoid.clone(),
        })
    })
}

fn footer_section(record: &ClientRecord, config: &PlanConfig, _: NaiveDate) -> Option<Section> {
    Some(Section::Footer(FooterBlock {
        notice: VALIDITY_NOTICE.iter().map(|n| n.to_string()).collect(),
        notes: (!record.notes.is_empty()).then(|| format!("Additional Notes: {}", record.notes)),
        signature: config.nutritionist.clone(),
        credentials: config.credentials.clone(),
    }))
}

/// Map a record onto the plan page, dated `date`.
pub fn map_record(record: &ClientRecord, config: &PlanConfig, date: NaiveDate) -> PlanDocument {
    PlanDocument {
        page_size: PageSize::A4,
        sections: LAYOUT
            .iter()
            .filter_map(|build| build(record, config, date))
            .collect(),
    }
}

/// Map a record using today's local date.
pub fn map_record_today(record: &ClientRecord, config: &PlanConfig) -> PlanDocument {
    map_record(record, config, chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    fn map(record: &ClientRecord) -> PlanDocument {
        map_record(record, &PlanConfig::default(), date())
    }

    #[test]
    fn test_date_format() {
        assert_eq!(format_plan_date(date()), "March 5, 2025");
        let d = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(format_plan_date(d), "December 25, 2024");
    }

    #[test]
    fn test_empty_record_produces_complete_page() {
        let doc = map(&ClientRecord::new());

        assert_eq!(doc.sections.len(), 5);
        assert!(doc.header().is_some());
        assert!(doc.foods_to_avoid().is_none());
        assert_eq!(doc.client_value("Name"), Some(NOT_PROVIDED));
        assert_eq!(doc.client_value("Height"), Some(NOT_PROVIDED));
        assert_eq!(doc.client_value("BMI"), Some(NOT_CALCULATED));
        assert_eq!(doc.client_value("Goals"), None);
        assert_eq!(doc.client_value("Health Issues"), None);

        let table = doc.meal_table().unwrap();
        assert_eq!(table.rows.len(), 6);
        assert!(table.rows.iter().all(|r| r.food == AS_PRESCRIBED));

        let footer = doc.footer().unwrap();
        assert!(footer.notes.is_none());
        assert!(footer.notice[0].contains("valid for 4 weeks"));
    }

    #[test]
    fn test_section_order() {
        let mut record = ClientRecord::new();
        record.foods_to_avoid = "fried food".into();
        let doc = map(&record);

        let kinds: Vec<&str> = doc
            .sections
            .iter()
            .map(|s| match s {
                Section::Header(_) => "header",
                Section::ClientInfo(_) => "client",
                Section::MealTable(_) => "meals",
                Section::Instructions(_) => "instructions",
                Section::FoodsToAvoid(_) => "avoid",
                Section::Footer(_) => "footer",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["header", "client", "meals", "instructions", "avoid", "footer"]
        );
        assert_eq!(doc.foods_to_avoid().unwrap().text, "fried food");
    }

    #[test]
    fn test_meal_rows_fixed_order_and_banding() {
        let mut record = ClientRecord::new();
        record.lunch = "rice+dal".into();
        record.evening_snacks = "sprouts".into();
        let table = map(&record).meal_table().cloned().unwrap();

        let meals: Vec<Meal> = table.rows.iter().map(|r| r.meal).collect();
        assert_eq!(meals, Meal::SCHEDULE.to_vec());
        assert_eq!(table.rows[3].food, "rice+dal");
        assert_eq!(table.rows[4].food, "sprouts");
        assert_eq!(table.rows[2].food, AS_PRESCRIBED);
        assert_eq!(table.rows[0].note, "On empty stomach");
        assert_eq!(table.rows[3].timing(), "Lunch\n(12:00-1:30 PM)");

        let bands: Vec<bool> = table.rows.iter().map(|r| r.banded).collect();
        assert_eq!(bands, vec![false, true, false, true, false, true]);
    }

    #[test]
    fn test_optional_client_rows() {
        let mut record = ClientRecord::new();
        record.complications = "thyroid".into();
        let doc = map(&record);
        assert_eq!(doc.client_value("Health Issues"), Some("thyroid"));
        assert_eq!(doc.client_value("Goals"), None);

        record.goals = "lose fat".into();
        let doc = map(&record);
        let labels: Vec<&str> = doc
            .client_info()
            .unwrap()
            .rows
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["Name", "Age", "Gender", "Height", "BMI", "Health Issues", "Goals"]
        );
    }

    #[test]
    fn test_footer_notes() {
        let mut record = ClientRecord::new();
        record.notes = "review in March".into();
        let footer = map(&record).footer().cloned().unwrap();
        assert_eq!(footer.notes.as_deref(), Some("Additional Notes: review in March"));
        assert_eq!(footer.signature, "Priya");
        assert_eq!(footer.credentials.len(), 2);
    }

    #[test]
    fn test_instructions_are_static() {
        let mut full = ClientRecord::new();
        full.goals = "gain muscle".into();
        let a = map(&ClientRecord::new()).instructions().cloned().unwrap();
        let b = map(&full).instructions().cloned().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.items.len(), 6);
    }

    #[test]
    fn test_header_uses_config() {
        let config = PlanConfig {
            clinic_name: "Green Plate".into(),
            ..PlanConfig::default()
        };
        let doc = map_record(&ClientRecord::new(), &config, date());
        let header = doc.header().unwrap();
        assert_eq!(header.clinic_name, "Green Plate");
        assert_eq!(header.date, "March 5, 2025");
    }
}
