//! Rendering backends for plan documents.

use std::fmt::Write;

use thiserror::Error;

use super::{PlanDocument, Section};

/// A rendering backend failed to produce output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Render failed: {0}")]
pub struct RenderError(pub String);

/// Turns a document description into file bytes.
pub trait DocumentRenderer {
    /// Render the whole page.
    fn render(&self, document: &PlanDocument) -> Result<Vec<u8>, RenderError>;

    /// MIME type of the rendered output.
    fn mime_type(&self) -> &'static str;

    /// File extension for the rendered output, without the dot.
    fn extension(&self) -> &'static str;
}

/// Plain-text preview of a plan document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl DocumentRenderer for TextRenderer {
    fn render(&self, document: &PlanDocument) -> Result<Vec<u8>, RenderError> {
        Ok(document.to_plain_text().into_bytes())
    }

    fn mime_type(&self) -> &'static str {
        "text/plain;charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

impl PlanDocument {
    /// Render the page as plain text, one section after another.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();

        for section in &self.sections {
            // Writing into a String cannot fail.
            let _ = write_section(&mut out, section);
            out.push('\n');
        }

        out
    }
}

fn write_section(out: &mut String, section: &Section) -> std::fmt::Result {
    match section {
        Section::Header(h) => {
            writeln!(out, "{}", h.clinic_name)?;
            writeln!(out, "{}", h.tagline)?;
            writeln!(out, "{}: {}", h.date_caption, h.date)?;
        }
        Section::ClientInfo(c) => {
            writeln!(out, "{}", c.title.to_uppercase())?;
            for row in &c.rows {
                writeln!(out, "  {}: {}", row.label, row.value)?;
            }
        }
        Section::MealTable(t) => {
            writeln!(out, "{}", t.title.to_uppercase())?;
            writeln!(out, "  {}", t.headers.join(" | "))?;
            for row in &t.rows {
                writeln!(
                    out,
                    "  {} ({}) | {} | {}",
                    row.label, row.time, row.food, row.note
                )?;
            }
        }
        Section::Instructions(l) => {
            writeln!(out, "{}", l.title)?;
            for item in &l.items {
                writeln!(out, "  • {}", item)?;
            }
        }
        Section::FoodsToAvoid(b) => {
            writeln!(out, "{}", b.title)?;
            writeln!(out, "  {}", b.text)?;
        }
        Section::Footer(f) => {
            for line in &f.notice {
                writeln!(out, "{}", line)?;
            }
            if let Some(notes) = &f.notes {
                writeln!(out, "{}", notes)?;
            }
            writeln!(out, "{}", f.signature)?;
            for line in &f.credentials {
                writeln!(out, "{}", line)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanConfig;
    use crate::document::map_record;
    use crate::models::ClientRecord;
    use chrono::NaiveDate;

    #[test]
    fn test_plain_text_contains_sections() {
        let mut record = ClientRecord::new();
        record.name = "Asha".into();
        record.lunch = "rice+dal".into();
        record.foods_to_avoid = "sugar".into();

        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let doc = map_record(&record, &PlanConfig::default(), date);
        let text = doc.to_plain_text();

        assert!(text.starts_with("Holistic Fitness by Priya\n"));
        assert!(text.contains("Diet Plan Created: March 5, 2025"));
        assert!(text.contains("  Name: Asha"));
        assert!(text.contains("  Lunch (12:00-1:30 PM) | rice+dal | Complete meal"));
        assert!(text.contains("  Dinner (8:00-9:00 PM) | As prescribed | Light dinner"));
        assert!(text.contains("Foods to Avoid\n  sugar"));
        assert!(text.contains("valid for 4 weeks"));
    }

    #[test]
    fn test_text_renderer_bytes() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let doc = map_record(&ClientRecord::new(), &PlanConfig::default(), date);
        let bytes = TextRenderer.render(&doc).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), doc.to_plain_text());
    }
}
