//! Export and document actions triggered from the form.
//!
//! This is the boundary where failures are caught: each action snapshots the
//! form, produces an [`OutputFile`] or an error, and reports the outcome
//! through the [`Notifier`]. The form itself is never modified.

use chrono::{DateTime, Local, NaiveDate, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::PlanConfig;
use crate::document::{map_record, DocumentRenderer, RenderError};
use crate::export::{export_csv, export_json, iso_date, ExportContext};
use crate::form::FormState;
use crate::models::ClientRecord;
use crate::notify::{NotificationKind, Notifier, NotifyOptions};
use crate::schema;

/// Action errors.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Form has {0} invalid field(s)")]
    Invalid(usize),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type PlanResult<T> = Result<T, PlanError>;

/// A generated file, ready for the host to save or preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

impl OutputFile {
    /// Contents as text, when they are valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }
}

/// Which document flow produced the file; they differ only in the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFlow {
    /// Direct download from the form: `<name>-diet-chart.<ext>`
    Download,
    /// Download from the preview dialog: `<name>-diet-plan-<date>.<ext>`
    Preview,
}

/// File name stem from the client name, `client` when blank.
pub fn file_stem(record: &ClientRecord) -> String {
    if record.name.is_empty() {
        "client".to_string()
    } else {
        record.name.replace(['/', '\\'], "-")
    }
}

/// `<name>-diet-plan-<YYYY-MM-DD>.<extension>`
pub fn dated_file_name(record: &ClientRecord, date: NaiveDate, extension: &str) -> String {
    format!("{}-diet-plan-{}.{}", file_stem(record), iso_date(date), extension)
}

/// `<name>-diet-chart.<extension>`
pub fn chart_file_name(record: &ClientRecord, extension: &str) -> String {
    format!("{}-diet-chart.{}", file_stem(record), extension)
}

/// Runs exports and document generation for a form.
pub struct PlanActions<'a> {
    notifier: &'a dyn Notifier,
    config: PlanConfig,
    fixed_time: Option<DateTime<Utc>>,
}

impl<'a> PlanActions<'a> {
    /// Create actions reporting to `notifier`, with the default config.
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self {
            notifier,
            config: PlanConfig::default(),
            fixed_time: None,
        }
    }

    /// Use a specific configuration.
    pub fn with_config(mut self, config: PlanConfig) -> Self {
        self.config = config;
        self
    }

    /// Stamp every output with a fixed time instead of the system clock.
    pub fn with_fixed_time(mut self, at: DateTime<Utc>) -> Self {
        self.fixed_time = Some(at);
        self
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    fn context(&self) -> ExportContext {
        match self.fixed_time {
            Some(at) => ExportContext::at(at, self.config.clone()),
            None => ExportContext::now(self.config.clone()),
        }
    }

    fn document_date(&self) -> NaiveDate {
        match self.fixed_time {
            Some(at) => at.date_naive(),
            None => Local::now().date_naive(),
        }
    }

    fn notify(&self, kind: NotificationKind, message: &str, duration_ms: u32) {
        self.notifier
            .notify(kind, message, NotifyOptions::duration(duration_ms));
    }

    /// Snapshot the form, refusing when it can't be submitted.
    fn snapshot(&self, form: &FormState) -> PlanResult<ClientRecord> {
        let record = form.snapshot();
        if !form.can_generate() {
            let failing = schema::validate(&record).error_count();
            warn!(failing, "refusing to export an invalid form");
            return Err(PlanError::Invalid(failing));
        }
        Ok(record)
    }

    /// Export the form as a JSON file.
    pub fn export_json(&self, form: &FormState) -> PlanResult<OutputFile> {
        let record = self.snapshot(form)?;
        self.notify(NotificationKind::Info, "Preparing JSON export...", 2000);

        let ctx = self.context();
        match export_json(&record, &ctx) {
            Ok(json) => {
                let file = OutputFile {
                    file_name: dated_file_name(&record, ctx.valid_from(), "json"),
                    mime_type: "application/json".to_string(),
                    contents: json.into_bytes(),
                };
                info!(file = %file.file_name, "exported JSON");
                self.notify(
                    NotificationKind::Success,
                    "JSON export completed successfully!",
                    4000,
                );
                Ok(file)
            }
            Err(e) => {
                error!(error = %e, "JSON export failed");
                self.notify(
                    NotificationKind::Error,
                    "Failed to export JSON. Please try again.",
                    5000,
                );
                Err(e.into())
            }
        }
    }

    /// Export the form as a CSV file.
    pub fn export_csv(&self, form: &FormState) -> PlanResult<OutputFile> {
        let record = self.snapshot(form)?;
        self.notify(NotificationKind::Info, "Preparing CSV export...", 2000);

        let ctx = self.context();
        let csv = export_csv(&record, &ctx);
        let file = OutputFile {
            file_name: dated_file_name(&record, ctx.valid_from(), "csv"),
            mime_type: "text/csv;charset=utf-8;".to_string(),
            contents: csv.into_bytes(),
        };
        info!(file = %file.file_name, "exported CSV");
        self.notify(NotificationKind::Success, "CSV export completed successfully!", 4000);
        Ok(file)
    }

    /// Map the form onto the plan document and render it.
    pub fn generate_document(
        &self,
        form: &FormState,
        renderer: &dyn DocumentRenderer,
        flow: DocumentFlow,
    ) -> PlanResult<OutputFile> {
        let record = self.snapshot(form)?;
        self.notify(NotificationKind::Success, "PDF generation started...", 2000);

        let date = self.document_date();
        let document = map_record(&record, &self.config, date);

        match renderer.render(&document) {
            Ok(contents) => {
                let extension = renderer.extension();
                let file_name = match flow {
                    DocumentFlow::Download => chart_file_name(&record, extension),
                    DocumentFlow::Preview => {
                        dated_file_name(&record, self.context().valid_from(), extension)
                    }
                };
                info!(file = %file_name, bytes = contents.len(), "rendered plan document");
                self.notify(NotificationKind::Success, "PDF downloaded successfully!", 4000);
                Ok(OutputFile {
                    file_name,
                    mime_type: renderer.mime_type().to_string(),
                    contents,
                })
            }
            Err(e) => {
                error!(error = %e, "document rendering failed");
                self.notify(
                    NotificationKind::Error,
                    "Failed to generate PDF. Please try again.",
                    5000,
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{PlanDocument, TextRenderer};
    use crate::models::Field;
    use crate::notify::RecordingNotifier;
    use chrono::TimeZone;

    struct FailingRenderer;

    impl DocumentRenderer for FailingRenderer {
        fn render(&self, _: &PlanDocument) -> Result<Vec<u8>, RenderError> {
            Err(RenderError("font missing".into()))
        }

        fn mime_type(&self) -> &'static str {
            "application/pdf"
        }

        fn extension(&self) -> &'static str {
            "pdf"
        }
    }

    fn valid_form() -> FormState {
        let mut form = FormState::new();
        for (field, value) in [
            (Field::Name, "Asha"),
            (Field::Age, "30"),
            (Field::Sex, "female"),
            (Field::Height, "160"),
            (Field::Weight, "55"),
            (Field::Goals, "lose fat"),
            (Field::EarlyMorning, "water"),
            (Field::Breakfast, "oats"),
            (Field::Lunch, "rice+dal"),
            (Field::Dinner, "soup"),
        ] {
            form.set_field(field, value);
        }
        form
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 5, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_file_names() {
        let mut record = ClientRecord::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(chart_file_name(&record, "pdf"), "client-diet-chart.pdf");
        assert_eq!(dated_file_name(&record, date, "csv"), "client-diet-plan-2025-03-05.csv");

        record.name = "Asha Rao".into();
        assert_eq!(chart_file_name(&record, "pdf"), "Asha Rao-diet-chart.pdf");
        assert_eq!(dated_file_name(&record, date, "json"), "Asha Rao-diet-plan-2025-03-05.json");

        record.name = "a/b".into();
        assert_eq!(file_stem(&record), "a-b");
    }

    #[test]
    fn test_export_json_notifies() {
        let notifier = RecordingNotifier::new();
        let actions = PlanActions::new(&notifier).with_fixed_time(at());

        let file = actions.export_json(&valid_form()).unwrap();
        assert_eq!(file.file_name, "Asha-diet-plan-2025-03-05.json");
        assert_eq!(file.mime_type, "application/json");
        assert!(file.as_text().unwrap().contains("\"clientId\": \"asha\""));

        let received = notifier.take();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].kind, NotificationKind::Info);
        assert_eq!(received[0].options.duration_ms, 2000);
        assert_eq!(received[1].kind, NotificationKind::Success);
        assert_eq!(received[1].message, "JSON export completed successfully!");
    }

    #[test]
    fn test_export_csv() {
        let notifier = RecordingNotifier::new();
        let actions = PlanActions::new(&notifier).with_fixed_time(at());

        let file = actions.export_csv(&valid_form()).unwrap();
        assert_eq!(file.file_name, "Asha-diet-plan-2025-03-05.csv");
        assert!(file.as_text().unwrap().contains("Lunch,12:00-1:30 PM,rice+dal,Complete meal"));
        assert_eq!(notifier.take().len(), 2);
    }

    #[test]
    fn test_invalid_form_is_refused_without_output() {
        let notifier = RecordingNotifier::new();
        let actions = PlanActions::new(&notifier);

        let mut form = valid_form();
        form.set_field(Field::Dinner, "");

        assert!(matches!(actions.export_json(&form), Err(PlanError::Invalid(1))));
        assert!(matches!(actions.export_csv(&form), Err(PlanError::Invalid(1))));
        assert!(matches!(
            actions.generate_document(&form, &TextRenderer, DocumentFlow::Download),
            Err(PlanError::Invalid(1))
        ));
        assert!(notifier.take().is_empty());
    }

    #[test]
    fn test_generate_document() {
        let notifier = RecordingNotifier::new();
        let actions = PlanActions::new(&notifier).with_fixed_time(at());
        let form = valid_form();

        let file = actions
            .generate_document(&form, &TextRenderer, DocumentFlow::Download)
            .unwrap();
        assert_eq!(file.file_name, "Asha-diet-chart.txt");
        assert!(file.as_text().unwrap().contains("March 5, 2025"));

        let file = actions
            .generate_document(&form, &TextRenderer, DocumentFlow::Preview)
            .unwrap();
        assert_eq!(file.file_name, "Asha-diet-plan-2025-03-05.txt");

        let messages: Vec<String> = notifier.take().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "PDF generation started...",
                "PDF downloaded successfully!",
                "PDF generation started...",
                "PDF downloaded successfully!",
            ]
        );
    }

    #[test]
    fn test_preview_name_uses_export_date() {
        let notifier = RecordingNotifier::new();
        let late = Utc.with_ymd_and_hms(2025, 3, 5, 23, 30, 0).unwrap();
        let actions = PlanActions::new(&notifier).with_fixed_time(late);
        let form = valid_form();

        let preview = actions
            .generate_document(&form, &TextRenderer, DocumentFlow::Preview)
            .unwrap();
        let json = actions.export_json(&form).unwrap();
        assert_eq!(preview.file_name, "Asha-diet-plan-2025-03-05.txt");
        assert_eq!(json.file_name, "Asha-diet-plan-2025-03-05.json");
    }

    #[test]
    fn test_render_failure_is_reported() {
        let notifier = RecordingNotifier::new();
        let actions = PlanActions::new(&notifier);
        let form = valid_form();
        let before = form.snapshot();

        let result = actions.generate_document(&form, &FailingRenderer, DocumentFlow::Download);
        assert!(matches!(result, Err(PlanError::Render(_))));
        assert_eq!(form.snapshot(), before);

        let received = notifier.take();
        let last = received.last().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert_eq!(last.message, "Failed to generate PDF. Please try again.");
        assert_eq!(last.options.duration_ms, 5000);
    }
}
