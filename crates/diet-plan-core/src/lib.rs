//! Diet Plan Core Library
//!
//! Client intake validation and diet plan generation for a single
//! practitioner.
//!
//! # Architecture
//!
//! ```text
//! Host form input → FormState::set_field ──► BMI derivation (weight/height)
//!                         │
//!                         ▼
//!                  Schema validation (every edit)
//!                         │
//!                 user action: snapshot
//!                         │
//!         ┌───────────────┼────────────────┐
//!         ▼               ▼                ▼
//!   Document mapper   JSON export      CSV export
//!         │               │                │
//!    Renderer backend     └──── OutputFile ┘
//!         │                        │
//!         └──────── Notifier (success / error) ──► host toasts
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (ClientRecord, Field, Meal)
//! - [`schema`]: Declarative field rules and record validation
//! - [`form`]: Live form state and BMI derivation
//! - [`document`]: Record to plan document mapping and renderers
//! - [`export`]: JSON and CSV export
//! - [`notify`]: Notification relay
//! - [`actions`]: Export/document actions with failure reporting
//! - [`config`]: Branding and plan settings

pub mod actions;
pub mod config;
pub mod document;
pub mod export;
pub mod form;
pub mod models;
pub mod notify;
pub mod schema;

// Re-export commonly used types
pub use actions::{DocumentFlow, OutputFile, PlanActions, PlanError};
pub use config::PlanConfig;
pub use document::{map_record, DocumentRenderer, PlanDocument, RenderError, TextRenderer};
pub use export::{export_csv, export_json, ExportContext, PlanExport};
pub use form::FormState;
pub use models::{ClientRecord, Field, Meal, Sex};
pub use notify::{NotificationKind, Notifier, NotifyOptions};
pub use schema::ValidationReport;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DietPlanError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field is derived and read-only: {0}")]
    ReadOnlyField(String),

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PlanError> for DietPlanError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Invalid(_) => DietPlanError::InvalidForm(e.to_string()),
            PlanError::Serialization(e) => DietPlanError::SerializationError(e.to_string()),
            PlanError::Render(e) => DietPlanError::RenderError(e.0),
        }
    }
}

impl From<serde_json::Error> for DietPlanError {
    fn from(e: serde_json::Error) -> Self {
        DietPlanError::SerializationError(e.to_string())
    }
}

impl From<config::ConfigError> for DietPlanError {
    fn from(e: config::ConfigError) -> Self {
        DietPlanError::ConfigError(e.to_string())
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for DietPlanError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        DietPlanError::RenderError(e.reason)
    }
}

impl<T> From<std::sync::PoisonError<T>> for DietPlanError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DietPlanError::Internal(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Host Callbacks
// =========================================================================

/// Host toast display.
#[uniffi::export(callback_interface)]
pub trait FfiNotifier: Send + Sync {
    fn notify(
        &self,
        kind: FfiNotificationKind,
        message: String,
        duration_ms: u32,
        persistent: bool,
    );
}

/// Host document renderer (e.g. a PDF engine). Receives the document
/// description as JSON and returns the file bytes.
#[uniffi::export(callback_interface)]
pub trait FfiDocumentRenderer: Send + Sync {
    fn render(&self, document_json: String) -> Result<Vec<u8>, DietPlanError>;
}

struct ForeignNotifier<'a>(&'a dyn FfiNotifier);

impl Notifier for ForeignNotifier<'_> {
    fn notify(&self, kind: NotificationKind, message: &str, options: NotifyOptions) {
        self.0.notify(
            kind.into(),
            message.to_string(),
            options.duration_ms,
            options.persistent,
        );
    }
}

struct ForeignRenderer<'a>(&'a dyn FfiDocumentRenderer);

impl DocumentRenderer for ForeignRenderer<'_> {
    fn render(&self, document: &PlanDocument) -> Result<Vec<u8>, RenderError> {
        let json = serde_json::to_string(document).map_err(|e| RenderError(e.to_string()))?;
        self.0.render(json).map_err(|e| RenderError(e.to_string()))
    }

    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Start a new, empty form session with the default branding.
#[uniffi::export]
pub fn new_session() -> Arc<DietPlanSession> {
    Arc::new(DietPlanSession::with_config(PlanConfig::default()))
}

/// Start a new form session with branding read from a JSON config.
#[uniffi::export]
pub fn new_session_with_config(config_json: String) -> Result<Arc<DietPlanSession>, DietPlanError> {
    let config = PlanConfig::from_json(&config_json)?;
    Ok(Arc::new(DietPlanSession::with_config(config)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// One intake form session, shared with the host UI.
#[derive(uniffi::Object)]
pub struct DietPlanSession {
    form: Mutex<FormState>,
    config: PlanConfig,
    notifier: Mutex<Option<Arc<dyn FfiNotifier>>>,
}

impl DietPlanSession {
    fn with_config(config: PlanConfig) -> Self {
        Self {
            form: Mutex::new(FormState::new()),
            config,
            notifier: Mutex::new(None),
        }
    }

    /// Run an action with the registered notifier, or silently without one.
    fn with_actions<T>(
        &self,
        run: impl FnOnce(&PlanActions<'_>, &FormState) -> Result<T, PlanError>,
    ) -> Result<T, DietPlanError> {
        // Neither lock is held while host callbacks run.
        let form = self.form.lock()?.clone();
        let notifier = self.notifier.lock()?.clone();

        let result = match notifier.as_deref() {
            Some(foreign) => {
                let relay = ForeignNotifier(foreign);
                let actions = PlanActions::new(&relay).with_config(self.config.clone());
                run(&actions, &form)
            }
            None => {
                let actions =
                    PlanActions::new(&notify::SilentNotifier).with_config(self.config.clone());
                run(&actions, &form)
            }
        };

        Ok(result?)
    }
}

#[uniffi::export]
impl DietPlanSession {
    // =========================================================================
    // Form Operations
    // =========================================================================

    /// Register the host's toast display.
    pub fn set_notifier(&self, notifier: Box<dyn FfiNotifier>) -> Result<(), DietPlanError> {
        *self.notifier.lock()? = Some(Arc::from(notifier));
        Ok(())
    }

    /// Set a field by its form key (e.g. "earlyMorning"). `bmi` is derived
    /// from weight and height and can't be set.
    pub fn set_field(&self, key: String, value: String) -> Result<(), DietPlanError> {
        let field =
            Field::from_key(&key).ok_or_else(|| DietPlanError::UnknownField(key.clone()))?;
        if !field.is_user_input() {
            return Err(DietPlanError::ReadOnlyField(key));
        }
        self.form.lock()?.set_field(field, value);
        Ok(())
    }

    /// Current value of a field.
    pub fn value(&self, key: String) -> Result<String, DietPlanError> {
        let field = Field::from_key(&key).ok_or(DietPlanError::UnknownField(key))?;
        Ok(self.form.lock()?.value(field).to_string())
    }

    /// Clear the form. Does nothing on a pristine form.
    pub fn reset(&self) -> Result<(), DietPlanError> {
        self.form.lock()?.reset();
        Ok(())
    }

    /// Form status for enabling controls and showing inline errors.
    pub fn status(&self) -> Result<FfiFormStatus, DietPlanError> {
        let form = self.form.lock()?;
        Ok(FfiFormStatus {
            is_valid: form.is_valid(),
            is_dirty: form.is_dirty(),
            can_reset: form.can_reset(),
            can_generate: form.can_generate(),
            message: form.status_message().map(str::to_string),
            errors: form
                .report()
                .map(|report| {
                    report
                        .errors()
                        .map(|(field, message)| FfiFieldError {
                            field: field.key().to_string(),
                            message: message.to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Current record as JSON (camelCase keys).
    pub fn snapshot_json(&self) -> Result<String, DietPlanError> {
        let record = self.form.lock()?.snapshot();
        Ok(serde_json::to_string(&record)?)
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export the record as a JSON file.
    pub fn export_json(&self) -> Result<FfiOutputFile, DietPlanError> {
        self.with_actions(|actions, form| actions.export_json(form))
            .map(Into::into)
    }

    /// Export the record as a CSV file.
    pub fn export_csv(&self) -> Result<FfiOutputFile, DietPlanError> {
        self.with_actions(|actions, form| actions.export_csv(form))
            .map(Into::into)
    }

    /// Plan document description as JSON, for a host-side renderer.
    pub fn document_json(&self) -> Result<String, DietPlanError> {
        let record = self.form.lock()?.snapshot();
        let document = document::map_record_today(&record, &self.config);
        Ok(serde_json::to_string(&document)?)
    }

    /// Render the plan through the host's renderer.
    pub fn generate_document(
        &self,
        renderer: Box<dyn FfiDocumentRenderer>,
        preview: bool,
    ) -> Result<FfiOutputFile, DietPlanError> {
        let flow = if preview {
            DocumentFlow::Preview
        } else {
            DocumentFlow::Download
        };
        let backend = ForeignRenderer(renderer.as_ref());
        self.with_actions(|actions, form| actions.generate_document(form, &backend, flow))
            .map(Into::into)
    }

    /// Plain-text preview of the plan.
    pub fn preview_text(&self) -> Result<String, DietPlanError> {
        let record = self.form.lock()?.snapshot();
        Ok(document::map_record_today(&record, &self.config).to_plain_text())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiNotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl From<NotificationKind> for FfiNotificationKind {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Success => FfiNotificationKind::Success,
            NotificationKind::Error => FfiNotificationKind::Error,
            NotificationKind::Warning => FfiNotificationKind::Warning,
            NotificationKind::Info => FfiNotificationKind::Info,
        }
    }
}

/// FFI-safe field error.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiFieldError {
    pub field: String,
    pub message: String,
}

/// FFI-safe form status.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiFormStatus {
    pub is_valid: bool,
    pub is_dirty: bool,
    pub can_reset: bool,
    pub can_generate: bool,
    pub message: Option<String>,
    pub errors: Vec<FfiFieldError>,
}

/// FFI-safe output file.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiOutputFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

impl From<OutputFile> for FfiOutputFile {
    fn from(file: OutputFile) -> Self {
        Self {
            file_name: file.file_name,
            mime_type: file.mime_type,
            contents: file.contents,
        }
    }
}
