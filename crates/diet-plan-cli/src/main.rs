use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use diet_plan_core::notify::LogNotifier;
use diet_plan_core::{
    ClientRecord, DocumentFlow, Field, FormState, OutputFile, PlanActions, PlanConfig,
    TextRenderer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "diet-plan")]
#[command(about = "Validate client intake records and produce diet plan files")]
struct Cli {
    /// Branding config (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a record against the intake form rules
    Validate {
        /// Client record (JSON, camelCase keys)
        record: PathBuf,
    },
    /// Export a record as JSON or CSV
    Export {
        /// Client record (JSON, camelCase keys)
        record: PathBuf,
        #[arg(long, value_enum)]
        format: ExportFormat,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Write a plain-text preview of the plan document
    Preview {
        /// Client record (JSON, camelCase keys)
        record: PathBuf,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Use the dated preview file name instead of the chart name
        #[arg(long)]
        dated: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Csv,
}

/// Replay a stored record into a fresh form, as if typed in.
///
/// BMI is skipped so it is always derived from weight and height.
fn load_form(path: &Path) -> anyhow::Result<FormState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading record {}", path.display()))?;
    let record = ClientRecord::from_json(&json)
        .with_context(|| format!("parsing record {}", path.display()))?;

    let mut form = FormState::new();
    for field in Field::ALL.into_iter().filter(|f| f.is_user_input()) {
        form.set_field(field, record.get(field));
    }
    Ok(form)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PlanConfig> {
    match path {
        Some(path) => PlanConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(PlanConfig::default()),
    }
}

fn write_output(out_dir: &Path, file: &OutputFile) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(&file.file_name);
    std::fs::write(&path, &file.contents)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = file.contents.len(), "wrote output");
    Ok(path)
}

fn ensure_valid(form: &FormState) -> anyhow::Result<()> {
    if form.is_valid() {
        return Ok(());
    }
    if let Some(report) = form.report() {
        for (field, message) in report.errors() {
            eprintln!("  {}: {}", field, message);
        }
    }
    bail!("record is not valid")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("diet_plan=info".parse()?)
                .add_directive("diet_plan_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let notifier = LogNotifier;
    let actions = PlanActions::new(&notifier).with_config(config);

    match cli.command {
        Commands::Validate { record } => {
            let form = load_form(&record)?;
            ensure_valid(&form)?;
            println!("Record is valid. BMI: {}", form.value(Field::Bmi));
        }
        Commands::Export {
            record,
            format,
            out_dir,
        } => {
            let form = load_form(&record)?;
            ensure_valid(&form)?;
            let file = match format {
                ExportFormat::Json => actions.export_json(&form)?,
                ExportFormat::Csv => actions.export_csv(&form)?,
            };
            let path = write_output(&out_dir, &file)?;
            println!("{}", path.display());
        }
        Commands::Preview {
            record,
            out_dir,
            dated,
        } => {
            let form = load_form(&record)?;
            ensure_valid(&form)?;
            let flow = if dated {
                DocumentFlow::Preview
            } else {
                DocumentFlow::Download
            };
            let file = actions.generate_document(&form, &TextRenderer, flow)?;
            let path = write_output(&out_dir, &file)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASHA: &str = r#"{
        "name": "Asha", "age": "30", "sex": "female", "height": "160", "weight": "55",
        "bmi": "99.0", "goals": "lose fat", "earlyMorning": "water", "breakfast": "oats",
        "lunch": "rice+dal", "dinner": "soup"
    }"#;

    #[test]
    fn test_load_form_derives_bmi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asha.json");
        std::fs::write(&path, ASHA).unwrap();

        let form = load_form(&path).unwrap();
        assert!(form.is_valid());
        assert_eq!(form.value(Field::Bmi), "21.5");
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asha.json");
        std::fs::write(&path, ASHA).unwrap();

        let form = load_form(&path).unwrap();
        let notifier = LogNotifier;
        let actions = PlanActions::new(&notifier);
        let file = actions.export_csv(&form).unwrap();

        let written = write_output(&dir.path().join("out"), &file).unwrap();
        assert!(written.ends_with(&file.file_name));
        let csv = std::fs::read_to_string(written).unwrap();
        assert!(csv.starts_with("SECTION,CLIENT INFORMATION"));
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "{}").unwrap();

        let form = load_form(&path).unwrap();
        assert!(ensure_valid(&form).is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "diet-plan",
            "export",
            "asha.json",
            "--format",
            "csv",
            "--config",
            "brand.json",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("brand.json")));
        assert!(matches!(
            cli.command,
            Commands::Export {
                format: ExportFormat::Csv,
                ..
            }
        ));
    }
}
