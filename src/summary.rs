//! Review summary and JSON export of the working record

use crate::format::{decimal_to_cents, format_currency, normalize_decimal};
use crate::state::{ConditionalFieldBinding, FieldKind, FormLayout, FormRecord, StepIndex};
use crate::validate::parse_form_date;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};
use std::path::Path;

pub const NOT_INFORMED: &str = "Não informado";
pub const FORM_VERSION: &str = "1.0";

/// One labelled value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// Rows of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub step: StepIndex,
    pub title: &'static str,
    pub rows: Vec<SummaryRow>,
}

/// Human-readable view of a record, one section per step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub sections: Vec<SummarySection>,
}

fn display_date(value: &str) -> String {
    parse_form_date(value)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

fn display_income(value: &str) -> String {
    if value.trim().is_empty() {
        return "R$ 0,00".to_string();
    }
    decimal_to_cents(&normalize_decimal(value))
        .map(|cents| format_currency(&cents))
        .unwrap_or_else(|| value.to_string())
}

fn display_attachment(value: &str) -> String {
    Path::new(value)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| value.to_string())
}

impl Summary {
    pub fn from_record(
        record: &FormRecord,
        layout: &FormLayout,
        bindings: &[ConditionalFieldBinding],
    ) -> Self {
        let hidden_dependent = |name: &str| {
            bindings
                .iter()
                .any(|b| b.dependent == name && !b.enables(record.value(&b.trigger)))
        };

        let sections = StepIndex::all()
            .map(|step| {
                let rows = layout
                    .fields_in(step)
                    .filter(|spec| !hidden_dependent(spec.name))
                    .map(|spec| {
                        let raw = record.value(spec.name).trim();
                        let trigger = bindings.iter().find(|b| b.trigger == spec.name);
                        let value = match spec.kind {
                            FieldKind::Currency => display_income(raw),
                            _ if raw.is_empty() => NOT_INFORMED.to_string(),
                            FieldKind::Date | FieldKind::IssueDate => display_date(raw),
                            FieldKind::Attachment => display_attachment(raw),
                            _ => match trigger {
                                Some(b) if b.enables(raw) => "Sim".to_string(),
                                Some(_) => "Não".to_string(),
                                None => raw.to_string(),
                            },
                        };
                        SummaryRow {
                            label: spec.label,
                            value,
                        }
                    })
                    .collect();
                SummarySection {
                    step,
                    title: step.title(),
                    rows,
                }
            })
            .collect();

        Self { sections }
    }

    /// Plain-text rendering, one `label: value` line per row
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&format!("{}. {}\n", section.step, section.title));
            for row in &section.rows {
                out.push_str(&format!("  {}: {}\n", row.label, row.value));
            }
        }
        out
    }
}

/// Pretty JSON of the record stamped with fill time and form version
pub fn export_json<Tz>(record: &FormRecord, now: DateTime<Tz>) -> serde_json::Result<String>
where
    Tz: TimeZone,
{
    let mut object = Map::new();
    for (name, value) in record.iter() {
        object.insert(name.to_string(), Value::String(value.to_string()));
    }
    object.insert(
        "dataPreenchimento".to_string(),
        Value::String(
            now.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
    );
    object.insert(
        "versaoFormulario".to_string(),
        Value::String(FORM_VERSION.to_string()),
    );
    serde_json::to_string_pretty(&Value::Object(object))
}

/// `ficha-cras-<name>.json`; every run of characters other than letters and
/// digits becomes one dash, so the name can never leave the target directory
pub fn export_file_name(record: &FormRecord) -> String {
    let slug = record
        .get("nome")
        .map(|nome| {
            nome.to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("-")
        })
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| "dados".to_string());
    format!("ficha-cras-{slug}.json")
}
