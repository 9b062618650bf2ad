//! Form field descriptors

use super::step::StepIndex;
use serde::{Deserialize, Serialize};

/// What kind of input a field holds; decides which mask and rule apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Email,
    /// Plain calendar date (birth date)
    Date,
    /// Document issue date, bounded to 1880..=today
    IssueDate,
    Select,
    Cpf,
    Rg,
    Phone,
    /// Monthly income, displayed as BRL currency
    Currency,
    /// File upload; only the chosen file name travels through the record
    Attachment,
    Hidden,
}

impl FieldKind {
    /// Kinds whose value is checked by a structured rule, not only for presence
    pub fn has_format_rule(self) -> bool {
        matches!(
            self,
            Self::Email
                | Self::Date
                | Self::IssueDate
                | Self::Cpf
                | Self::Rg
                | Self::Phone
                | Self::Currency
                | Self::Attachment
        )
    }

    /// File inputs cannot be rehydrated across sessions
    pub fn is_restorable(self) -> bool {
        !matches!(self, Self::Attachment)
    }
}

/// Derived validity of a field; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldValidity {
    #[default]
    Unvalidated,
    Valid,
    Invalid,
}

impl FieldValidity {
    pub fn from_check(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid
        }
    }
}

/// Static description of one named field in the wizard layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub step: StepIndex,
    pub kind: FieldKind,
    pub required: bool,
    /// Choices for select fields; empty for everything else
    pub options: &'static [&'static str],
}

impl FieldSpec {
    /// Create a field of the given kind
    pub fn new(name: &'static str, label: &'static str, step: StepIndex, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            step,
            kind,
            required: false,
            options: &[],
        }
    }

    /// Create a select field with its choices
    pub fn select(
        name: &'static str,
        label: &'static str,
        step: StepIndex,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            options,
            ..Self::new(name, label, step, FieldKind::Select)
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
