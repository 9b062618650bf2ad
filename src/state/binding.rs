//! Conditional field bindings
//!
//! A binding ties a dependent field's enabled/required state to the current
//! value of a trigger field. The enabled values are configuration: copies of
//! the intake form disagree on whether "yes" is spelled `Sim` or `def-sim`.

use serde::{Deserialize, Serialize};

/// Trigger field, dependent field and the trigger values that enable the dependent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalFieldBinding {
    pub trigger: String,
    pub dependent: String,
    pub enabled_values: Vec<String>,
}

impl ConditionalFieldBinding {
    pub fn new<I, S>(trigger: &str, dependent: &str, enabled_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            trigger: trigger.to_string(),
            dependent: dependent.to_string(),
            enabled_values: enabled_values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the dependent is enabled for this trigger value
    pub fn enables(&self, trigger_value: &str) -> bool {
        let value = trigger_value.trim();
        !value.is_empty() && self.enabled_values.iter().any(|v| v == value)
    }
}

/// Default "yes" spellings for the disability trigger
pub const DISABILITY_YES_VALUES: &[&str] = &["Sim", "def-sim"];
/// Default "yes" spellings for the medical report trigger
pub const REPORT_YES_VALUES: &[&str] = &["Sim", "laudo-sim"];

/// Bindings of the CRAS intake form with the default enabled values
pub fn cras_bindings() -> Vec<ConditionalFieldBinding> {
    vec![
        ConditionalFieldBinding::new(
            "deficiente",
            "deficiencia",
            DISABILITY_YES_VALUES.iter().copied(),
        ),
        ConditionalFieldBinding::new("laudo", "observacao", REPORT_YES_VALUES.iter().copied()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enables_on_any_configured_value() {
        let binding = ConditionalFieldBinding::new("deficiente", "deficiencia", ["Sim", "def-sim"]);
        assert!(binding.enables("Sim"));
        assert!(binding.enables("def-sim"));
        assert!(!binding.enables("Não"));
        assert!(!binding.enables(""));
    }

    #[test]
    fn test_enables_ignores_surrounding_whitespace() {
        let binding = ConditionalFieldBinding::new("laudo", "observacao", ["Sim"]);
        assert!(binding.enables(" Sim "));
    }

    #[test]
    fn test_cras_bindings_cover_both_pairs() {
        let bindings = cras_bindings();
        let pairs: Vec<(&str, &str)> = bindings
            .iter()
            .map(|b| (b.trigger.as_str(), b.dependent.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("deficiente", "deficiencia"), ("laudo", "observacao")]
        );
    }
}
