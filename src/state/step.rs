//! Wizard step index

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of steps in the intake wizard
pub const TOTAL_STEPS: u8 = 6;

/// A step number, always within `1..=TOTAL_STEPS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StepIndex(u8);

impl StepIndex {
    pub const FIRST: StepIndex = StepIndex(1);
    pub const LAST: StepIndex = StepIndex(TOTAL_STEPS);

    /// Build a step index, rejecting out-of-range numbers
    pub fn new(number: u8) -> Option<Self> {
        (1..=TOTAL_STEPS).contains(&number).then_some(Self(number))
    }

    /// Build a step index, clamping out-of-range numbers into bounds
    pub const fn clamped(number: u8) -> Self {
        if number < 1 {
            Self::FIRST
        } else if number > TOTAL_STEPS {
            Self::LAST
        } else {
            Self(number)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position, handy for array lookups
    pub fn position(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn prev(self) -> Option<Self> {
        Self::new(self.0.saturating_sub(1))
    }

    pub fn is_first(self) -> bool {
        self == Self::FIRST
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    /// Progress through the wizard as a percentage rounded to the nearest integer
    pub fn progress_percent(self) -> u8 {
        let total = u16::from(TOTAL_STEPS);
        ((u16::from(self.0) * 100 + total / 2) / total) as u8
    }

    /// Iterate every step in order
    pub fn all() -> impl Iterator<Item = StepIndex> {
        (1..=TOTAL_STEPS).map(StepIndex)
    }

    /// Section title shown for the step
    pub fn title(self) -> &'static str {
        match self.0 {
            1 => "Dados Pessoais",
            2 => "Documentação",
            3 => "Endereço",
            4 => "Informações Familiares",
            5 => "Situação Socioeconômica",
            _ => "Benefícios e Documentos",
        }
    }
}

impl Default for StepIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for StepIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("step {value} is outside 1..={TOTAL_STEPS}"))
    }
}

impl From<StepIndex> for u8 {
    fn from(step: StepIndex) -> Self {
        step.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(StepIndex::new(0).is_none());
        assert!(StepIndex::new(7).is_none());
        assert_eq!(StepIndex::new(3).map(StepIndex::get), Some(3));
    }

    #[test]
    fn test_clamped_stays_in_bounds() {
        assert_eq!(StepIndex::clamped(0), StepIndex::FIRST);
        assert_eq!(StepIndex::clamped(42), StepIndex::LAST);
        assert_eq!(StepIndex::clamped(4).get(), 4);
    }

    #[test]
    fn test_next_stops_at_last() {
        assert_eq!(StepIndex::FIRST.next(), StepIndex::new(2));
        assert!(StepIndex::LAST.next().is_none());
    }

    #[test]
    fn test_prev_stops_at_first() {
        assert_eq!(StepIndex::LAST.prev(), StepIndex::new(5));
        assert!(StepIndex::FIRST.prev().is_none());
    }

    #[test]
    fn test_progress_percent_rounds() {
        let percents: Vec<u8> = StepIndex::all().map(StepIndex::progress_percent).collect();
        assert_eq!(percents, vec![17, 33, 50, 67, 83, 100]);
    }

    #[test]
    fn test_all_yields_every_step() {
        assert_eq!(StepIndex::all().count(), TOTAL_STEPS as usize);
    }

    #[test]
    fn test_serde_rejects_invalid_step() {
        assert!(serde_json::from_str::<StepIndex>("9").is_err());
        assert_eq!(
            serde_json::from_str::<StepIndex>("2").ok(),
            StepIndex::new(2)
        );
    }
}
