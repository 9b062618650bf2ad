//! Step controller
//!
//! Owns the current step and the working record, gates navigation on field
//! validity, keeps conditional fields in sync with their triggers, and
//! autosaves after every edit.

use crate::format::{format_currency, format_for, unformat_currency};
use crate::state::{
    cras_bindings, ConditionalFieldBinding, FieldKind, FieldValidity, FormLayout, FormRecord,
    StepIndex, TOKEN_FIELD,
};
use crate::storage::{KeyValueStore, Persistence};
use crate::token::TokenTransport;
use crate::validate::{check_field, is_pdf_attachment, INVALID_FIELD_MESSAGE, PDF_ONLY_MESSAGE};
use crate::view::{ForwardAction, FormView, NavigationState, Progress, StepStatus};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Navigation and data state of one wizard session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: StepIndex,
    pub record: FormRecord,
    pub completed: BTreeSet<StepIndex>,
    pub attempted: BTreeSet<StepIndex>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: StepIndex::FIRST,
            record: FormRecord::new(),
            completed: BTreeSet::new(),
            attempted: BTreeSet::new(),
        }
    }
}

impl WizardState {
    pub fn status_of(&self, step: StepIndex) -> StepStatus {
        if self.completed.contains(&step) {
            StepStatus::Completed
        } else if self.attempted.contains(&step) {
            StepStatus::Attempted
        } else {
            StepStatus::Pending
        }
    }
}

/// Result of pressing the forward control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to this step
    Moved(StepIndex),
    /// The step has invalid fields; focus went to the first one
    Blocked { first_invalid: Option<String> },
    /// The form was handed to the native submission
    Submitted,
    /// Fields were valid but no usable token could be obtained
    Aborted,
}

/// The multi-step wizard
pub struct Wizard<V: FormView, S: KeyValueStore> {
    pub(super) view: V,
    pub(super) persistence: Persistence<S>,
    pub(super) transport: Box<dyn TokenTransport>,
    pub(super) layout: FormLayout,
    pub(super) bindings: Vec<ConditionalFieldBinding>,
    pub(super) state: WizardState,
    today: Option<NaiveDate>,
}

impl<V: FormView, S: KeyValueStore> Wizard<V, S> {
    /// Create a wizard over the CRAS layout with the default bindings
    pub fn new(view: V, store: S, transport: Box<dyn TokenTransport>) -> Self {
        Self {
            view,
            persistence: Persistence::new(store),
            transport,
            layout: FormLayout::cras(),
            bindings: cras_bindings(),
            state: WizardState::default(),
            today: None,
        }
    }

    pub fn with_bindings(mut self, bindings: Vec<ConditionalFieldBinding>) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_layout(mut self, layout: FormLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Pin the date used by the issue-date rule
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> StepIndex {
        self.state.step
    }

    pub fn record(&self) -> &FormRecord {
        &self.state.record
    }

    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    pub fn bindings(&self) -> &[ConditionalFieldBinding] {
        &self.bindings
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Restore saved data, wire conditional fields and show step 1
    pub fn start(&mut self) {
        self.restore();
        self.apply_bindings();
        self.capture();
        self.state.step = StepIndex::FIRST;
        self.render();
    }

    /// Replay the saved snapshot into the view; returns how many fields were filled
    pub fn restore(&mut self) -> usize {
        let Some(saved) = self.persistence.load() else {
            return 0;
        };
        let mut restored = 0;
        for (name, value) in saved.iter() {
            let restorable = self
                .layout
                .kind_of(name)
                .is_some_and(|kind| kind.is_restorable());
            if !restorable || !self.view.has_field(name) {
                continue;
            }
            self.view.set_value(name, value);
            restored += 1;
        }
        self.capture();
        tracing::debug!(restored, "restored saved form data");
        restored
    }

    /// Rebuild the working record from the enabled layout fields in the view
    pub fn capture(&mut self) {
        let mut record = FormRecord::new();
        for spec in self.layout.fields() {
            if !self.view.is_enabled(spec.name) {
                continue;
            }
            if let Some(value) = self.view.value(spec.name) {
                record.set(spec.name, value);
            }
        }
        self.state.record = record;
    }

    /// Capture and persist the whole record; storage failures are logged only
    pub fn autosave(&mut self) {
        self.capture();
        if let Err(err) = self.persistence.save(&self.state.record) {
            tracing::warn!(error = %err, "autosave failed");
        }
    }

    /// Typing in a field: mask it, save, refresh the forward control
    pub fn on_input(&mut self, name: &str, raw: &str) {
        if name == TOKEN_FIELD {
            return;
        }
        let value = self
            .layout
            .kind_of(name)
            .and_then(|kind| format_for(kind, raw))
            .unwrap_or_else(|| raw.to_string());
        self.view.set_value(name, &value);
        self.autosave();
        self.refresh_forward();
    }

    /// A committed change (select pick, file chosen, date set)
    pub fn on_change(&mut self, name: &str, value: &str) {
        if name == TOKEN_FIELD {
            return;
        }
        let kind = self.layout.kind_of(name);
        let value = kind
            .and_then(|kind| format_for(kind, value))
            .unwrap_or_else(|| value.to_string());
        self.view.set_value(name, &value);

        if kind == Some(FieldKind::Attachment)
            && !value.trim().is_empty()
            && !is_pdf_attachment(&value)
        {
            self.view.set_value(name, "");
            self.view.set_validity(name, FieldValidity::Invalid);
            self.view.set_error_message(name, Some(PDF_ONLY_MESSAGE));
        } else {
            self.validate_field(name);
        }

        let triggered: Vec<ConditionalFieldBinding> = self
            .bindings
            .iter()
            .filter(|b| b.trigger == name)
            .cloned()
            .collect();
        for binding in &triggered {
            self.apply_binding(binding);
        }

        self.autosave();
        self.refresh_forward();
    }

    pub fn on_blur(&mut self, name: &str) {
        if self.layout.kind_of(name) == Some(FieldKind::Currency) {
            let shown = self.view.value(name).unwrap_or_default();
            self.view.set_value(name, &format_currency(&shown));
        }
        self.validate_field(name);
        self.autosave();
        self.refresh_forward();
    }

    /// Entering a currency field swaps the mask for a plain editable amount
    pub fn on_focus(&mut self, name: &str) {
        if self.layout.kind_of(name) == Some(FieldKind::Currency) {
            let shown = self.view.value(name).unwrap_or_default();
            self.view.set_value(name, &unformat_currency(&shown));
        }
    }

    fn field_passes(&self, name: &str) -> bool {
        let Some(spec) = self.layout.field(name) else {
            return true;
        };
        check_field(
            spec.kind,
            &self.view.value(name).unwrap_or_default(),
            self.view.is_required(name),
            self.view.is_enabled(name),
            self.today(),
        )
    }

    /// Check one field and mark the outcome on the view
    pub fn validate_field(&mut self, name: &str) -> bool {
        if self.layout.field(name).is_none() {
            return true;
        }
        if !self.view.is_enabled(name) {
            self.view.set_validity(name, FieldValidity::Unvalidated);
            self.view.set_error_message(name, None);
            return true;
        }
        let valid = self.field_passes(name);
        self.view.set_validity(name, FieldValidity::from_check(valid));
        let message = if valid {
            None
        } else if self.layout.kind_of(name) == Some(FieldKind::Attachment)
            && !self.view.value(name).unwrap_or_default().trim().is_empty()
        {
            Some(PDF_ONLY_MESSAGE)
        } else {
            Some(INVALID_FIELD_MESSAGE)
        };
        self.view.set_error_message(name, message);
        valid
    }

    /// Required and enabled fields of a step; optional ones are only marked on blur
    fn gated_names(&self, step: StepIndex) -> Vec<&'static str> {
        self.layout
            .fields_in(step)
            .map(|f| f.name)
            .filter(|name| self.view.is_required(name) && self.view.is_enabled(name))
            .collect()
    }

    /// Validate the required fields of a step; `Err` names the first invalid one
    pub fn validate_step(&mut self, step: StepIndex) -> Result<(), String> {
        let mut first_invalid = None;
        for name in self.gated_names(step) {
            if !self.validate_field(name) && first_invalid.is_none() {
                first_invalid = Some(name.to_string());
            }
        }
        match first_invalid {
            Some(name) => Err(name),
            None => Ok(()),
        }
    }

    /// Whether every required field of a step passes, without touching markers
    pub fn step_is_satisfied(&self, step: StepIndex) -> bool {
        self.gated_names(step)
            .into_iter()
            .all(|name| self.field_passes(name))
    }

    /// Last-step gate: the step rules plus every active binding dependent on it
    /// holding a value
    pub fn final_gate(&mut self) -> Result<(), String> {
        let step_result = self.validate_step(StepIndex::LAST);

        let mut first_missing = None;
        for binding in &self.bindings {
            let in_last_step = self
                .layout
                .field(&binding.dependent)
                .is_some_and(|f| f.step == StepIndex::LAST);
            if !in_last_step {
                continue;
            }
            let trigger = self.view.value(&binding.trigger).unwrap_or_default();
            let dependent = self.view.value(&binding.dependent).unwrap_or_default();
            if binding.enables(&trigger) && dependent.trim().is_empty() {
                self.view.set_validity(&binding.dependent, FieldValidity::Invalid);
                self.view.set_error_message(&binding.dependent, Some(INVALID_FIELD_MESSAGE));
                first_missing.get_or_insert_with(|| binding.dependent.clone());
            }
        }

        match (step_result, first_missing) {
            (Err(name), _) | (Ok(()), Some(name)) => Err(name),
            (Ok(()), None) => Ok(()),
        }
    }

    pub(super) fn block(&mut self, first_invalid: Option<String>) -> Transition {
        self.state.attempted.insert(self.state.step);
        if let Some(name) = &first_invalid {
            self.view.focus(name);
        }
        self.render();
        tracing::debug!(step = %self.state.step, field = ?first_invalid, "advance blocked");
        Transition::Blocked { first_invalid }
    }

    /// Forward control: next step, or the submission path on the last step
    pub async fn advance(&mut self) -> Transition {
        let step = self.state.step;
        let Some(next) = step.next() else {
            return self.submit().await;
        };
        match self.validate_step(step) {
            Ok(()) => {
                self.state.completed.insert(step);
                self.state.step = next;
                self.render();
                tracing::debug!(from = %step, to = %next, "advanced");
                Transition::Moved(next)
            }
            Err(first) => self.block(Some(first)),
        }
    }

    /// Back control; `false` on step 1
    pub fn retreat(&mut self) -> bool {
        match self.state.step.prev() {
            Some(prev) => {
                self.state.step = prev;
                self.render();
                tracing::debug!(to = %prev, "retreated");
                true
            }
            None => false,
        }
    }

    /// Step selector: any in-range step, no gate
    pub fn jump_to(&mut self, number: u8) -> bool {
        match StepIndex::new(number) {
            Some(step) => {
                self.state.step = step;
                self.render();
                tracing::debug!(to = %step, "jumped");
                true
            }
            None => false,
        }
    }

    /// Show the current step with its progress, markers and controls
    pub fn render(&mut self) {
        let step = self.state.step;
        self.view.show_step(step);
        for s in StepIndex::all() {
            self.view.set_step_status(s, self.state.status_of(s));
        }
        self.view.render_progress(Progress::of(step));
        self.refresh_forward();
    }

    /// Re-evaluate the back/forward controls for the current step
    pub fn refresh_forward(&mut self) {
        let step = self.state.step;
        let navigation = if step.is_last() {
            NavigationState {
                back_enabled: !step.is_first(),
                forward: ForwardAction::Submit,
                forward_enabled: self.step_is_satisfied(step),
            }
        } else {
            NavigationState {
                back_enabled: !step.is_first(),
                forward: ForwardAction::Next,
                forward_enabled: true,
            }
        };
        self.view.set_navigation(navigation);
    }

    /// Sync every dependent field with its trigger
    pub fn apply_bindings(&mut self) {
        let bindings = self.bindings.clone();
        for binding in &bindings {
            self.apply_binding(binding);
        }
    }

    fn apply_binding(&mut self, binding: &ConditionalFieldBinding) {
        let trigger = self.view.value(&binding.trigger).unwrap_or_default();
        let enabled = binding.enables(&trigger);
        let dependent = binding.dependent.as_str();
        self.view.set_enabled(dependent, enabled);
        self.view.set_required(dependent, enabled);
        if !enabled {
            self.view.set_value(dependent, "");
            self.view.set_validity(dependent, FieldValidity::Unvalidated);
            self.view.set_error_message(dependent, None);
            self.state.record.remove(dependent);
        }
    }

    /// Blank the form and go back to step 1, keeping the token and the saved snapshot
    pub fn restart(&mut self) {
        self.reset_fields();
        self.apply_bindings();
        self.capture();
        self.state.step = StepIndex::FIRST;
        self.state.completed.clear();
        self.state.attempted.clear();
        self.render();
    }

    /// Blank every field except the token and drop all markers
    fn reset_fields(&mut self) {
        for name in self.view.field_names() {
            if name == TOKEN_FIELD {
                continue;
            }
            self.view.set_value(&name, "");
            self.view.set_validity(&name, FieldValidity::Unvalidated);
            self.view.set_error_message(&name, None);
        }
    }
}
