//! In-memory form view
//!
//! Holds field values and presentation state without drawing anything. The
//! terminal host renders from it, and the controller tests assert against it.

use super::{FormView, NavigationState, Progress, StepStatus};
use crate::state::{
    Banner, BannerQueue, FieldKind, FieldSpec, FieldValidity, FormLayout, StepIndex, TOKEN_FIELD,
    TOTAL_STEPS,
};

/// Represents a single form field with its presentation state and value
#[derive(Debug, Clone)]
pub struct FieldElement {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// `None` for fields outside every step container (the token)
    pub step: Option<StepIndex>,
    pub options: Vec<String>,
    pub value: String,
    pub enabled: bool,
    pub required: bool,
    pub validity: FieldValidity,
    pub error: Option<String>,
}

impl FieldElement {
    /// Create an element from its layout entry
    pub fn from_spec(spec: &FieldSpec) -> Self {
        Self {
            name: spec.name.to_string(),
            label: spec.label.to_string(),
            kind: spec.kind,
            step: Some(spec.step),
            options: spec.options.iter().map(|o| o.to_string()).collect(),
            value: String::new(),
            enabled: true,
            required: spec.required,
            validity: FieldValidity::Unvalidated,
            error: None,
        }
    }

    /// Create a hidden element carrying a fixed value
    pub fn hidden(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            label: String::new(),
            kind: FieldKind::Hidden,
            step: None,
            options: Vec::new(),
            value: value.to_string(),
            enabled: true,
            required: false,
            validity: FieldValidity::Unvalidated,
            error: None,
        }
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        self.value.push(c);
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        self.value.pop();
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_select(&self) -> bool {
        self.kind == FieldKind::Select
    }

    /// Move a select to its next or previous option, wrapping through the
    /// empty placeholder. Returns the new value.
    pub fn cycle_option(&mut self, forward: bool) -> Option<&str> {
        if self.options.is_empty() {
            return None;
        }
        let last = self.options.len() - 1;
        let current = self.options.iter().position(|o| *o == self.value);
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(last),
            (Some(i), true) if i == last => None,
            (Some(i), true) => Some(i + 1),
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
        self.value = next
            .and_then(|i| self.options.get(i).cloned())
            .unwrap_or_default();
        Some(&self.value)
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self.kind {
            FieldKind::Select if self.value.is_empty() => "Selecione...".to_string(),
            FieldKind::Attachment if self.value.is_empty() => "Nenhum arquivo".to_string(),
            _ => self.value.clone(),
        }
    }
}

/// Tab-order cycling over the focusable fields
pub trait FocusCycle {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// A [`FormView`] kept entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryView {
    elements: Vec<FieldElement>,
    visible_step: StepIndex,
    active: Option<String>,
    step_status: [StepStatus; TOTAL_STEPS as usize],
    progress: Progress,
    navigation: NavigationState,
    reset_busy: bool,
    banners: BannerQueue,
    pending_submission: Option<Vec<(String, String)>>,
    submit_count: usize,
}

impl MemoryView {
    /// One element per layout field plus the hidden token field
    pub fn new(layout: &FormLayout, token: &str) -> Self {
        let mut elements = Self::elements_of(layout);
        elements.push(FieldElement::hidden(TOKEN_FIELD, token));
        Self::from_elements(elements)
    }

    /// A view whose form carries no token field at all
    pub fn without_token(layout: &FormLayout) -> Self {
        Self::from_elements(Self::elements_of(layout))
    }

    fn elements_of(layout: &FormLayout) -> Vec<FieldElement> {
        let specs = layout.fields();
        specs.iter().map(FieldElement::from_spec).collect()
    }

    fn from_elements(elements: Vec<FieldElement>) -> Self {
        Self {
            elements,
            visible_step: StepIndex::FIRST,
            active: None,
            step_status: [StepStatus::Pending; TOTAL_STEPS as usize],
            progress: Progress::of(StepIndex::FIRST),
            navigation: NavigationState::default(),
            reset_busy: false,
            banners: BannerQueue::default(),
            pending_submission: None,
            submit_count: 0,
        }
    }

    pub fn element(&self, name: &str) -> Option<&FieldElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    fn element_mut(&mut self, name: &str) -> Option<&mut FieldElement> {
        self.elements.iter_mut().find(|e| e.name == name)
    }

    /// Elements of one step container, in layout order
    pub fn elements_in(&self, step: StepIndex) -> impl Iterator<Item = &FieldElement> {
        self.elements.iter().filter(move |e| e.step == Some(step))
    }

    fn focusable(&self) -> Vec<&str> {
        self.elements_in(self.visible_step)
            .filter(|e| e.enabled)
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Name of the field holding the cursor
    pub fn focused(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_element(&self) -> Option<&FieldElement> {
        self.active.as_deref().and_then(|name| self.element(name))
    }

    pub fn visible_step(&self) -> StepIndex {
        self.visible_step
    }

    pub fn step_status(&self, step: StepIndex) -> StepStatus {
        self.step_status[step.position()]
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn navigation(&self) -> NavigationState {
        self.navigation
    }

    pub fn is_reset_busy(&self) -> bool {
        self.reset_busy
    }

    pub fn banners(&self) -> &BannerQueue {
        &self.banners
    }

    pub fn banners_mut(&mut self) -> &mut BannerQueue {
        &mut self.banners
    }

    /// Fields handed over by the last native submission, if not yet taken
    pub fn take_submission(&mut self) -> Option<Vec<(String, String)>> {
        self.pending_submission.take()
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count
    }

    fn ensure_focus_in_step(&mut self) {
        let focusable = self.focusable();
        let keep = self
            .active
            .as_deref()
            .is_some_and(|name| focusable.contains(&name));
        if !keep {
            let first = focusable.first().map(|name| name.to_string());
            self.active = first;
        }
    }
}

impl FocusCycle for MemoryView {
    fn field_count(&self) -> usize {
        self.focusable().len()
    }

    fn active_field(&self) -> usize {
        let focusable = self.focusable();
        self.active
            .as_deref()
            .and_then(|name| focusable.iter().position(|n| *n == name))
            .unwrap_or(0)
    }

    fn set_active_field(&mut self, index: usize) {
        let name = self.focusable().get(index).map(|name| name.to_string());
        self.active = name;
    }
}

impl FormView for MemoryView {
    fn field_names(&self) -> Vec<String> {
        self.elements.iter().map(|e| e.name.clone()).collect()
    }

    fn has_field(&self, name: &str) -> bool {
        self.element(name).is_some()
    }

    fn value(&self, name: &str) -> Option<String> {
        self.element(name).map(|e| e.value.clone())
    }

    fn set_value(&mut self, name: &str, value: &str) {
        if let Some(element) = self.element_mut(name) {
            element.value = value.to_string();
        }
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.element(name).is_some_and(|e| e.enabled)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) {
        if let Some(element) = self.element_mut(name) {
            element.enabled = enabled;
        }
        self.ensure_focus_in_step();
    }

    fn is_required(&self, name: &str) -> bool {
        self.element(name).is_some_and(|e| e.required)
    }

    fn set_required(&mut self, name: &str, required: bool) {
        if let Some(element) = self.element_mut(name) {
            element.required = required;
        }
    }

    fn set_validity(&mut self, name: &str, validity: FieldValidity) {
        if let Some(element) = self.element_mut(name) {
            element.validity = validity;
        }
    }

    fn set_error_message(&mut self, name: &str, message: Option<&str>) {
        if let Some(element) = self.element_mut(name) {
            element.error = message.map(str::to_string);
        }
    }

    fn focus(&mut self, name: &str) {
        if self.focusable().contains(&name) {
            self.active = Some(name.to_string());
        }
    }

    fn show_step(&mut self, step: StepIndex) {
        self.visible_step = step;
        self.ensure_focus_in_step();
    }

    fn set_step_status(&mut self, step: StepIndex, status: StepStatus) {
        self.step_status[step.position()] = status;
    }

    fn render_progress(&mut self, progress: Progress) {
        self.progress = progress;
    }

    fn set_navigation(&mut self, navigation: NavigationState) {
        self.navigation = navigation;
    }

    fn set_reset_busy(&mut self, busy: bool) {
        self.reset_busy = busy;
    }

    fn show_banner(&mut self, banner: Banner) {
        self.banners.push(banner);
    }

    fn submit(&mut self) {
        // Disabled controls are not part of a form submission
        let fields = self
            .elements
            .iter()
            .filter(|e| e.enabled)
            .map(|e| (e.name.clone(), e.value.clone()))
            .collect();
        self.pending_submission = Some(fields);
        self.submit_count += 1;
    }
}
