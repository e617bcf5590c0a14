//! Configurator engine: the wizard state machine for one session.
//!
//! DESIGN
//! ======
//! A `Configurator` owns the selection state of a single visitor and a shared
//! handle to the immutable catalog. Steps advance only when the active step's
//! completeness predicate holds; step 4 exits only through submission or
//! `reset()`. Derived values (pricing, summary, payload) are recomputed from
//! explicit state on every call and never stored.
//!
//! SUBMISSION
//! ==========
//! Submission is split so the sink call can run without holding the session
//! lock: `begin_submission` flips the status to `InFlight` and hands back the
//! payload plus a ticket; `finish_submission` records the sink outcome only if
//! that ticket is still current. `reset()` retires outstanding tickets, so a
//! late sink response cannot resurrect a session that was started over.
//!
//! While a submission is in flight or has succeeded, the selection is locked:
//! navigation and selection mutators are no-ops until the outcome arrives
//! (in flight) or the session is reset (succeeded).

pub mod payload;
pub mod preview;
pub mod pricing;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use payload::SubmissionPayload;
use preview::SelectionSnapshot;
use pricing::{MaterialSummary, PriceBreakdown};

// =============================================================================
// WIZARD STEP
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    ModelSelection,
    ModuleSelection,
    MaterialSelection,
    ContactAndSubmit,
}

impl WizardStep {
    /// 1-based step number shown in the step indicator.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::ModelSelection => 1,
            Self::ModuleSelection => 2,
            Self::MaterialSelection => 3,
            Self::ContactAndSubmit => 4,
        }
    }

    #[must_use]
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::ModelSelection),
            2 => Some(Self::ModuleSelection),
            3 => Some(Self::MaterialSelection),
            4 => Some(Self::ContactAndSubmit),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ModelSelection => "model_selection",
            Self::ModuleSelection => "module_selection",
            Self::MaterialSelection => "material_selection",
            Self::ContactAndSubmit => "contact_and_submit",
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn prev(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }
}

// =============================================================================
// SELECTION STATE
// =============================================================================

/// The in-progress choices of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub model: Option<u32>,
    /// Selected module ids in the order they were first toggled on.
    pub modules: Vec<String>,
    /// Category -> material id. At most one material per category.
    pub materials: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
}

impl ContactInfo {
    /// Both fields present (non-blank). No format validation beyond that.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Lifecycle of the quote submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    NotStarted,
    InFlight,
    Succeeded,
    Failed(String),
}

/// Identifies one submission attempt. Only the current attempt may record an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

// =============================================================================
// CONFIGURATOR
// =============================================================================

#[derive(Debug, Clone)]
pub struct Configurator {
    catalog: Arc<Catalog>,
    step: WizardStep,
    selection: Selection,
    contact: ContactInfo,
    submission: SubmissionStatus,
    /// Bumped on every submission attempt and every reset.
    attempt: u64,
}

impl Configurator {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            step: WizardStep::ModelSelection,
            selection: Selection::default(),
            contact: ContactInfo::default(),
            submission: SubmissionStatus::NotStarted,
            attempt: 0,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    #[must_use]
    pub fn submission(&self) -> &SubmissionStatus {
        &self.submission
    }

    /// Step 4 `Submitted` sub-state.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submission == SubmissionStatus::Succeeded
    }

    fn is_locked(&self) -> bool {
        matches!(self.submission, SubmissionStatus::InFlight | SubmissionStatus::Succeeded)
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn is_step_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::ModelSelection => self.selection.model.is_some(),
            WizardStep::ModuleSelection => !self.selection.modules.is_empty(),
            WizardStep::MaterialSelection => !self.selection.materials.is_empty(),
            WizardStep::ContactAndSubmit => false,
        }
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        !self.is_locked() && self.is_step_complete(self.step) && self.step.next().is_some()
    }

    #[must_use]
    pub fn can_retreat(&self) -> bool {
        !self.is_locked() && self.step.prev().is_some()
    }

    /// Move to the next step if the current one is complete. Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Move back one step, keeping every selection. Returns whether the step changed.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Selection mutators. Unknown catalog ids are ignored.
    // -------------------------------------------------------------------------

    pub fn select_model(&mut self, model_id: u32) -> bool {
        if self.is_locked() || self.catalog.model(model_id).is_none() {
            return false;
        }
        self.selection.model = Some(model_id);
        true
    }

    pub fn toggle_module(&mut self, module_id: &str) -> bool {
        if self.is_locked() || self.catalog.module(module_id).is_none() {
            return false;
        }
        if let Some(pos) = self.selection.modules.iter().position(|id| id == module_id) {
            self.selection.modules.remove(pos);
        } else {
            self.selection.modules.push(module_id.to_owned());
        }
        true
    }

    pub fn select_material(&mut self, material_id: &str, category: &str) -> bool {
        if self.is_locked() || category.trim().is_empty() || self.catalog.material(material_id).is_none() {
            return false;
        }
        self.selection
            .materials
            .insert(category.to_owned(), material_id.to_owned());
        true
    }

    pub fn update_contact(&mut self, field: ContactField, value: impl Into<String>) -> bool {
        if self.is_locked() {
            return false;
        }
        let value = value.into();
        match field {
            ContactField::Name => self.contact.name = value,
            ContactField::Email => self.contact.email = value,
        }
        true
    }

    /// Start over with an empty selection. The catalog is kept.
    pub fn reset(&mut self) {
        self.step = WizardStep::ModelSelection;
        self.selection = Selection::default();
        self.contact = ContactInfo::default();
        self.submission = SubmissionStatus::NotStarted;
        self.attempt += 1;
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Whether `begin_submission` would start an attempt right now.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.contact.is_complete() && !self.is_locked()
    }

    /// Mark a submission as in flight and build its payload.
    ///
    /// Returns `None` (state unchanged) when contact details are missing, an
    /// attempt is already in flight, or the quote was already submitted.
    pub fn begin_submission(&mut self) -> Option<(SubmissionTicket, SubmissionPayload)> {
        if !self.can_submit() {
            return None;
        }
        self.attempt += 1;
        self.submission = SubmissionStatus::InFlight;
        Some((SubmissionTicket(self.attempt), self.submission_payload()))
    }

    /// Record the sink outcome for `ticket`. Stale tickets are ignored.
    pub fn finish_submission(&mut self, ticket: SubmissionTicket, outcome: Result<(), String>) -> bool {
        if ticket.0 != self.attempt || self.submission != SubmissionStatus::InFlight {
            return false;
        }
        self.submission = match outcome {
            Ok(()) => SubmissionStatus::Succeeded,
            Err(reason) => SubmissionStatus::Failed(reason),
        };
        true
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn total_price(&self) -> u64 {
        pricing::total_price(&self.catalog, &self.selection)
    }

    #[must_use]
    pub fn price_breakdown(&self) -> PriceBreakdown {
        pricing::price_breakdown(&self.catalog, &self.selection)
    }

    #[must_use]
    pub fn selected_module_names(&self) -> Vec<String> {
        pricing::module_names(&self.catalog, &self.selection)
    }

    #[must_use]
    pub fn selected_material_summaries(&self) -> Vec<MaterialSummary> {
        pricing::material_summaries(&self.catalog, &self.selection)
    }

    #[must_use]
    pub fn configuration_summary(&self) -> String {
        pricing::configuration_summary(&self.catalog, &self.selection)
    }

    #[must_use]
    pub fn submission_payload(&self) -> SubmissionPayload {
        payload::build(&self.catalog, &self.selection, &self.contact)
    }

    /// Read-only copy of the selection for visualization consumers.
    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot::of(&self.selection)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
