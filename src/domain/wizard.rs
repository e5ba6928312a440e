//! Linear three-step form wizard.
//!
//! Step1 → Step2 → Step3 → Submitted. `back` is allowed from Step2 and
//! Step3 and never clears entered data. Only Step3 can start a submission,
//! and only one submission can be in flight.

use std::sync::{Arc, Weak};
use thiserror::Error;

use super::form::{validate_step, FormStep, TripFormData, TripFormDraft};
use super::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Editing(FormStep),
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("submission is only possible from the last step")]
    NotOnLastStep,

    #[error("already on the first step")]
    AtFirstStep,

    #[error("already on the last step")]
    AtLastStep,

    #[error("a trip plan request is already in flight")]
    InFlight,

    #[error("the trip has already been submitted")]
    AlreadySubmitted,
}

/// Proof that the wizard validated the whole form and is waiting for the
/// generation response. Only [`Wizard::begin_submit`] creates one.
///
/// The wizard counts as loading for exactly as long as the ticket lives,
/// so a request future that is dropped mid-flight unlocks it too.
#[derive(Debug)]
pub struct SubmitTicket {
    form: TripFormData,
    _pending: Arc<()>,
}

impl SubmitTicket {
    pub fn form(&self) -> &TripFormData {
        &self.form
    }
}

#[derive(Debug, Clone)]
pub struct Wizard {
    draft: TripFormDraft,
    state: WizardState,
    pending: Weak<()>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(TripFormDraft::with_form_defaults())
    }
}

impl Wizard {
    pub fn new(draft: TripFormDraft) -> Self {
        Self {
            draft,
            state: WizardState::Editing(FormStep::Basics),
            pending: Weak::new(),
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.pending.strong_count() > 0
    }

    pub fn draft(&self) -> &TripFormDraft {
        &self.draft
    }

    /// Edit the form. Locked while a request is in flight or after submission.
    pub fn draft_mut(&mut self) -> Result<&mut TripFormDraft, WizardError> {
        self.editable_step()?;
        Ok(&mut self.draft)
    }

    /// Validate the current step and move to the next one.
    pub fn advance(&mut self) -> Result<FormStep, WizardError> {
        let step = self.editable_step()?;
        let next = step.next().ok_or(WizardError::AtLastStep)?;
        validate_step(step, &self.draft)?;
        self.state = WizardState::Editing(next);
        Ok(next)
    }

    pub fn back(&mut self) -> Result<FormStep, WizardError> {
        let step = self.editable_step()?;
        let previous = step.previous().ok_or(WizardError::AtFirstStep)?;
        self.state = WizardState::Editing(previous);
        Ok(previous)
    }

    /// Validate every step and mark a request as in flight.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, WizardError> {
        let step = self.editable_step()?;
        if step != FormStep::Logistics {
            return Err(WizardError::NotOnLastStep);
        }
        let form = TripFormData::try_from(self.draft.clone())?;
        let pending = Arc::new(());
        self.pending = Arc::downgrade(&pending);
        Ok(SubmitTicket {
            form,
            _pending: pending,
        })
    }

    /// Record the outcome of the request started by `ticket`. A failure
    /// leaves the wizard on the last step, ready to resubmit.
    pub fn finish_submit(&mut self, ticket: SubmitTicket, succeeded: bool) {
        drop(ticket);
        if succeeded {
            self.state = WizardState::Submitted;
        }
    }

    fn editable_step(&self) -> Result<FormStep, WizardError> {
        if self.is_loading() {
            return Err(WizardError::InFlight);
        }
        match self.state {
            WizardState::Editing(step) => Ok(step),
            WizardState::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }
}
