//! Wizard session — live editing state for the active step.
//!
//! DESIGN
//! ======
//! Validation runs on change: a field only reports errors once it has been
//! edited, and `next()` marks every field of the active step as edited
//! before checking. Any successful move persists the active step first,
//! even when nothing changed. Submitting the last step merges the three
//! persisted records, deletes them, and starts over on step 1.

use std::collections::BTreeSet;

use serde::Serialize;

use super::WizardError;
use super::gate::{self, Blocked, Indicator};
use super::schema::{Field, FieldError, FormValues, Step, StepFields, validate_field};
use super::storage::StepStore;

/// The merged record produced by a successful final submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

impl From<FormValues> for Submission {
    fn from(v: FormValues) -> Self {
        Self {
            first_name: v.first_name,
            last_name: v.last_name,
            email: v.email,
            phone: v.phone,
            address: v.address,
            city: v.city,
        }
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved(Step),
    Submitted(Submission),
    /// The active step failed validation; nothing was persisted.
    Invalid(Vec<FieldError>),
    Blocked(Blocked),
}

pub struct FormWizard<S> {
    store: S,
    step: Step,
    values: FormValues,
    edited: BTreeSet<Field>,
}

impl<S: StepStore> FormWizard<S> {
    /// Open the wizard at `requested`, redirected to the earliest prior
    /// step that is not complete.
    #[must_use]
    pub fn open(store: S, requested: Step) -> Self {
        let step = gate::resolve_entry_step(&store, requested);
        if step != requested {
            tracing::info!(requested = requested.number(), step = step.number(), "redirected to incomplete step");
        }
        let mut wizard = Self { store, step, values: FormValues::default(), edited: BTreeSet::new() };
        wizard.load_step(step);
        wizard
    }

    /// Open the wizard from route text such as `"2"`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStep` if `raw` is not 1, 2 or 3.
    pub fn open_route(store: S, raw: &str) -> Result<Self, WizardError> {
        let requested: Step = raw.parse()?;
        Ok(Self::open(store, requested))
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Edit a field of the active step.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotOnStep` if `field` belongs to another step.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), WizardError> {
        if field.step() != self.step {
            return Err(WizardError::FieldNotOnStep { field, step: self.step });
        }
        self.values.set(field, value);
        self.edited.insert(field);
        Ok(())
    }

    /// Errors of the edited fields of the active step.
    #[must_use]
    pub fn live_errors(&self) -> Vec<FieldError> {
        self.step
            .fields()
            .iter()
            .filter(|field| self.edited.contains(*field))
            .filter_map(|&field| validate_field(field, self.values.get(field)))
            .collect()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.live_errors().is_empty()
    }

    #[must_use]
    pub fn can_navigate_to(&self, target: Step) -> bool {
        gate::can_navigate_to_step(&self.store, self.step, self.live_errors().len(), target)
    }

    #[must_use]
    pub fn indicators(&self) -> [Indicator; 3] {
        gate::indicators(&self.store, self.step, self.live_errors().len())
    }

    #[must_use]
    pub fn is_step_complete(&self, step: Step) -> bool {
        gate::is_step_complete(&self.store, step)
    }

    /// Validate the active step; on success persist it and advance, or
    /// submit when on the last step.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn next(&mut self) -> Result<Transition, WizardError> {
        self.edited.extend(self.step.fields().iter().copied());
        let errors = self.live_errors();
        if !errors.is_empty() {
            tracing::debug!(step = self.step.number(), errors = errors.len(), "step invalid");
            return Ok(Transition::Invalid(errors));
        }

        self.persist_active()?;
        match self.step.next() {
            Some(next) => {
                self.move_to(next);
                Ok(Transition::Moved(next))
            }
            None => self.submit().map(Transition::Submitted),
        }
    }

    /// Persist the active step and go back one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn previous(&mut self) -> Result<Transition, WizardError> {
        if self.has_errors() {
            return Ok(Transition::Blocked(Blocked::HasErrors));
        }
        let Some(prev) = self.step.previous() else {
            return Ok(Transition::Blocked(Blocked::AlreadyActive));
        };
        self.persist_active()?;
        self.move_to(prev);
        Ok(Transition::Moved(prev))
    }

    /// Jump to `target` if the step gate allows it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn go_to(&mut self, target: Step) -> Result<Transition, WizardError> {
        if let Some(blocked) = gate::navigation_block(&self.store, self.step, self.live_errors().len(), target) {
            tracing::debug!(from = self.step.number(), to = target.number(), ?blocked, "navigation blocked");
            return Ok(Transition::Blocked(blocked));
        }
        self.persist_active()?;
        self.move_to(target);
        Ok(Transition::Moved(target))
    }

    fn submit(&mut self) -> Result<Submission, WizardError> {
        let mut merged = FormValues::default();
        for step in Step::ALL {
            if let Some(fields) = gate::stored_fields(&self.store, step) {
                merged.apply(&fields);
            }
        }
        for step in Step::ALL {
            self.store.remove(&step.storage_key())?;
        }

        let submission = Submission::from(merged);
        tracing::info!(submission = ?submission, "form submitted");

        self.values = FormValues::default();
        self.edited.clear();
        self.step = Step::One;
        Ok(submission)
    }

    fn persist_active(&mut self) -> Result<(), WizardError> {
        let record = StepFields::from_values(self.step, &self.values);
        let raw = record.to_json().map_err(super::StoreError::from)?;
        self.store.set(&self.step.storage_key(), &raw)?;
        tracing::debug!(step = self.step.number(), "step persisted");
        Ok(())
    }

    fn move_to(&mut self, step: Step) {
        self.step = step;
        self.edited.clear();
        self.load_step(step);
    }

    fn load_step(&mut self, step: Step) {
        match gate::stored_fields(&self.store, step) {
            Some(fields) => self.values.apply(&fields),
            None => self.values.clear_step(step),
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
