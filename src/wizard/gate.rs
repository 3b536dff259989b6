//! Step gate — which wizard steps are reachable from the active one.
//!
//! RULES
//! =====
//! - Live validation errors on the active step block every move.
//! - Earlier steps are always reachable otherwise.
//! - No skipping: more than one step ahead is never reachable.
//! - The next step is reachable only if the step before it is complete.
//! - A step is complete when its persisted record exists and passes its
//!   schema, regardless of what is currently being edited.

use super::schema::{Step, StepFields};
use super::storage::StepStore;

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// The active step has live validation errors.
    HasErrors,
    /// Target is more than one step ahead.
    Skip,
    /// The step before the target has no valid persisted record.
    PreviousIncomplete(Step),
    /// Target is the first step and already active.
    AlreadyActive,
}

/// Visual state of a step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    /// The active step with live errors.
    Error,
    /// Persisted and valid. Dimmed while the active step has errors.
    Complete { dimmed: bool },
    /// The active step, not yet complete.
    Active,
    /// Not complete but navigable.
    Reachable,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub step: Step,
    pub state: IndicatorState,
    /// Whether clicking the indicator navigates.
    pub enabled: bool,
}

/// Load and parse `step`'s persisted record. Unreadable or malformed
/// records read as absent.
pub fn stored_fields(store: &impl StepStore, step: Step) -> Option<StepFields> {
    let raw = match store.get(&step.storage_key()) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(step = step.number(), error = %e, "step record unreadable");
            return None;
        }
    };
    match StepFields::from_json(step, &raw) {
        Ok(fields) => Some(fields),
        Err(e) => {
            tracing::warn!(step = step.number(), error = %e, "step record malformed");
            None
        }
    }
}

pub fn is_step_complete(store: &impl StepStore, step: Step) -> bool {
    stored_fields(store, step).is_some_and(|fields| fields.is_valid())
}

/// Reason navigating from `active` to `target` is refused, if it is.
pub fn navigation_block(store: &impl StepStore, active: Step, live_errors: usize, target: Step) -> Option<Blocked> {
    if live_errors > 0 {
        return Some(Blocked::HasErrors);
    }
    if target < active {
        return None;
    }
    if target.number() > active.number() + 1 {
        return Some(Blocked::Skip);
    }
    match target.previous() {
        None => Some(Blocked::AlreadyActive),
        Some(prev) if is_step_complete(store, prev) => None,
        Some(prev) => Some(Blocked::PreviousIncomplete(prev)),
    }
}

pub fn can_navigate_to_step(store: &impl StepStore, active: Step, live_errors: usize, target: Step) -> bool {
    navigation_block(store, active, live_errors, target).is_none()
}

/// Where opening `requested` actually lands: the earliest prior step that
/// is not complete, or `requested` itself.
pub fn resolve_entry_step(store: &impl StepStore, requested: Step) -> Step {
    Step::ALL
        .into_iter()
        .take_while(|step| *step < requested)
        .find(|step| !is_step_complete(store, *step))
        .unwrap_or(requested)
}

pub fn indicator_state(store: &impl StepStore, active: Step, live_errors: usize, step: Step) -> IndicatorState {
    let has_errors = live_errors > 0;
    if has_errors && step == active {
        IndicatorState::Error
    } else if is_step_complete(store, step) {
        IndicatorState::Complete { dimmed: has_errors }
    } else if step == active {
        IndicatorState::Active
    } else if can_navigate_to_step(store, active, live_errors, step) {
        IndicatorState::Reachable
    } else {
        IndicatorState::Locked
    }
}

pub fn indicators(store: &impl StepStore, active: Step, live_errors: usize) -> [Indicator; 3] {
    Step::ALL.map(|step| Indicator {
        step,
        state: indicator_state(store, active, live_errors, step),
        enabled: can_navigate_to_step(store, active, live_errors, step),
    })
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;
