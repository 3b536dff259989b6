//! Form wizard — a fixed three-step form with per-step persistence.
//!
//! DESIGN
//! ======
//! `schema` defines steps, fields and validators; `storage` the injected
//! key-value persistence; `gate` the navigation rules as pure functions
//! over a store; `session` the live editing state that ties them together.

pub mod gate;
pub mod schema;
pub mod session;
pub mod storage;

pub use gate::{Blocked, Indicator, IndicatorState};
pub use schema::{Field, FieldError, FormValues, Step, StepFields};
pub use session::{FormWizard, Submission, Transition};
pub use storage::{FileStore, MemoryStore, StepStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// Route text that is not a step number 1–3.
    #[error("invalid step: {0:?}")]
    InvalidStep(String),

    #[error("field {field} is not on step {step}")]
    FieldNotOnStep { field: Field, step: Step },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WizardError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStep(_) => "E_INVALID_STEP",
            Self::FieldNotOnStep { .. } => "E_FIELD_NOT_ON_STEP",
            Self::Store(e) => e.error_code(),
        }
    }
}
