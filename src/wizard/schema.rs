//! Step schemas — the fields of each wizard step and their validators.
//!
//! DESIGN
//! ======
//! `StepFields` is a tagged union over the three per-step records, so a
//! step's fields and its validator always travel together. Each record
//! serializes to the camelCase JSON object persisted under that step's key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WizardError;

// =============================================================================
// STEP
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    One,
    Two,
    Three,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::One, Step::Two, Step::Three];

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    #[must_use]
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    #[must_use]
    pub fn is_last(self) -> bool {
        self == Self::Three
    }

    /// Key of this step's persisted record, e.g. `form-step-2`.
    #[must_use]
    pub fn storage_key(self) -> String {
        format!("form-step-{}", self.number())
    }

    #[must_use]
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::One => &[Field::FirstName, Field::LastName],
            Self::Two => &[Field::Email, Field::Phone],
            Self::Three => &[Field::Address, Field::City],
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Parses route text. Anything other than `1`, `2` or `3` is a routing error.
impl FromStr for Step {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(|| WizardError::InvalidStep(s.to_string()))
    }
}

// =============================================================================
// FIELD
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
}

impl Field {
    pub const ALL: [Field; 6] =
        [Field::FirstName, Field::LastName, Field::Email, Field::Phone, Field::Address, Field::City];

    /// JSON property name.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::City => "City",
        }
    }

    #[must_use]
    pub fn step(self) -> Step {
        match self {
            Self::FirstName | Self::LastName => Step::One,
            Self::Email | Self::Phone => Step::Two,
            Self::Address | Self::City => Step::Three,
        }
    }

    /// Accepts the JSON key (`firstName`) or a snake/kebab spelling (`first_name`).
    #[must_use]
    pub fn from_key(raw: &str) -> Option<Self> {
        let folded: String = raw.chars().filter(|c| *c != '_' && *c != '-').collect::<String>().to_lowercase();
        Self::ALL.into_iter().find(|f| f.key().to_lowercase() == folded)
    }

    fn rule(self) -> Rule {
        match self {
            Self::FirstName | Self::LastName | Self::City => Rule::MinLength(2),
            Self::Email => Rule::Email,
            Self::Phone => Rule::MinLength(10),
            Self::Address => Rule::MinLength(5),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// A field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Minimum length in UTF-16 code units.
    MinLength(usize),
    Email,
}

impl Rule {
    fn check(self, value: &str) -> Option<String> {
        match self {
            Self::MinLength(min) if value.encode_utf16().count() < min => {
                Some(format!("String must contain at least {min} character(s)"))
            }
            Self::Email if !is_valid_email(value) => Some("Invalid email".to_string()),
            _ => None,
        }
    }
}

/// Validate one field value against its rule.
#[must_use]
pub fn validate_field(field: Field, value: &str) -> Option<FieldError> {
    field.rule().check(value).map(|message| FieldError { field, message })
}

/// Address shape accepted by the contact step: a local part of letters,
/// digits and `_'+-.` (not starting with a dot, not ending in `'` or `.`),
/// then a dotted domain whose last label is at least two letters. No `..`.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if value.contains("..") || local.starts_with('.') {
        return false;
    }

    let local_ok = local.chars().all(|c| c.is_ascii_alphanumeric() || "_'+-.".contains(c))
        && local
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric() || "_+-".contains(c));
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, hosts)) = labels.split_last() else {
        return false;
    };
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    let hosts_ok = !hosts.is_empty()
        && hosts.iter().all(|label| {
            let mut chars = label.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    tld_ok && hosts_ok
}

// =============================================================================
// STEP RECORDS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressDetails {
    pub address: String,
    pub city: String,
}

/// The fields of exactly one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepFields {
    Personal(PersonalDetails),
    Contact(ContactDetails),
    Address(AddressDetails),
}

impl StepFields {
    #[must_use]
    pub fn step(&self) -> Step {
        match self {
            Self::Personal(_) => Step::One,
            Self::Contact(_) => Step::Two,
            Self::Address(_) => Step::Three,
        }
    }

    /// Empty record for `step`.
    #[must_use]
    pub fn empty(step: Step) -> Self {
        Self::from_values(step, &FormValues::default())
    }

    /// Take `step`'s fields out of the full form.
    #[must_use]
    pub fn from_values(step: Step, values: &FormValues) -> Self {
        match step {
            Step::One => Self::Personal(PersonalDetails {
                first_name: values.first_name.clone(),
                last_name: values.last_name.clone(),
            }),
            Step::Two => Self::Contact(ContactDetails { email: values.email.clone(), phone: values.phone.clone() }),
            Step::Three => {
                Self::Address(AddressDetails { address: values.address.clone(), city: values.city.clone() })
            }
        }
    }

    /// Parse a persisted record for `step`.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON object of string fields.
    pub fn from_json(step: Step, raw: &str) -> Result<Self, serde_json::Error> {
        Ok(match step {
            Step::One => Self::Personal(serde_json::from_str(raw)?),
            Step::Two => Self::Contact(serde_json::from_str(raw)?),
            Step::Three => Self::Address(serde_json::from_str(raw)?),
        })
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Personal(d) => serde_json::to_string(d),
            Self::Contact(d) => serde_json::to_string(d),
            Self::Address(d) => serde_json::to_string(d),
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match (self, field) {
            (Self::Personal(d), Field::FirstName) => &d.first_name,
            (Self::Personal(d), Field::LastName) => &d.last_name,
            (Self::Contact(d), Field::Email) => &d.email,
            (Self::Contact(d), Field::Phone) => &d.phone,
            (Self::Address(d), Field::Address) => &d.address,
            (Self::Address(d), Field::City) => &d.city,
            _ => return None,
        };
        Some(value)
    }

    /// Errors for every field of this step, in field order.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        self.step()
            .fields()
            .iter()
            .filter_map(|&field| validate_field(field, self.get(field).unwrap_or_default()))
            .collect()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// =============================================================================
// FORM VALUES
// =============================================================================

/// Live values of the whole form; every field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

impl FormValues {
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::City => &self.city,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
            Field::City => &mut self.city,
        };
        *slot = value.into();
    }

    /// Overwrite the fields covered by `record`.
    pub fn apply(&mut self, record: &StepFields) {
        for &field in record.step().fields() {
            if let Some(value) = record.get(field) {
                self.set(field, value);
            }
        }
    }

    /// Reset the fields of `step` to empty.
    pub fn clear_step(&mut self, step: Step) {
        for &field in step.fields() {
            self.set(field, String::new());
        }
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;
