use super::*;
use crate::wizard::IndicatorState;
use crate::wizard::storage::MemoryStore;

fn fill_step_one(w: &mut FormWizard<MemoryStore>) {
    w.set_field(Field::FirstName, "Ash").unwrap();
    w.set_field(Field::LastName, "Ketchum").unwrap();
}

fn fill_step_two(w: &mut FormWizard<MemoryStore>) {
    w.set_field(Field::Email, "ash@pallet.town").unwrap();
    w.set_field(Field::Phone, "5551234567").unwrap();
}

fn fill_step_three(w: &mut FormWizard<MemoryStore>) {
    w.set_field(Field::Address, "1 Route One").unwrap();
    w.set_field(Field::City, "Pallet").unwrap();
}

// =============================================================
// opening
// =============================================================

#[test]
fn open_route_rejects_invalid_step() {
    let err = FormWizard::open_route(MemoryStore::new(), "7").err().unwrap();
    assert_eq!(err, WizardError::InvalidStep("7".into()));
    assert_eq!(err.error_code(), "E_INVALID_STEP");
}

#[test]
fn open_redirects_to_first_incomplete_step() {
    let w = FormWizard::open_route(MemoryStore::new(), "3").unwrap();
    assert_eq!(w.step(), Step::One);
}

#[test]
fn open_loads_stored_values() {
    let mut store = MemoryStore::new();
    store.set("form-step-1", r#"{"firstName":"Misty","lastName":"W"}"#).unwrap();
    let w = FormWizard::open(store, Step::One);
    assert_eq!(w.values().first_name, "Misty");
    assert_eq!(w.values().last_name, "W");
    assert!(w.live_errors().is_empty(), "untouched fields report nothing");
}

// =============================================================
// live validation
// =============================================================

#[test]
fn only_edited_fields_report_errors() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    assert!(!w.has_errors());

    w.set_field(Field::FirstName, "A").unwrap();
    let errors = w.live_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, Field::FirstName);

    w.set_field(Field::FirstName, "Ash").unwrap();
    assert!(!w.has_errors());
}

#[test]
fn set_field_rejects_other_steps_fields() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    let err = w.set_field(Field::City, "Pallet").unwrap_err();
    assert_eq!(err, WizardError::FieldNotOnStep { field: Field::City, step: Step::One });
}

// =============================================================
// next / previous / go_to
// =============================================================

#[test]
fn next_validates_untouched_fields() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    let Transition::Invalid(errors) = w.next().unwrap() else {
        panic!("expected invalid");
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(w.step(), Step::One);
    assert!(w.store().is_empty(), "invalid step is not persisted");
    assert!(w.has_errors());
}

#[test]
fn next_persists_and_advances() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    fill_step_one(&mut w);
    assert_eq!(w.next().unwrap(), Transition::Moved(Step::Two));
    assert_eq!(w.step(), Step::Two);
    assert!(w.is_step_complete(Step::One));
    assert_eq!(
        w.store().get("form-step-1").unwrap().as_deref(),
        Some(r#"{"firstName":"Ash","lastName":"Ketchum"}"#)
    );
}

#[test]
fn previous_persists_current_values_even_if_incomplete() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    fill_step_one(&mut w);
    w.next().unwrap();

    w.set_field(Field::Email, "ash@pallet.town").unwrap();
    assert_eq!(w.previous().unwrap(), Transition::Moved(Step::One));
    assert_eq!(w.values().first_name, "Ash");

    let stored = w.store().get("form-step-2").unwrap().unwrap();
    assert!(stored.contains("ash@pallet.town"));
    assert!(!w.is_step_complete(Step::Two));
}

#[test]
fn previous_is_blocked_by_live_errors_and_on_first_step() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    assert_eq!(w.previous().unwrap(), Transition::Blocked(Blocked::AlreadyActive));

    fill_step_one(&mut w);
    w.next().unwrap();
    w.set_field(Field::Phone, "123").unwrap();
    assert_eq!(w.previous().unwrap(), Transition::Blocked(Blocked::HasErrors));
    assert_eq!(w.step(), Step::Two);
}

#[test]
fn go_to_blocks_while_errors_and_skips() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    fill_step_one(&mut w);
    assert_eq!(w.go_to(Step::Three).unwrap(), Transition::Blocked(Blocked::Skip));
    assert_eq!(w.go_to(Step::Two).unwrap(), Transition::Blocked(Blocked::PreviousIncomplete(Step::One)));

    w.set_field(Field::LastName, "K").unwrap();
    assert!(!w.can_navigate_to(Step::Two));
    assert_eq!(w.go_to(Step::Two).unwrap(), Transition::Blocked(Blocked::HasErrors));
}

#[test]
fn go_to_earlier_step_persists_active_step() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    fill_step_one(&mut w);
    w.next().unwrap();
    fill_step_two(&mut w);
    w.next().unwrap();
    assert_eq!(w.step(), Step::Three);

    w.set_field(Field::City, "Pallet").unwrap();
    assert_eq!(w.go_to(Step::One).unwrap(), Transition::Moved(Step::One));
    assert!(w.store().get("form-step-3").unwrap().unwrap().contains("Pallet"));
}

#[test]
fn indicators_follow_progress() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    fill_step_one(&mut w);
    w.next().unwrap();
    let got = w.indicators();
    assert_eq!(got[0].state, IndicatorState::Complete { dimmed: false });
    assert_eq!(got[1].state, IndicatorState::Active);
}

// =============================================================
// submission
// =============================================================

#[test]
fn submitting_last_step_merges_clears_and_restarts() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    fill_step_one(&mut w);
    w.next().unwrap();
    fill_step_two(&mut w);
    w.next().unwrap();
    fill_step_three(&mut w);

    let Transition::Submitted(submission) = w.next().unwrap() else {
        panic!("expected submission");
    };
    assert_eq!(
        submission,
        Submission {
            first_name: "Ash".into(),
            last_name: "Ketchum".into(),
            email: "ash@pallet.town".into(),
            phone: "5551234567".into(),
            address: "1 Route One".into(),
            city: "Pallet".into(),
        }
    );

    assert_eq!(w.step(), Step::One);
    assert_eq!(w.values(), &FormValues::default());
    assert!(!w.has_errors());
    let store = w.into_store();
    for step in Step::ALL {
        assert_eq!(store.get(&step.storage_key()).unwrap(), None);
    }
}

#[test]
fn invalid_last_step_does_not_submit() {
    let mut w = FormWizard::open(MemoryStore::new(), Step::One);
    fill_step_one(&mut w);
    w.next().unwrap();
    fill_step_two(&mut w);
    w.next().unwrap();
    w.set_field(Field::Address, "1 Rd").unwrap();

    assert!(matches!(w.next().unwrap(), Transition::Invalid(_)));
    assert!(w.store().get("form-step-1").unwrap().is_some());
}

#[test]
fn submission_serializes_camel_case() {
    let json = serde_json::to_value(Submission { first_name: "Ash".into(), ..Submission::default() }).unwrap();
    assert_eq!(json["firstName"], "Ash");
    assert_eq!(json["city"], "");
}
