//! End-to-end flows across the headless modules, driven the way the
//! components drive them.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::forms::autosave::{
    clear_draft, flush_if_current, on_values_changed, resolve_initial_values, save_now,
    AutosaveConfig, AutosaveOutcome, Debouncer,
};
use crate::forms::cascade::{change_parent, CascadeState, OptionsSource, SelectCascade};
use crate::forms::schema::{Rule, RuleSchema, SchemaRef};
use crate::forms::state::{dispatch, FormAction, FormState};
use crate::forms::submission::{submit_form, SubmitOptions, SubmitOutcome};
use crate::forms::types::{FieldDescriptor, SelectOption};
use crate::forms::values::{as_form_values, get_path, FormValues};
use crate::forms::wizard::{advance_wizard, Step, WizardOutcome, WizardPhase, WizardState};
use crate::services::errors::SubmitError;
use crate::services::notify::testing::RecordingNotifier;
use crate::services::notify::NotificationLevel;
use crate::services::storage::MemoryStore;
use crate::services::submit::SubmitFn;

fn set(form: &Rc<RefCell<FormState>>, path: &str, value: Value) {
    dispatch(
        form,
        FormAction::SetValue {
            path: path.into(),
            value,
        },
    );
}

fn shared<T>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

fn supplier_steps() -> Vec<Step> {
    vec![
        Step::new(
            "company",
            "Company",
            vec![FieldDescriptor::text("company.name", "Legal name").required()],
        ),
        Step::new(
            "contact",
            "Contact",
            vec![FieldDescriptor::email("contact.email", "Email").required()],
        ),
        Step::new(
            "terms",
            "Terms",
            vec![FieldDescriptor::number("terms.days", "Payment days").default_value(json!(30))],
        ),
    ]
}

async fn walk_to_last_step(
    wizard: &Rc<RefCell<WizardState>>,
    form: &Rc<RefCell<FormState>>,
    steps: &[Step],
    handler: &SubmitFn<impl Fn(FormValues) -> std::future::Ready<Result<(), SubmitError>>>,
    notifier: &RecordingNotifier,
) {
    let options = SubmitOptions::default();
    set(form, "company.name", json!("Acme"));
    let moved = advance_wizard(wizard, form, steps, handler, notifier, &options).await;
    assert_eq!(moved, WizardOutcome::Moved(1));
    set(form, "contact.email", json!("ap@acme.test"));
    let moved = advance_wizard(wizard, form, steps, handler, notifier, &options).await;
    assert_eq!(moved, WizardOutcome::Moved(2));
}

#[tokio::test]
async fn wizard_success_submits_nested_values_and_starts_over() {
    let steps = supplier_steps();
    let wizard = shared(WizardState::new(&steps, &FormValues::new()));
    let form = shared(wizard.borrow().step_form());
    let notifier = RecordingNotifier::default();
    let received = Rc::new(RefCell::new(None::<FormValues>));
    let sink = received.clone();
    let handler = SubmitFn(move |values: FormValues| {
        *sink.borrow_mut() = Some(values);
        std::future::ready(Ok::<(), SubmitError>(()))
    });

    walk_to_last_step(&wizard, &form, &steps, &handler, &notifier).await;
    let outcome =
        advance_wizard(&wizard, &form, &steps, &handler, &notifier, &SubmitOptions::default()).await;

    assert_eq!(outcome, WizardOutcome::Submitted);
    let values = received.borrow().clone().unwrap();
    assert_eq!(get_path(&values, "company.name"), Some(&json!("Acme")));
    assert_eq!(get_path(&values, "contact.email"), Some(&json!("ap@acme.test")));
    assert_eq!(get_path(&values, "terms.days"), Some(&json!(30)));

    let wizard = wizard.borrow();
    assert_eq!(wizard.current_step, 0);
    assert_eq!(wizard.completed_submissions, 1);
    assert_eq!(wizard.phase, WizardPhase::Editing);
    assert_eq!(get_path(&wizard.accumulated, "company.name"), None);
    assert_eq!(get_path(&wizard.accumulated, "terms.days"), Some(&json!(30)));
    assert_eq!(form.borrow().value("company.name"), None);
    assert_eq!(notifier.count(NotificationLevel::Success), 1);
}

#[tokio::test]
async fn wizard_failure_stays_on_last_step_with_data() {
    let steps = supplier_steps();
    let wizard = shared(WizardState::new(&steps, &FormValues::new()));
    let form = shared(wizard.borrow().step_form());
    let notifier = RecordingNotifier::default();
    let fail = Rc::new(Cell::new(true));
    let toggle = fail.clone();
    let handler = SubmitFn(move |_values: FormValues| {
        let result = if toggle.get() {
            Err(SubmitError::rejected("Registration number already exists"))
        } else {
            Ok(())
        };
        std::future::ready(result)
    });

    walk_to_last_step(&wizard, &form, &steps, &handler, &notifier).await;
    let outcome =
        advance_wizard(&wizard, &form, &steps, &handler, &notifier, &SubmitOptions::default()).await;

    assert!(matches!(outcome, WizardOutcome::Failed(_)));
    {
        let wizard = wizard.borrow();
        assert_eq!(wizard.current_step, 2);
        assert_eq!(wizard.phase, WizardPhase::Editing);
        assert_eq!(wizard.completed_submissions, 0);
        assert_eq!(get_path(&wizard.accumulated, "company.name"), Some(&json!("Acme")));
    }
    assert!(!form.borrow().is_submitting);
    let errors: Vec<_> = notifier
        .messages()
        .into_iter()
        .filter(|n| n.level == NotificationLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, SubmitOptions::default().fallback_error_message);

    // Retrying from the same step goes through
    fail.set(false);
    let retried =
        advance_wizard(&wizard, &form, &steps, &handler, &notifier, &SubmitOptions::default()).await;
    assert_eq!(retried, WizardOutcome::Submitted);
    assert_eq!(wizard.borrow().completed_submissions, 1);
}

#[tokio::test]
async fn wizard_jumps_cannot_submit_past_a_skipped_required_step() {
    let steps = supplier_steps();
    let wizard = shared(WizardState::new(&steps, &FormValues::new()));
    let form = shared(wizard.borrow().step_form());
    let notifier = RecordingNotifier::default();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let handler = SubmitFn(move |_values: FormValues| {
        counter.set(counter.get() + 1);
        std::future::ready(Ok::<(), SubmitError>(()))
    });

    // Indicator jumps: company -> contact -> terms without pressing Next
    assert!(wizard.borrow_mut().go_to(1, &steps, &mut form.borrow_mut()));
    set(&form, "contact.email", json!("ap@acme.test"));
    assert!(wizard.borrow_mut().go_to(2, &steps, &mut form.borrow_mut()));

    let outcome =
        advance_wizard(&wizard, &form, &steps, &handler, &notifier, &SubmitOptions::default()).await;

    assert_eq!(outcome, WizardOutcome::Blocked);
    assert_eq!(calls.get(), 0);
    assert_eq!(wizard.borrow().current_step, 0);
    assert_eq!(wizard.borrow().phase, WizardPhase::Editing);
    assert_eq!(form.borrow().error("company.name"), Some("Legal name is required"));
    assert!(notifier.messages().is_empty());
}

/// Company -> division -> department lookup table.
struct OrgChart;

#[async_trait(?Send)]
impl OptionsSource for OrgChart {
    async fn load_options(
        &self,
        child_path: &str,
        parent_value: &str,
    ) -> Result<Vec<SelectOption>, SubmitError> {
        let options = match (child_path, parent_value) {
            ("division_id", "1") => vec![SelectOption::new("10", "Retail"), SelectOption::new("11", "Wholesale")],
            ("division_id", "2") => vec![SelectOption::new("20", "Services")],
            ("department_id", "10") => vec![SelectOption::new("100", "Stores")],
            ("department_id", _) => Vec::new(),
            _ => return Err(SubmitError::rejected(format!("no route for {}", child_path))),
        };
        Ok(options)
    }
}

#[tokio::test]
async fn cascade_then_submit_cost_center() {
    let cascade = SelectCascade::new(["company_id", "division_id", "department_id"]);
    let cascade_state = shared(CascadeState::default());
    let form = shared(FormState::new(
        as_form_values(json!({"company_id": "", "division_id": "", "department_id": "", "name": ""}))
            .unwrap(),
    ));
    let schema = SchemaRef::new(
        RuleSchema::new()
            .field("department_id", "Department", vec![Rule::Required])
            .field("name", "Name", vec![Rule::Required]),
    );
    let notifier = RecordingNotifier::default();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let handler = SubmitFn(move |_values: FormValues| {
        counter.set(counter.get() + 1);
        std::future::ready(Ok::<(), SubmitError>(()))
    });

    assert!(change_parent(&cascade_state, &form, &cascade, &OrgChart, "company_id", "1").await);
    assert_eq!(cascade_state.borrow().options_for("division_id").len(), 2);
    assert!(change_parent(&cascade_state, &form, &cascade, &OrgChart, "division_id", "10").await);
    assert_eq!(cascade_state.borrow().options_for("department_id").len(), 1);
    set(&form, "department_id", json!("100"));

    // Switching company wipes the lower levels
    assert!(change_parent(&cascade_state, &form, &cascade, &OrgChart, "company_id", "2").await);
    assert_eq!(form.borrow().value("division_id"), Some(&json!("")));
    assert_eq!(form.borrow().value("department_id"), Some(&json!("")));
    assert!(cascade_state.borrow().options_for("department_id").is_empty());
    assert_eq!(cascade_state.borrow().options_for("division_id")[0].label, "Services");

    set(&form, "name", json!("Field services"));
    let outcome =
        submit_form(&form, Some(&schema), &handler, &notifier, &SubmitOptions::default()).await;
    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert_eq!(form.borrow().error("department_id"), Some("Department is required"));
    assert_eq!(calls.get(), 0);
}

#[tokio::test]
async fn draft_survives_a_reload_until_saved_and_discarded() {
    let store = MemoryStore::new();
    let config = AutosaveConfig::default().storage_key("journal-entry-draft");
    let defaults = as_form_values(json!({"reference": "", "memo": ""})).unwrap();
    let notifier = RecordingNotifier::default();
    let handler = SubmitFn(|_values: FormValues| std::future::ready(Ok::<(), SubmitError>(())));

    // First session: type, the draft is mirrored, the page goes away before the flush
    {
        let form = shared(FormState::new(resolve_initial_values(
            &store,
            config.storage_key.as_deref(),
            defaults.clone(),
        )));
        let debouncer = shared(Debouncer::default());
        set(&form, "reference", json!("JE-0042"));
        let values = form.borrow().values.clone();
        assert!(on_values_changed(&config, &store, &values, &debouncer).is_some());
    }

    // Second session picks the draft up and saves it explicitly
    let form = shared(FormState::new(resolve_initial_values(
        &store,
        config.storage_key.as_deref(),
        defaults.clone(),
    )));
    assert_eq!(form.borrow().value("reference"), Some(&json!("JE-0042")));

    set(&form, "memo", json!("Accrual"));
    let debouncer = shared(Debouncer::default());
    let values = form.borrow().values.clone();
    let ticket = on_values_changed(&config, &store, &values, &debouncer).unwrap();

    let outcome = save_now(&form, None, &handler, &notifier, &SubmitOptions::default()).await;
    assert_eq!(outcome, SubmitOutcome::Submitted);
    assert!(!form.borrow().is_dirty());
    assert_eq!(form.borrow().value("memo"), Some(&json!("Accrual")));

    // The pending debounced flush finds nothing left to save
    let flushed = flush_if_current(ticket, &debouncer, &form, &handler, &notifier, &config).await;
    assert_eq!(flushed, AutosaveOutcome::Clean);

    clear_draft(&store, config.storage_key.as_deref());
    let fresh = resolve_initial_values(&store, config.storage_key.as_deref(), defaults.clone());
    assert_eq!(fresh, defaults);
}
