use async_trait::async_trait;
use dioxus::prelude::*;
use serde_json::{json, Value};

use crate::components::{
    use_notifier, AutosaveForm, CascadeLevel, CascadingSelects, ConfirmDialog, FormBuilder,
    FormField, MultiStepForm, ToastHost,
};
use crate::forms::cascade::OptionsSourceRef;
use crate::forms::confirm::RecordSummary;
use crate::forms::file_upload::{FileUploadHook, SelectedFile, UploadHook, UploadObservers};
use crate::forms::schema::{Rule, RuleSchema, SchemaRef};
use crate::forms::state::FormState;
use crate::forms::submission::{submit_form, SubmitOptions};
use crate::forms::types::{CustomFieldContext, FieldDescriptor, FieldKind, FileConfig, SelectOption};
use crate::forms::values::{as_form_values, FormValues};
use crate::forms::wizard::Step;
use crate::services::client::{OptionsRoute, ResourceOptions, ResourceSubmitter, RestClient};
use crate::services::config::FormsConfig;
use crate::services::notify::{Notification, Notifier};
use crate::services::session::CurrentUser;
use crate::services::submit::OnSubmit;
use crate::{console_error, console_info, console_warn};

const FORMS_CSS: Asset = asset!("/assets/styling/forms.css");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Customer,
    Supplier,
    Journal,
    CostCenter,
    TaxCodes,
}

impl Section {
    const ALL: [Section; 5] = [
        Section::Customer,
        Section::Supplier,
        Section::Journal,
        Section::CostCenter,
        Section::TaxCodes,
    ];

    fn title(&self) -> &'static str {
        match self {
            Section::Customer => "Customer",
            Section::Supplier => "Supplier onboarding",
            Section::Journal => "Journal entry",
            Section::CostCenter => "Cost center",
            Section::TaxCodes => "Tax codes",
        }
    }
}

/// Stores attachments through the documents endpoint and keeps the returned id.
struct DocumentUploader {
    client: RestClient,
}

#[async_trait(?Send)]
impl FileUploadHook for DocumentUploader {
    async fn upload(&self, file: SelectedFile) -> Result<Option<Value>, String> {
        let mut metadata = FormValues::new();
        metadata.insert("file_name".into(), json!(file.name));
        metadata.insert("size_bytes".into(), json!(file.size_bytes));
        metadata.insert("mime_type".into(), json!(file.mime));
        let created = self
            .client
            .create("documents", &metadata)
            .await
            .map_err(|e| e.to_string())?;
        Ok(created.get("id").cloned())
    }
}

/// Page shell: configuration, current user and toasts for every composer.
#[component]
pub fn AdminConsole() -> Element {
    let config = use_context_provider(FormsConfig::load);
    let user = use_context_provider(|| CurrentUser {
        id: "u-1".to_string(),
        display_name: "Finance Admin".to_string(),
        tenant_id: "t-1".to_string(),
        access_token: None,
    });
    use_context_provider(|| {
        let client = RestClient::new(config.api.base_url.clone());
        match &user.access_token {
            Some(token) => client.with_bearer(token.clone()),
            None => client,
        }
    });
    let mut section = use_signal(|| Section::Customer);

    console_info!("[AdminConsole] Rendering section {:?}", section());

    rsx! {
        document::Link { rel: "stylesheet", href: FORMS_CSS }
        ToastHost {
            div {
                class: "admin-console",
                header {
                    class: "console-header",
                    h1 { "Ledger administration" }
                    span { class: "console-user", "{user.display_name}" }
                }
                nav {
                    class: "console-nav",
                    for (item, title) in Section::ALL.map(|item| (item, item.title())) {
                        button {
                            key: "{title}",
                            class: if item == section() { "nav-item active" } else { "nav-item" },
                            r#type: "button",
                            onclick: move |_| section.set(item),
                            "{title}"
                        }
                    }
                }
                main {
                    class: "console-body",
                    match section() {
                        Section::Customer => rsx! { CustomerSection {} },
                        Section::Supplier => rsx! { SupplierSection {} },
                        Section::Journal => rsx! { JournalSection {} },
                        Section::CostCenter => rsx! { CostCenterSection {} },
                        Section::TaxCodes => rsx! { TaxCodesSection {} },
                    }
                }
            }
        }
    }
}

fn payment_terms() -> Vec<SelectOption> {
    vec![
        SelectOption::new("net15", "Net 15"),
        SelectOption::new("net30", "Net 30"),
        SelectOption::new("net60", "Net 60"),
    ]
}

#[component]
fn CustomerSection() -> Element {
    let client = use_context::<RestClient>();
    let config = use_context::<FormsConfig>();
    let user = use_context::<CurrentUser>();
    let contract_status = use_signal(|| None::<String>);
    let attachments = use_hook(|| {
        let status = move |text: String| {
            let mut contract_status = contract_status;
            contract_status.set(Some(text));
        };
        FileConfig {
            max_size_mb: config.files.max_size_mb,
            accept: vec!["application/pdf".to_string(), "image/*".to_string()],
            uploader: Some(UploadHook::new(DocumentUploader {
                client: client.clone(),
            })),
            observers: UploadObservers::new()
                .on_start(move |file| status(format!("Uploading {}", file.name)))
                .on_success(move |file| status(format!("{} stored", file.name)))
                .on_error(move |message| {
                    console_warn!("[AdminConsole] Contract upload failed: {}", message);
                    status(format!("Upload failed: {}", message));
                })
                .on_remove(move || status("Contract removed".to_string())),
        }
    });
    let fields = vec![
        FieldDescriptor::text("name", "Customer name").required().max_length(120),
        FieldDescriptor::text("tax_id", "Tax ID")
            .placeholder("e.g. PL1234567890")
            .min_length(5),
        FieldDescriptor::email("billing.email", "Billing email").required(),
        FieldDescriptor::text("billing.city", "City"),
        FieldDescriptor::select("payment_terms", "Payment terms", payment_terms())
            .default_value(json!("net30"))
            .required(),
        FieldDescriptor::number("credit_limit", "Credit limit")
            .min(0.0)
            .step(100.0)
            .help_text("Leave empty for no limit"),
        FieldDescriptor::file("contract", "Signed contract", attachments),
        FieldDescriptor::textarea("notes", "Notes", 4).max_length(1000),
        FieldDescriptor::text("tenant_id", "Tenant")
            .hidden()
            .default_value(json!(user.tenant_id)),
    ];
    let on_submit = use_hook(|| OnSubmit::new(ResourceSubmitter::create(client.clone(), "customers")));

    rsx! {
        FormBuilder {
            title: "New customer".to_string(),
            fields,
            on_submit,
            submit_label: "Create customer".to_string(),
            success_message: "Customer created".to_string(),
        }
        if let Some(status) = contract_status() {
            p { class: "upload-status", role: "status", "{status}" }
        }
    }
}

#[component]
fn SupplierSection() -> Element {
    let client = use_context::<RestClient>();
    let steps = vec![
        Step::new(
            "company",
            "Company",
            vec![
                FieldDescriptor::text("company.name", "Legal name").required(),
                FieldDescriptor::text("company.registration", "Registration number").required(),
                FieldDescriptor::date("company.founded", "Founded"),
            ],
        )
        .description("Who are we paying?"),
        Step::new(
            "contact",
            "Contact",
            vec![
                FieldDescriptor::text("contact.name", "Contact person").required(),
                FieldDescriptor::email("contact.email", "Email").required(),
                FieldDescriptor::new("contact.phone", "Phone", FieldKind::from_type_str("tel")),
            ],
        ),
        Step::new(
            "banking",
            "Banking",
            vec![
                FieldDescriptor::text("bank.iban", "IBAN").required().min_length(15),
                FieldDescriptor::select("bank.terms", "Payment terms", payment_terms())
                    .default_value(json!("net30")),
            ],
        )
        .schema(SchemaRef::new(RuleSchema::new().field(
            "bank.iban",
            "IBAN",
            vec![
                Rule::Required,
                Rule::Custom(std::rc::Rc::new(|value: Option<&Value>, _all: &FormValues| {
                    let iban = value.and_then(Value::as_str).unwrap_or_default();
                    (!iban.chars().take(2).all(|c| c.is_ascii_alphabetic()))
                        .then(|| "IBAN must start with a country code".to_string())
                })),
            ],
        ))),
    ];
    let on_submit = use_hook(|| OnSubmit::new(ResourceSubmitter::create(client.clone(), "suppliers")));

    rsx! {
        MultiStepForm {
            title: "Supplier onboarding".to_string(),
            steps,
            on_submit,
            submit_label: "Register supplier".to_string(),
            success_message: "Supplier registered".to_string(),
        }
    }
}

fn render_amount_field(context: CustomFieldContext) -> Element {
    let current = context
        .value
        .as_ref()
        .and_then(Value::as_f64)
        .map(|n| format!("{:.2}", n))
        .unwrap_or_default();
    let on_input = context.on_input;
    rsx! {
        div {
            class: "amount-field",
            span { class: "amount-currency", "PLN" }
            input {
                id: "{context.name}",
                class: if context.error.is_some() { "input-field input-invalid" } else { "input-field" },
                r#type: "text",
                inputmode: "decimal",
                value: "{current}",
                disabled: context.disabled,
                onchange: move |evt: FormEvent| {
                    let raw = evt.value().replace(',', ".");
                    match raw.trim().parse::<f64>() {
                        Ok(amount) => on_input.call(json!(amount)),
                        Err(_) => on_input.call(Value::String(raw)),
                    }
                },
            }
        }
    }
}

#[component]
fn JournalSection() -> Element {
    let client = use_context::<RestClient>();
    let fields = vec![
        FieldDescriptor::date("entry_date", "Entry date").required(),
        FieldDescriptor::text("reference", "Reference").required(),
        FieldDescriptor::custom("amount", "Amount", render_amount_field)
            .required()
            .min(0.01),
        FieldDescriptor::text("account", "Account").on_change(|path, values| {
            console_info!("[AdminConsole] {} changed, {} values in draft", path, values.len());
        }),
        FieldDescriptor::textarea("memo", "Memo", 3),
    ];
    let schema = SchemaRef::new(RuleSchema::from_fields(&fields));
    let on_submit = use_hook(|| OnSubmit::new(ResourceSubmitter::create(client.clone(), "journal-drafts")));

    rsx! {
        AutosaveForm {
            title: "Journal entry draft".to_string(),
            schema,
            fields,
            on_submit,
            storage_key: "journal-entry-draft".to_string(),
            submit_label: "Save draft".to_string(),
        }
    }
}

#[component]
fn CostCenterSection() -> Element {
    let client = use_context::<RestClient>();
    let notifier = use_notifier();
    let form = use_signal(|| {
        FormState::new(
            as_form_values(json!({"company_id": "", "division_id": "", "department_id": "", "name": ""}))
                .unwrap_or_default(),
        )
    });
    let companies = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move {
                match client.list_options("companies", &[], "id", "name").await {
                    Ok(options) => options,
                    Err(e) => {
                        console_warn!("[AdminConsole] Could not load companies: {}", e);
                        Vec::new()
                    }
                }
            }
        }
    });
    let source = use_hook(|| {
        OptionsSourceRef::new(
            ResourceOptions::new(client.clone())
                .route("division_id", OptionsRoute::new("divisions", "company_id"))
                .route("department_id", OptionsRoute::new("departments", "division_id")),
        )
    });
    let handler = use_hook(|| OnSubmit::new(ResourceSubmitter::create(client.clone(), "cost-centers")));
    let schema = use_hook(|| {
        SchemaRef::new(
            RuleSchema::new()
                .field("company_id", "Company", vec![Rule::Required])
                .field("division_id", "Division", vec![Rule::Required])
                .field("department_id", "Department", vec![Rule::Required])
                .field("name", "Cost center name", vec![Rule::Required, Rule::MaxLength(60)]),
        )
    });

    let root_options = companies.read().clone().unwrap_or_default();
    let submitting = form.read().is_submitting;

    rsx! {
        div {
            class: "cost-center-form",
            h2 { class: "form-title", "New cost center" }
            CascadingSelects {
                form,
                levels: vec![
                    CascadeLevel::new("company_id", "Company"),
                    CascadeLevel::new("division_id", "Division"),
                    CascadeLevel::new("department_id", "Department"),
                ],
                root_options,
                source,
            }
            FormField {
                field: FieldDescriptor::text("name", "Cost center name").required(),
                form,
            }
            div {
                class: "button-section",
                button {
                    class: "submit-button",
                    r#type: "button",
                    disabled: submitting,
                    onclick: move |_| {
                        let schema = schema.clone();
                        let handler = handler.clone();
                        let notifier = notifier.clone();
                        spawn(async move {
                            let options = SubmitOptions {
                                success_message: "Cost center created".to_string(),
                                ..SubmitOptions::default()
                            };
                            submit_form(&form, Some(&schema), &handler, &notifier, &options).await;
                        });
                    },
                    if submitting { "Saving..." } else { "Create cost center" }
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct TaxCode {
    id: String,
    summary: RecordSummary,
    rate: f64,
}

#[component]
fn TaxCodesSection() -> Element {
    let client = use_context::<RestClient>();
    let notifier = use_notifier();
    let mut codes = use_signal(|| {
        vec![
            TaxCode {
                id: "vat-23".to_string(),
                summary: RecordSummary::new("Standard VAT").protected(),
                rate: 23.0,
            },
            TaxCode {
                id: "vat-8".to_string(),
                summary: RecordSummary::new("Reduced VAT"),
                rate: 8.0,
            },
            TaxCode {
                id: "vat-5".to_string(),
                summary: RecordSummary::new("Super-reduced VAT"),
                rate: 5.0,
            },
        ]
    });
    let mut pending_delete = use_signal(|| None::<TaxCode>);

    rsx! {
        div {
            class: "tax-codes",
            h2 { class: "form-title", "Tax codes" }
            table {
                class: "record-table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Rate" }
                        th {}
                    }
                }
                tbody {
                    for code in codes() {
                        tr {
                            key: "{code.id}",
                            td { "{code.summary.label}" }
                            td { "{code.rate}%" }
                            td {
                                button {
                                    class: "danger-button",
                                    r#type: "button",
                                    onclick: {
                                        let code = code.clone();
                                        move |_| pending_delete.set(Some(code.clone()))
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }

            if let Some(code) = pending_delete() {
                ConfirmDialog {
                    record: code.summary.clone(),
                    on_cancel: move |_| pending_delete.set(None),
                    on_confirm: {
                        let code = code.clone();
                        move |_| {
                            let client = client.clone();
                            let notifier = notifier.clone();
                            let code = code.clone();
                            pending_delete.set(None);
                            spawn(async move {
                                match client.delete("tax-codes", &code.id).await {
                                    Ok(()) => {
                                        codes.with_mut(|list| list.retain(|c| c.id != code.id));
                                        notifier.notify(Notification::success(format!(
                                            "{} deleted",
                                            code.summary.label
                                        )));
                                    }
                                    Err(e) => {
                                        console_error!("[AdminConsole] Delete of {} failed: {}", code.id, e);
                                        notifier.notify(Notification::error(format!(
                                            "Could not delete {}",
                                            code.summary.label
                                        )));
                                    }
                                }
                            });
                        }
                    },
                }
            }
        }
    }
}
