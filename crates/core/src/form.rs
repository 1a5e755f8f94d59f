//! Inventory form controller.
//!
//! Holds the raw form input, keeps `category` consistent with the selected
//! warehouse, validates every rule at once and assembles the create/update
//! payload. The controller performs no I/O: submission hands an
//! [`SubmitRequest`] to a caller-supplied callback.
//!
//! # Phases
//!
//! ```text
//! Idle ──edit/quick item──▶ Editing ──submit──▶ Validating ─┬─▶ ValidationFailed
//!   ▲                                                        └─▶ Submitting
//!   └──────── create succeeded ◀────────────────────────────────────┤
//!                                   Closed ◀── update succeeded ────┘
//! ```

use std::collections::BTreeMap;
use std::convert::Infallible;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::QuickItem;
use crate::types::{
    InventoryItem, ItemDraft, ItemId, ItemStatus, Sku, SupplierInfo, Unit, UnitParseError,
    Warehouse,
};

/// Longest accepted supplier email (RFC 5321).
const MAX_EMAIL_LENGTH: usize = 254;

/// Whether the form creates a new item or replaces an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ItemId),
}

/// Where the form is in its submit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormPhase {
    /// Blank form.
    Idle,
    /// Populated from an existing item, a quick item, or user input.
    Editing,
    /// Rules are being checked.
    Validating,
    /// Payload handed to the caller; further submits are refused.
    Submitting,
    /// At least one rule failed; see [`InventoryForm::errors`].
    ValidationFailed,
    /// An update succeeded and the form should be dismissed.
    Closed,
}

/// A form field that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FormField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "quantity")]
    Quantity,
    #[serde(rename = "unit")]
    Unit,
    #[serde(rename = "threshold")]
    Threshold,
    #[serde(rename = "supplierInfo")]
    Supplier,
    #[serde(rename = "supplierEmail")]
    SupplierEmail,
    #[serde(rename = "unitPrice")]
    UnitPrice,
}

impl FormField {
    /// Key the UI uses to attach the message to an input.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Quantity => "quantity",
            Self::Unit => "unit",
            Self::Threshold => "threshold",
            Self::Supplier => "supplierInfo",
            Self::SupplierEmail => "supplierEmail",
            Self::UnitPrice => "unitPrice",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation messages, one per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    /// Failing fields in display order.
    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    fn remove(&mut self, field: FormField) {
        self.0.remove(&field);
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Why a submission did not go through.
#[derive(Debug, Error)]
pub enum SubmitError<E = Infallible> {
    /// One or more fields failed validation; nothing was sent.
    #[error("form has invalid fields: {0}")]
    Invalid(FieldErrors),

    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    InFlight,

    /// The submit callback failed; input is kept for a retry.
    #[error("submission failed: {0}")]
    Rejected(E),
}

impl SubmitError {
    fn widen<E>(self) -> SubmitError<E> {
        match self {
            Self::Invalid(errors) => SubmitError::Invalid(errors),
            Self::InFlight => SubmitError::InFlight,
            Self::Rejected(never) => match never {},
        }
    }
}

/// Payload handed to the submit callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    /// `POST /inventory`.
    Create(ItemDraft),
    /// `PUT /inventory/{id}`, full-record replace.
    Update { id: ItemId, draft: ItemDraft },
}

impl SubmitRequest {
    #[must_use]
    pub const fn draft(&self) -> &ItemDraft {
        match self {
            Self::Create(draft) | Self::Update { draft, .. } => draft,
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Item created; the form was reset to blank defaults.
    Created,
    /// Item updated; the caller should close the form.
    Updated(ItemId),
}

/// Raw form input.
///
/// Counts are signed so that a negative entry can be held and reported
/// instead of being clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub sku: Option<Sku>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    pub threshold: i64,
    pub max_stock_level: Option<u32>,
    pub supplier: SupplierInfo,
    pub unit_price: Option<Decimal>,
    pub status: ItemStatus,
}

impl FormFields {
    /// Blank input for `warehouse`.
    #[must_use]
    pub fn blank(warehouse: Warehouse) -> Self {
        Self {
            sku: None,
            name: String::new(),
            description: String::new(),
            category: warehouse.default_category().to_owned(),
            quantity: 0,
            unit: Unit::default().as_str().to_owned(),
            threshold: 0,
            max_stock_level: None,
            supplier: SupplierInfo::default(),
            unit_price: None,
            status: ItemStatus::default(),
        }
    }

    fn from_item(item: &InventoryItem) -> Self {
        Self {
            sku: item.sku.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            quantity: i64::from(item.quantity),
            unit: item.unit.as_str().to_owned(),
            threshold: i64::from(item.threshold),
            max_stock_level: item.max_stock_level,
            supplier: item.supplier.clone(),
            unit_price: item.unit_price,
            status: item.status,
        }
    }
}

/// Stateful create/edit form for a single inventory item.
#[derive(Debug, Clone)]
pub struct InventoryForm {
    mode: FormMode,
    warehouse: Warehouse,
    fields: FormFields,
    errors: FieldErrors,
    phase: FormPhase,
    /// Phase to return to when a submission fails.
    resume: FormPhase,
}

impl InventoryForm {
    /// Blank create form for `warehouse`.
    #[must_use]
    pub fn new(warehouse: Warehouse) -> Self {
        Self {
            mode: FormMode::Create,
            warehouse,
            fields: FormFields::blank(warehouse),
            errors: FieldErrors::default(),
            phase: FormPhase::Idle,
            resume: FormPhase::Idle,
        }
    }

    /// Edit form populated from an existing item.
    #[must_use]
    pub fn edit(item: &InventoryItem) -> Self {
        Self {
            mode: FormMode::Edit(item.id.clone()),
            warehouse: item.warehouse,
            fields: FormFields::from_item(item),
            errors: FieldErrors::default(),
            phase: FormPhase::Editing,
            resume: FormPhase::Editing,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    #[must_use]
    pub const fn phase(&self) -> FormPhase {
        self.phase
    }

    #[must_use]
    pub const fn warehouse(&self) -> Warehouse {
        self.warehouse
    }

    #[must_use]
    pub const fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Errors from the last failed validation.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the submit control should be disabled.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Mutable access to the input. A blank form becomes `Editing`.
    pub fn fields_mut(&mut self) -> &mut FormFields {
        if self.phase == FormPhase::Idle {
            self.phase = FormPhase::Editing;
        }
        &mut self.fields
    }

    /// Switch warehouse and re-derive the category.
    ///
    /// Create forms always reset to the new warehouse's first category.
    /// Edit forms keep the current category when it is still valid.
    pub fn set_warehouse(&mut self, warehouse: Warehouse) {
        self.warehouse = warehouse;
        let keep = matches!(self.mode, FormMode::Edit(_))
            && warehouse.has_category(&self.fields.category);
        if !keep {
            self.fields.category = warehouse.default_category().to_owned();
        }
        self.errors.remove(FormField::Category);
    }

    /// Populate name, category, unit and warehouse from a template.
    pub fn apply_quick_item(&mut self, item: &QuickItem) {
        self.warehouse = item.warehouse;
        self.fields.name = item.name.to_owned();
        self.fields.category = item.category.to_owned();
        self.fields.unit = item.unit.as_str().to_owned();
        for field in [FormField::Name, FormField::Category, FormField::Unit] {
            self.errors.remove(field);
        }
        if self.phase == FormPhase::Idle {
            self.phase = FormPhase::Editing;
        }
    }

    /// Discard all input and return to a blank form for the current warehouse.
    pub fn reset(&mut self) {
        self.mode = FormMode::Create;
        self.fields = FormFields::blank(self.warehouse);
        self.errors = FieldErrors::default();
        self.phase = FormPhase::Idle;
        self.resume = FormPhase::Idle;
    }

    /// Check every rule and build the payload.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once, never just the first.
    pub fn validate(&self) -> Result<ItemDraft, FieldErrors> {
        let f = &self.fields;
        let mut errors = FieldErrors::default();

        if f.name.trim().is_empty() {
            errors.insert(FormField::Name, "Item name is required");
        }

        let category = f.category.trim();
        if category.is_empty() {
            errors.insert(FormField::Category, "Category is required");
        } else if !self.warehouse.has_category(category) {
            errors.insert(
                FormField::Category,
                format!(
                    "{category} is not stocked in {}",
                    self.warehouse.display_name()
                ),
            );
        }

        let quantity = check_count(&mut errors, FormField::Quantity, "Quantity", f.quantity);

        let unit = match f.unit.parse::<Unit>() {
            Ok(unit) => Some(unit),
            Err(UnitParseError::Empty) => {
                errors.insert(FormField::Unit, "Unit is required");
                None
            }
            Err(UnitParseError::Unknown(unit)) => {
                errors.insert(FormField::Unit, format!("Unknown unit: {unit}"));
                None
            }
        };

        let threshold = check_count(&mut errors, FormField::Threshold, "Threshold", f.threshold);

        if f.supplier.name.trim().is_empty() {
            errors.insert(FormField::Supplier, "Supplier name is required");
        }
        let email = f.supplier.email.trim();
        if !email.is_empty() && !is_plausible_email(email) {
            errors.insert(FormField::SupplierEmail, "Supplier email is not valid");
        }

        if f.unit_price.is_some_and(|price| price.is_sign_negative()) {
            errors.insert(FormField::UnitPrice, "Unit price cannot be negative");
        }

        match (quantity, unit, threshold) {
            (Some(quantity), Some(unit), Some(threshold)) if errors.is_empty() => Ok(ItemDraft {
                sku: f.sku.clone(),
                name: f.name.trim().to_owned(),
                description: f.description.trim().to_owned(),
                category: category.to_owned(),
                quantity,
                unit,
                threshold,
                max_stock_level: f.max_stock_level,
                warehouse: self.warehouse,
                supplier: trimmed_supplier(&f.supplier),
                unit_price: f.unit_price,
                status: f.status,
            }),
            _ => Err(errors),
        }
    }

    /// Validate and move to `Submitting`.
    ///
    /// # Errors
    ///
    /// `InFlight` while a submission is pending; `Invalid` (and phase
    /// `ValidationFailed`) when any rule fails.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SubmitError> {
        if self.phase == FormPhase::Submitting {
            return Err(SubmitError::InFlight);
        }
        if self.phase != FormPhase::ValidationFailed {
            self.resume = self.phase;
        }
        self.phase = FormPhase::Validating;

        match self.validate() {
            Ok(draft) => {
                self.errors = FieldErrors::default();
                self.phase = FormPhase::Submitting;
                Ok(match &self.mode {
                    FormMode::Create => SubmitRequest::Create(draft),
                    FormMode::Edit(id) => SubmitRequest::Update {
                        id: id.clone(),
                        draft,
                    },
                })
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.phase = FormPhase::ValidationFailed;
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    /// Record that the pending submission was saved.
    ///
    /// Returns `None` when no submission is pending.
    pub fn complete_submit(&mut self) -> Option<SubmitOutcome> {
        (self.phase == FormPhase::Submitting).then(|| self.complete())
    }

    /// Record that the pending submission failed. The input is kept and
    /// the form returns to the phase it was in before submitting.
    ///
    /// Returns `false` when no submission is pending.
    pub fn fail_submit(&mut self) -> bool {
        let pending = self.phase == FormPhase::Submitting;
        if pending {
            self.phase = self.resume;
        }
        pending
    }

    /// Validate, hand the payload to `callback`, and apply its result.
    ///
    /// # Errors
    ///
    /// `Invalid` or `InFlight` before the callback runs, `Rejected` with the
    /// callback's error afterwards.
    pub async fn submit<F, Fut, E>(&mut self, callback: F) -> Result<SubmitOutcome, SubmitError<E>>
    where
        F: FnOnce(SubmitRequest) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let request = self.begin_submit().map_err(SubmitError::<Infallible>::widen)?;
        match callback(request).await {
            Ok(()) => Ok(self.complete()),
            Err(e) => {
                self.fail_submit();
                Err(SubmitError::Rejected(e))
            }
        }
    }

    fn complete(&mut self) -> SubmitOutcome {
        match self.mode.clone() {
            FormMode::Create => {
                self.reset();
                SubmitOutcome::Created
            }
            FormMode::Edit(id) => {
                self.phase = FormPhase::Closed;
                SubmitOutcome::Updated(id)
            }
        }
    }
}

fn check_count(errors: &mut FieldErrors, field: FormField, label: &str, value: i64) -> Option<u32> {
    if value < 0 {
        errors.insert(field, format!("{label} cannot be negative"));
        return None;
    }
    u32::try_from(value).map_or_else(
        |_| {
            errors.insert(field, format!("{label} is too large"));
            None
        },
        Some,
    )
}

fn trimmed_supplier(supplier: &SupplierInfo) -> SupplierInfo {
    SupplierInfo {
        name: supplier.name.trim().to_owned(),
        contact: supplier.contact.trim().to_owned(),
        phone: supplier.phone.trim().to_owned(),
        email: supplier.email.trim().to_owned(),
        address: supplier.address.trim().to_owned(),
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::find_quick_item;
    use crate::types::item::fixtures::rebar;

    fn valid_create_form() -> InventoryForm {
        let mut form = InventoryForm::new(Warehouse::Aggregates);
        let fields = form.fields_mut();
        fields.name = "Portland Cement 50kg".to_string();
        fields.category = "Cement".to_string();
        fields.quantity = 200;
        fields.unit = "bags".to_string();
        fields.threshold = 40;
        fields.supplier.name = "Bamburi".to_string();
        form
    }

    #[test]
    fn test_new_form_defaults_category() {
        let form = InventoryForm::new(Warehouse::Metals);
        assert_eq!(form.phase(), FormPhase::Idle);
        assert_eq!(form.fields().category, "Steel & Reinforcement");
        assert_eq!(form.mode(), &FormMode::Create);
    }

    #[test]
    fn test_scenario_four_field_errors() {
        let mut form = InventoryForm::new(Warehouse::Aggregates);
        let fields = form.fields_mut();
        fields.name = String::new();
        fields.category = "Cement".to_string();
        fields.quantity = -1;
        fields.unit = String::new();
        fields.threshold = 5;
        fields.supplier = SupplierInfo::named("");

        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                FormField::Name,
                FormField::Quantity,
                FormField::Unit,
                FormField::Supplier
            ]
        );
        let keys: Vec<_> = fields.iter().map(|f| f.as_str()).collect();
        assert_eq!(keys, ["name", "quantity", "unit", "supplierInfo"]);
    }

    #[test]
    fn test_validation_collects_everything() {
        let mut form = valid_create_form();
        let fields = form.fields_mut();
        fields.name = "   ".to_string();
        fields.quantity = -3;
        fields.threshold = -1;
        fields.unit = "bushels".to_string();
        fields.supplier.email = "not-an-email".to_string();
        fields.unit_price = Some(Decimal::new(-1, 0));

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get(FormField::Unit), Some("Unknown unit: bushels"));
        assert_eq!(
            errors.get(FormField::Threshold),
            Some("Threshold cannot be negative")
        );
        assert!(errors.contains(FormField::SupplierEmail));
        assert!(errors.contains(FormField::UnitPrice));
    }

    #[test]
    fn test_count_too_large_is_rejected_not_clamped() {
        let mut form = valid_create_form();
        form.fields_mut().quantity = i64::from(u32::MAX) + 1;
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(FormField::Quantity), Some("Quantity is too large"));
    }

    #[test]
    fn test_category_must_match_warehouse() {
        let mut form = valid_create_form();
        form.fields_mut().category = "Roofing Sheets".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(FormField::Category),
            Some("Roofing Sheets is not stocked in Aggregates & Cement Warehouse")
        );
    }

    #[test]
    fn test_valid_form_builds_trimmed_draft() {
        let mut form = valid_create_form();
        form.fields_mut().name = "  Portland Cement 50kg ".to_string();
        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Portland Cement 50kg");
        assert_eq!(draft.unit, Unit::Bags);
        assert_eq!(draft.quantity, 200);
        assert_eq!(draft.warehouse, Warehouse::Aggregates);
    }

    #[test]
    fn test_warehouse_change_resets_category_on_create() {
        let mut form = InventoryForm::new(Warehouse::Aggregates);
        form.fields_mut().category = "Fine Sand".to_string();
        form.set_warehouse(Warehouse::Metals);
        assert_eq!(
            form.fields().category,
            Warehouse::Metals.default_category()
        );
    }

    #[test]
    fn test_warehouse_change_resets_even_when_still_valid_on_create() {
        let mut form = InventoryForm::new(Warehouse::Metals);
        form.fields_mut().category = "Wire & Mesh".to_string();
        form.set_warehouse(Warehouse::Metals);
        assert_eq!(form.fields().category, "Steel & Reinforcement");
    }

    #[test]
    fn test_warehouse_change_on_edit_keeps_valid_category() {
        let mut item = rebar();
        item.category = "Wire & Mesh".to_string();
        let mut form = InventoryForm::edit(&item);
        form.set_warehouse(Warehouse::Metals);
        assert_eq!(form.fields().category, "Wire & Mesh");

        form.set_warehouse(Warehouse::Paint);
        assert_eq!(form.fields().category, "Paints");
    }

    #[test]
    fn test_default_category_valid_for_every_warehouse() {
        for from in Warehouse::ALL {
            for to in Warehouse::ALL {
                let mut form = InventoryForm::new(from);
                form.set_warehouse(to);
                assert!(to.has_category(&form.fields().category));
                assert!(
                    to.categories().contains(&form.fields().category.as_str()),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_warehouse_change_clears_category_error() {
        let mut form = valid_create_form();
        form.fields_mut().category = String::new();
        assert!(form.begin_submit().is_err());
        assert!(form.errors().contains(FormField::Category));

        form.set_warehouse(Warehouse::Hardware);
        assert!(!form.errors().contains(FormField::Category));
    }

    #[test]
    fn test_quick_item_populates_form() {
        let template = find_quick_item("Rebar Y12").unwrap();
        let mut form = InventoryForm::new(Warehouse::Aggregates);
        form.apply_quick_item(template);

        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.warehouse(), Warehouse::Metals);
        assert_eq!(form.fields().name, "Rebar Y12");
        assert_eq!(form.fields().category, "Steel & Reinforcement");
        assert_eq!(form.fields().unit, "pieces");
        assert_eq!(form.mode(), &FormMode::Create);
    }

    #[test]
    fn test_begin_submit_refuses_duplicates() {
        let mut form = valid_create_form();
        let request = form.begin_submit().unwrap();
        assert!(matches!(request, SubmitRequest::Create(_)));
        assert!(form.is_submitting());
        assert!(matches!(form.begin_submit(), Err(SubmitError::InFlight)));
    }

    #[test]
    fn test_failed_validation_sets_phase() {
        let mut form = valid_create_form();
        form.fields_mut().name.clear();
        let err = form.begin_submit().unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(ref e) if e.contains(FormField::Name)));
        assert_eq!(form.phase(), FormPhase::ValidationFailed);
        assert_eq!(form.errors().len(), 1);
    }

    #[test]
    fn test_create_success_resets_for_current_warehouse() {
        let mut form = valid_create_form();
        form.set_warehouse(Warehouse::Hardware);
        form.fields_mut().category = "Fasteners".to_string();
        form.begin_submit().unwrap();

        assert_eq!(form.complete_submit(), Some(SubmitOutcome::Created));
        assert_eq!(form.phase(), FormPhase::Idle);
        assert_eq!(form.fields(), &FormFields::blank(Warehouse::Hardware));
    }

    #[test]
    fn test_edit_success_closes() {
        let item = rebar();
        let mut form = InventoryForm::edit(&item);
        let request = form.begin_submit().unwrap();
        assert!(matches!(request, SubmitRequest::Update { ref id, .. } if *id == item.id));

        assert_eq!(
            form.complete_submit(),
            Some(SubmitOutcome::Updated(item.id))
        );
        assert_eq!(form.phase(), FormPhase::Closed);
    }

    #[test]
    fn test_failure_keeps_input() {
        let mut form = valid_create_form();
        let before = form.fields().clone();
        form.begin_submit().unwrap();
        assert!(form.fail_submit());
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.fields(), &before);
    }

    #[test]
    fn test_no_pending_submission_to_resolve() {
        let mut form = valid_create_form();
        assert_eq!(form.complete_submit(), None);
        assert!(!form.fail_submit());
    }

    #[tokio::test]
    async fn test_submit_invokes_callback_with_payload() {
        let mut form = valid_create_form();
        let mut seen = None;
        let outcome = form
            .submit(|request| {
                seen = Some(request);
                async { Ok::<(), String>(()) }
            })
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Created);
        let draft = seen.unwrap();
        assert_eq!(draft.draft().name, "Portland Cement 50kg");
    }

    #[tokio::test]
    async fn test_submit_rejected_keeps_editing() {
        let mut form = valid_create_form();
        let err = form
            .submit(|_| async { Err::<(), _>("backend down".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(ref msg) if msg == "backend down"));
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.fields().name, "Portland Cement 50kg");
        assert!(!form.fail_submit());

        let outcome = form
            .submit(|_| async { Ok::<(), String>(()) })
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Created);
        assert_eq!(form.phase(), FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_submit_invalid_never_calls_back() {
        let mut form = InventoryForm::new(Warehouse::Aggregates);
        let mut called = false;
        let err = form
            .submit(|_| {
                called = true;
                async { Ok::<(), String>(()) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(_)));
        assert!(!called);
    }

    #[test]
    fn test_plausible_email() {
        assert!(is_plausible_email("orders@supplier.co.ke"));
        assert!(!is_plausible_email("orders@supplier"));
        assert!(!is_plausible_email("@supplier.com"));
        assert!(!is_plausible_email("a b@supplier.com"));
        assert!(!is_plausible_email("a@b@c.com"));
    }

    #[test]
    fn test_field_errors_display() {
        let mut form = valid_create_form();
        form.fields_mut().name.clear();
        form.fields_mut().quantity = -1;
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "name: Item name is required; quantity: Quantity cannot be negative"
        );
    }
}
