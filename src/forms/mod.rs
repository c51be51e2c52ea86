//! Entity forms built on [`FormState`].
//!
//! Each form owns its raw field values, applies its cross-field rules after
//! every change, and turns a valid state into the payload the backend
//! expects. Submission is all-or-nothing.

pub mod product;
pub mod purchased;
pub mod reorder;
pub mod stock;
pub mod supplier;
pub mod task;
pub mod worker;

pub use product::CocoProductForm;
pub use purchased::PurchasedItemForm;
pub use reorder::ReorderForm;
pub use stock::StockForm;
pub use supplier::SupplierForm;
pub use task::TaskForm;
pub use worker::WorkerForm;

use chrono::NaiveDate;

use crate::errors::ServiceError;
use crate::validation::FormState;

/// Whether a form creates a record or edits one (identifier locked).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// What to do when `qty_reserved` would exceed `qty_on_hand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedPolicy {
    /// Pull reserved down to on-hand without telling the operator.
    Clamp,
    /// Keep the value and show an inline error.
    Reject,
}

impl ReservedPolicy {
    /// Add screens clamp silently; edit screens report the problem.
    pub fn for_mode(mode: FormMode) -> Self {
        match mode {
            FormMode::Create => ReservedPolicy::Clamp,
            FormMode::Update => ReservedPolicy::Reject,
        }
    }
}

pub const RESERVED_ABOVE_ON_HAND: &str = "Reserved quantity cannot exceed quantity on hand";

/// Keeps `0 <= qty_reserved <= qty_on_hand` according to `policy`.
pub(crate) fn reconcile_reserved(state: &mut FormState, policy: ReservedPolicy, today: NaiveDate) {
    let (Some(on_hand), Some(reserved)) = (state.quantity("qty_on_hand"), state.quantity("qty_reserved"))
    else {
        return;
    };
    if reserved <= on_hand {
        if state.error("qty_reserved") == Some(RESERVED_ABOVE_ON_HAND) {
            let _ = state.revalidate("qty_reserved", today);
        }
        return;
    }
    match policy {
        ReservedPolicy::Clamp => {
            let _ = state.prefill("qty_reserved", on_hand.to_string());
            let _ = state.revalidate("qty_reserved", today);
        }
        ReservedPolicy::Reject => {
            let _ = state.set_error("qty_reserved", RESERVED_ABOVE_ON_HAND);
        }
    }
}

/// Shared behaviour of every entity form.
pub trait EntityForm {
    type Payload;

    fn state(&self) -> &FormState;

    fn state_mut(&mut self) -> &mut FormState;

    /// Cross-field rules, run after every change and before submission.
    fn reconcile(&mut self, _today: NaiveDate) {}

    /// Builds the payload from an already validated state.
    fn build(&self) -> Result<Self::Payload, ServiceError>;

    fn input(&mut self, field: &str, raw: &str, today: NaiveDate) -> Result<(), ServiceError> {
        self.state_mut().input(field, raw, today)?;
        self.reconcile(today);
        Ok(())
    }

    fn blur(&mut self, field: &str, today: NaiveDate) -> Result<(), ServiceError> {
        self.state_mut().blur(field, today)?;
        self.reconcile(today);
        Ok(())
    }

    /// Types a whole value and leaves the field.
    fn enter(&mut self, field: &str, raw: &str, today: NaiveDate) -> Result<(), ServiceError> {
        self.input(field, raw, today)?;
        self.blur(field, today)
    }

    fn value(&self, field: &str) -> &str {
        self.state().value(field)
    }

    fn error(&self, field: &str) -> Option<&str> {
        self.state().error(field)
    }

    fn can_submit(&self) -> bool {
        self.state().can_submit()
    }

    /// Validates every field, re-applies cross-field rules and builds the
    /// payload; nothing is produced while any error remains.
    fn submit(&mut self, today: NaiveDate) -> Result<Self::Payload, ServiceError> {
        self.state_mut().validate_all(today);
        self.reconcile(today);
        self.state().check_submittable()?;
        self.build()
    }
}

/// Typed getter that turns a missing value into a field error.
pub(crate) fn required<T>(state: &FormState, field: &str, value: Option<T>) -> Result<T, ServiceError> {
    value.ok_or_else(|| {
        let mut fields = crate::errors::FieldErrors::new();
        fields.insert(
            field.to_string(),
            state
                .error(field)
                .unwrap_or("is required")
                .to_string(),
        );
        ServiceError::InvalidFields(fields)
    })
}

/// `qty × unit_cost` for a payload; an overflowing product is a `unit_cost` error.
pub(crate) fn total_value(qty: u32, unit_cost: rust_decimal::Decimal) -> Result<rust_decimal::Decimal, ServiceError> {
    crate::validation::money::derived_total(qty, unit_cost).ok_or_else(|| {
        let mut fields = crate::errors::FieldErrors::new();
        fields.insert("unit_cost".to_string(), "Total value is too large".to_string());
        ServiceError::InvalidFields(fields)
    })
}

/// Parses a canonical choice label through the type's `FromStr`.
pub(crate) fn choice<T: std::str::FromStr>(state: &FormState, field: &str) -> Result<T, ServiceError> {
    let parsed = crate::models::normalize_label(state.value(field)).parse().ok();
    required(state, field, parsed)
}
