use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::Validate;

use super::{required, total_value, EntityForm, FormMode};
use crate::client::LaborApi;
use crate::errors::ServiceError;
use crate::models::{reorder::ReorderPayload, Reorder};
use crate::validation::{money, EntityKind, FormState};

/// Add/edit reorder form with a live `qty × unit_cost` total.
#[derive(Debug, Clone)]
pub struct ReorderForm {
    state: FormState,
    mode: FormMode,
}

impl Default for ReorderForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ReorderForm {
    pub fn new() -> Self {
        Self {
            state: FormState::new(EntityKind::Reorder),
            mode: FormMode::Create,
        }
    }

    pub fn edit(reorder: &Reorder) -> Result<Self, ServiceError> {
        let mut state = FormState::new(EntityKind::Reorder);
        state.prefill("order_id", reorder.order_id.clone())?;
        state.prefill("item_id", reorder.item_id.clone())?;
        state.prefill("unit_cost", reorder.unit_cost.to_string())?;
        state.prefill("qty", reorder.qty.to_string())?;
        state.prefill("requested_by", reorder.requested_by.clone())?;
        state.lock("order_id")?;
        Ok(Self {
            state,
            mode: FormMode::Update,
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Current total; zero until both factors parse.
    pub fn total(&self) -> Decimal {
        money::live_total(self.state.value("qty"), self.state.value("unit_cost"))
    }

    /// Read-only display of [`total`](Self::total), e.g. `1,806.00`.
    pub fn total_display(&self) -> String {
        money::format_money(self.total())
    }

    /// Flags `order_id` when the backend already knows it (create only).
    pub async fn verify_unique<A: LaborApi + ?Sized>(&mut self, api: &A) -> Result<bool, ServiceError> {
        if self.mode == FormMode::Update || self.state.error("order_id").is_some() {
            return Ok(self.state.error("order_id").is_none());
        }
        let id = self.state.value("order_id").trim().to_string();
        if id.is_empty() {
            return Ok(false);
        }
        if api.order_id_exists(&id).await? {
            self.state.set_error("order_id", "Order ID already exists")?;
            return Ok(false);
        }
        Ok(true)
    }
}

impl EntityForm for ReorderForm {
    type Payload = ReorderPayload;

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn build(&self) -> Result<ReorderPayload, ServiceError> {
        let s = &self.state;
        let qty = required(s, "qty", s.quantity("qty"))?;
        let unit_cost = required(s, "unit_cost", s.money("unit_cost"))?;
        let payload = ReorderPayload {
            order_id: s.value("order_id").trim().to_string(),
            item_id: s.value("item_id").trim().to_string(),
            unit_cost,
            qty,
            tot_value: total_value(qty, unit_cost)?,
            requested_by: s.value("requested_by").trim().to_string(),
        };
        payload.validate()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn filled() -> ReorderForm {
        let mut form = ReorderForm::new();
        form.enter("order_id", "RO-001", today()).unwrap();
        form.enter("item_id", "ITM-001", today()).unwrap();
        form.enter("qty", "12", today()).unwrap();
        form.enter("unit_cost", "150.50", today()).unwrap();
        form.enter("requested_by", "Ruwan", today()).unwrap();
        form
    }

    #[test]
    fn live_total_is_formatted() {
        let form = filled();
        assert_eq!(form.total(), dec!(1806.00));
        assert_eq!(form.total_display(), "1,806.00");
    }

    #[test]
    fn changing_cost_recomputes_total() {
        let mut form = filled();
        form.enter("unit_cost", "200", today()).unwrap();
        assert_eq!(form.total_display(), "2,400.00");
    }

    #[test]
    fn oversized_keystrokes_show_zero_total() {
        let mut form = ReorderForm::new();
        form.input("qty", "4000000000", today()).unwrap();
        form.input("unit_cost", "79228162514264337593543950335", today()).unwrap();
        assert_eq!(form.total(), Decimal::ZERO);
        assert_eq!(form.total_display(), "0.00");
    }

    #[test]
    fn submit_sends_raw_total() {
        let mut form = filled();
        let payload = form.submit(today()).unwrap();
        assert_eq!(payload.tot_value, dec!(1806.00));
        assert_eq!(payload.qty, 12);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["tot_value"], serde_json::json!(1806.0));
    }

    #[test]
    fn incomplete_form_blocks_submission() {
        let mut form = ReorderForm::new();
        form.enter("order_id", "RO-001", today()).unwrap();
        assert!(!form.can_submit());
        assert!(matches!(form.submit(today()), Err(ServiceError::InvalidFields(_))));
    }

    #[test]
    fn edit_locks_order_id() {
        let reorder = Reorder {
            order_id: "RO-001".into(),
            item_id: "ITM-001".into(),
            unit_cost: dec!(150.5),
            qty: 12,
            tot_value: dec!(1806),
            requested_by: "Ruwan".into(),
            created_at: None,
        };
        let mut form = ReorderForm::edit(&reorder).unwrap();
        assert!(form.input("order_id", "RO-002", today()).is_err());
        assert_eq!(form.total_display(), "1,806.00");
        assert_eq!(form.submit(today()).unwrap().order_id, "RO-001");
    }
}
