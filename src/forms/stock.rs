use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::Validate;

use super::{choice, required, total_value, EntityForm, FormMode};
use crate::client::LaborApi;
use crate::errors::ServiceError;
use crate::models::{stock::StockPayload, StockMovement, StockType};
use crate::validation::{dates, money, EntityKind, FormState};

/// Stock movement form; `unit_cost` only feeds the total and is not sent.
#[derive(Debug, Clone)]
pub struct StockForm {
    state: FormState,
    mode: FormMode,
    /// On-hand quantity of the referenced item, when known.
    available: Option<u32>,
}

impl StockForm {
    /// New movement dated today.
    pub fn new(today: NaiveDate) -> Self {
        let mut state = FormState::new(EntityKind::StockMovement);
        let _ = state.prefill("date", today.format("%Y-%m-%d").to_string());
        Self {
            state,
            mode: FormMode::Create,
            available: None,
        }
    }

    pub fn edit(movement: &StockMovement) -> Result<Self, ServiceError> {
        let mut state = FormState::new(EntityKind::StockMovement);
        state.prefill("stock_id", movement.stock_id.clone())?;
        state.prefill("item_id", movement.item_id.clone())?;
        state.prefill("category", movement.category.to_string())?;
        state.prefill("type", movement.movement_type.to_string())?;
        state.prefill("reason", movement.reason.clone())?;
        state.prefill("qty", movement.qty.to_string())?;
        if movement.qty > 0 {
            let unit = movement.tot_value / Decimal::from(movement.qty);
            state.prefill("unit_cost", money::truncate_cents(unit).to_string())?;
        }
        state.prefill("date", movement.date.format("%Y-%m-%d").to_string())?;
        state.lock("stock_id")?;
        state.unbound_date("date")?;
        Ok(Self {
            state,
            mode: FormMode::Update,
            available: None,
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Sets the on-hand quantity that bounds outbound movements.
    pub fn set_available(&mut self, on_hand: Option<u32>, today: NaiveDate) {
        self.available = on_hand;
        self.reconcile(today);
    }

    pub fn total(&self) -> Decimal {
        money::live_total(self.state.value("qty"), self.state.value("unit_cost"))
    }

    pub fn total_display(&self) -> String {
        money::format_money(self.total())
    }

    /// First selectable date of the trailing window.
    pub fn earliest_date(today: NaiveDate) -> NaiveDate {
        dates::stock_window_start(today)
    }

    pub async fn verify_unique<A: LaborApi + ?Sized>(&mut self, api: &A) -> Result<bool, ServiceError> {
        if self.mode == FormMode::Update || self.state.error("stock_id").is_some() {
            return Ok(self.state.error("stock_id").is_none());
        }
        let id = self.state.value("stock_id").trim().to_string();
        if id.is_empty() {
            return Ok(false);
        }
        if api.stock_id_exists(&id).await? {
            self.state.set_error("stock_id", "Stock ID already exists")?;
            return Ok(false);
        }
        Ok(true)
    }

    fn is_outbound(&self) -> bool {
        self.state.value("type").trim().parse::<StockType>().ok() == Some(StockType::Out)
    }
}

impl EntityForm for StockForm {
    type Payload = StockPayload;

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn reconcile(&mut self, today: NaiveDate) {
        let qty = self.state.quantity("qty");
        let exceeds = match (self.available, qty) {
            (Some(on_hand), Some(qty)) => self.is_outbound() && qty > on_hand,
            _ => false,
        };
        if exceeds {
            let on_hand = self.available.unwrap_or_default();
            let _ = self.state.set_error(
                "qty",
                format!("Quantity exceeds available stock ({on_hand})"),
            );
        } else if self
            .state
            .error("qty")
            .is_some_and(|e| e.starts_with("Quantity exceeds"))
        {
            let _ = self.state.revalidate("qty", today);
        }
    }

    fn build(&self) -> Result<StockPayload, ServiceError> {
        let s = &self.state;
        let qty = required(s, "qty", s.quantity("qty"))?;
        let unit_cost = required(s, "unit_cost", s.money("unit_cost"))?;
        let payload = StockPayload {
            stock_id: s.value("stock_id").trim().to_string(),
            item_id: s.value("item_id").trim().to_string(),
            category: choice(s, "category")?,
            movement_type: choice(s, "type")?,
            reason: s.value("reason").trim().to_string(),
            qty,
            tot_value: total_value(qty, unit_cost)?,
            date: required(s, "date", s.date("date"))?,
        };
        payload.validate()?;
        Ok(payload)
    }
}
