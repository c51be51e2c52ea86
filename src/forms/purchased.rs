use chrono::NaiveDate;

use super::{reconcile_reserved, required, EntityForm, FormMode, ReservedPolicy};
use crate::errors::ServiceError;
use crate::models::PurchasedItem;
use crate::validation::{EntityKind, FormState};

#[derive(Debug, Clone)]
pub struct PurchasedItemForm {
    state: FormState,
    mode: FormMode,
    policy: ReservedPolicy,
}

impl Default for PurchasedItemForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PurchasedItemForm {
    pub fn new() -> Self {
        Self {
            state: FormState::new(EntityKind::PurchasedItem),
            mode: FormMode::Create,
            policy: ReservedPolicy::for_mode(FormMode::Create),
        }
    }

    pub fn edit(item: &PurchasedItem) -> Result<Self, ServiceError> {
        let mut state = FormState::new(EntityKind::PurchasedItem);
        state.prefill("item_id", item.item_id.clone())?;
        state.prefill("item_name", item.item_name.clone())?;
        state.prefill("category", item.category.clone())?;
        state.prefill("unit", item.unit.clone())?;
        state.prefill("unit_cost", item.unit_cost.to_string())?;
        state.prefill("qty_on_hand", item.qty_on_hand.to_string())?;
        state.prefill("qty_reserved", item.qty_reserved.to_string())?;
        state.prefill("reorder_level", item.reorder_level.to_string())?;
        if let Some(supplier) = &item.supplier_id {
            state.prefill("supplier_id", supplier.clone())?;
        }
        state.lock("item_id")?;
        Ok(Self {
            state,
            mode: FormMode::Update,
            policy: ReservedPolicy::for_mode(FormMode::Update),
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }
}

impl EntityForm for PurchasedItemForm {
    type Payload = PurchasedItem;

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn reconcile(&mut self, today: NaiveDate) {
        reconcile_reserved(&mut self.state, self.policy, today);
    }

    fn build(&self) -> Result<PurchasedItem, ServiceError> {
        let s = &self.state;
        Ok(PurchasedItem {
            item_id: s.value("item_id").trim().to_string(),
            item_name: s.value("item_name").trim().to_string(),
            category: s.value("category").trim().to_string(),
            unit: s.value("unit").trim().to_string(),
            unit_cost: required(s, "unit_cost", s.money("unit_cost"))?,
            qty_on_hand: required(s, "qty_on_hand", s.quantity("qty_on_hand"))?,
            qty_reserved: required(s, "qty_reserved", s.quantity("qty_reserved"))?,
            reorder_level: required(s, "reorder_level", s.quantity("reorder_level"))?,
            supplier_id: s.opt_value("supplier_id"),
        })
    }
}
