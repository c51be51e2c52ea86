use chrono::NaiveDate;

use super::{reconcile_reserved, required, EntityForm, FormMode, ReservedPolicy};
use crate::client::LaborApi;
use crate::errors::ServiceError;
use crate::models::CocoProduct;
use crate::validation::{EntityKind, FormState};

/// Add-product screen and update-product modal.
#[derive(Debug, Clone)]
pub struct CocoProductForm {
    state: FormState,
    mode: FormMode,
    policy: ReservedPolicy,
}

impl Default for CocoProductForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CocoProductForm {
    pub fn new() -> Self {
        Self {
            state: FormState::new(EntityKind::CocoProduct),
            mode: FormMode::Create,
            policy: ReservedPolicy::for_mode(FormMode::Create),
        }
    }

    pub fn edit(product: &CocoProduct) -> Result<Self, ServiceError> {
        let mut state = FormState::new(EntityKind::CocoProduct);
        state.prefill("pro_id", product.pro_id.clone())?;
        state.prefill("pro_name", product.pro_name.clone())?;
        state.prefill("category", product.category.clone())?;
        state.prefill("unit", product.unit.clone())?;
        state.prefill("std_cost", product.std_cost.to_string())?;
        state.prefill("sell_price", product.sell_price.to_string())?;
        state.prefill("qty_on_hand", product.qty_on_hand.to_string())?;
        state.prefill("qty_reserved", product.qty_reserved.to_string())?;
        state.prefill("reorder_level", product.reorder_level.to_string())?;
        if let Some(expire) = product.expire_date {
            state.prefill("expire_date", expire.format("%Y-%m-%d").to_string())?;
        }
        state.lock("pro_id")?;
        Ok(Self {
            state,
            mode: FormMode::Update,
            policy: ReservedPolicy::for_mode(FormMode::Update),
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn policy(&self) -> ReservedPolicy {
        self.policy
    }

    pub async fn verify_unique<A: LaborApi + ?Sized>(&mut self, api: &A) -> Result<bool, ServiceError> {
        if self.mode == FormMode::Update || self.state.error("pro_id").is_some() {
            return Ok(self.state.error("pro_id").is_none());
        }
        let id = self.state.value("pro_id").trim().to_string();
        if id.is_empty() {
            return Ok(false);
        }
        if api.product_id_exists(&id).await? {
            self.state.set_error("pro_id", "Product ID already exists")?;
            return Ok(false);
        }
        Ok(true)
    }
}

impl EntityForm for CocoProductForm {
    type Payload = CocoProduct;

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn reconcile(&mut self, today: NaiveDate) {
        reconcile_reserved(&mut self.state, self.policy, today);
    }

    fn build(&self) -> Result<CocoProduct, ServiceError> {
        let s = &self.state;
        Ok(CocoProduct {
            pro_id: s.value("pro_id").trim().to_string(),
            pro_name: s.value("pro_name").trim().to_string(),
            category: s.value("category").trim().to_string(),
            unit: s.value("unit").trim().to_string(),
            std_cost: required(s, "std_cost", s.money("std_cost"))?,
            sell_price: required(s, "sell_price", s.money("sell_price"))?,
            qty_on_hand: required(s, "qty_on_hand", s.quantity("qty_on_hand"))?,
            qty_reserved: required(s, "qty_reserved", s.quantity("qty_reserved"))?,
            reorder_level: required(s, "reorder_level", s.quantity("reorder_level"))?,
            expire_date: s.date("expire_date"),
        })
    }
}
