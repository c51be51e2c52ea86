use super::{EntityForm, FormMode};
use crate::errors::ServiceError;
use crate::models::Supplier;
use crate::validation::{EntityKind, FormState};

#[derive(Debug, Clone)]
pub struct SupplierForm {
    state: FormState,
    mode: FormMode,
}

impl Default for SupplierForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SupplierForm {
    pub fn new() -> Self {
        Self {
            state: FormState::new(EntityKind::Supplier),
            mode: FormMode::Create,
        }
    }

    pub fn edit(supplier: &Supplier) -> Result<Self, ServiceError> {
        let mut state = FormState::new(EntityKind::Supplier);
        state.prefill("sup_id", supplier.sup_id.clone())?;
        state.prefill("sup_name", supplier.sup_name.clone())?;
        state.prefill("email", supplier.email.clone())?;
        state.prefill("phone", supplier.phone.clone())?;
        state.prefill("address", supplier.address.clone())?;
        state.prefill("item_category", supplier.item_category.clone())?;
        state.lock("sup_id")?;
        Ok(Self {
            state,
            mode: FormMode::Update,
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }
}

impl EntityForm for SupplierForm {
    type Payload = Supplier;

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn build(&self) -> Result<Supplier, ServiceError> {
        let s = &self.state;
        Ok(Supplier {
            sup_id: s.value("sup_id").trim().to_string(),
            sup_name: s.value("sup_name").trim().to_string(),
            email: s.value("email").trim().to_string(),
            phone: s.value("phone").trim().to_string(),
            address: s.value("address").trim().to_string(),
            item_category: s.value("item_category").trim().to_string(),
        })
    }
}
