use chrono::NaiveDate;

use super::{choice, required, EntityForm, FormMode};
use crate::errors::ServiceError;
use crate::models::{worker::WorkerPayload, Worker};
use crate::validation::{dates, EntityKind, FormState};

/// Register/edit worker form. Birth dates outside the working-age band are
/// moved to the nearest boundary on blur.
#[derive(Debug, Clone)]
pub struct WorkerForm {
    state: FormState,
    mode: FormMode,
    is_available: bool,
}

impl Default for WorkerForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerForm {
    pub fn new() -> Self {
        let mut state = FormState::new(EntityKind::Worker);
        let _ = state.prefill("jobRole", crate::models::JobRole::default().to_string());
        Self {
            state,
            mode: FormMode::Create,
            is_available: true,
        }
    }

    pub fn edit(worker: &Worker) -> Result<Self, ServiceError> {
        let mut state = FormState::new(EntityKind::Worker);
        state.prefill("workerId", worker.worker_id.clone())?;
        state.prefill("userEmail", worker.user_email.clone())?;
        state.prefill("name", worker.name.clone())?;
        state.prefill("jobRole", worker.job_role.to_string())?;
        if let Some(dob) = worker.date_of_birth {
            state.prefill("dateOfBirth", dob.format("%Y-%m-%d").to_string())?;
        }
        state.prefill("nic", worker.nic.clone())?;
        state.lock("workerId")?;
        Ok(Self {
            state,
            mode: FormMode::Update,
            is_available: worker.is_available,
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn set_available(&mut self, available: bool) {
        self.is_available = available;
    }

    /// Date-picker bounds for the birth date: `(earliest, latest)`.
    pub fn birth_date_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (dates::earliest_birth_date(today), dates::latest_birth_date(today))
    }
}

impl EntityForm for WorkerForm {
    type Payload = WorkerPayload;

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn build(&self) -> Result<WorkerPayload, ServiceError> {
        let s = &self.state;
        Ok(WorkerPayload {
            worker_id: s.value("workerId").trim().to_string(),
            user_email: s.value("userEmail").trim().to_string(),
            name: s.value("name").trim().to_string(),
            job_role: choice(s, "jobRole")?,
            is_available: self.is_available,
            date_of_birth: required(s, "dateOfBirth", s.date("dateOfBirth"))?,
            nic: s.value("nic").trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobRole;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn fill(form: &mut WorkerForm, dob: &str) {
        form.enter("workerId", "W-010", today()).unwrap();
        form.enter("userEmail", "sunil@estate.lk", today()).unwrap();
        form.enter("name", "Sunil Bandara", today()).unwrap();
        form.enter("jobRole", "quality-control", today()).unwrap();
        form.enter("nic", "901234567V", today()).unwrap();
        form.input("dateOfBirth", dob, today()).unwrap();
    }

    #[test]
    fn ten_year_old_blocks_then_corrects() {
        let mut form = WorkerForm::new();
        fill(&mut form, "2016-10-19");
        assert!(!form.can_submit());

        form.blur("dateOfBirth", today()).unwrap();
        assert_eq!(form.value("dateOfBirth"), "2008-10-19");
        let payload = form.submit(today()).unwrap();
        assert_eq!(payload.job_role, JobRole::QualityControl);
        assert_eq!(dates::age_on(payload.date_of_birth, today()), 18);
    }

    #[test]
    fn too_old_moves_to_oldest_allowed() {
        let mut form = WorkerForm::new();
        fill(&mut form, "1950-05-05");
        form.blur("dateOfBirth", today()).unwrap();
        let (earliest, latest) = WorkerForm::birth_date_bounds(today());
        assert_eq!(form.value("dateOfBirth"), earliest.format("%Y-%m-%d").to_string());
        assert!(earliest < latest);
    }

    #[test]
    fn edit_keeps_worker_id_and_availability() {
        let worker = Worker {
            worker_id: "W-001".into(),
            user_email: "nimal@estate.lk".into(),
            name: "Nimal".into(),
            job_role: JobRole::Harvesting,
            is_available: false,
            date_of_birth: NaiveDate::from_ymd_opt(1994, 7, 21),
            nic: "942031234V".into(),
            created_at: None,
        };
        let mut form = WorkerForm::edit(&worker).unwrap();
        assert!(form.input("workerId", "W-999", today()).is_err());
        let payload = form.submit(today()).unwrap();
        assert_eq!(payload.worker_id, "W-001");
        assert!(!payload.is_available);
    }
}
