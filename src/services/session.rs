//! Operator session: token persistence and the logged-in worker.
//!
//! Initialisation is explicit. Callers run [`initialize_session`] once at
//! start-up and keep the returned [`Session`]; reading it never does I/O.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::client::LaborApi;
use crate::errors::ServiceError;
use crate::models::{LoginRequest, LoginResponse, Worker};

/// What survives between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: String,
    pub user_email: String,
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, ServiceError>;
    fn save(&self, session: &StoredSession) -> Result<(), ServiceError>;
    fn clear(&self) -> Result<(), ServiceError>;
}

/// JSON file holding `{ "token", "userEmail" }`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, ServiceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(session) if !session.token.is_empty() => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ServiceError> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Holds the logged-in worker, if the operator is one. Purely passive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerContext {
    worker: Option<Worker>,
}

impl WorkerContext {
    pub fn worker(&self) -> Option<&Worker> {
        self.worker.as_ref()
    }

    pub fn worker_id(&self) -> Option<&str> {
        self.worker.as_ref().map(|w| w.worker_id.as_str())
    }

    pub fn set(&mut self, worker: Worker) {
        self.worker = Some(worker);
    }

    pub fn clear(&mut self) {
        self.worker = None;
    }
}

/// Result of session initialisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub authenticated: bool,
    pub token: Option<String>,
    pub user_email: Option<String>,
    pub context: WorkerContext,
}

impl Session {
    pub fn worker(&self) -> Option<&Worker> {
        self.context.worker()
    }
}

/// Restores the stored session and resolves the worker record of the
/// logged-in account. Accounts without a worker record (HR, inventory) stay
/// authenticated with an empty context.
#[instrument(skip(store, api))]
pub async fn initialize_session(
    store: &dyn SessionStore,
    api: &dyn LaborApi,
) -> Result<Session, ServiceError> {
    let Some(stored) = store.load()? else {
        return Ok(Session::default());
    };

    let mut context = WorkerContext::default();
    match api.worker_by_email(&stored.user_email).await {
        Ok(worker) => context.set(worker),
        Err(err) if err.status_code() == axum::http::StatusCode::NOT_FOUND => {
            info!(email = %stored.user_email, "account has no worker record");
        }
        Err(err) => error!(error = %err, "failed to resolve worker for session"),
    }

    Ok(Session {
        authenticated: true,
        token: Some(stored.token),
        user_email: Some(stored.user_email),
        context,
    })
}

/// Logs in and persists the returned token.
#[instrument(skip(store, api, password))]
pub async fn login(
    store: &dyn SessionStore,
    api: &dyn LaborApi,
    email: &str,
    password: &str,
) -> Result<LoginResponse, ServiceError> {
    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    request.validate()?;
    let response = api.login(&request).await?;
    store.save(&StoredSession {
        token: response.token.clone(),
        user_email: response.user.email.clone(),
    })?;
    info!(email = %response.user.email, role = %response.user.role, "logged in");
    Ok(response)
}

pub fn logout(store: &dyn SessionStore) -> Result<(), ServiceError> {
    store.clear()?;
    info!("logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
        assert_eq!(store.load().unwrap(), None);

        let session = StoredSession {
            token: "abc".into(),
            user_email: "hr@estate.lk".into(),
        };
        store.save(&session).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"userEmail\""));
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn corrupt_file_means_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(FileSessionStore::new(path).load().unwrap(), None);
    }
}
