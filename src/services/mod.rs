//! Operator-facing workflows built on top of the REST client.

pub mod assignment;
pub mod directory;
pub mod reports;
pub mod session;

pub use assignment::{assign_existing, seed_new_task, AssignmentDraft};
pub use directory::DirectoryService;
pub use reports::LaborReport;
pub use session::{initialize_session, FileSessionStore, Session, SessionStore, WorkerContext};
