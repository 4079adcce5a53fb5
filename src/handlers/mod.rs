//! HTTP request handlers

pub mod auth;
pub mod inspections;
pub mod middleware;
pub mod reports;
pub mod users;

pub use auth::*;
pub use inspections::*;
pub use middleware::*;
pub use reports::*;
pub use users::*;

use std::sync::Arc;

use crate::store::archive::CaseArchive;
use crate::store::users::{SessionStore, UserDirectory};
use crate::store::InspectionStore;
use crate::summary::Summarizer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InspectionStore>,
    pub users: Arc<UserDirectory>,
    pub sessions: Arc<SessionStore>,
    pub archive: Option<Arc<CaseArchive>>,
    pub summarizer: Arc<Summarizer>,
    pub session_expiry_hours: i64,
    pub is_production: bool,
}
