//! Record store: repository contract and its implementations
//!
//! Domain logic (lifecycle rules, history synthesis) lives in `lifecycle`
//! and never depends on which backing store is in use. Handlers talk to
//! `dyn InspectionStore` only.

pub mod archive;
pub mod memory;
pub mod users;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AddFollowUp, AddPhoto, CreateInspection, FollowUp, Inspection, Photo, UpdateInspection,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Inspection not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),
}

/// Repository contract for inspection records.
///
/// Callers observe mutations by re-reading: there is no push channel, every
/// mutating call is followed by a fresh `list`/`get` on the caller's side.
/// Records are never deleted.
#[async_trait]
pub trait InspectionStore: Send + Sync {
    /// All records, newest first, as detached copies.
    async fn list(&self) -> Vec<Inspection>;

    async fn get(&self, id: Uuid) -> Result<Inspection, StoreError>;

    async fn create(
        &self,
        input: CreateInspection,
        acting_user: &str,
    ) -> Result<Inspection, StoreError>;

    async fn update(
        &self,
        id: Uuid,
        changes: UpdateInspection,
        acting_user: &str,
    ) -> Result<Inspection, StoreError>;

    async fn add_photo(
        &self,
        id: Uuid,
        photo: AddPhoto,
        acting_user: &str,
    ) -> Result<Photo, StoreError>;

    async fn add_follow_up(
        &self,
        id: Uuid,
        input: AddFollowUp,
        acting_user: &str,
    ) -> Result<FollowUp, StoreError>;
}
