//! In-memory record store
//!
//! Reference implementation of [`InspectionStore`]: a single locked list
//! plus a monotonic protocol counter. Every operation completes after a
//! configurable artificial delay, simulating the latency of the remote
//! backend this store stands in for. Individual operations are serialized
//! by the lock, but nothing serializes a caller's read-modify-write across
//! two HTTP calls: concurrent edits are last-write-wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{InspectionStore, StoreError};
use crate::lifecycle;
use crate::models::{
    AddFollowUp, AddPhoto, CreateInspection, FollowUp, Inspection, InspectionSource,
    InspectionType, Photo, UpdateInspection,
};

pub struct InMemoryStore {
    inspections: RwLock<Vec<Inspection>>,
    /// Monotonic sequence behind the protocol number. Never reused, even
    /// though records are never deleted today.
    protocol_seq: AtomicU64,
    latency: Duration,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            inspections: RwLock::new(Vec::new()),
            protocol_seq: AtomicU64::new(0),
            latency,
        }
    }

    pub fn with_records(records: Vec<Inspection>, latency: Duration) -> Self {
        Self {
            protocol_seq: AtomicU64::new(records.len() as u64),
            inspections: RwLock::new(records),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn next_protocol(&self) -> String {
        let seq = self.protocol_seq.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{:03}", Utc::now().year(), seq)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Set semantics at the edit surface: drop duplicate actions, first
/// occurrence wins.
fn dedupe_actions(actions: &mut Vec<crate::models::EnforcementAction>) {
    let mut seen = std::collections::BTreeSet::new();
    actions.retain(|a| seen.insert(*a));
}

#[async_trait]
impl InspectionStore for InMemoryStore {
    async fn list(&self) -> Vec<Inspection> {
        self.simulate_latency().await;
        let guard = self.inspections.read().await;
        let mut records = guard.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    async fn get(&self, id: Uuid) -> Result<Inspection, StoreError> {
        self.simulate_latency().await;
        let guard = self.inspections.read().await;
        guard
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(
        &self,
        input: CreateInspection,
        acting_user: &str,
    ) -> Result<Inspection, StoreError> {
        self.simulate_latency().await;

        if input.address.trim().is_empty() {
            return Err(StoreError::Validation(
                "Field 'address' is required".to_string(),
            ));
        }

        let now = Utc::now();
        let inspector = input.inspector.filter(|i| !i.trim().is_empty());
        let inspection = Inspection {
            id: Uuid::new_v4(),
            protocol: self.next_protocol(),
            address: input.address,
            latitude: input.latitude,
            longitude: input.longitude,
            source: input.source.unwrap_or(InspectionSource::Internal),
            kind: input.kind.unwrap_or(InspectionType::Other),
            description: input.description.unwrap_or_default(),
            status: lifecycle::initial_status(inspector.as_deref()),
            created_at: now,
            updated_at: now,
            report: None,
            report_summary: None,
            photos: Vec::new(),
            follow_ups: Vec::new(),
            actions: Vec::new(),
            verified_infractions: Default::default(),
            complainant_name: input.complainant_name,
            complainant_address: input.complainant_address,
            respondent_name: input.respondent_name,
            contact_phone: input.contact_phone,
            attachments: input.attachments,
            reference_point: input.reference_point,
            complaint_date: input.complaint_date,
            history: vec![lifecycle::creation_entry(
                inspector.as_deref(),
                acting_user,
                now,
            )],
            inspector,
        };

        let mut guard = self.inspections.write().await;
        guard.insert(0, inspection.clone());
        Ok(inspection)
    }

    async fn update(
        &self,
        id: Uuid,
        mut changes: UpdateInspection,
        acting_user: &str,
    ) -> Result<Inspection, StoreError> {
        self.simulate_latency().await;

        if let Some(ref mut actions) = changes.actions {
            dedupe_actions(actions);
        }

        let mut guard = self.inspections.write().await;
        let record = guard
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound)?;

        let now = Utc::now();
        let entries = lifecycle::plan_update(record, &changes, acting_user, now);

        if let Some(status) = changes.status {
            record.status = status;
        }
        if let Some(inspector) = changes.inspector {
            record.inspector = Some(inspector);
        }
        if let Some(report) = changes.report {
            record.report = Some(report);
        }
        if let Some(summary) = changes.report_summary {
            record.report_summary = Some(summary);
        }
        if let Some(actions) = changes.actions {
            record.actions = actions;
        }
        if let Some(infractions) = changes.verified_infractions {
            record.verified_infractions = infractions;
        }

        record.updated_at = now;
        lifecycle::merge_history(&mut record.history, entries);

        Ok(record.clone())
    }

    async fn add_photo(
        &self,
        id: Uuid,
        photo: AddPhoto,
        acting_user: &str,
    ) -> Result<Photo, StoreError> {
        self.simulate_latency().await;

        let mut guard = self.inspections.write().await;
        let record = guard
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound)?;

        let now = Utc::now();
        let new_photo = Photo {
            id: Uuid::new_v4(),
            url: photo.url,
            name: photo.name,
            uploaded_at: now,
        };
        record.photos.push(new_photo.clone());
        record.updated_at = now;
        lifecycle::merge_history(
            &mut record.history,
            vec![lifecycle::photo_entry(&new_photo.name, acting_user, now)],
        );

        Ok(new_photo)
    }

    async fn add_follow_up(
        &self,
        id: Uuid,
        input: AddFollowUp,
        acting_user: &str,
    ) -> Result<FollowUp, StoreError> {
        self.simulate_latency().await;

        let mut guard = self.inspections.write().await;
        let record = guard
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound)?;

        let now = Utc::now();
        let follow_up = FollowUp {
            id: Uuid::new_v4(),
            date: input.date,
            notes: input.notes,
            completed: false,
        };
        record.follow_ups.push(follow_up.clone());

        let (forced_status, entries) =
            lifecycle::plan_follow_up(record, input.date, acting_user, now);
        if let Some(status) = forced_status {
            record.status = status;
        }
        lifecycle::merge_history(&mut record.history, entries);
        record.updated_at = now;

        Ok(follow_up)
    }
}
