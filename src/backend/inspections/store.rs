/**
 * Inspection Store
 *
 * In-memory record of every accepted submission. Inspections (single room
 * and whole building) count as pending until an admin reviews them; custodial
 * notes are never pending.
 */

use crate::shared::pagination::{Page, Pagination};
use crate::shared::submission::{InspectionSummary, SubmissionPayload, SubmissionReceipt};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored submission
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionRecord {
    pub id: Uuid,
    pub payload: SubmissionPayload,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl InspectionRecord {
    pub fn is_pending(&self) -> bool {
        self.payload.is_inspection() && self.reviewed_at.is_none()
    }

    pub fn summary(&self) -> InspectionSummary {
        InspectionSummary {
            id: self.id,
            form_type: self.payload.form_type().to_string(),
            school: self.payload.school().to_string(),
            created_at: self.created_at,
            reviewed_at: self.reviewed_at,
        }
    }
}

/// Why a review could not be recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewError {
    NotFound,
    /// Notes have nothing to review
    NotAnInspection,
}

#[derive(Debug, Default)]
pub struct InspectionStore {
    records: Vec<InspectionRecord>,
}

impl InspectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an already validated payload
    pub fn insert(&mut self, payload: SubmissionPayload, now: DateTime<Utc>) -> SubmissionReceipt {
        let record = InspectionRecord {
            id: Uuid::new_v4(),
            payload,
            created_at: now,
            reviewed_at: None,
        };
        let receipt = SubmissionReceipt {
            id: record.id,
            form_type: record.payload.form_type().to_string(),
            created_at: now,
        };
        self.records.push(record);
        receipt
    }

    pub fn get(&self, id: Uuid) -> Option<&InspectionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// One page of pending inspections, newest first
    pub fn pending(&self, page: u32, limit: u32) -> Page<InspectionSummary> {
        let mut pending: Vec<&InspectionRecord> =
            self.records.iter().filter(|r| r.is_pending()).collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let pagination = Pagination::new(page, limit, pending.len() as u64);
        let data = pending
            .into_iter()
            .skip(pagination.offset())
            .take(limit as usize)
            .map(InspectionRecord::summary)
            .collect();
        Page { data, pagination }
    }

    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_pending()).count()
    }

    /// Mark an inspection reviewed. Reviewing twice keeps the first time.
    pub fn mark_reviewed(
        &mut self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<InspectionSummary, ReviewError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ReviewError::NotFound)?;
        if !record.payload.is_inspection() {
            return Err(ReviewError::NotAnInspection);
        }
        record.reviewed_at.get_or_insert(now);
        Ok(record.summary())
    }

    /// Every record, newest first
    pub fn all(&self) -> Vec<InspectionSummary> {
        let mut all: Vec<InspectionSummary> =
            self.records.iter().map(InspectionRecord::summary).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
