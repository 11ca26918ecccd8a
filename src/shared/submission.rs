//! Submission Payloads
//!
//! Every form the inspector can submit travels as one JSON object tagged with
//! its form type:
//!
//! ```json
//! { "type": "single_room", "school": "ASA", "inspectorName": "J. Doe", ... }
//! ```
//!
//! [`SubmissionPayload::from_json`] is the single entry point used at the API
//! boundary. It rejects unknown tags with [`SharedError::UnknownFormType`],
//! malformed shapes with [`SharedError::SerializationError`], and out-of-range
//! values with [`SharedError::ValidationError`] naming the field.

use crate::shared::error::SharedError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest accepted rating
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating
pub const MAX_RATING: u8 = 5;

/// Form type tags accepted by [`SubmissionPayload::from_json`]
pub const FORM_TYPES: [&str; 3] = ["single_room", "whole_building", "custodial_note"];

/// Cleanliness ratings for one inspected space. Every category is optional;
/// a present rating must lie in `MIN_RATING..=MAX_RATING`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_horizontal_surfaces: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrooms: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_satisfaction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_cleaning: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_support: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_compliance: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<u8>,
}

impl Ratings {
    fn entries(&self) -> [(&'static str, Option<u8>); 11] {
        [
            ("floors", self.floors),
            ("verticalHorizontalSurfaces", self.vertical_horizontal_surfaces),
            ("ceiling", self.ceiling),
            ("restrooms", self.restrooms),
            ("customerSatisfaction", self.customer_satisfaction),
            ("trash", self.trash),
            ("projectCleaning", self.project_cleaning),
            ("activitySupport", self.activity_support),
            ("safetyCompliance", self.safety_compliance),
            ("equipment", self.equipment),
            ("monitoring", self.monitoring),
        ]
    }

    /// Number of categories that carry a rating
    pub fn rated_count(&self) -> usize {
        self.entries().iter().filter(|(_, r)| r.is_some()).count()
    }

    /// Mean of the present ratings
    pub fn average(&self) -> Option<f64> {
        let present: Vec<u8> = self.entries().iter().filter_map(|(_, r)| *r).collect();
        if present.is_empty() {
            return None;
        }
        Some(present.iter().map(|&r| f64::from(r)).sum::<f64>() / present.len() as f64)
    }

    fn validate(&self, prefix: &str) -> Result<(), SharedError> {
        for (name, rating) in self.entries() {
            if let Some(value) = rating {
                if !(MIN_RATING..=MAX_RATING).contains(&value) {
                    return Err(SharedError::validation(
                        format!("{prefix}{name}"),
                        format!("Rating must be between {MIN_RATING} and {MAX_RATING}, got {value}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A single-room inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInspectionForm {
    pub inspector_name: String,
    pub school: String,
    pub date: String,
    pub location_description: String,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub location_category: Option<String>,
    #[serde(flatten)]
    pub ratings: Ratings,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// One room recorded as part of a whole-building walk-through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRoom {
    pub room_type: String,
    #[serde(default)]
    pub room_identifier: Option<String>,
    #[serde(flatten)]
    pub ratings: Ratings,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A whole-building inspection with its per-room entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingInspectionForm {
    pub inspector_name: String,
    pub school: String,
    pub date: String,
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub location_description: String,
    #[serde(default)]
    pub rooms: Vec<BuildingRoom>,
    #[serde(default)]
    pub verified_rooms: Vec<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A free-form custodial note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodialNoteForm {
    pub school: String,
    pub date: String,
    pub location: String,
    pub location_description: String,
    pub notes: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Any submittable form, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmissionPayload {
    SingleRoom(RoomInspectionForm),
    WholeBuilding(BuildingInspectionForm),
    CustodialNote(CustodialNoteForm),
}

impl SubmissionPayload {
    /// Parse and validate a payload received over the wire
    pub fn from_json(value: serde_json::Value) -> Result<Self, SharedError> {
        let tag = match value.get("type") {
            Some(serde_json::Value::String(tag)) => tag.clone(),
            Some(_) => return Err(SharedError::validation("type", "Form type must be a string")),
            None => return Err(SharedError::validation("type", "Form type is required")),
        };
        if !FORM_TYPES.contains(&tag.as_str()) {
            return Err(SharedError::unknown_form_type(tag));
        }

        let payload: SubmissionPayload = serde_json::from_value(value)?;
        payload.validate()?;
        Ok(payload)
    }

    /// The wire tag for this payload
    pub fn form_type(&self) -> &'static str {
        match self {
            Self::SingleRoom(_) => "single_room",
            Self::WholeBuilding(_) => "whole_building",
            Self::CustodialNote(_) => "custodial_note",
        }
    }

    /// Whether this payload is an inspection (counted as pending until reviewed)
    pub fn is_inspection(&self) -> bool {
        !matches!(self, Self::CustodialNote(_))
    }

    pub fn school(&self) -> &str {
        match self {
            Self::SingleRoom(form) => &form.school,
            Self::WholeBuilding(form) => &form.school,
            Self::CustodialNote(form) => &form.school,
        }
    }

    /// Check field-level rules
    pub fn validate(&self) -> Result<(), SharedError> {
        match self {
            Self::SingleRoom(form) => {
                require("inspectorName", &form.inspector_name, "Inspector name is required")?;
                require("school", &form.school, "School is required")?;
                require("date", &form.date, "Date is required")?;
                require(
                    "locationDescription",
                    &form.location_description,
                    "Location description is required",
                )?;
                form.ratings.validate("")?;
            }
            Self::WholeBuilding(form) => {
                require("inspectorName", &form.inspector_name, "Inspector name is required")?;
                require("school", &form.school, "School is required")?;
                require("date", &form.date, "Date is required")?;
                for (index, room) in form.rooms.iter().enumerate() {
                    require(
                        &format!("rooms[{index}].roomType"),
                        &room.room_type,
                        "Room type is required",
                    )?;
                    room.ratings.validate(&format!("rooms[{index}]."))?;
                }
            }
            Self::CustodialNote(form) => {
                require("school", &form.school, "School is required")?;
                require("date", &form.date, "Date is required")?;
                require("location", &form.location, "Location is required")?;
                require("notes", &form.notes, "Notes are required")?;
            }
        }
        Ok(())
    }
}

fn require(field: &str, value: &str, message: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, message));
    }
    Ok(())
}

/// What the server answers after accepting a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub form_type: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the pending-review list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSummary {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub form_type: String,
    pub school: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}
