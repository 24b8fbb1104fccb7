//! Field (plot) domain model.
//!
//! # Invariants
//! - `coordinates` is always a plain numeric list; undecodable stored text
//!   becomes an empty list.
//! - `current_stage` defaults to `seeding` and `status` to `active`.

use super::validation::{Validate, ValidationErrors, Validator};
use super::Identified;
use crate::store::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Crop lifecycle phase of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropStage {
    #[default]
    Seeding,
    Growing,
    Ready,
    Harvested,
}

impl CropStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Growing => "growing",
            Self::Ready => "ready",
            Self::Harvested => "harvested",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "seeding" => Some(Self::Seeding),
            "growing" => Some(Self::Growing),
            "ready" => Some(Self::Ready),
            "harvested" => Some(Self::Harvested),
            _ => None,
        }
    }
}

impl Display for CropStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a field is currently cropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    #[default]
    Active,
    Completed,
}

impl FieldStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for FieldStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cultivated plot as stored in `field_c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub name: String,
    /// Area in the farm's configured unit (hectares by convention).
    pub area: Option<f64>,
    pub coordinates: Vec<f64>,
    pub crop_id: Option<RecordId>,
    pub soil_type: Option<String>,
    pub crop_variety: Option<String>,
    pub plant_date: Option<NaiveDate>,
    pub expected_harvest: Option<NaiveDate>,
    pub current_stage: CropStage,
    pub status: FieldStatus,
    pub tags: String,
    pub owner: Option<RecordId>,
}

impl Identified for Field {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// Input for creating a field. Unset stage/status take the column defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewField {
    pub name: String,
    pub area: Option<f64>,
    pub coordinates: Vec<f64>,
    pub crop_id: Option<RecordId>,
    pub soil_type: Option<String>,
    pub crop_variety: Option<String>,
    pub plant_date: Option<NaiveDate>,
    pub expected_harvest: Option<NaiveDate>,
    pub current_stage: Option<CropStage>,
    pub status: Option<FieldStatus>,
    pub tags: String,
    pub owner: Option<RecordId>,
}

impl NewField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Validate for NewField {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_text("name", &self.name, "Field name is required");
        check_area(&mut validator, self.area);
        check_crop_id(&mut validator, self.crop_id);
        validator.finish()
    }
}

/// Partial update; `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub area: Option<Option<f64>>,
    pub coordinates: Option<Vec<f64>>,
    pub crop_id: Option<Option<RecordId>>,
    pub soil_type: Option<Option<String>>,
    pub crop_variety: Option<Option<String>>,
    pub plant_date: Option<Option<NaiveDate>>,
    pub expected_harvest: Option<Option<NaiveDate>>,
    pub current_stage: Option<CropStage>,
    pub status: Option<FieldStatus>,
    pub tags: Option<String>,
    pub owner: Option<Option<RecordId>>,
}

impl Validate for FieldPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(name) = &self.name {
            validator.require_text("name", name, "Field name is required");
        }
        check_area(&mut validator, self.area.flatten());
        check_crop_id(&mut validator, self.crop_id.flatten());
        validator.finish()
    }
}

fn check_area(validator: &mut Validator, area: Option<f64>) {
    if let Some(area) = area {
        validator.require_positive("area", area, "Valid area is required");
    }
}

fn check_crop_id(validator: &mut Validator, crop_id: Option<RecordId>) {
    if matches!(crop_id, Some(id) if id <= 0) {
        validator.fail("cropId", "Valid crop ID is required");
    }
}
