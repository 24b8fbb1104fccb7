//! Expense and harvest models.
//!
//! Amounts and revenue are plain `f64` in the farm's currency.

use super::validation::{Validate, ValidationErrors, Validator};
use super::Identified;
use crate::store::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A cost entry as stored in `expense_c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub date: Option<NaiveDate>,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub field_id: Option<RecordId>,
    pub field_name: Option<String>,
    pub tags: String,
    pub owner: Option<RecordId>,
}

impl Identified for Expense {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewExpense {
    pub date: Option<NaiveDate>,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub field_id: Option<RecordId>,
    pub field_name: Option<String>,
    pub tags: String,
    pub owner: Option<RecordId>,
}

impl Validate for NewExpense {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator
            .require_present("date", self.date.as_ref(), "Date is required")
            .require_text("category", &self.category, "Category is required")
            .require_text("description", &self.description, "Description is required")
            .require_positive("amount", self.amount, "Amount must be a positive number");
        check_field_id(&mut validator, self.field_id);
        validator.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub field_id: Option<Option<RecordId>>,
    pub field_name: Option<Option<String>>,
    pub tags: Option<String>,
    pub owner: Option<Option<RecordId>>,
}

impl Validate for ExpensePatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(category) = &self.category {
            validator.require_text("category", category, "Category is required");
        }
        if let Some(description) = &self.description {
            validator.require_text("description", description, "Description is required");
        }
        if let Some(amount) = self.amount {
            validator.require_positive("amount", amount, "Amount must be a positive number");
        }
        check_field_id(&mut validator, self.field_id.flatten());
        validator.finish()
    }
}

fn check_field_id(validator: &mut Validator, field_id: Option<RecordId>) {
    if matches!(field_id, Some(id) if id <= 0) {
        validator.fail("fieldId", "Field ID must be a positive number");
    }
}

/// A harvest sale as stored in `harvest_c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Harvest {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub date: Option<NaiveDate>,
    /// Harvested field; stored in the `cropId_c` column.
    pub field_id: Option<RecordId>,
    pub field_name: Option<String>,
    pub crop_variety: Option<String>,
    pub quantity: f64,
    pub unit: Option<String>,
    /// Free-text quality grade.
    pub quality: Option<String>,
    pub revenue: f64,
    pub tags: String,
    pub owner: Option<RecordId>,
}

impl Identified for Harvest {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHarvest {
    pub date: Option<NaiveDate>,
    pub field_id: Option<RecordId>,
    pub field_name: Option<String>,
    pub crop_variety: Option<String>,
    pub quantity: f64,
    pub unit: Option<String>,
    pub quality: Option<String>,
    pub revenue: f64,
    pub tags: String,
    pub owner: Option<RecordId>,
}

impl Validate for NewHarvest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .require_present("date", self.date.as_ref(), "Date is required")
            .require_present(
                "fieldId",
                self.field_id.as_ref(),
                "Field selection is required",
            )
            .require_positive("quantity", self.quantity, "Quantity must be a positive number")
            .require_positive("revenue", self.revenue, "Revenue must be a positive number")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestPatch {
    pub date: Option<NaiveDate>,
    pub field_id: Option<RecordId>,
    pub field_name: Option<Option<String>>,
    pub crop_variety: Option<Option<String>>,
    pub quantity: Option<f64>,
    pub unit: Option<Option<String>>,
    pub quality: Option<Option<String>>,
    pub revenue: Option<f64>,
    pub tags: Option<String>,
    pub owner: Option<Option<RecordId>>,
}

impl Validate for HarvestPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(quantity) = self.quantity {
            validator.require_positive("quantity", quantity, "Quantity must be a positive number");
        }
        if let Some(revenue) = self.revenue {
            validator.require_positive("revenue", revenue, "Revenue must be a positive number");
        }
        validator.finish()
    }
}
