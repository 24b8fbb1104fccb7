//! Inventory item model and stock-level projections.

use super::validation::{Validate, ValidationErrors, Validator};
use super::Identified;
use crate::store::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Full-stock reference used by `stock_percentage`, as a multiple of `min_stock`.
const FULL_STOCK_FACTOR: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    InStock,
}

/// A stocked supply as stored in `inventory_c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "Id")]
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub min_stock: f64,
    /// Stamped by the inventory service on every write.
    pub last_updated: Option<NaiveDate>,
    pub tags: String,
    pub owner: Option<RecordId>,
}

impl InventoryItem {
    pub fn stock_status(&self) -> StockStatus {
        if self.quantity <= 0.0 {
            StockStatus::OutOfStock
        } else if self.quantity <= self.min_stock {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    /// Fill level against three times the minimum stock, capped at 100.
    pub fn stock_percentage(&self) -> f64 {
        if self.min_stock <= 0.0 {
            return 100.0;
        }
        let full = self.min_stock * FULL_STOCK_FACTOR;
        (self.quantity / full * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

impl Identified for InventoryItem {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewInventoryItem {
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub min_stock: f64,
    pub tags: String,
    pub owner: Option<RecordId>,
}

impl Validate for NewInventoryItem {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator
            .require_text("name", &self.name, "Item name is required")
            .require_text("category", &self.category, "Category is required")
            .require_non_negative("quantity", self.quantity, "Valid quantity is required")
            .require_text("unit", &self.unit, "Unit is required")
            .require_non_negative("minStock", self.min_stock, "Valid minimum stock is required");
        if self.min_stock > self.quantity {
            validator.fail(
                "minStock",
                "Minimum stock cannot be higher than current quantity",
            );
        }
        validator.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub min_stock: Option<f64>,
    pub tags: Option<String>,
    pub owner: Option<Option<RecordId>>,
}

impl Validate for InventoryPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(name) = &self.name {
            validator.require_text("name", name, "Item name is required");
        }
        if let Some(category) = &self.category {
            validator.require_text("category", category, "Category is required");
        }
        if let Some(quantity) = self.quantity {
            validator.require_non_negative("quantity", quantity, "Valid quantity is required");
        }
        if let Some(unit) = &self.unit {
            validator.require_text("unit", unit, "Unit is required");
        }
        if let Some(min_stock) = self.min_stock {
            validator.require_non_negative(
                "minStock",
                min_stock,
                "Valid minimum stock is required",
            );
        }
        validator.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{InventoryItem, NewInventoryItem, StockStatus};
    use crate::model::validation::Validate;

    fn item(quantity: f64, min_stock: f64) -> InventoryItem {
        InventoryItem {
            id: 1,
            name: "Urea".to_string(),
            category: "Fertilizer".to_string(),
            quantity,
            unit: "kg".to_string(),
            min_stock,
            last_updated: None,
            tags: String::new(),
            owner: None,
        }
    }

    #[test]
    fn stock_status_thresholds() {
        assert_eq!(item(0.0, 10.0).stock_status(), StockStatus::OutOfStock);
        assert_eq!(item(10.0, 10.0).stock_status(), StockStatus::Low);
        assert_eq!(item(11.0, 10.0).stock_status(), StockStatus::InStock);
    }

    #[test]
    fn stock_percentage_is_capped_and_guards_zero_minimum() {
        assert_eq!(item(15.0, 10.0).stock_percentage(), 50.0);
        assert_eq!(item(90.0, 10.0).stock_percentage(), 100.0);
        assert_eq!(item(5.0, 0.0).stock_percentage(), 100.0);
    }

    #[test]
    fn minimum_above_quantity_is_rejected() {
        let input = NewInventoryItem {
            name: "Seed corn".to_string(),
            category: "Seeds".to_string(),
            quantity: 5.0,
            unit: "bag".to_string(),
            min_stock: 8.0,
            ..NewInventoryItem::default()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(
            errors.message_for("minStock"),
            Some("Minimum stock cannot be higher than current quantity")
        );
    }
}
