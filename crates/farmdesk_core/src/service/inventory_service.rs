//! Inventory-specific queries on top of the generic record service.

use super::record_service::{RecordService, ServiceResult};
use crate::mapping::common::NAME;
use crate::mapping::inventory::CATEGORY;
use crate::model::inventory::InventoryItem;
use crate::store::{Condition, Operator, OrderBy, RecordStore};

impl<S: RecordStore> RecordService<S, InventoryItem> {
    /// Items at or below their minimum stock, ordered by name.
    ///
    /// The store protocol compares columns against literals only, so the
    /// column-to-column threshold is applied after the fetch.
    pub fn low_stock(&self) -> ServiceResult<Vec<InventoryItem>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(InventoryItem::is_low_stock)
            .collect())
    }

    /// Items whose category equals `category` exactly.
    pub fn by_category(&self, category: &str) -> ServiceResult<Vec<InventoryItem>> {
        let query = Self::base_query()
            .filter(Condition::new(CATEGORY, Operator::EqualTo, category))
            .order(OrderBy::asc(NAME));
        self.fetch(&query)
    }
}
