//! `inventory_c` column table and converters.

use super::common::{NAME, OWNER, TAGS};
use super::{MappingResult, RecordReader, RecordWriter, TableMapping};
use crate::model::dates::format_store_date;
use crate::model::inventory::{InventoryItem, InventoryPatch, NewInventoryItem};
use crate::store::{OrderBy, Record};
use chrono::NaiveDate;

pub const TABLE: &str = "inventory_c";

pub const CATEGORY: &str = "category_c";
pub const QUANTITY: &str = "quantity_c";
pub const UNIT: &str = "unit_c";
pub const MIN_STOCK: &str = "minStock_c";
pub const LAST_UPDATED: &str = "lastUpdated_c";

impl TableMapping for InventoryItem {
    type New = NewInventoryItem;
    type Patch = InventoryPatch;

    const TABLE: &'static str = TABLE;
    const LABEL: &'static str = "inventory item";
    const COLUMNS: &'static [&'static str] =
        &[NAME, TAGS, OWNER, CATEGORY, QUANTITY, UNIT, MIN_STOCK, LAST_UPDATED];

    fn default_order() -> Vec<OrderBy> {
        vec![OrderBy::asc(NAME)]
    }

    fn from_record(record: &Record) -> MappingResult<Self> {
        let reader = RecordReader::new(TABLE, record);
        Ok(Self {
            id: reader.id()?,
            name: reader.text_or_empty(NAME)?,
            category: reader.text_or_empty(CATEGORY)?,
            quantity: reader.number_or_zero(QUANTITY)?,
            unit: reader.text_or_empty(UNIT)?,
            min_stock: reader.number_or_zero(MIN_STOCK)?,
            last_updated: reader.date(LAST_UPDATED),
            tags: reader.text_or_empty(TAGS)?,
            owner: reader.lookup_id(OWNER)?,
        })
    }

    fn new_to_record(input: &NewInventoryItem, today: NaiveDate) -> Record {
        let mut writer = RecordWriter::new();
        writer
            .put(NAME, input.name.trim())
            .put(CATEGORY, input.category.as_str())
            .put(QUANTITY, input.quantity)
            .put(UNIT, input.unit.as_str())
            .put(MIN_STOCK, input.min_stock)
            .put(LAST_UPDATED, format_store_date(today))
            .put(TAGS, input.tags.as_str())
            .put_opt(OWNER, input.owner);
        writer.finish()
    }

    /// Every inventory write refreshes `lastUpdated_c`, even an empty patch.
    fn patch_to_record(patch: &InventoryPatch, today: NaiveDate) -> Record {
        let mut writer = RecordWriter::new();
        writer
            .put(LAST_UPDATED, format_store_date(today))
            .patch(NAME, patch.name.as_deref().map(str::trim))
            .patch(CATEGORY, patch.category.clone())
            .patch(QUANTITY, patch.quantity)
            .patch(UNIT, patch.unit.clone())
            .patch(MIN_STOCK, patch.min_stock)
            .patch(TAGS, patch.tags.clone())
            .patch_opt(OWNER, patch.owner);
        writer.finish()
    }
}
