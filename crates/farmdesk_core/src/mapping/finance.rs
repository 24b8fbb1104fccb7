//! `expense_c` and `harvest_c` column tables and converters.

use super::common::{NAME, OWNER, TAGS};
use super::{MappingResult, RecordReader, RecordWriter, TableMapping};
use crate::model::finance::{
    Expense, ExpensePatch, Harvest, HarvestPatch, NewExpense, NewHarvest,
};
use crate::store::{OrderBy, Record};
use chrono::NaiveDate;

pub mod expense {
    pub const TABLE: &str = "expense_c";

    pub const DATE: &str = "date_c";
    pub const CATEGORY: &str = "category_c";
    pub const DESCRIPTION: &str = "description_c";
    pub const AMOUNT: &str = "amount_c";
    pub const FIELD_ID: &str = "fieldId_c";
    pub const FIELD_NAME: &str = "fieldName_c";
}

pub mod harvest {
    pub const TABLE: &str = "harvest_c";

    /// Holds the harvested field's id.
    pub const CROP_ID: &str = "cropId_c";
    pub const FIELD_NAME: &str = "fieldName_c";
    pub const CROP_VARIETY: &str = "cropVariety_c";
    pub const DATE: &str = "date_c";
    pub const QUANTITY: &str = "quantity_c";
    pub const UNIT: &str = "unit_c";
    pub const QUALITY: &str = "quality_c";
    pub const REVENUE: &str = "revenue_c";
}

impl TableMapping for Expense {
    type New = NewExpense;
    type Patch = ExpensePatch;

    const TABLE: &'static str = expense::TABLE;
    const LABEL: &'static str = "expense";
    const COLUMNS: &'static [&'static str] = &[
        NAME,
        TAGS,
        OWNER,
        expense::DATE,
        expense::CATEGORY,
        expense::DESCRIPTION,
        expense::AMOUNT,
        expense::FIELD_ID,
        expense::FIELD_NAME,
    ];

    fn default_order() -> Vec<OrderBy> {
        vec![OrderBy::desc(expense::DATE)]
    }

    fn from_record(record: &Record) -> MappingResult<Self> {
        let reader = RecordReader::new(expense::TABLE, record);
        Ok(Self {
            id: reader.id()?,
            date: reader.date(expense::DATE),
            category: reader.text_or_empty(expense::CATEGORY)?,
            description: reader.text_or_empty(expense::DESCRIPTION)?,
            amount: reader.number_or_zero(expense::AMOUNT)?,
            field_id: reader.lookup_id(expense::FIELD_ID)?,
            field_name: reader.text(expense::FIELD_NAME)?,
            tags: reader.text_or_empty(TAGS)?,
            owner: reader.lookup_id(OWNER)?,
        })
    }

    fn new_to_record(input: &NewExpense, _today: NaiveDate) -> Record {
        let description = input.description.trim();
        let mut writer = RecordWriter::new();
        writer
            .put(NAME, description)
            .put_date(expense::DATE, input.date)
            .put(expense::CATEGORY, input.category.as_str())
            .put(expense::DESCRIPTION, description)
            .put(expense::AMOUNT, input.amount)
            .put_opt(expense::FIELD_ID, input.field_id)
            .put_opt(expense::FIELD_NAME, input.field_name.clone())
            .put(TAGS, input.tags.as_str())
            .put_opt(OWNER, input.owner);
        writer.finish()
    }

    fn patch_to_record(patch: &ExpensePatch, _today: NaiveDate) -> Record {
        let description = patch.description.as_deref().map(str::trim);
        let mut writer = RecordWriter::new();
        writer
            .patch(NAME, description)
            .patch(expense::DESCRIPTION, description)
            .patch_date(expense::DATE, patch.date.map(Some))
            .patch(expense::CATEGORY, patch.category.clone())
            .patch(expense::AMOUNT, patch.amount)
            .patch_opt(expense::FIELD_ID, patch.field_id)
            .patch_opt(expense::FIELD_NAME, patch.field_name.clone())
            .patch(TAGS, patch.tags.clone())
            .patch_opt(OWNER, patch.owner);
        writer.finish()
    }
}

impl TableMapping for Harvest {
    type New = NewHarvest;
    type Patch = HarvestPatch;

    const TABLE: &'static str = harvest::TABLE;
    const LABEL: &'static str = "harvest";
    const COLUMNS: &'static [&'static str] = &[
        NAME,
        TAGS,
        OWNER,
        harvest::CROP_ID,
        harvest::FIELD_NAME,
        harvest::CROP_VARIETY,
        harvest::DATE,
        harvest::QUANTITY,
        harvest::UNIT,
        harvest::QUALITY,
        harvest::REVENUE,
    ];

    fn default_order() -> Vec<OrderBy> {
        vec![OrderBy::desc(harvest::DATE)]
    }

    fn from_record(record: &Record) -> MappingResult<Self> {
        let reader = RecordReader::new(harvest::TABLE, record);
        Ok(Self {
            id: reader.id()?,
            date: reader.date(harvest::DATE),
            field_id: reader.lookup_id(harvest::CROP_ID)?,
            field_name: reader.text(harvest::FIELD_NAME)?,
            crop_variety: reader.text(harvest::CROP_VARIETY)?,
            quantity: reader.number_or_zero(harvest::QUANTITY)?,
            unit: reader.text(harvest::UNIT)?,
            quality: reader.text(harvest::QUALITY)?,
            revenue: reader.number_or_zero(harvest::REVENUE)?,
            tags: reader.text_or_empty(TAGS)?,
            owner: reader.lookup_id(OWNER)?,
        })
    }

    fn new_to_record(input: &NewHarvest, _today: NaiveDate) -> Record {
        let name = input
            .crop_variety
            .clone()
            .or_else(|| input.field_name.clone())
            .unwrap_or_else(|| "Harvest".to_string());
        let mut writer = RecordWriter::new();
        writer
            .put(NAME, name)
            .put_date(harvest::DATE, input.date)
            .put_opt(harvest::CROP_ID, input.field_id)
            .put_opt(harvest::FIELD_NAME, input.field_name.clone())
            .put_opt(harvest::CROP_VARIETY, input.crop_variety.clone())
            .put(harvest::QUANTITY, input.quantity)
            .put_opt(harvest::UNIT, input.unit.clone())
            .put_opt(harvest::QUALITY, input.quality.clone())
            .put(harvest::REVENUE, input.revenue)
            .put(TAGS, input.tags.as_str())
            .put_opt(OWNER, input.owner);
        writer.finish()
    }

    fn patch_to_record(patch: &HarvestPatch, _today: NaiveDate) -> Record {
        let mut writer = RecordWriter::new();
        writer
            .patch_date(harvest::DATE, patch.date.map(Some))
            .patch(harvest::CROP_ID, patch.field_id)
            .patch_opt(harvest::FIELD_NAME, patch.field_name.clone())
            .patch_opt(harvest::CROP_VARIETY, patch.crop_variety.clone())
            .patch(harvest::QUANTITY, patch.quantity)
            .patch_opt(harvest::UNIT, patch.unit.clone())
            .patch_opt(harvest::QUALITY, patch.quality.clone())
            .patch(harvest::REVENUE, patch.revenue)
            .patch(TAGS, patch.tags.clone())
            .patch_opt(OWNER, patch.owner);
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{expense, harvest};
    use crate::mapping::common::NAME;
    use crate::mapping::TableMapping;
    use crate::model::finance::{Expense, Harvest, NewExpense, NewHarvest};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn expense_description_doubles_as_record_name() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let input = NewExpense {
            date: Some(today),
            category: "Fuel".to_string(),
            description: "Diesel".to_string(),
            amount: 80.0,
            ..NewExpense::default()
        };
        let record = Expense::new_to_record(&input, today);
        assert_eq!(record[NAME], json!("Diesel"));
        assert_eq!(record[expense::DATE], json!("2024-03-03"));
        assert!(record[expense::FIELD_ID].is_null());
    }

    #[test]
    fn harvest_field_reference_lives_in_crop_id_column() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let input = NewHarvest {
            date: Some(today),
            field_id: Some(4),
            quantity: 2.0,
            revenue: 300.0,
            ..NewHarvest::default()
        };
        let mut record = Harvest::new_to_record(&input, today);
        assert_eq!(record[harvest::CROP_ID], json!(4));

        record.insert("Id".to_string(), json!(1));
        let decoded = Harvest::from_record(&record).unwrap();
        assert_eq!(decoded.field_id, Some(4));
        assert_eq!(decoded.revenue, 300.0);
    }
}
