//! `field_c` column table and converters.

use super::common::{NAME, OWNER, TAGS};
use super::{encode_coordinates, MappingResult, RecordReader, RecordWriter, TableMapping};
use crate::model::field::{CropStage, Field, FieldPatch, FieldStatus, NewField};
use crate::store::{OrderBy, Record};
use chrono::NaiveDate;

pub const TABLE: &str = "field_c";

pub const AREA: &str = "area_c";
pub const COORDINATES: &str = "coordinates_c";
pub const CROP_ID: &str = "cropId_c";
pub const SOIL_TYPE: &str = "soilType_c";
pub const CROP_VARIETY: &str = "cropVariety_c";
pub const PLANT_DATE: &str = "plantDate_c";
pub const EXPECTED_HARVEST: &str = "expectedHarvest_c";
pub const CURRENT_STAGE: &str = "currentStage_c";
pub const STATUS: &str = "status_c";

impl TableMapping for Field {
    type New = NewField;
    type Patch = FieldPatch;

    const TABLE: &'static str = TABLE;
    const LABEL: &'static str = "field";
    const COLUMNS: &'static [&'static str] = &[
        NAME,
        TAGS,
        OWNER,
        AREA,
        COORDINATES,
        CROP_ID,
        SOIL_TYPE,
        CROP_VARIETY,
        PLANT_DATE,
        EXPECTED_HARVEST,
        CURRENT_STAGE,
        STATUS,
    ];

    fn default_order() -> Vec<OrderBy> {
        vec![OrderBy::asc(NAME)]
    }

    fn from_record(record: &Record) -> MappingResult<Self> {
        let reader = RecordReader::new(TABLE, record);
        Ok(Self {
            id: reader.id()?,
            name: reader.text_or_empty(NAME)?,
            area: reader.number(AREA)?,
            coordinates: reader.coordinates(COORDINATES),
            crop_id: reader.lookup_id(CROP_ID)?,
            soil_type: reader.text(SOIL_TYPE)?,
            crop_variety: reader.text(CROP_VARIETY)?,
            plant_date: reader.date(PLANT_DATE),
            expected_harvest: reader.date(EXPECTED_HARVEST),
            current_stage: reader.choice(CURRENT_STAGE, CropStage::parse, CropStage::default())?,
            status: reader.choice(STATUS, FieldStatus::parse, FieldStatus::default())?,
            tags: reader.text_or_empty(TAGS)?,
            owner: reader.lookup_id(OWNER)?,
        })
    }

    fn new_to_record(input: &NewField, _today: NaiveDate) -> Record {
        let mut writer = RecordWriter::new();
        writer
            .put(NAME, input.name.trim())
            .put_opt(AREA, input.area)
            .put(COORDINATES, encode_coordinates(&input.coordinates))
            .put_opt(CROP_ID, input.crop_id)
            .put_opt(SOIL_TYPE, input.soil_type.clone())
            .put_opt(CROP_VARIETY, input.crop_variety.clone())
            .put_date(PLANT_DATE, input.plant_date)
            .put_date(EXPECTED_HARVEST, input.expected_harvest)
            .put(
                CURRENT_STAGE,
                input.current_stage.unwrap_or_default().as_str(),
            )
            .put(STATUS, input.status.unwrap_or_default().as_str())
            .put(TAGS, input.tags.as_str())
            .put_opt(OWNER, input.owner);
        writer.finish()
    }

    fn patch_to_record(patch: &FieldPatch, _today: NaiveDate) -> Record {
        let mut writer = RecordWriter::new();
        writer
            .patch(NAME, patch.name.as_deref().map(str::trim))
            .patch_opt(AREA, patch.area)
            .patch(
                COORDINATES,
                patch.coordinates.as_deref().map(encode_coordinates),
            )
            .patch_opt(CROP_ID, patch.crop_id)
            .patch_opt(SOIL_TYPE, patch.soil_type.clone())
            .patch_opt(CROP_VARIETY, patch.crop_variety.clone())
            .patch_date(PLANT_DATE, patch.plant_date)
            .patch_date(EXPECTED_HARVEST, patch.expected_harvest)
            .patch(CURRENT_STAGE, patch.current_stage.map(CropStage::as_str))
            .patch(STATUS, patch.status.map(FieldStatus::as_str))
            .patch(TAGS, patch.tags.clone())
            .patch_opt(OWNER, patch.owner);
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{AREA, COORDINATES, CURRENT_STAGE, STATUS};
    use crate::mapping::TableMapping;
    use crate::model::field::{CropStage, Field, FieldPatch, FieldStatus, NewField};
    use crate::store::Record;
    use chrono::NaiveDate;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn create_applies_stage_and_status_defaults() {
        let record = Field::new_to_record(&NewField::new("North"), today());
        assert_eq!(record[CURRENT_STAGE], json!("seeding"));
        assert_eq!(record[STATUS], json!("active"));
        assert_eq!(record[COORDINATES], json!("[]"));
    }

    #[test]
    fn patch_emits_only_present_columns() {
        let patch = FieldPatch {
            current_stage: Some(CropStage::Ready),
            area: Some(None),
            ..FieldPatch::default()
        };
        let record = Field::patch_to_record(&patch, today());
        assert_eq!(record.len(), 2);
        assert_eq!(record[CURRENT_STAGE], json!("ready"));
        assert!(record[AREA].is_null());
    }

    #[test]
    fn decode_tolerates_bad_coordinates_but_not_bad_status() {
        let mut record: Record = json!({
            "Id": 3,
            "Name": "South",
            "coordinates_c": "{broken",
            "status_c": "completed"
        })
        .as_object()
        .cloned()
        .unwrap();
        let field = Field::from_record(&record).unwrap();
        assert!(field.coordinates.is_empty());
        assert_eq!(field.status, FieldStatus::Completed);
        assert_eq!(field.current_stage, CropStage::Seeding);

        record.insert(STATUS.to_string(), json!("archived"));
        let err = Field::from_record(&record).unwrap_err();
        assert_eq!(err.column, STATUS);
    }
}
