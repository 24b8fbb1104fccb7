//! `task_c` column table and converters.

use super::common::{NAME, OWNER, TAGS};
use super::{MappingResult, RecordReader, RecordWriter, TableMapping};
use crate::model::task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
use crate::store::{OrderBy, Record};
use chrono::NaiveDate;

pub const TABLE: &str = "task_c";

pub const TITLE: &str = "title_c";
pub const DESCRIPTION: &str = "description_c";
pub const FIELD_NAME: &str = "fieldName_c";
pub const ASSIGNED_TO: &str = "assignedTo_c";
pub const DUE_DATE: &str = "dueDate_c";
pub const STATUS: &str = "status_c";
pub const PRIORITY: &str = "priority_c";
pub const CATEGORY: &str = "category_c";
pub const FIELD_ID: &str = "fieldId_c";

impl TableMapping for Task {
    type New = NewTask;
    type Patch = TaskPatch;

    const TABLE: &'static str = TABLE;
    const LABEL: &'static str = "task";
    const COLUMNS: &'static [&'static str] = &[
        NAME,
        TAGS,
        OWNER,
        TITLE,
        DESCRIPTION,
        FIELD_NAME,
        ASSIGNED_TO,
        DUE_DATE,
        STATUS,
        PRIORITY,
        CATEGORY,
        FIELD_ID,
    ];

    fn default_order() -> Vec<OrderBy> {
        vec![OrderBy::desc(DUE_DATE)]
    }

    fn from_record(record: &Record) -> MappingResult<Self> {
        let reader = RecordReader::new(TABLE, record);
        let title = match reader.text(TITLE)? {
            Some(title) => title,
            None => reader.text_or_empty(NAME)?,
        };
        Ok(Self {
            id: reader.id()?,
            title,
            description: reader.text(DESCRIPTION)?,
            field_id: reader.lookup_id(FIELD_ID)?,
            field_name: reader.text(FIELD_NAME)?,
            assigned_to: reader.text(ASSIGNED_TO)?,
            due_date: reader.date(DUE_DATE),
            status: reader.choice(STATUS, TaskStatus::parse, TaskStatus::default())?,
            priority: reader.choice(PRIORITY, TaskPriority::parse, TaskPriority::default())?,
            category: reader.text(CATEGORY)?,
            tags: reader.text_or_empty(TAGS)?,
            owner: reader.lookup_id(OWNER)?,
        })
    }

    fn new_to_record(input: &NewTask, _today: NaiveDate) -> Record {
        let title = input.title.trim();
        let mut writer = RecordWriter::new();
        writer
            .put(NAME, title)
            .put(TITLE, title)
            .put_opt(DESCRIPTION, input.description.clone())
            .put_opt(FIELD_NAME, input.field_name.clone())
            .put_opt(ASSIGNED_TO, input.assigned_to.clone())
            .put_date(DUE_DATE, input.due_date)
            .put(STATUS, input.status.unwrap_or_default().as_str())
            .put(PRIORITY, input.priority.unwrap_or_default().as_str())
            .put_opt(CATEGORY, input.category.clone())
            .put_opt(FIELD_ID, input.field_id)
            .put(TAGS, input.tags.as_str())
            .put_opt(OWNER, input.owner);
        writer.finish()
    }

    fn patch_to_record(patch: &TaskPatch, _today: NaiveDate) -> Record {
        let title = patch.title.as_deref().map(str::trim);
        let mut writer = RecordWriter::new();
        writer
            .patch(NAME, title)
            .patch(TITLE, title)
            .patch_opt(DESCRIPTION, patch.description.clone())
            .patch_opt(FIELD_NAME, patch.field_name.clone())
            .patch_opt(ASSIGNED_TO, patch.assigned_to.clone())
            .patch_date(DUE_DATE, patch.due_date)
            .patch(STATUS, patch.status.map(TaskStatus::as_str))
            .patch(PRIORITY, patch.priority.map(TaskPriority::as_str))
            .patch_opt(CATEGORY, patch.category.clone())
            .patch_opt(FIELD_ID, patch.field_id)
            .patch(TAGS, patch.tags.clone())
            .patch_opt(OWNER, patch.owner);
        writer.finish()
    }
}
