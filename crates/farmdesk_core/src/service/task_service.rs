//! Task queries pushed down to the record store.

use super::record_service::{RecordService, ServiceResult};
use crate::mapping::task::{DUE_DATE, FIELD_ID, STATUS};
use crate::model::task::{Task, TaskStatus};
use crate::store::{Condition, Operator, OrderBy, RecordId, RecordStore};

impl<S: RecordStore> RecordService<S, Task> {
    /// Tasks in `status`, latest due date first.
    pub fn by_status(&self, status: TaskStatus) -> ServiceResult<Vec<Task>> {
        let query = Self::base_query()
            .filter(Condition::new(STATUS, Operator::EqualTo, status.as_str()))
            .order(OrderBy::desc(DUE_DATE));
        self.fetch(&query)
    }

    /// Tasks referencing field `field_id`, latest due date first.
    ///
    /// Matches references stored as a plain integer id.
    pub fn by_field(&self, field_id: RecordId) -> ServiceResult<Vec<Task>> {
        let query = Self::base_query()
            .filter(Condition::new(FIELD_ID, Operator::EqualTo, field_id))
            .order(OrderBy::desc(DUE_DATE));
        self.fetch(&query)
    }
}
