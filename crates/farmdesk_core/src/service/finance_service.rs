//! Expense queries pushed down to the record store.

use super::record_service::{RecordService, ServiceResult};
use crate::mapping::finance::expense;
use crate::model::dates::format_store_date;
use crate::model::finance::Expense;
use crate::store::{Condition, Operator, OrderBy, RecordStore};
use chrono::NaiveDate;

impl<S: RecordStore> RecordService<S, Expense> {
    /// Expenses whose category equals `category` exactly, newest first.
    pub fn by_category(&self, category: &str) -> ServiceResult<Vec<Expense>> {
        let query = Self::base_query()
            .filter(Condition::new(expense::CATEGORY, Operator::EqualTo, category))
            .order(OrderBy::desc(expense::DATE));
        self.fetch(&query)
    }

    /// Expenses dated within `start..=end`, newest first.
    ///
    /// Stored dates are `YYYY-MM-DD` text, possibly followed by a time part, so
    /// the upper bound is the start of the day after `end`.
    pub fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> ServiceResult<Vec<Expense>> {
        let mut query = Self::base_query().filter(Condition::new(
            expense::DATE,
            Operator::GreaterThanOrEqualTo,
            format_store_date(start),
        ));
        if let Some(after_end) = end.succ_opt() {
            query = query.filter(Condition::new(
                expense::DATE,
                Operator::LessThan,
                format_store_date(after_end),
            ));
        }
        self.fetch(&query.order(OrderBy::desc(expense::DATE)))
    }
}
