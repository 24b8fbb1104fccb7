//! Core use-case services.
//!
//! # Responsibility
//! - Translate between typed entities and the record store protocol.
//! - Aggregate dashboard statistics over several services.
//!
//! # Invariants
//! - Services never swallow store failures; they log and propagate them.
//! - Services never retry.

use chrono::{Local, NaiveDate};

pub mod dashboard_service;
pub mod finance_service;
pub mod inventory_service;
pub mod record_service;
pub mod task_service;

use crate::model::field::Field;
use crate::model::finance::{Expense, Harvest};
use crate::model::inventory::InventoryItem;
use crate::model::task::Task;
use record_service::RecordService;

pub type FieldService<S> = RecordService<S, Field>;
pub type TaskService<S> = RecordService<S, Task>;
pub type InventoryService<S> = RecordService<S, InventoryItem>;
pub type ExpenseService<S> = RecordService<S, Expense>;
pub type HarvestService<S> = RecordService<S, Harvest>;

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
