//! Dashboard aggregation over the field, task and finance services.
//!
//! # Responsibility
//! - Fetch fields, tasks, expenses and harvests concurrently.
//! - Fold them into headline stats, a revenue trend and recent tasks.
//!
//! # Invariants
//! - A load either returns complete data or fails as a whole.
//! - Aggregation is pure over the fetched collections.

use super::record_service::{RecordService, ServiceError, ServiceResult};
use super::{Clock, SystemClock};
use crate::model::dates::previous_month;
use crate::model::field::{Field, FieldStatus};
use crate::model::finance::{Expense, Harvest};
use crate::model::task::{Task, TaskStatus};
use crate::model::weather::WeatherReport;
use crate::page::finance::{monthly_revenue, FinancialSummary};
use crate::store::RecordStore;
use chrono::NaiveDate;
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Number of tasks listed on the dashboard.
pub const RECENT_TASK_LIMIT: usize = 5;
/// Share of the current month used as the stand-in previous month.
pub const DEFAULT_BASELINE_FACTOR: f64 = 0.85;

/// Error returned by `DashboardService::load`.
#[derive(Debug)]
pub enum DashboardError {
    LoadFailed(ServiceError),
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadFailed(_) => write!(f, "failed to load dashboard data"),
        }
    }
}

impl Error for DashboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LoadFailed(err) => Some(err),
        }
    }
}

impl From<ServiceError> for DashboardError {
    fn from(value: ServiceError) -> Self {
        Self::LoadFailed(value)
    }
}

/// Revenue the current month is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevenueBaseline {
    /// A fixed share of the current month's revenue.
    Proxy { factor: f64 },
    /// Actual revenue of the previous calendar month.
    PreviousMonth,
}

impl Default for RevenueBaseline {
    fn default() -> Self {
        Self::Proxy {
            factor: DEFAULT_BASELINE_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueTrend {
    pub direction: TrendDirection,
    /// Magnitude with one decimal, e.g. `"17.6%"`.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_fields: usize,
    pub active_crops: usize,
    pub pending_tasks: usize,
    pub monthly_revenue: f64,
    pub total_revenue: f64,
    pub monthly_expenses: f64,
    pub revenue_trend: RevenueTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub weather: Option<WeatherReport>,
    pub recent_tasks: Vec<Task>,
}

/// Compares `current` to `baseline`; `"0%"` when the baseline is zero.
pub fn revenue_trend(current: f64, baseline: f64) -> RevenueTrend {
    let direction = if current > baseline {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };
    if baseline == 0.0 {
        return RevenueTrend {
            direction,
            value: "0%".to_string(),
        };
    }
    let change = ((current - baseline) / baseline * 100.0).abs();
    RevenueTrend {
        direction,
        value: format!("{change:.1}%"),
    }
}

/// Tasks with a due date, latest first, at most `RECENT_TASK_LIMIT`.
pub fn recent_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut dated: Vec<&Task> = tasks.iter().filter(|t| t.due_date.is_some()).collect();
    dated.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    dated
        .into_iter()
        .take(RECENT_TASK_LIMIT)
        .cloned()
        .collect()
}

/// Folds fetched collections into dashboard stats.
pub fn summarize(
    fields: &[Field],
    tasks: &[Task],
    expenses: &[Expense],
    harvests: &[Harvest],
    baseline: RevenueBaseline,
    today: NaiveDate,
) -> DashboardStats {
    let finance = FinancialSummary::compute(expenses, harvests, today);
    let baseline_revenue = match baseline {
        RevenueBaseline::Proxy { factor } => finance.monthly_revenue * factor,
        RevenueBaseline::PreviousMonth => monthly_revenue(harvests, previous_month(today)),
    };

    DashboardStats {
        total_fields: fields.len(),
        active_crops: fields
            .iter()
            .filter(|f| f.status == FieldStatus::Active)
            .count(),
        pending_tasks: tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .count(),
        monthly_revenue: finance.monthly_revenue,
        total_revenue: finance.total_revenue,
        monthly_expenses: finance.monthly_expenses,
        revenue_trend: revenue_trend(finance.monthly_revenue, baseline_revenue),
    }
}

/// Loads the dashboard from one record store.
pub struct DashboardService<S> {
    store: S,
    clock: Arc<dyn Clock>,
    baseline: RevenueBaseline,
    weather: Option<WeatherReport>,
}

impl<S: RecordStore> DashboardService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            baseline: RevenueBaseline::default(),
            weather: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_baseline(mut self, baseline: RevenueBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Weather snapshot reported alongside the stats.
    pub fn with_weather(mut self, weather: WeatherReport) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn load(&self) -> Result<DashboardData, DashboardError> {
        self.load_at(self.clock.today())
    }

    /// Loads with `today` as the reference date for monthly figures.
    ///
    /// # Errors
    /// - `DashboardError::LoadFailed` when any of the four fetches fails.
    pub fn load_at(&self, today: NaiveDate) -> Result<DashboardData, DashboardError> {
        let started_at = Instant::now();
        let fetched = self.fetch_all();
        let (fields, tasks, expenses, harvests) = match fetched {
            Ok(collections) => collections,
            Err(err) => {
                error!(
                    "event=dashboard_load module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(DashboardError::LoadFailed(err));
            }
        };

        let stats = summarize(&fields, &tasks, &expenses, &harvests, self.baseline, today);
        info!(
            "event=dashboard_load module=service status=ok fields={} tasks={} harvests={} duration_ms={}",
            fields.len(),
            tasks.len(),
            harvests.len(),
            started_at.elapsed().as_millis()
        );
        Ok(DashboardData {
            stats,
            weather: self.weather.clone(),
            recent_tasks: recent_tasks(&tasks),
        })
    }

    #[allow(clippy::type_complexity)]
    fn fetch_all(&self) -> ServiceResult<(Vec<Field>, Vec<Task>, Vec<Expense>, Vec<Harvest>)> {
        let store = &self.store;
        let fields = RecordService::<&S, Field>::new(store).with_clock(Arc::clone(&self.clock));
        let tasks = RecordService::<&S, Task>::new(store).with_clock(Arc::clone(&self.clock));
        let expenses = RecordService::<&S, Expense>::new(store).with_clock(Arc::clone(&self.clock));
        let harvests = RecordService::<&S, Harvest>::new(store).with_clock(Arc::clone(&self.clock));

        thread::scope(|scope| {
            let fields = scope.spawn(|| fields.list());
            let tasks = scope.spawn(|| tasks.list());
            let expenses = scope.spawn(|| expenses.list());
            let harvests = scope.spawn(|| harvests.list());

            let fields = join(fields);
            let tasks = join(tasks);
            let expenses = join(expenses);
            let harvests = join(harvests);
            Ok((fields?, tasks?, expenses?, harvests?))
        })
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}
