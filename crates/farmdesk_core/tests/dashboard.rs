use chrono::NaiveDate;
use farmdesk_core::service::dashboard_service::TrendDirection;
use farmdesk_core::store::{FetchQuery, Record, RecordOutcome, StoreResult};
use farmdesk_core::{
    DashboardError, DashboardService, FieldService, FieldStatus, FixedClock, HarvestService,
    MemoryRecordStore, NewField, NewHarvest, NewTask, RecordId, RecordStore, RevenueBaseline,
    ServiceError, SqliteRecordStore, StoreError, TaskService, TaskStatus, WeatherReport,
};
use std::error::Error;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 6, 15)
}

fn harvest(on: NaiveDate, revenue: f64) -> NewHarvest {
    NewHarvest {
        date: Some(on),
        field_id: Some(1),
        crop_variety: Some("Winter Wheat".to_string()),
        quantity: 10.0,
        revenue,
        ..NewHarvest::default()
    }
}

fn seed_farm(store: Arc<dyn RecordStore>) {
    let fields = FieldService::new(Arc::clone(&store));
    fields.create(&NewField::new("North")).unwrap();
    fields.create(&NewField::new("South")).unwrap();
    fields
        .create(&NewField {
            status: Some(FieldStatus::Completed),
            ..NewField::new("Old orchard")
        })
        .unwrap();

    let tasks = TaskService::new(Arc::clone(&store));
    for day in 1..=7 {
        let mut task = NewTask::new(format!("Task {day}"), date(2024, 6, day));
        task.description = Some(format!("Scheduled job {day}"));
        if day > 4 {
            task.status = Some(TaskStatus::Completed);
        }
        tasks.create(&task).unwrap();
    }

    let harvests = HarvestService::new(Arc::clone(&store));
    harvests.create(&harvest(date(2024, 6, 2), 100.0)).unwrap();
    harvests.create(&harvest(date(2024, 6, 14), 200.0)).unwrap();
    harvests.create(&harvest(date(2024, 5, 20), 500.0)).unwrap();
    harvests.create(&harvest(date(2023, 6, 10), 50.0)).unwrap();
}

fn stores() -> Vec<(&'static str, Arc<dyn RecordStore>)> {
    vec![
        ("memory", Arc::new(MemoryRecordStore::new())),
        ("sqlite", Arc::new(SqliteRecordStore::open_in_memory().unwrap())),
    ]
}

#[test]
fn stats_count_fields_tasks_and_current_month_revenue() {
    for (label, store) in stores() {
        seed_farm(Arc::clone(&store));
        let data = DashboardService::new(Arc::clone(&store))
            .load_at(today())
            .unwrap();

        assert_eq!(data.stats.total_fields, 3, "{label}");
        assert_eq!(data.stats.active_crops, 2, "{label}");
        assert_eq!(data.stats.pending_tasks, 4, "{label}");
        assert_eq!(data.stats.monthly_revenue, 300.0, "{label}");
        assert_eq!(data.stats.total_revenue, 850.0, "{label}");
        assert_eq!(data.stats.monthly_expenses, 0.0, "{label}");
        assert_eq!(data.stats.revenue_trend.direction, TrendDirection::Up, "{label}");
        assert_eq!(data.stats.revenue_trend.value, "17.6%", "{label}");
        assert!(data.weather.is_none(), "{label}");
    }
}

#[test]
fn recent_tasks_are_the_five_latest_by_due_date() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    seed_farm(Arc::clone(&store));

    let data = DashboardService::new(store).load_at(today()).unwrap();
    let titles: Vec<&str> = data.recent_tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Task 7", "Task 6", "Task 5", "Task 4", "Task 3"]);
}

#[test]
fn previous_month_baseline_compares_real_revenue() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    seed_farm(Arc::clone(&store));

    let data = DashboardService::new(store)
        .with_baseline(RevenueBaseline::PreviousMonth)
        .load_at(today())
        .unwrap();
    assert_eq!(data.stats.revenue_trend.direction, TrendDirection::Down);
    assert_eq!(data.stats.revenue_trend.value, "40.0%");
}

#[test]
fn empty_store_reports_zero_percent_trend() {
    let store = MemoryRecordStore::new();
    let data = DashboardService::new(&store)
        .with_clock(Arc::new(FixedClock(today())))
        .load()
        .unwrap();

    assert_eq!(data.stats.total_fields, 0);
    assert_eq!(data.stats.monthly_revenue, 0.0);
    assert_eq!(data.stats.revenue_trend.value, "0%");
    assert!(data.recent_tasks.is_empty());
}

#[test]
fn configured_weather_is_passed_through() {
    let weather = WeatherReport {
        location: "Nakuru".to_string(),
        temperature: 24.0,
        condition: "Partly Cloudy".to_string(),
        humidity: 65,
        wind_speed: 12.0,
        icon: "CloudSun".to_string(),
        forecast: Vec::new(),
    };
    let store = MemoryRecordStore::new();
    let data = DashboardService::new(&store)
        .with_weather(weather.clone())
        .load_at(today())
        .unwrap();
    assert_eq!(data.weather, Some(weather));
}

/// Serves fields normally and fails every harvest read.
struct HarvestOutage {
    inner: MemoryRecordStore,
}

impl RecordStore for HarvestOutage {
    fn fetch_records(&self, table: &str, query: &FetchQuery) -> StoreResult<Vec<Record>> {
        if table == "harvest_c" {
            return Err(StoreError::Unavailable("harvest table offline".to_string()));
        }
        self.inner.fetch_records(table, query)
    }

    fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>> {
        self.inner.get_record_by_id(table, id, fields)
    }

    fn create_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        self.inner.create_records(table, records)
    }

    fn update_records(&self, table: &str, records: Vec<Record>) -> StoreResult<Vec<RecordOutcome>> {
        self.inner.update_records(table, records)
    }

    fn delete_records(&self, table: &str, ids: &[RecordId]) -> StoreResult<Vec<RecordOutcome>> {
        self.inner.delete_records(table, ids)
    }
}

#[test]
fn any_failed_fetch_fails_the_whole_load() {
    let store = HarvestOutage {
        inner: MemoryRecordStore::new(),
    };
    let err = DashboardService::new(&store).load_at(today()).unwrap_err();

    assert_eq!(err.to_string(), "failed to load dashboard data");
    let DashboardError::LoadFailed(cause) = &err;
    assert!(matches!(
        cause,
        ServiceError::Store {
            table: "harvest_c",
            ..
        }
    ));
    let source = err.source().map(ToString::to_string).unwrap_or_default();
    assert!(source.contains("harvest table offline"));
}
