use farmdesk_core::store::{Condition, FetchQuery, Operator, OrderBy, Record, RecordOutcome};
use farmdesk_core::{MemoryRecordStore, RecordStore, SqliteRecordStore, StoreError};
use serde_json::{json, Value};

const TABLE: &str = "inventory_c";

fn stores() -> Vec<(&'static str, Box<dyn RecordStore>)> {
    vec![
        ("memory", Box::new(MemoryRecordStore::new())),
        ("sqlite", Box::new(SqliteRecordStore::open_in_memory().unwrap())),
    ]
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn seed(store: &dyn RecordStore) -> Vec<i64> {
    let outcomes = store
        .create_records(
            TABLE,
            vec![
                record(json!({"Name": "Urea", "category_c": "Fertilizer", "quantity_c": 12})),
                record(json!({"Name": "Diesel", "category_c": "Fuel", "quantity_c": 300})),
                record(json!({"Name": "Maize seed", "category_c": "Seeds", "quantity_c": 40})),
                record(json!({"Name": "Potash", "category_c": "Fertilizer", "quantity_c": 5})),
            ],
        )
        .unwrap();
    outcomes
        .into_iter()
        .map(|outcome| match outcome {
            RecordOutcome::Success(rec) => rec["Id"].as_i64().unwrap(),
            RecordOutcome::Failure { message } => panic!("create failed: {message}"),
        })
        .collect()
}

fn names(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .map(|rec| rec["Name"].as_str().unwrap())
        .collect()
}

#[test]
fn create_assigns_increasing_ids() {
    for (label, store) in stores() {
        let ids = seed(store.as_ref());
        assert_eq!(ids, vec![1, 2, 3, 4], "{label}");
    }
}

#[test]
fn fetch_applies_conditions_and_ordering() {
    for (label, store) in stores() {
        seed(store.as_ref());
        let query = FetchQuery::with_fields(&["Name", "quantity_c"])
            .filter(Condition::new("category_c", Operator::EqualTo, "Fertilizer"))
            .order(OrderBy::asc("quantity_c"));
        let found = store.fetch_records(TABLE, &query).unwrap();
        assert_eq!(names(&found), vec!["Potash", "Urea"], "{label}");
        assert!(found[0].get("category_c").is_none(), "{label}: projected out");
        assert_eq!(found[0]["Id"], json!(4), "{label}");

        let query = FetchQuery::default()
            .filter(Condition::new("quantity_c", Operator::GreaterThan, 10))
            .filter(Condition::new("quantity_c", Operator::LessThanOrEqualTo, 40))
            .order(OrderBy::desc("quantity_c"));
        let found = store.fetch_records(TABLE, &query).unwrap();
        assert_eq!(names(&found), vec!["Maize seed", "Urea"], "{label}");
    }
}

#[test]
fn comparisons_only_match_values_of_the_same_kind() {
    for (label, store) in stores() {
        seed(store.as_ref());
        let query = FetchQuery::default().filter(Condition::new(
            "quantity_c",
            Operator::GreaterThan,
            "1",
        ));
        assert!(store.fetch_records(TABLE, &query).unwrap().is_empty(), "{label}");
    }
}

#[test]
fn projection_fills_missing_columns_with_null() {
    for (label, store) in stores() {
        seed(store.as_ref());
        let fields = vec!["Name".to_string(), "unit_c".to_string()];
        let found = store.get_record_by_id(TABLE, 2, &fields).unwrap().unwrap();
        assert_eq!(found["Name"], json!("Diesel"), "{label}");
        assert_eq!(found["unit_c"], Value::Null, "{label}");
        assert!(store.get_record_by_id(TABLE, 99, &fields).unwrap().is_none());
        assert!(store.get_record_by_id("field_c", 2, &fields).unwrap().is_none());
    }
}

#[test]
fn update_merges_columns_and_reports_missing_rows() {
    for (label, store) in stores() {
        seed(store.as_ref());
        let outcomes = store
            .update_records(
                TABLE,
                vec![
                    record(json!({"Id": 1, "quantity_c": 20})),
                    record(json!({"Id": 42, "quantity_c": 1})),
                ],
            )
            .unwrap();
        assert!(outcomes[0].is_success(), "{label}");
        assert!(!outcomes[1].is_success(), "{label}");

        let stored = store.get_record_by_id(TABLE, 1, &[]).unwrap().unwrap();
        assert_eq!(stored["quantity_c"], json!(20), "{label}");
        assert_eq!(stored["Name"], json!("Urea"), "{label}");
        assert_eq!(stored["category_c"], json!("Fertilizer"), "{label}");
    }
}

#[test]
fn delete_removes_only_named_rows() {
    for (label, store) in stores() {
        seed(store.as_ref());
        let outcomes = store.delete_records(TABLE, &[2, 77]).unwrap();
        assert!(outcomes[0].is_success(), "{label}");
        assert!(!outcomes[1].is_success(), "{label}");

        let remaining = store.fetch_records(TABLE, &FetchQuery::default()).unwrap();
        assert_eq!(names(&remaining), vec!["Urea", "Maize seed", "Potash"], "{label}");
    }
}

#[test]
fn rejects_unsafe_column_names() {
    for (label, store) in stores() {
        let query = FetchQuery::with_fields(&["Name; DROP TABLE records"]);
        assert!(
            matches!(
                store.fetch_records(TABLE, &query),
                Err(StoreError::InvalidQuery(_))
            ),
            "{label}"
        );
    }
}
