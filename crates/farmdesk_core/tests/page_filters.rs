use chrono::NaiveDate;
use farmdesk_core::page::filter::{
    distinct_categories, ExpenseFilter, Facet, FieldFilter, InventoryFilter, TaskFilter,
};
use farmdesk_core::page::list_state::ListState;
use farmdesk_core::{
    CropStage, Expense, ExpenseService, Field, FieldService, FieldStatus, InventoryItem,
    MemoryRecordStore, NewExpense, NewField, NewTask, Task, TaskPriority, TaskService, TaskStatus,
};

fn field(id: i64, name: &str, variety: Option<&str>, stage: CropStage) -> Field {
    Field {
        id,
        name: name.to_string(),
        area: None,
        coordinates: Vec::new(),
        crop_id: None,
        soil_type: None,
        crop_variety: variety.map(str::to_string),
        plant_date: None,
        expected_harvest: None,
        current_stage: stage,
        status: FieldStatus::Active,
        tags: String::new(),
        owner: None,
    }
}

fn item(id: i64, name: &str, category: &str) -> InventoryItem {
    InventoryItem {
        id,
        name: name.to_string(),
        category: category.to_string(),
        quantity: 10.0,
        unit: "kg".to_string(),
        min_stock: 1.0,
        last_updated: None,
        tags: String::new(),
        owner: None,
    }
}

fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|i| name(i).to_string()).collect()
}

#[test]
fn field_search_matches_name_or_variety_ignoring_case() {
    let fields = vec![
        field(1, "North Paddock", Some("Winter Wheat"), CropStage::Growing),
        field(2, "Wheatley Strip", None, CropStage::Seeding),
        field(3, "River Flat", Some("Barley"), CropStage::Growing),
    ];

    let filter = FieldFilter {
        search: "wheat".to_string(),
        ..FieldFilter::default()
    };
    assert_eq!(
        names(&filter.apply(&fields), |f| f.name.as_str()),
        vec!["North Paddock", "Wheatley Strip"]
    );

    let filter = FieldFilter {
        search: "WHEAT".to_string(),
        stage: Facet::Only(CropStage::Growing),
    };
    assert_eq!(names(&filter.apply(&fields), |f| f.name.as_str()), vec!["North Paddock"]);
}

#[test]
fn all_facets_with_empty_search_return_everything() {
    let fields = vec![
        field(1, "North", None, CropStage::Ready),
        field(2, "South", None, CropStage::Harvested),
    ];
    let filter = FieldFilter {
        search: String::new(),
        stage: Facet::parse_with("all", CropStage::parse).unwrap(),
    };
    assert_eq!(filter.apply(&fields), fields);

    let items = vec![item(1, "Urea", "Fertilizer"), item(2, "Diesel", "Fuel")];
    let filter = InventoryFilter {
        search: "  ".to_string(),
        category: Facet::category("all"),
    };
    assert_eq!(filter.apply(&items), items);
}

#[test]
fn task_filter_combines_search_status_and_priority() {
    let store = MemoryRecordStore::new();
    let service = TaskService::new(&store);
    let due = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    for (title, description, status, priority) in [
        ("Spray wheat", "Fungicide pass", TaskStatus::Pending, TaskPriority::High),
        ("Fix fence", "near the wheat field", TaskStatus::Pending, TaskPriority::Low),
        ("Harvest wheat", "Combine run", TaskStatus::Completed, TaskPriority::High),
        ("Service tractor", "Oil change", TaskStatus::Pending, TaskPriority::High),
    ] {
        let mut input = NewTask::new(title, due);
        input.description = Some(description.to_string());
        input.status = Some(status);
        input.priority = Some(priority);
        service.create(&input).unwrap();
    }
    let tasks: Vec<Task> = service.list().unwrap();

    let filter = TaskFilter {
        search: "wheat".to_string(),
        status: Facet::Only(TaskStatus::Pending),
        priority: Facet::All,
    };
    let mut found = names(&filter.apply(&tasks), |t| t.title.as_str());
    found.sort();
    assert_eq!(found, vec!["Fix fence", "Spray wheat"]);

    let filter = TaskFilter {
        search: "wheat".to_string(),
        status: Facet::Only(TaskStatus::Pending),
        priority: Facet::Only(TaskPriority::High),
    };
    assert_eq!(names(&filter.apply(&tasks), |t| t.title.as_str()), vec!["Spray wheat"]);
}

#[test]
fn expense_page_filters_and_lists_categories_from_the_store() {
    let store = MemoryRecordStore::new();
    let service = ExpenseService::new(&store);
    let on = NaiveDate::from_ymd_opt(2024, 6, 3);
    for (category, description) in [
        ("Seeds", "Maize seed"),
        ("Fuel", "Tractor diesel"),
        ("Seeds", "Bean seed"),
    ] {
        service
            .create(&NewExpense {
                date: on,
                category: category.to_string(),
                description: description.to_string(),
                amount: 25.0,
                ..NewExpense::default()
            })
            .unwrap();
    }
    let mut state: ListState<Expense> = ListState::default();
    state.replace_all(service.list().unwrap());
    let snapshot = state.snapshot();

    let mut categories = distinct_categories(snapshot.iter().map(|e| e.category.as_str()));
    categories.sort();
    assert_eq!(categories, vec!["Fuel", "Seeds"]);

    let filter = ExpenseFilter {
        search: "SEED".to_string(),
        category: Facet::category("Seeds"),
    };
    let mut found = names(&filter.apply(&snapshot), |e| e.description.as_str());
    found.sort();
    assert_eq!(found, vec!["Bean seed", "Maize seed"]);
}

#[test]
fn list_state_follows_confirmed_writes() {
    let store = MemoryRecordStore::new();
    let service = FieldService::new(&store);
    let mut state: ListState<Field> = ListState::default();

    let created = service.create(&NewField::new("North")).unwrap();
    state.push_created(created.clone());
    let after_create = state.snapshot();

    assert!(service.delete(created.id).unwrap());
    assert!(state.remove(created.id));

    assert_eq!(after_create.len(), 1);
    assert!(state.is_empty());
}
