//! In-memory list filters for the record pages.
//!
//! # Invariants
//! - Search is a case-insensitive substring match; an empty term matches all.
//! - A facet of `"all"` bypasses its predicate.
//! - Search and facets combine with AND.

use crate::model::field::{CropStage, Field};
use crate::model::finance::Expense;
use crate::model::inventory::InventoryItem;
use crate::model::task::{Task, TaskPriority, TaskStatus};

/// Facet value that bypasses the predicate.
pub const ALL: &str = "all";

/// Exact-match selector with an "everything" option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Facet<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Facet<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T> Facet<T> {
    /// Reads a selector value; `None` when `parse` rejects it.
    pub fn parse_with(value: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case(ALL) {
            return Some(Self::All);
        }
        parse(value.trim()).map(Self::Only)
    }
}

impl Facet<String> {
    /// Free-text category selector; any value other than `"all"` is exact.
    pub fn category(value: &str) -> Self {
        Self::parse_with(value, |v| Some(v.to_string())).unwrap_or_default()
    }
}

/// Case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn optional_contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| contains_ignore_case(h, needle))
}

fn apply<'a, T: Clone + 'a>(
    items: impl IntoIterator<Item = &'a T>,
    keep: impl Fn(&T) -> bool,
) -> Vec<T> {
    items.into_iter().filter(|item| keep(item)).cloned().collect()
}

/// Unique categories in first-seen order.
pub fn distinct_categories<'a>(categories: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for category in categories {
        if !seen.iter().any(|c| c == category) {
            seen.push(category.to_string());
        }
    }
    seen
}

/// Fields and crops page: search over name and variety, facet on stage.
#[derive(Debug, Clone, Default)]
pub struct FieldFilter {
    pub search: String,
    pub stage: Facet<CropStage>,
}

impl FieldFilter {
    pub fn matches(&self, field: &Field) -> bool {
        let term = self.search.trim();
        let search_hit = contains_ignore_case(&field.name, term)
            || optional_contains(field.crop_variety.as_deref(), term);
        search_hit && self.stage.matches(&field.current_stage)
    }

    pub fn apply(&self, fields: &[Field]) -> Vec<Field> {
        apply(fields, |f| self.matches(f))
    }
}

/// Tasks page: search over title and description, facets on status and priority.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub search: String,
    pub status: Facet<TaskStatus>,
    pub priority: Facet<TaskPriority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let term = self.search.trim();
        let search_hit = contains_ignore_case(&task.title, term)
            || optional_contains(task.description.as_deref(), term);
        search_hit && self.status.matches(&task.status) && self.priority.matches(&task.priority)
    }

    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        apply(tasks, |t| self.matches(t))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub search: String,
    pub category: Facet<String>,
}

impl InventoryFilter {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        contains_ignore_case(&item.name, self.search.trim()) && self.category.matches(&item.category)
    }

    pub fn apply(&self, items: &[InventoryItem]) -> Vec<InventoryItem> {
        apply(items, |i| self.matches(i))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub search: String,
    pub category: Facet<String>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        contains_ignore_case(&expense.description, self.search.trim())
            && self.category.matches(&expense.category)
    }

    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        apply(expenses, |e| self.matches(e))
    }
}
