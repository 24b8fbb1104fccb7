//! Finance page totals.

use crate::model::dates::is_same_month;
use crate::model::finance::{Expense, Harvest};
use chrono::NaiveDate;
use serde::Serialize;

/// Money totals over every expense and harvest, plus the current month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_expenses: f64,
    pub total_revenue: f64,
    pub profit: f64,
    pub monthly_expenses: f64,
    pub monthly_revenue: f64,
    pub monthly_profit: f64,
}

impl FinancialSummary {
    /// Sums amounts and revenues; undated rows count towards totals only.
    pub fn compute(expenses: &[Expense], harvests: &[Harvest], today: NaiveDate) -> Self {
        let in_month = |date: Option<NaiveDate>| date.is_some_and(|d| is_same_month(d, today));

        let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
        let total_revenue: f64 = harvests.iter().map(|h| h.revenue).sum();
        let monthly_expenses: f64 = expenses
            .iter()
            .filter(|e| in_month(e.date))
            .map(|e| e.amount)
            .sum();
        let monthly_revenue = monthly_revenue(harvests, today);

        Self {
            total_expenses,
            total_revenue,
            profit: total_revenue - total_expenses,
            monthly_expenses,
            monthly_revenue,
            monthly_profit: monthly_revenue - monthly_expenses,
        }
    }
}

/// Revenue of harvests dated in the calendar month of `month`.
pub fn monthly_revenue(harvests: &[Harvest], month: NaiveDate) -> f64 {
    harvests
        .iter()
        .filter(|h| h.date.is_some_and(|d| is_same_month(d, month)))
        .map(|h| h.revenue)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::FinancialSummary;
    use crate::model::finance::{Expense, Harvest};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn expense(id: i64, amount: f64, on: Option<NaiveDate>) -> Expense {
        Expense {
            id,
            date: on,
            category: "Fuel".to_string(),
            description: "Diesel".to_string(),
            amount,
            field_id: None,
            field_name: None,
            tags: String::new(),
            owner: None,
        }
    }

    fn harvest(id: i64, revenue: f64, on: Option<NaiveDate>) -> Harvest {
        Harvest {
            id,
            date: on,
            field_id: Some(1),
            field_name: None,
            crop_variety: None,
            quantity: 1.0,
            unit: None,
            quality: None,
            revenue,
            tags: String::new(),
            owner: None,
        }
    }

    #[test]
    fn splits_totals_and_current_month() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let expenses = vec![
            expense(1, 40.0, date(2024, 6, 2)),
            expense(2, 60.0, date(2024, 5, 30)),
            expense(3, 5.0, None),
        ];
        let harvests = vec![
            harvest(1, 200.0, date(2024, 6, 1)),
            harvest(2, 300.0, date(2023, 6, 1)),
        ];

        let summary = FinancialSummary::compute(&expenses, &harvests, today);
        assert_eq!(summary.total_expenses, 105.0);
        assert_eq!(summary.total_revenue, 500.0);
        assert_eq!(summary.profit, 395.0);
        assert_eq!(summary.monthly_expenses, 40.0);
        assert_eq!(summary.monthly_revenue, 200.0);
        assert_eq!(summary.monthly_profit, 160.0);
    }

    #[test]
    fn empty_inputs_sum_to_zero() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(
            FinancialSummary::compute(&[], &[], today),
            FinancialSummary::default()
        );
    }
}
