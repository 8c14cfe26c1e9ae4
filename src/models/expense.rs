// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Expense items, saved snapshots, and the summary derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Income assumed when the user has not filled in their profile.
pub const DEFAULT_MONTHLY_INCOME: f64 = 20_000.0;

/// Above this share of income, users are told to cut back.
const REDUCE_EXPENSES_THRESHOLD: f64 = 80.0;
/// Above this share of income, users are nudged towards budgeting.
const BUDGETING_THRESHOLD: f64 = 50.0;

/// One line of the expense calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExpenseItem {
    pub name: String,
    pub price: f64,
    pub quantity: f64,
}

impl ExpenseItem {
    pub fn cost(&self) -> f64 {
        self.price * self.quantity
    }
}

/// Saved snapshot of a calculation. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExpenseList {
    pub id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub timestamp: DateTime<Utc>,
    pub total_amount: f64,
    pub items: Vec<ExpenseItem>,
}

impl ExpenseList {
    /// Build a new snapshot with a fresh id, stamped now.
    pub fn new(items: Vec<ExpenseItem>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            total_amount: compute_total(&items),
            items,
        }
    }
}

/// Sum of price × quantity over all items.
pub fn compute_total(items: &[ExpenseItem]) -> f64 {
    items.iter().map(ExpenseItem::cost).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum AdviceTier {
    ReduceExpenses,
    Budgeting,
    Healthy,
}

impl AdviceTier {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage > REDUCE_EXPENSES_THRESHOLD {
            AdviceTier::ReduceExpenses
        } else if percentage > BUDGETING_THRESHOLD {
            AdviceTier::Budgeting
        } else {
            AdviceTier::Healthy
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AdviceTier::ReduceExpenses => {
                "Consider reducing expenses or finding additional income sources."
            }
            AdviceTier::Budgeting => {
                "You're spending a significant portion of your income. Consider budgeting."
            }
            AdviceTier::Healthy => "Great job! You're maintaining healthy spending habits.",
        }
    }
}

/// Expenses measured against monthly income.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExpenseSummary {
    pub total: f64,
    pub monthly_income: f64,
    pub percentage: f64,
    /// Income minus total; negative means a deficit.
    pub remaining: f64,
    pub is_deficit: bool,
    /// `|remaining|` to two decimals, shown next to the deficit indicator.
    pub remaining_display: String,
    pub advice: AdviceTier,
    pub advice_message: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpenseError {
    #[error("Monthly income must be greater than 0")]
    NonPositiveIncome,
}

/// Compare a total against monthly income.
///
/// Income must be a positive finite number; anything else would make the
/// percentage meaningless.
pub fn compute_summary(total: f64, monthly_income: f64) -> Result<ExpenseSummary, ExpenseError> {
    if !monthly_income.is_finite() || monthly_income <= 0.0 {
        return Err(ExpenseError::NonPositiveIncome);
    }

    let percentage = total / monthly_income * 100.0;
    let remaining = monthly_income - total;
    let advice = AdviceTier::for_percentage(percentage);

    Ok(ExpenseSummary {
        total,
        monthly_income,
        percentage,
        remaining,
        is_deficit: remaining < 0.0,
        remaining_display: format!("{:.2}", remaining.abs()),
        advice,
        advice_message: advice.message().to_string(),
    })
}
