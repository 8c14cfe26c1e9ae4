// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Expense list snapshots stored under each user.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::expense::{compute_summary, compute_total, DEFAULT_MONTHLY_INCOME};
use crate::models::{ExpenseItem, ExpenseList, ExpenseSummary};

#[derive(Clone)]
pub struct ExpenseService {
    db: FirestoreDb,
}

impl ExpenseService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Total and summary for a set of items.
    ///
    /// Without an explicit income, the profile's average monthly income is
    /// used, falling back to [`DEFAULT_MONTHLY_INCOME`].
    pub async fn calculate(
        &self,
        uid: &str,
        items: &[ExpenseItem],
        monthly_income: Option<f64>,
    ) -> Result<(f64, ExpenseSummary), AppError> {
        let income = match monthly_income {
            Some(income) => income,
            None => self
                .db
                .get_profile(uid)
                .await?
                .and_then(|p| p.avg_monthly_income)
                .unwrap_or(DEFAULT_MONTHLY_INCOME),
        };

        let total = compute_total(items);
        let summary = compute_summary(total, income)?;
        Ok((total, summary))
    }

    /// Save a new snapshot. Every call creates a distinct list.
    pub async fn save(&self, uid: &str, items: Vec<ExpenseItem>) -> Result<ExpenseList, AppError> {
        let list = ExpenseList::new(items);
        self.db.insert_expense_list(uid, &list).await?;

        tracing::info!(
            uid,
            list_id = %list.id,
            items = list.items.len(),
            total = list.total_amount,
            "Expense list saved"
        );
        Ok(list)
    }

    /// All snapshots for the user, newest first.
    pub async fn list(&self, uid: &str) -> Result<Vec<ExpenseList>, AppError> {
        let mut lists = self.db.get_expense_lists(uid).await?;
        lists.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(lists)
    }

    /// Delete a snapshot. Unknown ids are a no-op.
    pub async fn delete(&self, uid: &str, list_id: &str) -> Result<(), AppError> {
        self.db.delete_expense_list(uid, list_id).await?;
        tracing::info!(uid, list_id, "Expense list deleted");
        Ok(())
    }
}
