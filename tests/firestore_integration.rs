// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with FIRESTORE_EMULATOR_HOST pointing at the emulator.
//!
//! The emulator provides a clean state for each test run.

use envesto::models::{ExpenseItem, ExpenseList, UserProfile};

mod common;
use common::test_db;

/// Generate a unique user ID for test isolation.
fn unique_uid() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

fn items() -> Vec<ExpenseItem> {
    vec![
        ExpenseItem {
            name: "Rent".to_string(),
            price: 8000.0,
            quantity: 1.0,
        },
        ExpenseItem {
            name: "Bus pass".to_string(),
            price: 600.0,
            quantity: 1.0,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
// PROFILE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_profile_upsert_and_merge() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid();

    assert!(db.get_profile(&uid).await.unwrap().is_none());

    let mut profile = UserProfile::baseline(&uid, "emu@example.com", Some("Emu"));
    db.upsert_profile(&profile).await.unwrap();

    profile.job = Some("Electrician".to_string());
    profile.avg_monthly_income = Some(42000.0);
    db.upsert_profile(&profile).await.unwrap();

    let stored = db.get_profile(&uid).await.unwrap().unwrap();
    assert_eq!(stored, profile);
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPENSE LIST TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_expense_lists_round_trip_and_delete() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid();

    let first = ExpenseList::new(items());
    let second = ExpenseList::new(items());
    db.insert_expense_list(&uid, &first).await.unwrap();
    db.insert_expense_list(&uid, &second).await.unwrap();

    let lists = db.get_expense_lists(&uid).await.unwrap();
    assert_eq!(lists.len(), 2);
    assert!(lists.iter().all(|l| l.total_amount == 8600.0));

    db.delete_expense_list(&uid, &first.id).await.unwrap();
    // Deleting again is not an error
    db.delete_expense_list(&uid, &first.id).await.unwrap();

    let lists = db.get_expense_lists(&uid).await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].id, second.id);
}

#[tokio::test]
async fn test_expense_lists_scoped_to_user() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_uid();
    let other = unique_uid();

    db.insert_expense_list(&owner, &ExpenseList::new(items()))
        .await
        .unwrap();

    assert!(db.get_expense_lists(&other).await.unwrap().is_empty());
}
