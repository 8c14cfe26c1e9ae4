// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Expense calculator and saved-list API tests (in-memory store).

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use envesto::models::UserProfile;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{authed_request, body_json, create_test_app, create_test_jwt};

fn sample_items() -> serde_json::Value {
    json!([
        { "name": "Rent", "price": 9000.0, "quantity": 1.0 },
        { "name": "Groceries", "price": 450.5, "quantity": 4.0 },
        { "name": "Fuel", "price": 106.0, "quantity": 10.0 }
    ])
}

#[tokio::test]
async fn test_expenses_require_auth() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/expenses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(authed_request("GET", "/api/expenses", "not.a.jwt", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_token");
}

#[tokio::test]
async fn test_calculate_with_default_income() {
    let (app, _) = create_test_app();
    let token = create_test_jwt("uid-calc", "calc@example.com");

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/expenses/calculate",
            &token,
            Some(json!({ "items": sample_items() })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // 9000 + 1802 + 1060
    assert_eq!(body["total"], 11862.0);
    let summary = &body["summary"];
    assert_eq!(summary["monthlyIncome"], 20000.0);
    assert_eq!(summary["isDeficit"], false);
    assert_eq!(summary["remainingDisplay"], "8138.00");
    assert_eq!(summary["advice"], "budgeting");
}

#[tokio::test]
async fn test_calculate_uses_profile_income_and_reports_deficit() {
    let (app, state) = create_test_app();
    let mut profile = UserProfile::baseline("uid-tight", "tight@example.com", None);
    profile.avg_monthly_income = Some(10000.0);
    state.db.upsert_profile(&profile).await.unwrap();
    let token = create_test_jwt("uid-tight", "tight@example.com");

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/expenses/calculate",
            &token,
            Some(json!({ "items": sample_items() })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let summary = &body["summary"];
    assert_eq!(summary["monthlyIncome"], 10000.0);
    assert_eq!(summary["isDeficit"], true);
    assert_eq!(summary["remainingDisplay"], "1862.00");
    assert_eq!(summary["advice"], "reduce_expenses");
    assert_eq!(
        summary["adviceMessage"],
        "Consider reducing expenses or finding additional income sources."
    );
}

#[tokio::test]
async fn test_calculate_rejects_zero_income() {
    let (app, _) = create_test_app();
    let token = create_test_jwt("uid-zero", "zero@example.com");

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/expenses/calculate",
            &token,
            Some(json!({ "items": sample_items(), "monthlyIncome": 0.0 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_income");
}

#[tokio::test]
async fn test_save_list_and_delete() {
    let (app, _) = create_test_app();
    let token = create_test_jwt("uid-lists", "lists@example.com");

    // Save the same items twice: each save is its own snapshot
    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(authed_request(
                "POST",
                "/api/expenses",
                &token,
                Some(json!({ "items": sample_items() })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["totalAmount"], 11862.0);
        assert_eq!(body["items"].as_array().unwrap().len(), 3);
        ids.push(body["id"].as_str().unwrap().to_string());
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_ne!(ids[0], ids[1]);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/expenses", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let lists = body_json(response).await;
    let lists = lists.as_array().unwrap();
    assert_eq!(lists.len(), 2);
    // Newest first
    assert_eq!(lists[0]["id"], ids[1].as_str());

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/expenses/{}", ids[0]),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(authed_request("GET", "/api/expenses", &token, None))
        .await
        .unwrap();
    let lists = body_json(response).await;
    let lists = lists.as_array().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["id"], ids[1].as_str());
}

#[tokio::test]
async fn test_lists_are_private_per_user() {
    let (app, _) = create_test_app();
    let owner = create_test_jwt("uid-owner", "owner@example.com");
    let other = create_test_jwt("uid-other", "other@example.com");

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/expenses",
            &owner,
            Some(json!({ "items": sample_items() })),
        ))
        .await
        .unwrap();
    let saved = body_json(response).await;
    let id = saved["id"].as_str().unwrap().to_string();

    // Another user deleting the id leaves the owner's list alone
    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/expenses/{}", id),
            &other,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/expenses", &other, None))
        .await
        .unwrap();
    assert!(body_json(response).await.as_array().unwrap().is_empty());

    let response = app
        .oneshot(authed_request("GET", "/api/expenses", &owner, None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_unknown_list_succeeds() {
    let (app, _) = create_test_app();
    let token = create_test_jwt("uid-del", "del@example.com");

    let response = app
        .oneshot(authed_request(
            "DELETE",
            "/api/expenses/does-not-exist",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_price_as_string_is_json_bad_request() {
    let (app, _) = create_test_app();
    let token = create_test_jwt("uid-typo", "typo@example.com");

    let response = app
        .oneshot(authed_request(
            "POST",
            "/api/expenses",
            &token,
            Some(json!({ "items": [{ "name": "Rent", "price": "abc", "quantity": 1 }] })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_body");
    assert!(body["fields"]["items[0].price"][0]
        .as_str()
        .unwrap()
        .contains("expected f64"));
}

#[tokio::test]
async fn test_malformed_json_is_json_bad_request() {
    let (app, _) = create_test_app();
    let token = create_test_jwt("uid-typo", "typo@example.com");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/expenses/calculate")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"items\": ["))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_body");
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}
