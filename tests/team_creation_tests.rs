// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team creation over HTTP: validation errors and the stored result.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_create_team_makes_creator_first_member() {
    let (app, state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/teams",
            Some("alice"),
            &state,
            Some(json!({
                "teamName": "  Sunday Spikers ",
                "sport": "Volleyball",
                "location": "Capitola",
                "description": "Casual beach doubles",
                "maxMembers": 8
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    assert_eq!(body["teamName"], "Sunday Spikers");
    assert_eq!(body["maxMembers"], 8);
    assert_eq!(body["members"], json!(["alice"]));
    assert_eq!(body["creatorId"], "alice");
    assert_eq!(body["creatorName"], "alice name");
    assert_eq!(body["isCreator"], true);
    assert_eq!(body["actions"], json!(["delete"]));

    // New team shows up first in the directory
    let id = body["id"].as_str().unwrap().to_string();
    let response = app
        .oneshot(common::request("GET", "/teams", None, &state))
        .await
        .unwrap();
    let listing = common::body_json(response).await;
    assert_eq!(listing["teams"][0]["id"], id.as_str());
}

#[tokio::test]
async fn test_create_team_defaults_capacity() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/teams",
            Some("alice"),
            &state,
            Some(json!({
                "teamName": "Lunch League",
                "sport": "Basketball",
                "location": "Mountain View",
                "description": "Noon pickup"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(common::body_json(response).await["maxMembers"], 10);
}

#[tokio::test]
async fn test_missing_fields_are_reported_together() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/teams",
            Some("alice"),
            &state,
            Some(json!({
                "teamName": "   ",
                "sport": "",
                "location": "Capitola",
                "description": ""
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_failed");
    assert_eq!(
        body["fields"],
        json!({
            "description": "Description is required",
            "sport": "Please select a sport",
            "teamName": "Team name is required"
        })
    );
    assert!(state.db.list_teams().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_requires_sign_in() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/teams",
            None,
            &state,
            Some(json!({
                "teamName": "Ghosts",
                "sport": "Soccer",
                "location": "Nowhere",
                "description": "No one"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(state.db.list_teams().await.unwrap().is_empty());
}
