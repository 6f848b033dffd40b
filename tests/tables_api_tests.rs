//! Endpoint tests for the tables API.
//!
//! These run the full router (auth, validation, lifecycle service,
//! repository) against an in-memory SQLite database with migrations applied.

mod test_utils;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use test_utils::{STAFF_TOKEN, test_app};
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn staff(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", STAFF_TOKEN));

    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_table(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, staff("POST", "/tables", Some(body))).await
}

#[tokio::test]
async fn root_returns_service_info() {
    let app = test_app().await.unwrap();

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "floorplan");
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app().await.unwrap();

    let (status, body) = send(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn table_lifecycle_scenario() {
    let app = test_app().await.unwrap();

    // create table {number: "5", capacity: 4, location: "Floor 1"}
    let (status, created) = create_table(
        &app,
        json!({"table_number": "5", "capacity": 4, "location": "Floor 1", "status": "available"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["table_number"], "5");
    assert_eq!(created["status"], "available");
    assert_eq!(created["is_active"], true);

    // creating the same number again is rejected
    let (status, body) = create_table(
        &app,
        json!({"table_number": "5", "capacity": 2, "location": "Patio"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // occupy the table
    let (status, body) = send(
        &app,
        staff(
            "PATCH",
            &format!("/tables/{}/status", id),
            Some(json!({"status": "occupied"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "occupied");

    // deletion is blocked while occupied
    let (status, body) = send(&app, staff("DELETE", &format!("/tables/{}", id), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("occupied"));

    // free it and delete
    let (status, _) = send(
        &app,
        staff(
            "PATCH",
            &format!("/tables/{}/status", id),
            Some(json!({"status": "available"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, staff("DELETE", &format!("/tables/{}", id), None)).await;
    assert_eq!(status, StatusCode::OK);

    // gone for good
    let (status, body) = send(&app, get(&format!("/tables/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn deletion_blocked_while_reserved() {
    let app = test_app().await.unwrap();

    let (_, created) = create_table(
        &app,
        json!({"table_number": "8", "capacity": 2, "status": "reserved"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(&app, staff("DELETE", &format!("/tables/{}", id), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn write_endpoints_require_staff_token() {
    let app = test_app().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/tables")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"table_number": "1", "capacity": 2}).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let request = Request::builder()
        .method("DELETE")
        .uri("/tables/1")
        .header(header::AUTHORIZATION, "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // reads stay open
    let (status, _) = send(&app, get("/tables")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn non_positive_capacity_is_rejected_and_not_persisted() {
    let app = test_app().await.unwrap();

    for capacity in [0, -4] {
        let (status, body) = create_table(
            &app,
            json!({"table_number": "1", "capacity": capacity}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_FAILED");
    }

    let (_, body) = send(&app, get("/tables")).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn update_rejects_non_positive_capacity() {
    let app = test_app().await.unwrap();

    let (_, created) = create_table(&app, json!({"table_number": "2", "capacity": 4})).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        staff(
            "PUT",
            &format!("/tables/{}", id),
            Some(json!({"capacity": 0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // value unchanged
    let (_, body) = send(&app, get(&format!("/tables/{}", id))).await;
    assert_eq!(body["capacity"], 4);
}

#[tokio::test]
async fn partial_update_leaves_omitted_fields_untouched() {
    let app = test_app().await.unwrap();

    let (_, created) = create_table(
        &app,
        json!({"table_number": "7", "capacity": 4, "location": "Floor 2"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        staff(
            "PUT",
            &format!("/tables/{}", id),
            Some(json!({"capacity": 6})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capacity"], 6);
    assert_eq!(body["table_number"], "7");
    assert_eq!(body["location"], "Floor 2");
    assert_eq!(body["status"], "available");
}

#[tokio::test]
async fn rename_to_existing_number_conflicts() {
    let app = test_app().await.unwrap();

    create_table(&app, json!({"table_number": "1", "capacity": 2})).await;
    let (_, second) = create_table(&app, json!({"table_number": "2", "capacity": 2})).await;
    let id = second["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        staff(
            "PUT",
            &format!("/tables/{}", id),
            Some(json!({"table_number": "1"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // writing back its own number is fine
    let (status, _) = send(
        &app,
        staff(
            "PUT",
            &format!("/tables/{}", id),
            Some(json!({"table_number": "2", "capacity": 8})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn search_matches_number_or_location_case_insensitively() {
    let app = test_app().await.unwrap();

    create_table(
        &app,
        json!({"table_number": "VIP 1", "capacity": 4, "location": "Mezzanine"}),
    )
    .await;
    create_table(
        &app,
        json!({"table_number": "12", "capacity": 2, "location": "vip lounge"}),
    )
    .await;
    create_table(
        &app,
        json!({"table_number": "13", "capacity": 2, "location": "Floor 1"}),
    )
    .await;

    let (status, body) = send(&app, get("/tables?search=VIP")).await;
    assert_eq!(status, StatusCode::OK);
    let tables = body["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(body["total"], 2);
    let numbers: Vec<&str> = tables
        .iter()
        .map(|t| t["table_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["VIP 1", "12"]);

    // count equals the unpaginated result set even when the page is smaller
    let (_, body) = send(&app, get("/tables?search=vip&limit=1")).await;
    assert_eq!(body["tables"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn listing_hides_inactive_tables_by_default() {
    let app = test_app().await.unwrap();

    create_table(&app, json!({"table_number": "1", "capacity": 2})).await;
    let (_, hidden) = create_table(&app, json!({"table_number": "2", "capacity": 2})).await;
    let id = hidden["id"].as_i64().unwrap();

    send(
        &app,
        staff(
            "PUT",
            &format!("/tables/{}", id),
            Some(json!({"is_active": false})),
        ),
    )
    .await;

    let (_, body) = send(&app, get("/tables")).await;
    assert_eq!(body["total"], 1);

    // soft-deleted rows remain in storage and are visible on demand
    let (_, body) = send(&app, get("/tables?active_only=false")).await;
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn listing_filters_by_status() {
    let app = test_app().await.unwrap();

    create_table(&app, json!({"table_number": "1", "capacity": 2})).await;
    create_table(
        &app,
        json!({"table_number": "2", "capacity": 2, "status": "occupied"}),
    )
    .await;

    let (_, body) = send(&app, get("/tables?status=occupied")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["tables"][0]["table_number"], "2");
}

#[tokio::test]
async fn pagination_is_stable_in_id_order() {
    let app = test_app().await.unwrap();

    for number in ["1", "2", "3", "4"] {
        create_table(&app, json!({"table_number": number, "capacity": 2})).await;
    }

    let (_, page_one) = send(&app, get("/tables?limit=2")).await;
    let (_, page_two) = send(&app, get("/tables?skip=2&limit=2")).await;

    let collect = |body: &Value| -> Vec<String> {
        body["tables"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["table_number"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(collect(&page_one), vec!["1", "2"]);
    assert_eq!(collect(&page_two), vec!["3", "4"]);
    assert_eq!(page_one["total"], 4);
    assert_eq!(page_two["total"], 4);
}

#[tokio::test]
async fn invalid_limit_is_rejected() {
    let app = test_app().await.unwrap();

    let (status, body) = send(&app, get("/tables?limit=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, _) = send(&app, get("/tables?limit=501")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn available_listing_applies_capacity_floor() {
    let app = test_app().await.unwrap();

    create_table(&app, json!({"table_number": "1", "capacity": 2})).await;
    create_table(&app, json!({"table_number": "2", "capacity": 6})).await;
    create_table(&app, json!({"table_number": "3", "capacity": 8})).await;
    create_table(
        &app,
        json!({"table_number": "4", "capacity": 10, "status": "occupied"}),
    )
    .await;
    create_table(
        &app,
        json!({"table_number": "5", "capacity": 12, "is_active": false}),
    )
    .await;

    let (status, body) = send(&app, get("/tables/available?min_capacity=6")).await;
    assert_eq!(status, StatusCode::OK);
    let tables = body.as_array().unwrap();
    let numbers: Vec<&str> = tables
        .iter()
        .map(|t| t["table_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["2", "3"]);
    for table in tables {
        assert_eq!(table["status"], "available");
        assert_eq!(table["is_active"], true);
        assert!(table["capacity"].as_i64().unwrap() >= 6);
    }
}

#[tokio::test]
async fn by_status_lists_active_bucket_for_staff() {
    let app = test_app().await.unwrap();

    create_table(
        &app,
        json!({"table_number": "1", "capacity": 2, "status": "reserved"}),
    )
    .await;
    create_table(
        &app,
        json!({"table_number": "2", "capacity": 2, "status": "reserved", "is_active": false}),
    )
    .await;
    create_table(&app, json!({"table_number": "3", "capacity": 2})).await;

    // staff token required
    let (status, _) = send(&app, get("/tables/by-status/reserved")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, staff("GET", "/tables/by-status/reserved", None)).await;
    assert_eq!(status, StatusCode::OK);
    let tables = body.as_array().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0]["table_number"], "1");
}

#[tokio::test]
async fn unknown_ids_return_not_found() {
    let app = test_app().await.unwrap();

    let (status, _) = send(&app, get("/tables/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        staff("PUT", "/tables/999", Some(json!({"capacity": 4}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        staff(
            "PATCH",
            "/tables/999/status",
            Some(json!({"status": "occupied"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, staff("DELETE", "/tables/999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn errors_carry_trace_ids() {
    let app = test_app().await.unwrap();

    let (status, body) = send(&app, get("/tables/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["trace_id"].as_str().is_some());
}
