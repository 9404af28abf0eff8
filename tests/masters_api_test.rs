//! Master data and technician API tests.

mod common;

use axum::http::{Method, StatusCode};
use common::{dec, TestApp};
use rust_decimal::Decimal;
use serde_json::json;

#[tokio::test]
async fn service_master_crud() {
    let app = TestApp::new().await;

    let created = app
        .create_service("Ceramic Coating", &[("Sedan", "12000"), ("SUV", "15000")])
        .await;
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created["pricing_by_vehicle_type"].as_array().map(Vec::len), Some(2));

    let updated = app
        .expect(
            Method::PATCH,
            &format!("/api/masters/services/{}", id),
            Some(json!({ "name": "Ceramic Coating Pro" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(updated["name"], "Ceramic Coating Pro");
    assert_eq!(updated["pricing_by_vehicle_type"], created["pricing_by_vehicle_type"]);

    let deleted = app
        .expect(
            Method::DELETE,
            &format!("/api/masters/services/{}", id),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(deleted["deleted"], true);

    let response = app
        .authed(Method::DELETE, &format!("/api/masters/services/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn negative_prices_are_rejected() {
    let app = TestApp::new().await;
    let response = app
        .authed(
            Method::POST,
            "/api/masters/services",
            Some(json!({
                "name": "Broken",
                "pricing_by_vehicle_type": [{ "vehicle_type": "Sedan", "price": "-1" }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ppf_rolls_get_ids_and_can_be_replaced() {
    let app = TestApp::new().await;
    let ppf = app.create_ppf("Matte PPF", "150").await;
    let id = ppf["id"].as_str().expect("id").to_string();
    let roll_id = ppf["rolls"][0]["id"].clone();
    assert!(roll_id.is_string());

    let updated = app
        .expect(
            Method::PATCH,
            &format!("/api/masters/ppf/{}", id),
            Some(json!({
                "rolls": [
                    { "id": roll_id, "name": "Roll A", "stock": "140" },
                    { "name": "Roll B", "stock": "200" }
                ]
            })),
            StatusCode::OK,
        )
        .await;
    let rolls = updated["rolls"].as_array().expect("rolls");
    assert_eq!(rolls.len(), 2);
    assert_eq!(rolls[0]["id"], roll_id);
    assert_eq!(dec(&rolls[0]["stock"]), Decimal::from(140));
    assert!(rolls[1]["id"].is_string());
}

#[tokio::test]
async fn category_rename_moves_its_accessories() {
    let app = TestApp::new().await;

    let category = app
        .expect(
            Method::POST,
            "/api/masters/accessory-categories",
            Some(json!({ "name": "Interior" })),
            StatusCode::CREATED,
        )
        .await;
    let category_id = category["id"].as_str().expect("id").to_string();

    let response = app
        .authed(
            Method::POST,
            "/api/masters/accessory-categories",
            Some(json!({ "name": "Interior" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    app.create_accessory("Interior", "Floor Mats", "500").await;
    app.create_accessory("Interior", "Seat Covers", "3500").await;
    app.create_accessory("Exterior", "Mud Flaps", "250").await;

    let listed = app
        .expect(
            Method::GET,
            &format!("/api/masters/accessory-categories/{}/accessories", category_id),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));

    let renamed = app
        .expect(
            Method::PATCH,
            &format!("/api/masters/accessory-categories/{}", category_id),
            Some(json!({ "name": "Cabin" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(renamed["name"], "Cabin");

    let listed = app
        .expect(
            Method::GET,
            &format!("/api/masters/accessory-categories/{}/accessories", category_id),
            None,
            StatusCode::OK,
        )
        .await;
    let items = listed.as_array().expect("accessories");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|a| a["category"] == "Cabin"));

    let all = app
        .expect(Method::GET, "/api/masters/accessories", None, StatusCode::OK)
        .await;
    assert!(all
        .as_array()
        .expect("accessories")
        .iter()
        .all(|a| a["category"] != "Interior"));
}

#[tokio::test]
async fn vehicle_types_crud() {
    let app = TestApp::new().await;
    let suv = app
        .expect(
            Method::POST,
            "/api/masters/vehicle-types",
            Some(json!({ "name": "SUV" })),
            StatusCode::CREATED,
        )
        .await;
    let id = suv["id"].as_str().expect("id").to_string();

    let renamed = app
        .expect(
            Method::PATCH,
            &format!("/api/masters/vehicle-types/{}", id),
            Some(json!({ "name": "Compact SUV" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(renamed["name"], "Compact SUV");

    app.expect(
        Method::DELETE,
        &format!("/api/masters/vehicle-types/{}", id),
        None,
        StatusCode::OK,
    )
    .await;
    let remaining = app
        .expect(Method::GET, "/api/masters/vehicle-types", None, StatusCode::OK)
        .await;
    assert_eq!(remaining.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn technicians_filter_by_status() {
    let app = TestApp::new().await;
    let ravi = app
        .expect(
            Method::POST,
            "/api/technicians",
            Some(json!({ "name": "Ravi Kumar", "specialty": "PPF installation" })),
            StatusCode::CREATED,
        )
        .await;
    assert_eq!(ravi["status"], "active");
    app.expect(
        Method::POST,
        "/api/technicians",
        Some(json!({ "name": "Sunil", "specialty": "Detailing", "status": "inactive" })),
        StatusCode::CREATED,
    )
    .await;

    let active = app
        .expect(Method::GET, "/api/technicians?status=active", None, StatusCode::OK)
        .await;
    assert_eq!(active.as_array().map(Vec::len), Some(1));
    assert_eq!(active[0]["name"], "Ravi Kumar");

    let updated = app
        .expect(
            Method::PATCH,
            &format!("/api/technicians/{}", ravi["id"].as_str().unwrap_or_default()),
            Some(json!({ "status": "inactive" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(updated["status"], "inactive");
}
