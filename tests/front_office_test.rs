//! Inquiries, invoice listing, appointments and the dashboard.

mod common;

use axum::http::{Method, StatusCode};
use common::{dec, TestApp};
use rust_decimal::Decimal;
use serde_json::{json, Value};

fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn inquiry_prices_default_to_line_sums_with_markup() {
    let app = TestApp::new().await;

    let inquiry = app
        .expect(
            Method::POST,
            "/api/inquiries",
            Some(json!({
                "customer_name": "Priya Shah",
                "phone": "9123456780",
                "services": [{
                    "service_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                    "service_name": "Ceramic Coating",
                    "price": "10000",
                    "customer_price": "12000"
                }],
                "accessories": [{
                    "accessory_id": "6fa85f64-5717-4562-b3fc-2c963f66afa6",
                    "accessory_name": "Floor Mats",
                    "price": "500",
                    "customer_price": "500"
                }]
            })),
            StatusCode::CREATED,
        )
        .await;

    assert!(inquiry["inquiry_id"]
        .as_str()
        .unwrap_or_default()
        .starts_with("INQ-"));
    assert_eq!(dec(&inquiry["our_price"]), Decimal::from(10500));
    assert_eq!(dec(&inquiry["customer_price"]), Decimal::from(12500));
    assert_eq!(dec(&inquiry["markup"]), Decimal::from(2000));
    assert_eq!(dec(&inquiry["markup_percent"]), Decimal::new(1905, 2));
}

#[tokio::test]
async fn inquiry_filters_and_delete() {
    let app = TestApp::new().await;
    for (name, phone, service) in [
        ("Priya Shah", "9123456780", "Ceramic Coating"),
        ("Karan Gill", "9988776655", "Foam Wash"),
    ] {
        app.expect(
            Method::POST,
            "/api/inquiries",
            Some(json!({
                "customer_name": name,
                "phone": phone,
                "services": [{
                    "service_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                    "service_name": service,
                    "price": "1000",
                    "customer_price": "1200"
                }],
                "our_price": "0",
                "customer_price": "1200"
            })),
            StatusCode::CREATED,
        )
        .await;
    }

    let by_service = app
        .expect(
            Method::GET,
            "/api/inquiries?service=Foam%20Wash",
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(by_service.as_array().map(Vec::len), Some(1));
    assert_eq!(by_service[0]["customer_name"], "Karan Gill");
    // explicit zero cost keeps the percent at zero
    assert_eq!(dec(&by_service[0]["markup_percent"]), Decimal::ZERO);

    let by_phone = app
        .expect(Method::GET, "/api/inquiries?search=91234", None, StatusCode::OK)
        .await;
    assert_eq!(by_phone.as_array().map(Vec::len), Some(1));

    app.expect(
        Method::DELETE,
        &format!("/api/inquiries/{}", id_of(&by_phone[0])),
        None,
        StatusCode::OK,
    )
    .await;
    let remaining = app
        .expect(Method::GET, "/api/inquiries", None, StatusCode::OK)
        .await;
    assert_eq!(remaining.as_array().map(Vec::len), Some(1));
}

async fn completed_invoice(app: &TestApp, phone: &str, business: &str) -> Value {
    let wash = app
        .create_service(&format!("Wash {}", phone), &[("Sedan", "1000")])
        .await;
    let job = app
        .create_job_card(json!({
            "phone_number": phone,
            "services": [{ "id": wash["id"] }],
            "gst": "18",
            "status": "Completed"
        }))
        .await;
    app.expect(
        Method::POST,
        &format!("/api/job-cards/{}/invoice", id_of(&job)),
        Some(json!({ "business": business })),
        StatusCode::CREATED,
    )
    .await
}

#[tokio::test]
async fn invoice_list_reports_filtered_total() {
    let app = TestApp::new().await;
    completed_invoice(&app, "9000000001", "Auto Gamma").await;
    completed_invoice(&app, "9000000002", "Auto Gamma").await;
    completed_invoice(&app, "9000000003", "Gamma Films").await;

    let all = app
        .expect(Method::GET, "/api/invoices", None, StatusCode::OK)
        .await;
    assert_eq!(all["count"], 3);
    assert_eq!(dec(&all["total_amount"]), Decimal::from(3540));

    let films = app
        .expect(
            Method::GET,
            "/api/invoices?business=Gamma%20Films",
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(films["count"], 1);
    assert_eq!(dec(&films["total_amount"]), Decimal::from(1180));

    let numbers: Vec<String> = all["invoices"]
        .as_array()
        .expect("invoices")
        .iter()
        .filter_map(|i| i["invoice_no"].as_str().map(str::to_string))
        .collect();
    let mut deduped = numbers.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), 3);
}

#[tokio::test]
async fn appointment_cancel_and_filters() {
    let app = TestApp::new().await;
    let booked = app
        .expect(
            Method::POST,
            "/api/appointments",
            Some(json!({
                "customer_name": "Neha Rao",
                "phone": "9000011111",
                "vehicle_info": "2022 Honda City",
                "service_type": "Ceramic Coating",
                "date": "2026-10-21",
                "time": "10:30"
            })),
            StatusCode::CREATED,
        )
        .await;
    assert_eq!(booked["status"], "SCHEDULED");

    let response = app
        .authed(
            Method::POST,
            "/api/appointments",
            Some(json!({
                "customer_name": "Neha Rao",
                "phone": "9000011111",
                "service_type": "Wash",
                "date": "2026-10-21",
                "time": "half past ten"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let cancelled = app
        .expect(
            Method::PATCH,
            &format!("/api/appointments/{}", id_of(&booked)),
            Some(json!({ "status": "CANCELLED", "cancel_reason": "Customer travelling" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["cancel_reason"], "Customer travelling");

    let rescheduled = app
        .expect(
            Method::PATCH,
            &format!("/api/appointments/{}", id_of(&booked)),
            Some(json!({ "status": "SCHEDULED", "date": "2026-10-23" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(rescheduled["cancel_reason"], Value::Null);

    let on_day = app
        .expect(
            Method::GET,
            "/api/appointments?date=2026-10-23",
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(on_day.as_array().map(Vec::len), Some(1));
    let cancelled_only = app
        .expect(
            Method::GET,
            "/api/appointments?status=CANCELLED",
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(cancelled_only.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn dashboard_summarises_today() {
    let app = TestApp::new().await;
    app.create_ppf("Gloss PPF", "150").await;
    completed_invoice(&app, "9000000001", "Auto Gamma").await;
    app.create_job_card(json!({ "phone_number": "9000000001" })).await;
    app.create_job_card(json!({ "phone_number": "9000000002", "status": "In Progress" }))
        .await;
    app.expect(
        Method::POST,
        "/api/inquiries",
        Some(json!({ "customer_name": "Walk-in", "phone": "9000000009" })),
        StatusCode::CREATED,
    )
    .await;

    let snapshot = app
        .expect(Method::GET, "/api/dashboard", None, StatusCode::OK)
        .await;

    assert_eq!(dec(&snapshot["todays_sales"]), Decimal::from(1180));
    assert_eq!(snapshot["active_service_jobs"], 2);
    assert_eq!(snapshot["inquiries_today"], 1);
    assert_eq!(snapshot["total_customers"], 2);

    let trend = snapshot["sales_trend"].as_array().expect("trend");
    assert_eq!(trend.len(), 7);
    assert_eq!(dec(&trend[6]["amount"]), Decimal::from(1180));

    let counts = snapshot["job_status_counts"].as_array().expect("counts");
    let completed = counts
        .iter()
        .find(|c| c["status"] == "Completed")
        .expect("completed row");
    assert_eq!(completed["count"], 1);

    let weeks = snapshot["weekly_new_customers"].as_array().expect("weeks");
    assert_eq!(weeks.len(), 4);
    assert_eq!(weeks[3]["count"], 2);

    let stock = snapshot["ppf_stock"].as_array().expect("stock");
    assert_eq!(stock.len(), 1);
    assert_eq!(dec(&stock[0]["total_stock"]), Decimal::from(150));
}
