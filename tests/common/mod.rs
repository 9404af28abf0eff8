#![allow(dead_code)]

use std::sync::Arc;

use autogarage_api::{
    build_router,
    config::AppConfig,
    db,
    events::{self, EventSender},
    logging::discard_logger,
    AppState,
};
use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;

pub const USER_EMAIL: &str = "owner@garage.test";
pub const USER_PASSWORD: &str = "letmein123";

/// Application router over a fresh in-memory SQLite database, with the
/// default user seeded and a logged-in session cookie.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    cookie: String,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.default_user_email = USER_EMAIL.to_string();
        cfg.default_user_password = USER_PASSWORD.to_string();
        cfg.cors_allow_any_origin = true;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_task = tokio::spawn(events::process_events(event_rx));
        let event_sender = Arc::new(EventSender::new(event_tx));

        let state = AppState::new(Arc::new(pool), cfg, event_sender, &discard_logger());
        state
            .services
            .users
            .ensure_default_user(USER_EMAIL, USER_PASSWORD)
            .await
            .expect("seed default user");

        let router = build_router(state.clone());

        let mut app = Self {
            router,
            state,
            cookie: String::new(),
            _event_task: event_task,
        };
        let response = app
            .request(
                Method::POST,
                "/api/login",
                Some(json!({ "email": USER_EMAIL, "password": USER_PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "test login failed");
        app.cookie = session_cookie_from(&response).expect("login sets a session cookie");
        app
    }

    /// `name=value` pair for the logged-in session.
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// Send a request with an optional JSON body and `Cookie` header.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = if let Some(json) = body {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Request carrying the logged-in session cookie.
    pub async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request(method, uri, body, Some(&self.cookie)).await
    }

    /// Authenticated request that asserts the status and returns `data`.
    pub async fn expect(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        status: StatusCode,
    ) -> Value {
        let response = self.authed(method.clone(), uri, body).await;
        let actual = response.status();
        let json = response_json(response).await;
        assert_eq!(actual, status, "{} {} returned {}", method, uri, json);
        json.get("data").cloned().unwrap_or(json)
    }

    pub async fn create_service(&self, name: &str, prices: &[(&str, &str)]) -> Value {
        let rows: Vec<Value> = prices
            .iter()
            .map(|(vt, price)| json!({ "vehicle_type": vt, "price": price }))
            .collect();
        self.expect(
            Method::POST,
            "/api/masters/services",
            Some(json!({ "name": name, "pricing_by_vehicle_type": rows })),
            StatusCode::CREATED,
        )
        .await
    }

    pub async fn create_accessory(&self, category: &str, name: &str, price: &str) -> Value {
        self.expect(
            Method::POST,
            "/api/masters/accessories",
            Some(json!({ "category": category, "name": name, "quantity": 10, "price": price })),
            StatusCode::CREATED,
        )
        .await
    }

    pub async fn create_ppf(&self, name: &str, roll_stock: &str) -> Value {
        self.expect(
            Method::POST,
            "/api/masters/ppf",
            Some(json!({
                "name": name,
                "pricing_by_vehicle_type": [{
                    "vehicle_type": "Sedan",
                    "options": [
                        { "warranty_name": "3 Years", "price": "30000" },
                        { "warranty_name": "5 Years", "price": "45000" }
                    ]
                }],
                "rolls": [{ "name": "Roll A", "stock": roll_stock }]
            })),
            StatusCode::CREATED,
        )
        .await
    }

    /// Job card body with the customer and vehicle fields filled in.
    pub fn job_card_body(&self, extra: Value) -> Value {
        let mut body = json!({
            "customer_name": "Arjun Mehta",
            "phone_number": "9876543210",
            "referral_source": "Google",
            "make": "Hyundai",
            "model": "Creta",
            "year": "2023",
            "license_plate": "MH12AB1234",
            "vehicle_type": "Sedan"
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        body
    }

    pub async fn create_job_card(&self, extra: Value) -> Value {
        self.expect(
            Method::POST,
            "/api/job-cards",
            Some(self.job_card_body(extra)),
            StatusCode::CREATED,
        )
        .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

pub fn session_cookie_from(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(|pair| pair.trim().to_string())
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json response")
}

/// Decimal fields serialize as strings; compare them numerically.
pub fn dec(value: &Value) -> rust_decimal::Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("not a decimal: {}", other),
    }
}
