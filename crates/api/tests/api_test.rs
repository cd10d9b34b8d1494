//! HTTP tests driving the router against the in-memory stores.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use bahi_api::{AppState, create_router};
use bahi_core::ledger::{
    Customer, CustomerPatch, NewCustomer, NewPayment, NewTransaction, Payment, PaymentPatch,
    Transaction, TransactionPatch,
};
use bahi_core::store::{
    CustomerOrder, LedgerStore, MemoryIdentityStore, MemoryLedgerStore, StoreError, StoreResult,
};
use bahi_shared::types::{CustomerId, Currency, OwnerId, PaymentId, TransactionId};
use bahi_shared::{JwtConfig, JwtService};

fn jwt() -> Arc<JwtService> {
    Arc::new(JwtService::new(JwtConfig {
        secret: "api-test-secret".into(),
        ..JwtConfig::default()
    }))
}

fn app() -> Router {
    app_with_ledger(Arc::new(MemoryLedgerStore::new()))
}

fn app_with_ledger(ledger: Arc<dyn LedgerStore>) -> Router {
    create_router(AppState::new(
        ledger,
        Arc::new(MemoryIdentityStore::new()),
        jwt(),
        Currency::Inr,
    ))
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers and logs in; returns `(access_token, refresh_token)`.
async fn sign_in(app: &Router, email: &str) -> (String, String) {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({"email": email, "password": "secret1", "repeat_password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"email": email, "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

async fn create_customer(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/customers",
        Some(token),
        Some(json!({"name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn post_ok(app: &Router, token: &str, uri: &str, body: Value) -> Value {
    let (status, body) = send(app, Method::POST, uri, Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_health_is_public() {
    let (status, body) = send(&app(), Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[rstest]
#[case("/api/v1/customers")]
#[case("/api/v1/transactions")]
#[case("/api/v1/payments")]
#[case("/api/v1/dashboard/metrics")]
#[case("/api/v1/reports/customer-balances")]
#[case("/api/v1/auth/me")]
#[tokio::test]
async fn test_protected_routes_require_token(#[case] uri: &str) {
    let app = app();
    let (status, body) = send(&app, Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, uri, Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let app = app();
    let (_, refresh) = sign_in(&app, "asha@shop.test").await;
    let (status, _) = send(&app, Method::GET, "/api/v1/customers", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_and_conflict() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({"email": "a@shop.test", "password": "secret1", "repeat_password": "secret2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({"email": "a@shop.test", "password": "abc", "repeat_password": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    sign_in(&app, "a@shop.test").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({"email": "A@shop.test", "password": "secret1", "repeat_password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_login_refresh_me_logout() {
    let app = app();
    let (access, refresh) = sign_in(&app, "ravi@shop.test").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/me", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ravi@shop.test");
    assert_eq!(body["username"], "ravi");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({"refresh_token": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["access_token"].as_str().unwrap().to_string();
    let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", Some(&new_access), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/logout",
        None,
        Some(json!({"refresh_token": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({"refresh_token": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "ravi@shop.test", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_all_ends_every_session() {
    let app = app();
    let (access, first_refresh) = sign_in(&app, "asha@shop.test").await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "asha@shop.test", "password": "secret1"})),
    )
    .await;
    let second_refresh = body["refresh_token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::POST, "/api/v1/auth/logout-all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::POST, "/api/v1/auth/logout-all", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revoked_sessions"], 2);

    for refresh in [first_refresh, second_refresh] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({"refresh_token": refresh})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_ledger_flow_report_and_cascade() {
    let app = app();
    let (token, _) = sign_in(&app, "owner@shop.test").await;

    let asha = create_customer(&app, &token, "Asha").await;
    let ravi = create_customer(&app, &token, "Ravi").await;

    post_ok(&app, &token, "/api/v1/transactions", json!({"customer_id": asha, "transaction_type": "debit", "amount": "500"})).await;
    post_ok(&app, &token, "/api/v1/transactions", json!({"customer_id": asha, "transaction_type": "credit", "amount": "100"})).await;
    post_ok(&app, &token, "/api/v1/payments", json!({"customer_id": asha, "amount": "200", "payment_method": "online"})).await;
    post_ok(&app, &token, "/api/v1/transactions", json!({"customer_id": ravi, "transaction_type": "debit", "amount": "300"})).await;
    post_ok(&app, &token, "/api/v1/payments", json!({"customer_id": ravi, "amount": "300"})).await;
    post_ok(&app, &token, "/api/v1/payments", json!({"customer_id": ravi, "amount": "50", "payment_method": "cash"})).await;

    let (status, report) = send(&app, Method::GET, "/api/v1/reports/customer-balances", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["customers"][0]["name"], "Asha");
    assert_eq!(report["customers"][0]["balance"], "200");
    assert_eq!(report["customers"][0]["status"], "receivable");
    assert_eq!(report["customers"][0]["formatted"], "₹200.00");
    assert_eq!(report["customers"][1]["balance"], "-50");
    assert_eq!(report["customers"][1]["formatted"], "-₹50.00");
    assert_eq!(report["totals"]["customers_with_debt"], 1);
    assert_eq!(report["totals"]["total_outstanding"], "150");
    assert_eq!(report["totals"]["formatted"]["total_outstanding"], "₹150.00");
    assert_eq!(report["currency"], "INR");

    let (status, statement) = send(&app, Method::GET, &format!("/api/v1/customers/{asha}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(statement["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(statement["payments"][0]["payment_method"], "upi");
    assert_eq!(statement["formatted"]["balance"], "₹200.00");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/customers/{asha}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, Method::GET, &format!("/api/v1/transactions?customer_id={asha}"), Some(&token), None).await;
    assert!(listed["transactions"].as_array().unwrap().is_empty());

    let (_, metrics) = send(&app, Method::GET, "/api/v1/dashboard/metrics", Some(&token), None).await;
    assert_eq!(metrics["total_customers"], 1);
    assert_eq!(metrics["total_transactions"], 1);
    assert_eq!(metrics["total_payments"], 2);
    assert_eq!(metrics["outstanding_balance"], "-50");
    assert_eq!(metrics["status"], "payable");
    assert_eq!(metrics["formatted"]["outstanding_balance"], "-₹50.00");

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/customers/{asha}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ledger_validation_errors() {
    let app = app();
    let (token, _) = sign_in(&app, "owner@shop.test").await;
    let asha = create_customer(&app, &token, "Asha").await;

    let (status, body) = send(&app, Method::POST, "/api/v1/customers", Some(&token), Some(json!({"name": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(&token),
        Some(json!({"customer_id": asha, "transaction_type": "debit", "amount": "0"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/payments",
        Some(&token),
        Some(json!({"amount": "10"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let long_name = "a".repeat(256);
    let (status, body) = send(&app, Method::POST, "/api/v1/customers", Some(&token), Some(json!({"name": long_name}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "name must be at most 255 characters");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(&token),
        Some(json!({"customer_id": asha, "transaction_type": "debit", "amount": "1000000000000.01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/payments",
        Some(&token),
        Some(json!({"customer_id": CustomerId::new(), "amount": "10"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = send(&app, Method::GET, "/api/v1/transactions/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (_, listed) = send(&app, Method::GET, "/api/v1/transactions", Some(&token), None).await;
    assert!(listed["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_customer_and_order() {
    let app = app();
    let (token, _) = sign_in(&app, "owner@shop.test").await;
    let ravi = create_customer(&app, &token, "ravi").await;
    create_customer(&app, &token, "Asha").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/customers/{ravi}"),
        Some(&token),
        Some(json!({"phone": "98450 22222", "address": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "98450 22222");
    assert_eq!(body["address"], Value::Null);

    let (_, by_name) = send(&app, Method::GET, "/api/v1/customers?order=name", Some(&token), None).await;
    assert_eq!(by_name["customers"][0]["name"], "Asha");
    assert_eq!(by_name["customers"][1]["name"], "ravi");

    let (status, _) = send(&app, Method::GET, "/api/v1/customers?order=oldest", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owners_are_isolated() {
    let app = app();
    let (token_a, _) = sign_in(&app, "a@shop.test").await;
    let (token_b, _) = sign_in(&app, "b@shop.test").await;
    let asha = create_customer(&app, &token_a, "Asha").await;

    let (_, listed) = send(&app, Method::GET, "/api/v1/customers", Some(&token_b), None).await;
    assert!(listed["customers"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/customers/{asha}"), Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/customers/{asha}"), Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/customers/{asha}"), Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
}

/// A ledger backend that is always down.
struct UnavailableStore;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::Backend("connection refused".into()))
}

#[async_trait]
impl LedgerStore for UnavailableStore {
    async fn list_customers(&self, _: OwnerId, _: CustomerOrder) -> StoreResult<Vec<Customer>> {
        down()
    }
    async fn get_customer(&self, _: OwnerId, _: CustomerId) -> StoreResult<Option<Customer>> {
        down()
    }
    async fn create_customer(&self, _: OwnerId, _: NewCustomer) -> StoreResult<Customer> {
        down()
    }
    async fn update_customer(&self, _: OwnerId, _: CustomerId, _: CustomerPatch) -> StoreResult<Option<Customer>> {
        down()
    }
    async fn delete_customer(&self, _: OwnerId, _: CustomerId) -> StoreResult<bool> {
        down()
    }
    async fn list_transactions(&self, _: OwnerId, _: Option<CustomerId>) -> StoreResult<Vec<Transaction>> {
        down()
    }
    async fn get_transaction(&self, _: OwnerId, _: TransactionId) -> StoreResult<Option<Transaction>> {
        down()
    }
    async fn create_transaction(&self, _: OwnerId, _: NewTransaction) -> StoreResult<Transaction> {
        down()
    }
    async fn update_transaction(&self, _: OwnerId, _: TransactionId, _: TransactionPatch) -> StoreResult<Option<Transaction>> {
        down()
    }
    async fn delete_transaction(&self, _: OwnerId, _: TransactionId) -> StoreResult<bool> {
        down()
    }
    async fn list_payments(&self, _: OwnerId, _: Option<CustomerId>) -> StoreResult<Vec<Payment>> {
        down()
    }
    async fn get_payment(&self, _: OwnerId, _: PaymentId) -> StoreResult<Option<Payment>> {
        down()
    }
    async fn create_payment(&self, _: OwnerId, _: NewPayment) -> StoreResult<Payment> {
        down()
    }
    async fn update_payment(&self, _: OwnerId, _: PaymentId, _: PaymentPatch) -> StoreResult<Option<Payment>> {
        down()
    }
    async fn delete_payment(&self, _: OwnerId, _: PaymentId) -> StoreResult<bool> {
        down()
    }
}

#[rstest]
#[case("/api/v1/customers")]
#[case("/api/v1/transactions")]
#[case("/api/v1/payments")]
#[case("/api/v1/dashboard/metrics")]
#[case("/api/v1/reports/customer-balances")]
#[tokio::test]
async fn test_store_failure_is_an_error_not_an_empty_list(#[case] uri: &str) {
    let app = app_with_ledger(Arc::new(UnavailableStore));
    let (token, _) = sign_in(&app, "owner@shop.test").await;

    let (status, body) = send(&app, Method::GET, uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "STORAGE_ERROR");
    assert_eq!(body["message"], "An error occurred");
}
