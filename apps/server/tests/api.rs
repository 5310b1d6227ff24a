//! End-to-end flows over the full router: categories, transactions,
//! budgets, and the reporting views.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use fintrack_server::api::app_router;
use fintrack_server::build_state;
use fintrack_server::config::Config;

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".to_string(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        access_ttl_secs: 3600,
        refresh_ttl_secs: 7200,
        min_budget_year: 2000,
        max_budget_year: 2100,
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state), tmp)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

struct Client {
    app: Router,
    access: String,
}

impl Client {
    async fn registered(app: Router, email: &str) -> Self {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "email": email, "password": "super-secret" })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        let registered = body_json(response).await;
        let access = registered["tokens"]["access"].as_str().unwrap().to_string();
        Self { app, access }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.access));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn get(&self, uri: &str) -> axum::response::Response {
        self.request(Method::GET, uri, None).await
    }

    async fn post_json(&self, uri: &str, body: serde_json::Value) -> serde_json::Value {
        let response = self.request(Method::POST, uri, Some(body)).await;
        assert_eq!(response.status(), 201, "POST {uri} should create");
        body_json(response).await
    }

    async fn create_category(&self, name: &str, kind: &str) -> String {
        let created = self
            .post_json(
                "/api/categories",
                serde_json::json!({ "name": name, "kind": kind }),
            )
            .await;
        created["id"].as_str().unwrap().to_string()
    }

    async fn create_transaction(
        &self,
        category_id: Option<&str>,
        kind: &str,
        amount: f64,
        date: &str,
    ) -> serde_json::Value {
        self.post_json(
            "/api/transactions",
            serde_json::json!({
                "categoryId": category_id,
                "kind": kind,
                "amount": amount,
                "date": date
            }),
        )
        .await
    }

    async fn create_budget(
        &self,
        category_id: &str,
        month: i32,
        year: i32,
        allocated: f64,
    ) -> serde_json::Value {
        self.post_json(
            "/api/budgets",
            serde_json::json!({
                "categoryId": category_id,
                "month": month,
                "year": year,
                "allocatedAmount": allocated
            }),
        )
        .await
    }
}

#[tokio::test]
async fn budget_tracking_flow() {
    let (app, _tmp) = build_test_router().await;
    let client = Client::registered(app, "tracker@example.com").await;

    let groceries = client.create_category("Groceries", "EXPENSE").await;
    let rent = client.create_category("Rent", "EXPENSE").await;
    let dining = client.create_category("Dining", "EXPENSE").await;
    let salary = client.create_category("Salary", "INCOME").await;

    // June 2025 activity
    client
        .create_transaction(Some(&groceries), "EXPENSE", 3000.0, "2025-06-05")
        .await;
    client
        .create_transaction(Some(&groceries), "EXPENSE", 2000.0, "2025-06-18")
        .await;
    client
        .create_transaction(Some(&rent), "EXPENSE", 4500.0, "2025-06-01")
        .await;
    client
        .create_transaction(Some(&dining), "EXPENSE", 2500.0, "2025-06-21")
        .await;
    client
        .create_transaction(Some(&salary), "INCOME", 30000.0, "2025-06-25")
        .await;
    // July spending must not leak into the June report
    client
        .create_transaction(Some(&groceries), "EXPENSE", 999.0, "2025-07-02")
        .await;

    client.create_budget(&groceries, 6, 2025, 8000.0).await;
    client.create_budget(&rent, 6, 2025, 12000.0).await;

    // current: per-budget progress
    let response = client.get("/api/budgets/current?month=6&year=2025").await;
    assert_eq!(response.status(), 200);
    let overview = body_json(response).await;
    assert_eq!(overview["month"], 6);
    assert_eq!(overview["year"], 2025);
    let rows = overview["budgets"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let groceries_row = rows
        .iter()
        .find(|row| row["categoryName"] == "Groceries")
        .unwrap();
    assert_eq!(groceries_row["spentAmount"], 5000.0);
    assert_eq!(groceries_row["remainingAmount"], 3000.0);
    assert_eq!(groceries_row["percentageUsed"], 62.5);

    // comparison: overall totals include the unbudgeted Dining spend
    let response = client
        .get("/api/budgets/comparison?month=6&year=2025")
        .await;
    assert_eq!(response.status(), 200);
    let comparison = body_json(response).await;
    assert_eq!(comparison["period"], "6/2025");
    assert_eq!(comparison["overall"]["totalAllocated"], 20000.0);
    assert_eq!(comparison["overall"]["totalSpent"], 12000.0);
    assert_eq!(comparison["overall"]["totalRemaining"], 8000.0);
    assert_eq!(comparison["overall"]["percentageUsed"], 60.0);

    let by_category = comparison["byCategory"].as_array().unwrap();
    assert_eq!(by_category.len(), 2);
    assert!(by_category.iter().all(|row| row["category"] != "Dining"));
    assert!(by_category.iter().all(|row| row["status"] == "under"));

    // Budget the overspent category and it shows up as over
    client.create_budget(&dining, 6, 2025, 2000.0).await;
    let response = client
        .get("/api/budgets/comparison?month=6&year=2025")
        .await;
    let comparison = body_json(response).await;
    let dining_row = comparison["byCategory"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["category"] == "Dining")
        .cloned()
        .unwrap();
    assert_eq!(dining_row["status"], "over");
    assert_eq!(dining_row["spent"], 2500.0);
    assert_eq!(dining_row["remaining"], -500.0);
}

#[tokio::test]
async fn budget_validation_rules() {
    let (app, _tmp) = build_test_router().await;
    let client = Client::registered(app, "rules@example.com").await;

    let groceries = client.create_category("Groceries", "EXPENSE").await;
    let salary = client.create_category("Salary", "INCOME").await;

    // Budget on an income category
    let response = client
        .request(
            Method::POST,
            "/api/budgets",
            Some(serde_json::json!({
                "categoryId": salary, "month": 6, "year": 2025, "allocatedAmount": 100.0
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
    let error = body_json(response).await;
    assert_eq!(error["fields"][0]["field"], "categoryId");

    // Out-of-range fields, all reported at once
    let response = client
        .request(
            Method::POST,
            "/api/budgets",
            Some(serde_json::json!({
                "categoryId": groceries, "month": 13, "year": 1899, "allocatedAmount": -1.0
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
    let error = body_json(response).await;
    assert_eq!(error["fields"].as_array().unwrap().len(), 3);

    // Duplicate (category, month, year)
    client.create_budget(&groceries, 6, 2025, 8000.0).await;
    let response = client
        .request(
            Method::POST,
            "/api/budgets",
            Some(serde_json::json!({
                "categoryId": groceries, "month": 6, "year": 2025, "allocatedAmount": 9000.0
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Exactly one row made it in
    let response = client.get("/api/budgets?month=6&year=2025").await;
    let listed = body_json(response).await;
    assert_eq!(listed["meta"]["totalRowCount"], 1);

    // An update only moves the allocation; identity fields are ignored
    let budget_id = listed["data"][0]["id"].as_str().unwrap().to_string();
    let response = client
        .request(
            Method::PUT,
            &format!("/api/budgets/{budget_id}"),
            Some(serde_json::json!({
                "allocatedAmount": 9500.0, "month": 12, "year": 2030, "categoryId": "other"
            })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let updated = body_json(response).await;
    assert_eq!(updated["allocatedAmount"], 9500.0);
    assert_eq!(updated["month"], 6);
    assert_eq!(updated["year"], 2025);
    assert_eq!(updated["categoryId"], serde_json::json!(groceries));

    // Transaction kind must match its category's kind
    let response = client
        .request(
            Method::POST,
            "/api/transactions",
            Some(serde_json::json!({
                "categoryId": salary, "kind": "EXPENSE", "amount": 50.0, "date": "2025-06-10"
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
    let error = body_json(response).await;
    assert_eq!(error["fields"][0]["field"], "categoryId");

    // Sub-cent amounts are rejected
    let response = client
        .request(
            Method::POST,
            "/api/transactions",
            Some(serde_json::json!({
                "kind": "EXPENSE", "amount": 0.001, "date": "2025-06-10"
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn category_delete_cascades() {
    let (app, _tmp) = build_test_router().await;
    let client = Client::registered(app, "cascade@example.com").await;

    let groceries = client.create_category("Groceries", "EXPENSE").await;
    let transaction = client
        .create_transaction(Some(&groceries), "EXPENSE", 120.0, "2025-06-05")
        .await;
    let transaction_id = transaction["id"].as_str().unwrap();
    client.create_budget(&groceries, 6, 2025, 1000.0).await;

    let response = client
        .request(
            Method::DELETE,
            &format!("/api/categories/{groceries}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 204);

    // The dependent budget is gone
    let response = client.get("/api/budgets?month=6&year=2025").await;
    let listed = body_json(response).await;
    assert_eq!(listed["meta"]["totalRowCount"], 0);

    // The transaction survives, detached from the category
    let response = client
        .get(&format!("/api/transactions/{transaction_id}"))
        .await;
    assert_eq!(response.status(), 200);
    let survived = body_json(response).await;
    assert_eq!(survived["categoryId"], serde_json::Value::Null);
    assert_eq!(survived["amount"], 120.0);
}

#[tokio::test]
async fn transaction_summary_for_dashboard() {
    let (app, _tmp) = build_test_router().await;
    let client = Client::registered(app, "dash@example.com").await;

    let salary = client.create_category("Salary", "INCOME").await;
    let groceries = client.create_category("Groceries", "EXPENSE").await;

    client
        .create_transaction(Some(&salary), "INCOME", 3000.0, "2025-06-01")
        .await;
    client
        .create_transaction(Some(&groceries), "EXPENSE", 120.5, "2025-06-05")
        .await;
    client
        .create_transaction(Some(&groceries), "EXPENSE", 79.5, "2025-06-07")
        .await;
    client
        .create_transaction(None, "EXPENSE", 10.0, "2025-06-09")
        .await;
    // Outside the requested range
    client
        .create_transaction(Some(&groceries), "EXPENSE", 999.0, "2025-05-31")
        .await;

    let response = client
        .get("/api/transactions/summary?startDate=2025-06-01&endDate=2025-06-30")
        .await;
    assert_eq!(response.status(), 200);
    let summary = body_json(response).await;
    assert_eq!(summary["totalIncome"], 3000.0);
    assert_eq!(summary["totalExpenses"], 210.0);
    assert_eq!(summary["balance"], 2790.0);
    assert_eq!(summary["transactionCount"], 4);

    let breakdown = summary["categoryBreakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 3);
    // Ordered by total, descending
    assert_eq!(breakdown[0]["category"], "Salary");
    assert_eq!(breakdown[1]["category"], "Groceries");
    assert_eq!(breakdown[1]["total"], 200.0);
    assert_eq!(breakdown[1]["count"], 2);
    assert_eq!(breakdown[2]["category"], serde_json::Value::Null);
}

#[tokio::test]
async fn transaction_filters_and_pagination() {
    let (app, _tmp) = build_test_router().await;
    let client = Client::registered(app, "filters@example.com").await;

    let groceries = client.create_category("Groceries", "EXPENSE").await;
    for (amount, date, description) in [
        (25.0, "2025-06-01", "farmers market"),
        (60.0, "2025-06-08", "weekly shop"),
        (95.0, "2025-06-15", "weekly shop"),
        (140.0, "2025-06-22", "party supplies"),
    ] {
        client
            .post_json(
                "/api/transactions",
                serde_json::json!({
                    "categoryId": groceries, "kind": "EXPENSE", "amount": amount,
                    "date": date, "description": description
                }),
            )
            .await;
    }

    // Amount range
    let response = client
        .get("/api/transactions?minAmount=50&maxAmount=100")
        .await;
    let listed = body_json(response).await;
    assert_eq!(listed["meta"]["totalRowCount"], 2);

    // Description search
    let response = client.get("/api/transactions?search=weekly").await;
    let listed = body_json(response).await;
    assert_eq!(listed["meta"]["totalRowCount"], 2);

    // Pagination with ascending amount sort
    let response = client
        .get("/api/transactions?sort=amount&page=2&pageSize=3")
        .await;
    let listed = body_json(response).await;
    assert_eq!(listed["meta"]["totalRowCount"], 4);
    assert_eq!(listed["meta"]["page"], 2);
    let page = listed["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["amount"], 140.0);

    // Date window
    let response = client
        .get("/api/transactions?startDate=2025-06-10&endDate=2025-06-30")
        .await;
    let listed = body_json(response).await;
    assert_eq!(listed["meta"]["totalRowCount"], 2);
}

#[tokio::test]
async fn users_cannot_see_each_other() {
    let (app, _tmp) = build_test_router().await;
    let alice = Client::registered(app.clone(), "alice@example.com").await;
    let bob = Client::registered(app, "bob@example.com").await;

    let category = alice.create_category("Groceries", "EXPENSE").await;
    let transaction = alice
        .create_transaction(Some(&category), "EXPENSE", 10.0, "2025-06-01")
        .await;

    // Bob sees an empty world and cannot touch Alice's records
    let listed = body_json(bob.get("/api/categories").await).await;
    assert_eq!(listed["meta"]["totalRowCount"], 0);

    let response = bob.get(&format!("/api/categories/{category}")).await;
    assert_eq!(response.status(), 404);

    let response = bob
        .request(
            Method::DELETE,
            &format!("/api/transactions/{}", transaction["id"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);

    // Bob can reuse the same category name for himself
    bob.create_category("Groceries", "EXPENSE").await;
}

#[tokio::test]
async fn malformed_filters_degrade_to_400() {
    let (app, _tmp) = build_test_router().await;
    let client = Client::registered(app, "edge@example.com").await;

    let response = client.get("/api/budgets/current?month=abc").await;
    assert_eq!(response.status(), 400);

    let response = client.get("/api/transactions?startDate=junk").await;
    assert_eq!(response.status(), 400);

    let response = client
        .get("/api/budgets/comparison?month=0&year=2025")
        .await;
    assert_eq!(response.status(), 400);
}
