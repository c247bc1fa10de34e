use api::routes::{AppState, build_router};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Router over a fresh in-memory database.
pub async fn test_router() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    // One connection keeps every query on the same in-memory database.
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    bootstrap_sqlite(&db).await;
    build_router(AppState { pool: db }, &[])
}

async fn bootstrap_sqlite(db: &DatabaseConnection) {
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE employee (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            position TEXT NOT NULL,
            department TEXT NOT NULL,
            manager_id TEXT,
            report_order INTEGER
        );
        "#,
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE compensation (
            employee_id TEXT PRIMARY KEY,
            salary INTEGER NOT NULL,
            effective_date TEXT NOT NULL
        );
        "#,
    ))
    .await
    .unwrap();
}

/// Fire one request at the router; decode the JSON body, Null when empty.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// POST a new employee, optionally attaching existing ids as direct reports.
pub async fn create_employee(
    router: &Router,
    first: &str,
    last: &str,
    position: &str,
    reports: &[&str],
) -> String {
    let mut body = json!({
        "firstName": first,
        "lastName": last,
        "position": position,
        "department": "Engineering",
    });
    if !reports.is_empty() {
        body["directReports"] =
            Value::Array(reports.iter().map(|id| json!({ "employeeId": id })).collect());
    }
    let (status, value) = send(router, Method::POST, "/api/employee", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    value["employeeId"].as_str().unwrap().to_string()
}

pub struct SeededOrg {
    pub lennon: String,
    pub mccartney: String,
    pub starr: String,
    pub best: String,
    pub harrison: String,
}

/// The demo org chart: Lennon -> [McCartney, Starr], Starr -> [Best, Harrison].
pub async fn seed_org(router: &Router) -> SeededOrg {
    let mccartney = create_employee(router, "Paul", "McCartney", "Developer I", &[]).await;
    let best = create_employee(router, "Pete", "Best", "Developer II", &[]).await;
    let harrison = create_employee(router, "George", "Harrison", "Developer III", &[]).await;
    let starr = create_employee(router, "Ringo", "Starr", "Developer V", &[&best, &harrison]).await;
    let lennon = create_employee(
        router,
        "John",
        "Lennon",
        "Development Manager",
        &[&mccartney, &starr],
    )
    .await;
    SeededOrg {
        lennon,
        mccartney,
        starr,
        best,
        harrison,
    }
}
