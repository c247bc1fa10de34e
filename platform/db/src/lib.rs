//! Database primitives and the employee/compensation query helpers.

use entity::{compensation, employee};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, Value,
};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing")]
    MissingUrl,
    #[error(transparent)]
    Connect(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url_key")]
    env_key: String,
}

fn default_url_key() -> String {
    "DATABASE_URL".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            env_key: default_url_key(),
        }
    }
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn database_url(&self) -> Result<String, DbError> {
        std::env::var(&self.env_key).map_err(|_| DbError::MissingUrl)
    }
}

/// Open a pool against the configured database.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let url = settings.database_url()?;
    let options = ConnectOptions::new(url);
    Ok(Database::connect(options).await?)
}

/// Point lookup of a single employee row.
pub async fn find_employee<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<employee::Model>, DbErr> {
    employee::Entity::find_by_id(id).one(db).await
}

/// Fetch an employee row together with its immediate direct reports in one
/// query. Reports come back in `report_order`.
pub async fn find_employee_with_reports<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<(employee::Model, Vec<employee::Model>)>, DbErr> {
    let rows = employee::Entity::find()
        .filter(
            Condition::any()
                .add(employee::Column::Id.eq(id))
                .add(employee::Column::ManagerId.eq(id)),
        )
        .all(db)
        .await?;

    let mut root = None;
    let mut reports = Vec::new();
    for row in rows {
        if row.id == id {
            root = Some(row);
        } else {
            reports.push(row);
        }
    }
    reports.sort_by_key(|report| report.report_order.unwrap_or(i32::MAX));
    Ok(root.map(|employee| (employee, reports)))
}

/// Clear the manager link of every direct report of `manager`.
pub async fn detach_reports<C: ConnectionTrait>(db: &C, manager: Uuid) -> Result<(), DbErr> {
    employee::Entity::update_many()
        .col_expr(employee::Column::ManagerId, Expr::value(Value::Uuid(None)))
        .col_expr(employee::Column::ReportOrder, Expr::value(Value::Int(None)))
        .filter(employee::Column::ManagerId.eq(manager))
        .exec(db)
        .await?;
    Ok(())
}

/// Point `report` at `manager` at position `rank` within the report list.
/// Returns the number of rows touched (zero when no such employee exists).
pub async fn assign_manager<C: ConnectionTrait>(
    db: &C,
    report: Uuid,
    manager: Uuid,
    rank: i32,
) -> Result<u64, DbErr> {
    let result = employee::Entity::update_many()
        .col_expr(employee::Column::ManagerId, Expr::value(manager))
        .col_expr(employee::Column::ReportOrder, Expr::value(rank))
        .filter(employee::Column::Id.eq(report))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Compensation lookup keyed by employee id.
pub async fn find_compensation<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
) -> Result<Option<compensation::Model>, DbErr> {
    compensation::Entity::find_by_id(employee_id).one(db).await
}
