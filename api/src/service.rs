//! Employee and compensation operations.

use entity::{compensation, employee};
use platform_api::{ApiError, ApiResult};
use platform_db::{self, DbPool};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DbErr, EntityTrait, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::{Compensation, Employee, ReportingStructure};
use crate::reporting;

pub(crate) fn db_error(err: DbErr) -> ApiError {
    ApiError::internal(err.into())
}

/// Persist a new employee under a freshly assigned id. Any direct reports
/// listed on the input are attached by id, in list order.
pub async fn create_employee(db: &DbPool, input: Employee) -> ApiResult<Employee> {
    let id = Uuid::new_v4();
    let txn = db.begin().await.map_err(db_error)?;
    employee::ActiveModel {
        id: Set(id),
        first_name: Set(input.first_name.clone()),
        last_name: Set(input.last_name.clone()),
        position: Set(input.position.clone()),
        department: Set(input.department.clone()),
        manager_id: Set(None),
        report_order: Set(None),
    }
    .insert(&txn)
    .await
    .map_err(db_error)?;
    attach_reports(&txn, id, input.direct_reports.as_deref().unwrap_or(&[])).await?;
    txn.commit().await.map_err(db_error)?;
    Ok(Employee {
        employee_id: Some(id),
        ..input
    })
}

/// One level of hydration: the employee plus its immediate direct reports.
/// Full recursion is the reporting path's job.
pub async fn get_employee_by_id(db: &DbPool, id: Uuid) -> ApiResult<Option<Employee>> {
    let Some((root, reports)) = platform_db::find_employee_with_reports(db, id)
        .await
        .map_err(db_error)?
    else {
        return Ok(None);
    };
    let mut employee = Employee::from_model(root);
    if !reports.is_empty() {
        employee.direct_reports = Some(reports.into_iter().map(Employee::from_model).collect());
    }
    Ok(Some(employee))
}

/// Wholesale replace: the original row goes away and the replacement is
/// inserted under the original id, all within one transaction. The
/// replacement's own id, if set, is discarded.
pub async fn replace_employee(
    db: &DbPool,
    original: employee::Model,
    replacement: Employee,
) -> ApiResult<Employee> {
    let id = original.id;
    let txn = db.begin().await.map_err(db_error)?;
    platform_db::detach_reports(&txn, id).await.map_err(db_error)?;
    employee::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(db_error)?;
    employee::ActiveModel {
        id: Set(id),
        first_name: Set(replacement.first_name.clone()),
        last_name: Set(replacement.last_name.clone()),
        position: Set(replacement.position.clone()),
        department: Set(replacement.department.clone()),
        manager_id: Set(None),
        report_order: Set(None),
    }
    .insert(&txn)
    .await
    .map_err(db_error)?;
    attach_reports(&txn, id, replacement.direct_reports.as_deref().unwrap_or(&[])).await?;
    txn.commit().await.map_err(db_error)?;
    Ok(Employee {
        employee_id: Some(id),
        ..replacement
    })
}

/// Full hydration plus the transitive count.
pub async fn get_reporting_structure(
    db: &DbPool,
    id: Uuid,
) -> ApiResult<Option<ReportingStructure>> {
    let Some(employee) = reporting::load_tree(db, id).await.map_err(db_error)? else {
        return Ok(None);
    };
    let number_of_reports = reporting::count_reports(&employee);
    Ok(Some(ReportingStructure {
        employee,
        number_of_reports,
    }))
}

/// Employee existence is checked by the caller before this runs.
pub async fn create_compensation(db: &DbPool, input: Compensation) -> ApiResult<Compensation> {
    compensation::ActiveModel {
        employee_id: Set(input.employee),
        salary: Set(input.salary),
        effective_date: Set(input.effective_date),
    }
    .insert(db)
    .await
    .map_err(db_error)?;
    Ok(input)
}

pub async fn get_compensation_by_employee_id(
    db: &DbPool,
    id: Uuid,
) -> ApiResult<Option<Compensation>> {
    let found = platform_db::find_compensation(db, id).await.map_err(db_error)?;
    Ok(found.map(Compensation::from_model))
}

async fn attach_reports<C: ConnectionTrait>(
    db: &C,
    manager: Uuid,
    reports: &[Employee],
) -> ApiResult<()> {
    for (rank, report) in reports.iter().enumerate() {
        let report_id = report.employee_id.ok_or_else(|| {
            ApiError::InvalidInput("direct report entries must carry an employeeId".into())
        })?;
        let touched = platform_db::assign_manager(db, report_id, manager, rank as i32)
            .await
            .map_err(db_error)?;
        if touched == 0 {
            return Err(ApiError::NotFound);
        }
    }
    Ok(())
}
