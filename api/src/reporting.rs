//! The reporting core: tree hydration and transitive report counts.

use std::collections::HashMap;

use entity::employee;
use platform_db::{self, DbPool};
use sea_orm::DbErr;
use uuid::Uuid;

use crate::domain::Employee;

/// Materialize the full reporting tree under `root`.
///
/// Issues one combined query per employee, depth first and left to right in
/// report order. Fine at org-chart scale; a closure table would collapse the
/// whole walk into a single query. Assumes the reporting relation is a tree —
/// a cyclic chain of manager links does not terminate.
pub async fn load_tree(db: &DbPool, root: Uuid) -> Result<Option<Employee>, DbErr> {
    let mut nodes: HashMap<Uuid, (employee::Model, Vec<Uuid>)> = HashMap::new();
    let mut pending = vec![root];
    while let Some(id) = pending.pop() {
        let Some((model, reports)) = platform_db::find_employee_with_reports(db, id).await? else {
            if id == root {
                return Ok(None);
            }
            // A report deleted mid-walk reads as a leaf.
            continue;
        };
        let report_ids: Vec<Uuid> = reports.iter().map(|report| report.id).collect();
        // Reverse push so the first report is the next fetch.
        pending.extend(report_ids.iter().rev().copied());
        nodes.insert(id, (model, report_ids));
    }
    Ok(assemble(root, &mut nodes))
}

fn assemble(
    id: Uuid,
    nodes: &mut HashMap<Uuid, (employee::Model, Vec<Uuid>)>,
) -> Option<Employee> {
    let (model, report_ids) = nodes.remove(&id)?;
    let mut employee = Employee::from_model(model);
    let reports: Vec<Employee> = report_ids
        .into_iter()
        .filter_map(|report| assemble(report, nodes))
        .collect();
    if !reports.is_empty() {
        employee.direct_reports = Some(reports);
    }
    Some(employee)
}

/// Total transitive reports under `employee`.
///
/// Pure aggregation over an already materialized tree; an absent report list
/// counts the same as an empty one.
pub fn count_reports(employee: &Employee) -> usize {
    match &employee.direct_reports {
        None => 0,
        Some(reports) => reports.len() + reports.iter().map(count_reports).sum::<usize>(),
    }
}
