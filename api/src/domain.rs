//! Wire-shape records for the HTTP surface.

use chrono::NaiveDate;
use entity::{compensation, employee};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<Uuid>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    /// Absent and empty mean the same thing: no reports. Request bodies may
    /// list id-only stubs here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_reports: Option<Vec<Employee>>,
}

impl Employee {
    /// A one-node view of a stored row; reports left absent.
    pub fn from_model(model: employee::Model) -> Self {
        Self {
            employee_id: Some(model.id),
            first_name: model.first_name,
            last_name: model.last_name,
            position: model.position,
            department: model.department,
            direct_reports: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    pub employee: Uuid,
    pub salary: i64,
    pub effective_date: NaiveDate,
}

impl Compensation {
    pub fn from_model(model: compensation::Model) -> Self {
        Self {
            employee: model.employee_id,
            salary: model.salary,
            effective_date: model.effective_date,
        }
    }
}

/// Derived per request, never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingStructure {
    pub employee: Employee,
    pub number_of_reports: usize,
}
