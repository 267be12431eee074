//! Employee row model.

use sqlx::FromRow;
use workforce_core::employee::{Employee, EmployeeAccount};
use workforce_core::error::CoreError;
use workforce_core::roles::Role;
use workforce_core::types::{DbId, Timestamp};

/// Full row from the `employees` table.
///
/// Contains the password hash -- convert with [`EmployeeRow::into_employee`]
/// for anything caller-facing.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub department: String,
    pub position: String,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EmployeeRow {
    pub fn into_employee(self) -> Result<Employee, CoreError> {
        EmployeeAccount::try_from(self).map(|account| account.employee)
    }
}

impl TryFrom<EmployeeRow> for EmployeeAccount {
    type Error = CoreError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(EmployeeAccount {
            employee: Employee {
                id: row.id,
                email: row.email,
                first_name: row.first_name,
                last_name: row.last_name,
                role: Role::from_str(&row.role)?,
                department: row.department,
                position: row.position,
                avatar: row.avatar,
                is_active: row.is_active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        })
    }
}
