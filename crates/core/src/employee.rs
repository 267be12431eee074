//! Employee identity types and input validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::{DbId, Timestamp};

/// An employee as exposed to callers. Never carries credential material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: String,
    pub position: String,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An employee together with the stored credential hash.
///
/// Only the directory's authentication path reads this; it is not serializable.
#[derive(Clone)]
pub struct EmployeeAccount {
    pub employee: Employee,
    pub password_hash: String,
}

impl fmt::Debug for EmployeeAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmployeeAccount")
            .field("employee", &self.employee)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Profile submitted when an administrator creates an employee.
#[derive(Clone, Deserialize, Validate)]
pub struct CreateEmployee {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[validate(length(min = 1, message = "department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "position is required"))]
    pub position: String,
    pub avatar: Option<String>,
}

impl fmt::Debug for CreateEmployee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateEmployee")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("role", &self.role)
            .field("department", &self.department)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl CreateEmployee {
    /// Check field shapes and the secret length.
    pub fn check(&self, min_password_length: usize) -> Result<(), CoreError> {
        if self.password.is_empty() {
            return Err(CoreError::missing_field("password"));
        }
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        crate::password::validate_password_strength(&self.password, min_password_length)
            .map_err(CoreError::Validation)
    }
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Clone, Default, Deserialize, Validate)]
pub struct UpdateEmployee {
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub password: Option<String>,
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: Option<String>,
    pub role: Option<Role>,
    #[validate(length(min = 1, message = "department must not be empty"))]
    pub department: Option<String>,
    #[validate(length(min = 1, message = "position must not be empty"))]
    pub position: Option<String>,
    pub avatar: Option<String>,
    pub is_active: Option<bool>,
}

impl fmt::Debug for UpdateEmployee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateEmployee")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl UpdateEmployee {
    pub fn check(&self, min_password_length: usize) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        if let Some(password) = &self.password {
            crate::password::validate_password_strength(password, min_password_length)
                .map_err(CoreError::Validation)?;
        }
        Ok(())
    }
}

/// Store-level insert for a new employee. The secret is already hashed.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: String,
    pub position: String,
    pub avatar: Option<String>,
    pub created_at: Timestamp,
}

/// Store-level partial update. The secret, if changing, is already hashed.
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub avatar: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: Option<Timestamp>,
}

impl EmployeeChanges {
    /// Apply the non-`None` fields onto `employee`.
    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(email) = &self.email {
            employee.email = email.clone();
        }
        if let Some(first_name) = &self.first_name {
            employee.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            employee.last_name = last_name.clone();
        }
        if let Some(role) = self.role {
            employee.role = role;
        }
        if let Some(department) = &self.department {
            employee.department = department.clone();
        }
        if let Some(position) = &self.position {
            employee.position = position.clone();
        }
        if let Some(avatar) = &self.avatar {
            employee.avatar = Some(avatar.clone());
        }
        if let Some(is_active) = self.is_active {
            employee.is_active = is_active;
        }
        if let Some(updated_at) = self.updated_at {
            employee.updated_at = updated_at;
        }
    }
}
