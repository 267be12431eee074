//! Employee identities and credential checks.

use std::sync::Arc;

use workforce_core::clock::Clock;
use workforce_core::employee::{
    CreateEmployee, Employee, EmployeeChanges, NewEmployee, UpdateEmployee,
};
use workforce_core::error::CoreError;
use workforce_core::password::CredentialVerifier;
use workforce_core::types::DbId;
use workforce_db::constraints::UQ_EMPLOYEES_EMAIL;

use crate::error::{EngineError, EngineResult};
use crate::store::{EmployeeStore, StoreError};

/// Owns employee records. Employees are deactivated, never deleted.
pub struct EmployeeDirectory {
    store: Arc<dyn EmployeeStore>,
    verifier: Arc<dyn CredentialVerifier>,
    clock: Arc<dyn Clock>,
    min_password_length: usize,
}

/// Translate a rejected email write into the domain conflict.
fn duplicate_email(err: StoreError, email: &str) -> EngineError {
    if err.is_unique_violation(UQ_EMPLOYEES_EMAIL) {
        CoreError::DuplicateIdentity {
            email: email.to_string(),
        }
        .into()
    } else {
        err.into()
    }
}

impl EmployeeDirectory {
    pub fn new(
        store: Arc<dyn EmployeeStore>,
        verifier: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
        min_password_length: usize,
    ) -> Self {
        Self {
            store,
            verifier,
            clock,
            min_password_length,
        }
    }

    /// Exact, case-sensitive lookup.
    pub async fn find_by_email(&self, email: &str) -> EngineResult<Option<Employee>> {
        let account = self.store.account_by_email(email).await?;
        Ok(account.map(|a| a.employee))
    }

    pub async fn find_by_id(&self, id: DbId) -> EngineResult<Option<Employee>> {
        Ok(self.store.employee_by_id(id).await?)
    }

    /// Like [`find_by_id`](Self::find_by_id) but absence is `NotFound`.
    pub async fn get(&self, id: DbId) -> EngineResult<Employee> {
        self.find_by_id(id).await?.ok_or_else(|| {
            CoreError::NotFound {
                entity: "Employee",
                id,
            }
            .into()
        })
    }

    pub async fn list_active(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.store.active_employees().await?)
    }

    pub async fn count_active(&self) -> EngineResult<i64> {
        Ok(self.store.count_active_employees().await?)
    }

    /// Register a new employee. The secret is hashed before it reaches the
    /// store.
    pub async fn create(&self, profile: CreateEmployee) -> EngineResult<Employee> {
        profile.check(self.min_password_length)?;

        if self.store.account_by_email(&profile.email).await?.is_some() {
            return Err(CoreError::DuplicateIdentity {
                email: profile.email,
            }
            .into());
        }

        let password_hash = self.verifier.hash(&profile.password)?;
        let input = NewEmployee {
            email: profile.email,
            password_hash,
            first_name: profile.first_name,
            last_name: profile.last_name,
            role: profile.role,
            department: profile.department,
            position: profile.position,
            avatar: profile.avatar,
            created_at: self.clock.now(),
        };

        // A concurrent create with the same email loses at the constraint.
        let employee = self
            .store
            .insert_employee(&input)
            .await
            .map_err(|e| duplicate_email(e, &input.email))?;

        tracing::info!(
            employee_id = employee.id,
            email = %employee.email,
            role = employee.role.as_str(),
            "Employee created"
        );
        Ok(employee)
    }

    /// Check a secret against the stored hash.
    ///
    /// Returns `None` for an unknown email, a wrong secret, or a deactivated
    /// account alike.
    pub async fn verify_credentials(
        &self,
        email: &str,
        secret: &str,
    ) -> EngineResult<Option<Employee>> {
        let Some(account) = self.store.account_by_email(email).await? else {
            return Ok(None);
        };
        if !self.verifier.verify(secret, &account.password_hash)? {
            return Ok(None);
        }
        if !account.employee.is_active {
            return Ok(None);
        }
        Ok(Some(account.employee))
    }

    /// Soft-delete. Deactivating an inactive employee succeeds again.
    pub async fn deactivate(&self, id: DbId) -> EngineResult<Employee> {
        let changes = EmployeeChanges {
            is_active: Some(false),
            updated_at: Some(self.clock.now()),
            ..Default::default()
        };
        let employee = self
            .store
            .update_employee(id, &changes)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Employee",
                id,
            })?;
        tracing::info!(employee_id = id, "Employee deactivated");
        Ok(employee)
    }

    /// Apply a partial profile update. A new email is re-checked for
    /// uniqueness; a new secret is re-hashed.
    pub async fn update(&self, id: DbId, input: UpdateEmployee) -> EngineResult<Employee> {
        input.check(self.min_password_length)?;
        self.get(id).await?;

        if let Some(email) = &input.email {
            if let Some(existing) = self.store.account_by_email(email).await? {
                if existing.employee.id != id {
                    return Err(CoreError::DuplicateIdentity {
                        email: email.clone(),
                    }
                    .into());
                }
            }
        }

        let password_hash = input
            .password
            .as_deref()
            .map(|secret| self.verifier.hash(secret))
            .transpose()?;

        let changes = EmployeeChanges {
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role,
            department: input.department,
            position: input.position,
            avatar: input.avatar,
            is_active: input.is_active,
            updated_at: Some(self.clock.now()),
        };

        let employee = self
            .store
            .update_employee(id, &changes)
            .await
            .map_err(|e| duplicate_email(e, changes.email.as_deref().unwrap_or_default()))?
            .ok_or(CoreError::NotFound {
                entity: "Employee",
                id,
            })?;

        tracing::info!(employee_id = id, "Employee updated");
        Ok(employee)
    }
}
