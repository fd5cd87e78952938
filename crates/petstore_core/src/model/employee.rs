//! Employee write model.
//!
//! # Responsibility
//! - Define the staff record owned by exactly one store.
//! - Validate name fields before persistence.
//!
//! # Invariants
//! - `store_id == None` only while the employee is unassigned.
//! - The owning store's employee set is derived from `store_id`; there is
//!   no second copy of the association to keep in sync.

use crate::model::store::StoreId;
use crate::model::{optional_phone, require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Stable identifier for an employee, assigned by the persistence layer.
pub type EmployeeId = i64;

/// Employee payload used for both create (`id == None`) and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<EmployeeId>,
    pub store_id: Option<StoreId>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub job_title: String,
}

impl Employee {
    /// Creates a new unassigned employee payload.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// Checks required fields, reporting the first offending one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("first_name", &self.first_name)?;
        require_non_blank("last_name", &self.last_name)?;
        optional_phone("phone", &self.phone)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Employee;
    use crate::model::ValidationError;

    #[test]
    fn blank_last_name_is_reported_by_field() {
        let employee = Employee::new("Rosa", " ");
        let err = employee.validate().unwrap_err();
        assert_eq!(err, ValidationError::BlankField("last_name"));
    }

    #[test]
    fn new_employee_starts_unassigned() {
        let employee = Employee::new("Rosa", "Vane");
        assert!(employee.id.is_none());
        assert!(employee.store_id.is_none());
        employee.validate().unwrap();
    }
}
