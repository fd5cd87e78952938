//! Employee use-case service (state machine: Unassigned -> Assigned).
//!
//! # Responsibility
//! - Provide store-scoped and unscoped employee APIs.
//! - Enforce the scope rule: operations given a store id fail unless the
//!   employee currently belongs to that store.
//!
//! # Invariants
//! - The store's employee set is derived from the employee's `store_id`
//!   column; a successful save can never leave the two sides disagreeing.
//! - Re-assigning to the store an employee already belongs to is a
//!   conflict; moving between stores removes the employee from the prior
//!   store's set by the same write.

use crate::model::employee::{Employee, EmployeeId};
use crate::model::store::StoreId;
use crate::model::ValidationError;
use crate::repo::employee_repo::{EmployeeRecord, EmployeeRepository};
use crate::repo::RepoError;
use crate::service::Resolution;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for employee use-cases.
#[derive(Debug)]
pub enum EmployeeServiceError {
    /// Target store does not exist.
    StoreNotFound(StoreId),
    /// Target employee does not exist.
    EmployeeNotFound(EmployeeId),
    /// The employee exists but belongs to a different store.
    NotEmployedByStore {
        employee_id: EmployeeId,
        store_id: StoreId,
    },
    /// The employee is already assigned to that exact store.
    AlreadyAssigned {
        employee_id: EmployeeId,
        store_id: StoreId,
    },
    /// A required field is missing or malformed.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for EmployeeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreNotFound(id) => write!(f, "store not found: {id}"),
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::NotEmployedByStore {
                employee_id,
                store_id,
            } => write!(
                f,
                "employee {employee_id} is not employed by store {store_id}"
            ),
            Self::AlreadyAssigned {
                employee_id,
                store_id,
            } => write!(
                f,
                "employee {employee_id} is already assigned to store {store_id}"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent employee state: {details}")
            }
        }
    }
}

impl Error for EmployeeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EmployeeServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::StoreNotFound(store_id) => Self::StoreNotFound(store_id),
            RepoError::EmployeeNotFound(employee_id) => Self::EmployeeNotFound(employee_id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Employee service facade over repository implementations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates or updates one employee under the given store and assigns
    /// it there.
    ///
    /// The payload id is resolved explicitly: `None` creates, a known id
    /// updates, an unknown id fails. Any prior assignment is overwritten
    /// by the new store.
    pub fn add_to_store(
        &self,
        store_id: StoreId,
        payload: Employee,
    ) -> Result<EmployeeRecord, EmployeeServiceError> {
        self.ensure_store_exists(store_id)?;
        let resolution = self.resolve(payload.id)?;
        let id = match &resolution {
            Resolution::New => None,
            Resolution::Existing(current) => Some(current.id),
        };
        let target = Employee {
            id,
            store_id: Some(store_id),
            ..payload
        };
        let employee_id = self.repo.save(&target)?;
        self.read_back(employee_id)
    }

    /// Updates the fields of an employee of the given store.
    ///
    /// The assignment is left untouched; ids carried by the payload are
    /// ignored in favor of the path arguments.
    pub fn update_scoped(
        &self,
        store_id: StoreId,
        employee_id: EmployeeId,
        payload: Employee,
    ) -> Result<EmployeeRecord, EmployeeServiceError> {
        let current = self.get_scoped(store_id, employee_id)?;
        let target = Employee {
            id: Some(current.id),
            store_id: current.store_id,
            ..payload
        };
        self.repo.save(&target)?;
        self.read_back(employee_id)
    }

    /// Creates or updates one employee without store scope.
    ///
    /// Never touches the assignment: a new employee starts unassigned and
    /// an existing one keeps its current store.
    pub fn save_unscoped(
        &self,
        payload: Employee,
    ) -> Result<EmployeeRecord, EmployeeServiceError> {
        let resolution = self.resolve(payload.id)?;
        let (id, store_id) = match &resolution {
            Resolution::New => (None, None),
            Resolution::Existing(current) => (Some(current.id), current.store_id),
        };
        let target = Employee {
            id,
            store_id,
            ..payload
        };
        let employee_id = self.repo.save(&target)?;
        self.read_back(employee_id)
    }

    /// Moves an employee into the given store.
    ///
    /// Fails with `AlreadyAssigned` when the employee already belongs to
    /// that exact store. Moving from a different store is allowed and
    /// removes the employee from the prior store's set in the same write.
    pub fn assign_to_store(
        &self,
        store_id: StoreId,
        employee_id: EmployeeId,
    ) -> Result<EmployeeRecord, EmployeeServiceError> {
        self.ensure_store_exists(store_id)?;
        let current = self
            .repo
            .get(employee_id)?
            .ok_or(EmployeeServiceError::EmployeeNotFound(employee_id))?;
        if current.store_id == Some(store_id) {
            return Err(EmployeeServiceError::AlreadyAssigned {
                employee_id,
                store_id,
            });
        }

        let mut target = current.to_employee();
        target.store_id = Some(store_id);
        self.repo.save(&target)?;
        self.read_back(employee_id)
    }

    /// Deletes an employee of the given store.
    pub fn delete_scoped(
        &self,
        store_id: StoreId,
        employee_id: EmployeeId,
    ) -> Result<(), EmployeeServiceError> {
        self.get_scoped(store_id, employee_id)?;
        self.repo.delete(employee_id)?;
        Ok(())
    }

    /// Gets an employee of the given store.
    ///
    /// Distinguishes "no such employee" from "employed elsewhere" so
    /// callers can report the right failure.
    pub fn get_scoped(
        &self,
        store_id: StoreId,
        employee_id: EmployeeId,
    ) -> Result<EmployeeRecord, EmployeeServiceError> {
        let record = self
            .repo
            .get(employee_id)?
            .ok_or(EmployeeServiceError::EmployeeNotFound(employee_id))?;
        if record.store_id != Some(store_id) {
            return Err(EmployeeServiceError::NotEmployedByStore {
                employee_id,
                store_id,
            });
        }
        Ok(record)
    }

    /// Lists all employees, assigned or not.
    pub fn list_all(&self) -> Result<Vec<EmployeeRecord>, EmployeeServiceError> {
        self.repo.list().map_err(Into::into)
    }

    /// Lists the employees of one store.
    pub fn list_by_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<EmployeeRecord>, EmployeeServiceError> {
        self.ensure_store_exists(store_id)?;
        self.repo.list_by_store(store_id).map_err(Into::into)
    }

    fn resolve(
        &self,
        id: Option<EmployeeId>,
    ) -> Result<Resolution<EmployeeRecord>, EmployeeServiceError> {
        match id {
            None => Ok(Resolution::New),
            Some(employee_id) => {
                let current = self
                    .repo
                    .get(employee_id)?
                    .ok_or(EmployeeServiceError::EmployeeNotFound(employee_id))?;
                Ok(Resolution::Existing(current))
            }
        }
    }

    fn ensure_store_exists(&self, store_id: StoreId) -> Result<(), EmployeeServiceError> {
        if self.repo.store_exists(store_id)? {
            Ok(())
        } else {
            Err(EmployeeServiceError::StoreNotFound(store_id))
        }
    }

    fn read_back(&self, employee_id: EmployeeId) -> Result<EmployeeRecord, EmployeeServiceError> {
        self.repo
            .get(employee_id)?
            .ok_or(EmployeeServiceError::InconsistentState(
                "saved employee not found in read-back",
            ))
    }
}
