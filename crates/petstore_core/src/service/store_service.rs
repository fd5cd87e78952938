//! Store use-case service.
//!
//! # Responsibility
//! - Provide store create/update/get/list/delete APIs.
//! - Return persisted projections with both association sets loaded.
//!
//! # Invariants
//! - `save_store` creates on a missing id and updates on a present one;
//!   an unknown id fails, it never silently creates.
//! - Store deletion cascades to owned employees and membership rows at
//!   the persistence layer, not here.

use crate::model::store::{Store, StoreId};
use crate::model::ValidationError;
use crate::repo::store_repo::{StoreRecord, StoreRepository};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for store use-cases.
#[derive(Debug)]
pub enum StoreServiceError {
    /// Target store does not exist.
    NotFound(StoreId),
    /// A required field is missing or malformed.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for StoreServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "store not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for StoreServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::StoreNotFound(store_id) => Self::NotFound(store_id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Store service facade over repository implementations.
pub struct StoreService<R: StoreRepository> {
    repo: R,
}

impl<R: StoreRepository> StoreService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates or updates one store and returns the persisted projection.
    ///
    /// A payload without an id creates a new store; a payload with an id
    /// updates the existing row or fails with `NotFound`.
    pub fn save_store(&self, payload: Store) -> Result<StoreRecord, StoreServiceError> {
        let store_id = self.repo.save(&payload)?;
        self.read_back(store_id)
    }

    /// Gets one store by id with employees and customers loaded.
    pub fn get_store(&self, store_id: StoreId) -> Result<StoreRecord, StoreServiceError> {
        self.repo
            .get(store_id)?
            .ok_or(StoreServiceError::NotFound(store_id))
    }

    /// Lists all stores ordered by id.
    pub fn list_stores(&self) -> Result<Vec<StoreRecord>, StoreServiceError> {
        self.repo.list().map_err(Into::into)
    }

    /// Deletes one store; owned employees and membership rows go with it.
    pub fn delete_store(&self, store_id: StoreId) -> Result<(), StoreServiceError> {
        self.repo.delete(store_id).map_err(Into::into)
    }

    fn read_back(&self, store_id: StoreId) -> Result<StoreRecord, StoreServiceError> {
        self.repo
            .get(store_id)?
            .ok_or(StoreServiceError::InconsistentState(
                "saved store not found in read-back",
            ))
    }
}
