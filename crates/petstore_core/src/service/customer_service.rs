//! Customer use-case service (membership set, not single-owner).
//!
//! # Responsibility
//! - Provide store-scoped customer APIs over the M:N membership relation.
//! - Enforce the scope rule: operations given a store id fail unless the
//!   customer holds a membership in that store.
//!
//! # Invariants
//! - Membership is stored once, in the join rows; both sides of the M:N
//!   relation are projections of the same rows and cannot diverge.
//! - The membership set is owned by this service: save payloads never
//!   change memberships directly, only `add_to_store`/`remove_from_store`
//!   do.
//! - Removing the last membership deletes the customer record; removing
//!   one of several detaches that membership only.

use crate::model::customer::{Customer, CustomerId};
use crate::model::store::StoreId;
use crate::model::ValidationError;
use crate::repo::customer_repo::{CustomerRecord, CustomerRepository, MembershipRemoval};
use crate::repo::RepoError;
use crate::service::Resolution;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for customer use-cases.
#[derive(Debug)]
pub enum CustomerServiceError {
    /// Target store does not exist.
    StoreNotFound(StoreId),
    /// Target customer does not exist.
    CustomerNotFound(CustomerId),
    /// The customer exists but holds no membership in the store.
    NotMemberOfStore {
        customer_id: CustomerId,
        store_id: StoreId,
    },
    /// A required field is missing or malformed.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for CustomerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreNotFound(id) => write!(f, "store not found: {id}"),
            Self::CustomerNotFound(id) => write!(f, "customer not found: {id}"),
            Self::NotMemberOfStore {
                customer_id,
                store_id,
            } => write!(
                f,
                "customer {customer_id} is not a member of store {store_id}"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent customer state: {details}")
            }
        }
    }
}

impl Error for CustomerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CustomerServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::StoreNotFound(store_id) => Self::StoreNotFound(store_id),
            RepoError::CustomerNotFound(customer_id) => Self::CustomerNotFound(customer_id),
            RepoError::MembershipNotFound {
                customer_id,
                store_id,
            } => Self::NotMemberOfStore {
                customer_id,
                store_id,
            },
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Customer service facade over repository implementations.
pub struct CustomerService<R: CustomerRepository> {
    repo: R,
}

impl<R: CustomerRepository> CustomerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates or updates one customer and grants it membership in the
    /// given store.
    ///
    /// The payload id is resolved explicitly: `None` creates, a known id
    /// updates, an unknown id fails. Existing memberships in other stores
    /// are preserved, so adding the same customer to a second store leaves
    /// it a member of both.
    pub fn add_to_store(
        &self,
        store_id: StoreId,
        payload: Customer,
    ) -> Result<CustomerRecord, CustomerServiceError> {
        self.ensure_store_exists(store_id)?;
        let resolution = self.resolve(payload.id)?;
        let (id, store_ids) = match &resolution {
            Resolution::New => (None, Vec::new()),
            Resolution::Existing(current) => (Some(current.id), current.store_ids.clone()),
        };
        let mut target = Customer {
            id,
            store_ids,
            ..payload
        };
        target.grant_membership(store_id);
        let customer_id = self.repo.save(&target)?;
        self.read_back(customer_id)
    }

    /// Updates the fields of a customer holding membership in the store.
    ///
    /// Memberships are left untouched; ids carried by the payload are
    /// ignored in favor of the path arguments.
    pub fn update_scoped(
        &self,
        store_id: StoreId,
        customer_id: CustomerId,
        payload: Customer,
    ) -> Result<CustomerRecord, CustomerServiceError> {
        let current = self.get_scoped(store_id, customer_id)?;
        let target = Customer {
            id: Some(current.id),
            store_ids: current.store_ids.clone(),
            ..payload
        };
        self.repo.save(&target)?;
        self.read_back(customer_id)
    }

    /// Detaches a customer's membership in the given store.
    ///
    /// The membership must exist. When other memberships remain the record
    /// survives and only that one link is removed; detaching the last
    /// membership deletes the customer record outright. The returned
    /// outcome states which of the two happened.
    pub fn remove_from_store(
        &self,
        store_id: StoreId,
        customer_id: CustomerId,
    ) -> Result<MembershipRemoval, CustomerServiceError> {
        self.get_scoped(store_id, customer_id)?;
        self.repo
            .remove_membership(customer_id, store_id)
            .map_err(Into::into)
    }

    /// Gets a customer holding membership in the given store.
    ///
    /// Distinguishes "no such customer" from "not a member here" so
    /// callers can report the right failure.
    pub fn get_scoped(
        &self,
        store_id: StoreId,
        customer_id: CustomerId,
    ) -> Result<CustomerRecord, CustomerServiceError> {
        let record = self
            .repo
            .get(customer_id)?
            .ok_or(CustomerServiceError::CustomerNotFound(customer_id))?;
        if !record.store_ids.contains(&store_id) {
            return Err(CustomerServiceError::NotMemberOfStore {
                customer_id,
                store_id,
            });
        }
        Ok(record)
    }

    /// Lists all customers across stores.
    pub fn list_all(&self) -> Result<Vec<CustomerRecord>, CustomerServiceError> {
        self.repo.list().map_err(Into::into)
    }

    /// Lists the customers holding membership in one store.
    pub fn list_by_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<CustomerRecord>, CustomerServiceError> {
        self.ensure_store_exists(store_id)?;
        self.repo.list_by_store(store_id).map_err(Into::into)
    }

    fn resolve(
        &self,
        id: Option<CustomerId>,
    ) -> Result<Resolution<CustomerRecord>, CustomerServiceError> {
        match id {
            None => Ok(Resolution::New),
            Some(customer_id) => {
                let current = self
                    .repo
                    .get(customer_id)?
                    .ok_or(CustomerServiceError::CustomerNotFound(customer_id))?;
                Ok(Resolution::Existing(current))
            }
        }
    }

    fn ensure_store_exists(&self, store_id: StoreId) -> Result<(), CustomerServiceError> {
        if self.repo.store_exists(store_id)? {
            Ok(())
        } else {
            Err(CustomerServiceError::StoreNotFound(store_id))
        }
    }

    fn read_back(&self, customer_id: CustomerId) -> Result<CustomerRecord, CustomerServiceError> {
        self.repo
            .get(customer_id)?
            .ok_or(CustomerServiceError::InconsistentState(
                "saved customer not found in read-back",
            ))
    }
}
