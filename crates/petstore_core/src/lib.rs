//! Core domain logic for the pet store records backend.
//! This crate is the single source of truth for association invariants
//! between stores, employees, and customers.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::customer::{Customer, CustomerId};
pub use model::employee::{Employee, EmployeeId};
pub use model::store::{Store, StoreId};
pub use model::ValidationError;
pub use repo::customer_repo::{
    CustomerRecord, CustomerRepository, MembershipRemoval, SqliteCustomerRepository,
};
pub use repo::employee_repo::{EmployeeRecord, EmployeeRepository, SqliteEmployeeRepository};
pub use repo::store_repo::{SqliteStoreRepository, StoreRecord, StoreRepository};
pub use repo::{RepoError, RepoResult};
pub use service::customer_service::{CustomerService, CustomerServiceError};
pub use service::employee_service::{EmployeeService, EmployeeServiceError};
pub use service::store_service::{StoreService, StoreServiceError};
pub use service::Resolution;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
