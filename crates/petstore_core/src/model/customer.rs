//! Customer write model.
//!
//! # Responsibility
//! - Define the client record shared across stores.
//! - Keep the store-membership set normalized (sorted, deduplicated).
//!
//! # Invariants
//! - `store_ids` is the customer side of the M:N membership relation; the
//!   store side is derived from the same join rows at read time.
//! - `email` is required and must look like an email address.

use crate::model::store::StoreId;
use crate::model::{require_email, ValidationError};
use serde::{Deserialize, Serialize};

/// Stable identifier for a customer, assigned by the persistence layer.
pub type CustomerId = i64;

/// Customer payload used for both create (`id == None`) and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Stores this customer belongs to, sorted ascending without duplicates.
    pub store_ids: Vec<StoreId>,
}

impl Customer {
    /// Creates a new customer payload with no memberships.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Checks required fields, reporting the first offending one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_email("email", &self.email)?;
        Ok(())
    }

    /// Adds one store membership, keeping the set sorted and unique.
    pub fn grant_membership(&mut self, store_id: StoreId) {
        if let Err(position) = self.store_ids.binary_search(&store_id) {
            self.store_ids.insert(position, store_id);
        }
    }

    /// Removes one store membership. Returns whether it was present.
    pub fn revoke_membership(&mut self, store_id: StoreId) -> bool {
        match self.store_ids.binary_search(&store_id) {
            Ok(position) => {
                self.store_ids.remove(position);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns whether this customer belongs to the given store.
    pub fn is_member_of(&self, store_id: StoreId) -> bool {
        self.store_ids.binary_search(&store_id).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::Customer;

    #[test]
    fn membership_set_stays_sorted_and_unique() {
        let mut customer = Customer::new("Iris", "Okafor", "iris@example.com");
        customer.grant_membership(7);
        customer.grant_membership(2);
        customer.grant_membership(7);
        assert_eq!(customer.store_ids, vec![2, 7]);

        assert!(customer.revoke_membership(7));
        assert!(!customer.revoke_membership(7));
        assert_eq!(customer.store_ids, vec![2]);
        assert!(customer.is_member_of(2));
        assert!(!customer.is_member_of(7));
    }

    #[test]
    fn email_is_required() {
        let customer = Customer::new("Iris", "Okafor", "");
        customer.validate().unwrap_err();
    }
}
