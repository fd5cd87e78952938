//! Store write model.
//!
//! # Responsibility
//! - Define the root business entity of the association graph.
//! - Validate required contact fields before persistence.
//!
//! # Invariants
//! - A store id is assigned by storage on first save and never reused.
//! - `name` and `phone` are required; `zip` must look like a zip code
//!   when supplied.

use crate::model::{optional_zip, require_non_blank, require_phone, ValidationError};
use serde::{Deserialize, Serialize};

/// Stable identifier for a store, assigned by the persistence layer.
pub type StoreId = i64;

/// Store payload used for both create (`id == None`) and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: Option<StoreId>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
}

impl Store {
    /// Creates a new store payload with the required fields set.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Checks required fields, reporting the first offending one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("store_name", &self.name)?;
        require_phone("store_phone", &self.phone)?;
        optional_zip("store_zip", &self.zip)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::model::ValidationError;

    #[test]
    fn blank_name_is_reported_by_field() {
        let store = Store::new("", "555-0100");
        let err = store.validate().unwrap_err();
        assert_eq!(err, ValidationError::BlankField("store_name"));
    }

    #[test]
    fn minimal_store_passes_validation() {
        Store::new("Paws", "555-0100").validate().unwrap();
    }

    #[test]
    fn bad_zip_is_reported_by_field() {
        let mut store = Store::new("Paws", "555-0100");
        store.zip = "OR-97".to_string();
        let err = store.validate().unwrap_err();
        assert_eq!(err.field(), "store_zip");
    }
}
