//! Store repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `stores` storage.
//! - Project each store together with its employee and customer sets.
//!
//! # Invariants
//! - Write paths call `Store::validate()` before SQL mutations.
//! - Deleting a store relies on the schema's `ON DELETE CASCADE` rules to
//!   drop owned employees and membership rows; the core never re-implements
//!   that cascade.
//! - Listings are deterministic: `store_id ASC`.

use crate::model::store::{Store, StoreId};
use crate::repo::customer_repo::{self, CustomerRecord};
use crate::repo::employee_repo::{self, EmployeeRecord};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

const STORE_SELECT_SQL: &str = "SELECT
    store_id,
    store_name,
    store_address,
    store_city,
    store_state,
    store_zip,
    store_phone,
    updated_at
FROM stores";

/// Read model for store list/detail use-cases, association sets included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreRecord {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    /// Update timestamp in epoch milliseconds.
    pub updated_at: i64,
    /// Employees owned by this store (derived from `employees.store_id`).
    pub employees: Vec<EmployeeRecord>,
    /// Customers holding a membership in this store.
    pub customers: Vec<CustomerRecord>,
}

impl StoreRecord {
    /// Converts the read model back into a write payload for follow-up
    /// saves.
    pub fn to_store(&self) -> Store {
        Store {
            id: Some(self.id),
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Repository interface for store operations.
pub trait StoreRepository {
    /// Inserts (`id == None`) or updates one store; returns its id.
    fn save(&self, store: &Store) -> RepoResult<StoreId>;
    /// Gets one store by id with both association sets loaded.
    fn get(&self, store_id: StoreId) -> RepoResult<Option<StoreRecord>>;
    /// Lists all stores with their association sets.
    fn list(&self) -> RepoResult<Vec<StoreRecord>>;
    /// Deletes one store by id; employees and membership rows cascade.
    fn delete(&self, store_id: StoreId) -> RepoResult<()>;
}

/// SQLite-backed store repository.
pub struct SqliteStoreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStoreRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "stores",
            &[
                "store_id",
                "store_name",
                "store_address",
                "store_city",
                "store_state",
                "store_zip",
                "store_phone",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl StoreRepository for SqliteStoreRepository<'_> {
    fn save(&self, store: &Store) -> RepoResult<StoreId> {
        store.validate()?;

        match store.id {
            None => {
                self.conn.execute(
                    "INSERT INTO stores (
                        store_name,
                        store_address,
                        store_city,
                        store_state,
                        store_zip,
                        store_phone
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                    params![
                        store.name.as_str(),
                        store.address.as_str(),
                        store.city.as_str(),
                        store.state.as_str(),
                        store.zip.as_str(),
                        store.phone.as_str(),
                    ],
                )?;
                Ok(self.conn.last_insert_rowid())
            }
            Some(store_id) => {
                let changed = self.conn.execute(
                    "UPDATE stores
                     SET
                        store_name = ?2,
                        store_address = ?3,
                        store_city = ?4,
                        store_state = ?5,
                        store_zip = ?6,
                        store_phone = ?7,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE store_id = ?1;",
                    params![
                        store_id,
                        store.name.as_str(),
                        store.address.as_str(),
                        store.city.as_str(),
                        store.state.as_str(),
                        store.zip.as_str(),
                        store.phone.as_str(),
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::StoreNotFound(store_id));
                }
                Ok(store_id)
            }
        }
    }

    fn get(&self, store_id: StoreId) -> RepoResult<Option<StoreRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STORE_SELECT_SQL} WHERE store_id = ?1;"))?;
        let mut rows = stmt.query([store_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_store_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<StoreRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STORE_SELECT_SQL} ORDER BY store_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut stores = Vec::new();
        while let Some(row) = rows.next()? {
            stores.push(parse_store_row(self.conn, row)?);
        }
        Ok(stores)
    }

    fn delete(&self, store_id: StoreId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM stores WHERE store_id = ?1;", [store_id])?;
        if changed == 0 {
            return Err(RepoError::StoreNotFound(store_id));
        }
        Ok(())
    }
}

pub(crate) fn store_exists(conn: &Connection, store_id: StoreId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM stores WHERE store_id = ?1);",
        [store_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_store_row(conn: &Connection, row: &Row<'_>) -> RepoResult<StoreRecord> {
    let store_id: StoreId = row.get("store_id")?;
    Ok(StoreRecord {
        id: store_id,
        name: row.get("store_name")?,
        address: row.get("store_address")?,
        city: row.get("store_city")?,
        state: row.get("store_state")?,
        zip: row.get("store_zip")?,
        phone: row.get("store_phone")?,
        updated_at: row.get("updated_at")?,
        employees: employee_repo::list_for_store(conn, store_id)?,
        customers: customer_repo::list_for_store(conn, store_id)?,
    })
}
