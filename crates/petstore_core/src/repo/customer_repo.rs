//! Customer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and per-store listing over `customers` storage.
//! - Own the M:N membership rows in `store_customers`, replacing a
//!   customer's whole membership set atomically on save.
//!
//! # Invariants
//! - Write paths call `Customer::validate()` before SQL mutations.
//! - The customer row and its membership rows commit in one transaction.
//! - Membership ids in read models are sorted ascending.
//! - Listings are deterministic: `last_name, first_name, customer_id`.

use crate::model::customer::{Customer, CustomerId};
use crate::model::store::StoreId;
use crate::repo::store_repo::store_exists;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use serde::Serialize;

const CUSTOMER_SELECT_SQL: &str = "SELECT
    customer_id,
    first_name,
    last_name,
    email,
    updated_at
FROM customers";

const CUSTOMER_ORDER_SQL: &str = "ORDER BY last_name ASC, first_name ASC, customer_id ASC";

/// Read model for customer list/detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Stores this customer belongs to, sorted ascending.
    pub store_ids: Vec<StoreId>,
    /// Update timestamp in epoch milliseconds.
    pub updated_at: i64,
}

impl CustomerRecord {
    /// Converts the read model back into a write payload for follow-up
    /// saves.
    pub fn to_customer(&self) -> Customer {
        Customer {
            id: Some(self.id),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            store_ids: self.store_ids.clone(),
        }
    }
}

/// Outcome of a membership-scoped removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipRemoval {
    /// Membership detached; the customer still belongs to other stores.
    MembershipDetached,
    /// Last membership detached; the customer record was deleted with it.
    CustomerDeleted,
}

/// Repository interface for customer operations.
pub trait CustomerRepository {
    /// Inserts (`id == None`) or updates one customer and replaces its
    /// membership rows, all in one transaction; returns the customer id.
    fn save(&self, customer: &Customer) -> RepoResult<CustomerId>;
    /// Gets one customer by id, memberships included.
    fn get(&self, customer_id: CustomerId) -> RepoResult<Option<CustomerRecord>>;
    /// Lists all customers across stores.
    fn list(&self) -> RepoResult<Vec<CustomerRecord>>;
    /// Lists the customers holding a membership in one store.
    fn list_by_store(&self, store_id: StoreId) -> RepoResult<Vec<CustomerRecord>>;
    /// Deletes one customer by id; membership rows go with it.
    fn delete(&self, customer_id: CustomerId) -> RepoResult<()>;
    /// Detaches one membership; deletes the customer record when it was
    /// the last one. Both steps share one transaction.
    fn remove_membership(
        &self,
        customer_id: CustomerId,
        store_id: StoreId,
    ) -> RepoResult<MembershipRemoval>;
    /// Reports whether a store row exists, for scope checks above this
    /// repository.
    fn store_exists(&self, store_id: StoreId) -> RepoResult<bool>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "customers",
            &["customer_id", "first_name", "last_name", "email", "updated_at"],
        )?;
        ensure_connection_ready(conn, "store_customers", &["store_id", "customer_id"])?;
        Ok(Self { conn })
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn save(&self, customer: &Customer) -> RepoResult<CustomerId> {
        customer.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for &store_id in &customer.store_ids {
            if !store_exists(&tx, store_id)? {
                return Err(RepoError::StoreNotFound(store_id));
            }
        }

        let customer_id = match customer.id {
            None => {
                tx.execute(
                    "INSERT INTO customers (first_name, last_name, email)
                     VALUES (?1, ?2, ?3);",
                    params![
                        customer.first_name.as_str(),
                        customer.last_name.as_str(),
                        customer.email.as_str(),
                    ],
                )?;
                tx.last_insert_rowid()
            }
            Some(customer_id) => {
                let changed = tx.execute(
                    "UPDATE customers
                     SET
                        first_name = ?2,
                        last_name = ?3,
                        email = ?4,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE customer_id = ?1;",
                    params![
                        customer_id,
                        customer.first_name.as_str(),
                        customer.last_name.as_str(),
                        customer.email.as_str(),
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::CustomerNotFound(customer_id));
                }
                customer_id
            }
        };

        tx.execute(
            "DELETE FROM store_customers WHERE customer_id = ?1;",
            [customer_id],
        )?;
        for &store_id in &customer.store_ids {
            tx.execute(
                "INSERT INTO store_customers (store_id, customer_id) VALUES (?1, ?2);",
                params![store_id, customer_id],
            )?;
        }

        tx.commit()?;
        Ok(customer_id)
    }

    fn get(&self, customer_id: CustomerId) -> RepoResult<Option<CustomerRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} WHERE customer_id = ?1;"))?;
        let mut rows = stmt.query([customer_id])?;
        if let Some(row) = rows.next()? {
            let record = parse_customer_row(self.conn, row)?;
            return Ok(Some(record));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<CustomerRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} {CUSTOMER_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(self.conn, row)?);
        }
        Ok(customers)
    }

    fn list_by_store(&self, store_id: StoreId) -> RepoResult<Vec<CustomerRecord>> {
        list_for_store(self.conn, store_id)
    }

    fn delete(&self, customer_id: CustomerId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM customers WHERE customer_id = ?1;",
            [customer_id],
        )?;
        if changed == 0 {
            return Err(RepoError::CustomerNotFound(customer_id));
        }
        Ok(())
    }

    fn remove_membership(
        &self,
        customer_id: CustomerId,
        store_id: StoreId,
    ) -> RepoResult<MembershipRemoval> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let customer_present: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE customer_id = ?1);",
            [customer_id],
            |row| row.get(0),
        )?;
        if customer_present == 0 {
            return Err(RepoError::CustomerNotFound(customer_id));
        }

        let detached = tx.execute(
            "DELETE FROM store_customers WHERE store_id = ?1 AND customer_id = ?2;",
            params![store_id, customer_id],
        )?;
        if detached == 0 {
            return Err(RepoError::MembershipNotFound {
                customer_id,
                store_id,
            });
        }

        let remaining: i64 = tx.query_row(
            "SELECT COUNT(*) FROM store_customers WHERE customer_id = ?1;",
            [customer_id],
            |row| row.get(0),
        )?;

        let outcome = if remaining == 0 {
            tx.execute(
                "DELETE FROM customers WHERE customer_id = ?1;",
                [customer_id],
            )?;
            MembershipRemoval::CustomerDeleted
        } else {
            tx.execute(
                "UPDATE customers
                 SET updated_at = (strftime('%s', 'now') * 1000)
                 WHERE customer_id = ?1;",
                [customer_id],
            )?;
            MembershipRemoval::MembershipDetached
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn store_exists(&self, store_id: StoreId) -> RepoResult<bool> {
        store_exists(self.conn, store_id)
    }
}

pub(crate) fn list_for_store(
    conn: &Connection,
    store_id: StoreId,
) -> RepoResult<Vec<CustomerRecord>> {
    let mut stmt = conn.prepare(
        "SELECT
            c.customer_id AS customer_id,
            c.first_name AS first_name,
            c.last_name AS last_name,
            c.email AS email,
            c.updated_at AS updated_at
         FROM customers c
         INNER JOIN store_customers sc ON sc.customer_id = c.customer_id
         WHERE sc.store_id = ?1
         ORDER BY c.last_name ASC, c.first_name ASC, c.customer_id ASC;",
    )?;
    let mut rows = stmt.query([store_id])?;
    let mut customers = Vec::new();
    while let Some(row) = rows.next()? {
        customers.push(parse_customer_row(conn, row)?);
    }
    Ok(customers)
}

fn parse_customer_row(conn: &Connection, row: &Row<'_>) -> RepoResult<CustomerRecord> {
    let customer_id: CustomerId = row.get("customer_id")?;
    Ok(CustomerRecord {
        id: customer_id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        store_ids: load_memberships(conn, customer_id)?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_memberships(conn: &Connection, customer_id: CustomerId) -> RepoResult<Vec<StoreId>> {
    let mut stmt = conn.prepare(
        "SELECT store_id
         FROM store_customers
         WHERE customer_id = ?1
         ORDER BY store_id ASC;",
    )?;
    let mut rows = stmt.query([customer_id])?;
    let mut store_ids = Vec::new();
    while let Some(row) = rows.next()? {
        store_ids.push(row.get(0)?);
    }
    Ok(store_ids)
}
