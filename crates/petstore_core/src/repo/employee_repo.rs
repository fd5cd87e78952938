//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and per-store listing over `employees` storage.
//! - Keep the 1:N store association inside the employee row's `store_id`
//!   column.
//!
//! # Invariants
//! - Write paths call `Employee::validate()` before SQL mutations.
//! - A non-null `store_id` must reference an existing store.
//! - Listings are deterministic: `last_name, first_name, employee_id`.

use crate::model::employee::{Employee, EmployeeId};
use crate::model::store::StoreId;
use crate::repo::store_repo::store_exists;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    employee_id,
    store_id,
    first_name,
    last_name,
    phone,
    job_title,
    updated_at
FROM employees";

const EMPLOYEE_ORDER_SQL: &str = "ORDER BY last_name ASC, first_name ASC, employee_id ASC";

/// Read model for employee list/detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    /// Owning store. `None` means the employee is unassigned.
    pub store_id: Option<StoreId>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub job_title: String,
    /// Update timestamp in epoch milliseconds.
    pub updated_at: i64,
}

impl EmployeeRecord {
    /// Converts the read model back into a write payload for follow-up
    /// saves.
    pub fn to_employee(&self) -> Employee {
        Employee {
            id: Some(self.id),
            store_id: self.store_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            job_title: self.job_title.clone(),
        }
    }
}

/// Repository interface for employee operations.
pub trait EmployeeRepository {
    /// Inserts (`id == None`) or updates one employee; returns its id.
    fn save(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    /// Gets one employee by id.
    fn get(&self, employee_id: EmployeeId) -> RepoResult<Option<EmployeeRecord>>;
    /// Lists all employees across stores.
    fn list(&self) -> RepoResult<Vec<EmployeeRecord>>;
    /// Lists the employees assigned to one store.
    fn list_by_store(&self, store_id: StoreId) -> RepoResult<Vec<EmployeeRecord>>;
    /// Deletes one employee by id.
    fn delete(&self, employee_id: EmployeeId) -> RepoResult<()>;
    /// Reports whether a store row exists, for scope checks above this
    /// repository.
    fn store_exists(&self, store_id: StoreId) -> RepoResult<bool>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "employees",
            &[
                "employee_id",
                "store_id",
                "first_name",
                "last_name",
                "phone",
                "job_title",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn save(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;
        if let Some(store_id) = employee.store_id {
            if !store_exists(self.conn, store_id)? {
                return Err(RepoError::StoreNotFound(store_id));
            }
        }

        match employee.id {
            None => {
                self.conn.execute(
                    "INSERT INTO employees (
                        store_id,
                        first_name,
                        last_name,
                        phone,
                        job_title
                    ) VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        employee.store_id,
                        employee.first_name.as_str(),
                        employee.last_name.as_str(),
                        employee.phone.as_str(),
                        employee.job_title.as_str(),
                    ],
                )?;
                Ok(self.conn.last_insert_rowid())
            }
            Some(employee_id) => {
                let changed = self.conn.execute(
                    "UPDATE employees
                     SET
                        store_id = ?2,
                        first_name = ?3,
                        last_name = ?4,
                        phone = ?5,
                        job_title = ?6,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE employee_id = ?1;",
                    params![
                        employee_id,
                        employee.store_id,
                        employee.first_name.as_str(),
                        employee.last_name.as_str(),
                        employee.phone.as_str(),
                        employee.job_title.as_str(),
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::EmployeeNotFound(employee_id));
                }
                Ok(employee_id)
            }
        }
    }

    fn get(&self, employee_id: EmployeeId) -> RepoResult<Option<EmployeeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE employee_id = ?1;"))?;
        let mut rows = stmt.query([employee_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<EmployeeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} {EMPLOYEE_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn list_by_store(&self, store_id: StoreId) -> RepoResult<Vec<EmployeeRecord>> {
        list_for_store(self.conn, store_id)
    }

    fn delete(&self, employee_id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE employee_id = ?1;", [employee_id])?;
        if changed == 0 {
            return Err(RepoError::EmployeeNotFound(employee_id));
        }
        Ok(())
    }

    fn store_exists(&self, store_id: StoreId) -> RepoResult<bool> {
        store_exists(self.conn, store_id)
    }
}

pub(crate) fn list_for_store(
    conn: &Connection,
    store_id: StoreId,
) -> RepoResult<Vec<EmployeeRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{EMPLOYEE_SELECT_SQL} WHERE store_id = ?1 {EMPLOYEE_ORDER_SQL};"
    ))?;
    let mut rows = stmt.query([store_id])?;
    let mut employees = Vec::new();
    while let Some(row) = rows.next()? {
        employees.push(parse_employee_row(row)?);
    }
    Ok(employees)
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<EmployeeRecord> {
    Ok(EmployeeRecord {
        id: row.get("employee_id")?,
        store_id: row.get("store_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        phone: row.get("phone")?,
        job_title: row.get("job_title")?,
        updated_at: row.get("updated_at")?,
    })
}
