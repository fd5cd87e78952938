use petstore_core::db::open_db_in_memory;
use petstore_core::{
    Employee, EmployeeService, EmployeeServiceError, SqliteEmployeeRepository,
    SqliteStoreRepository, Store, StoreRecord, StoreService, ValidationError,
};
use rusqlite::Connection;

#[test]
fn add_to_store_assigns_both_sides_of_the_association() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let store = seed_store(&stores, "Paws");
    let hired = employees
        .add_to_store(store.id, Employee::new("Rosa", "Vane"))
        .unwrap();

    assert_eq!(hired.store_id, Some(store.id));

    let projection = stores.get_store(store.id).unwrap();
    assert!(projection.employees.iter().any(|e| e.id == hired.id));
}

#[test]
fn add_to_store_fails_for_unknown_store() {
    let conn = setup();
    let employees = employee_service(&conn);

    let err = employees
        .add_to_store(99, Employee::new("Rosa", "Vane"))
        .unwrap_err();
    assert!(matches!(err, EmployeeServiceError::StoreNotFound(99)));
}

#[test]
fn add_to_store_with_unknown_employee_id_fails_instead_of_creating() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let store = seed_store(&stores, "Paws");
    let mut payload = Employee::new("Rosa", "Vane");
    payload.id = Some(404);

    let err = employees.add_to_store(store.id, payload).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::EmployeeNotFound(404)));
    assert!(employees.list_all().unwrap().is_empty());
}

#[test]
fn update_scoped_rejects_the_wrong_store() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let home = seed_store(&stores, "Paws");
    let other = seed_store(&stores, "Claws");
    let hired = employees
        .add_to_store(home.id, Employee::new("Rosa", "Vane"))
        .unwrap();

    let err = employees
        .update_scoped(other.id, hired.id, Employee::new("Rosa", "Vane-Diaz"))
        .unwrap_err();
    assert!(matches!(
        err,
        EmployeeServiceError::NotEmployedByStore { employee_id, store_id }
            if employee_id == hired.id && store_id == other.id
    ));
}

#[test]
fn update_scoped_changes_fields_but_not_the_assignment() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let store = seed_store(&stores, "Paws");
    let hired = employees
        .add_to_store(store.id, Employee::new("Rosa", "Vane"))
        .unwrap();

    let mut payload = Employee::new("Rosa", "Vane");
    payload.job_title = "Groomer".to_string();
    payload.phone = "555-0107".to_string();
    let updated = employees
        .update_scoped(store.id, hired.id, payload)
        .unwrap();

    assert_eq!(updated.id, hired.id);
    assert_eq!(updated.store_id, Some(store.id));
    assert_eq!(updated.job_title, "Groomer");
    assert_eq!(updated.phone, "555-0107");
}

#[test]
fn assign_twice_to_the_same_store_conflicts() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let store = seed_store(&stores, "Paws");
    let free_agent = employees.save_unscoped(Employee::new("Noel", "Park")).unwrap();
    assert_eq!(free_agent.store_id, None);

    let assigned = employees.assign_to_store(store.id, free_agent.id).unwrap();
    assert_eq!(assigned.store_id, Some(store.id));

    let err = employees
        .assign_to_store(store.id, free_agent.id)
        .unwrap_err();
    assert!(matches!(
        err,
        EmployeeServiceError::AlreadyAssigned { employee_id, store_id }
            if employee_id == free_agent.id && store_id == store.id
    ));
}

#[test]
fn reassignment_moves_the_employee_out_of_the_prior_store() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let first = seed_store(&stores, "Paws");
    let second = seed_store(&stores, "Claws");
    let hired = employees
        .add_to_store(first.id, Employee::new("Rosa", "Vane"))
        .unwrap();

    let moved = employees.assign_to_store(second.id, hired.id).unwrap();
    assert_eq!(moved.store_id, Some(second.id));

    assert!(employees.list_by_store(first.id).unwrap().is_empty());
    let staffed = employees.list_by_store(second.id).unwrap();
    assert_eq!(staffed.len(), 1);
    assert_eq!(staffed[0].id, hired.id);
}

#[test]
fn delete_scoped_removes_the_employee_from_the_store() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let store = seed_store(&stores, "Paws");
    let hired = employees
        .add_to_store(store.id, Employee::new("Rosa", "Vane"))
        .unwrap();

    employees.delete_scoped(store.id, hired.id).unwrap();

    assert!(stores.get_store(store.id).unwrap().employees.is_empty());
    let err = employees.get_scoped(store.id, hired.id).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::EmployeeNotFound(_)));
}

#[test]
fn delete_scoped_rejects_the_wrong_store() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let home = seed_store(&stores, "Paws");
    let other = seed_store(&stores, "Claws");
    let hired = employees
        .add_to_store(home.id, Employee::new("Rosa", "Vane"))
        .unwrap();

    let err = employees.delete_scoped(other.id, hired.id).unwrap_err();
    assert!(matches!(
        err,
        EmployeeServiceError::NotEmployedByStore { .. }
    ));
    assert_eq!(employees.list_by_store(home.id).unwrap().len(), 1);
}

#[test]
fn save_unscoped_validates_names_and_keeps_the_assignment() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let err = employees
        .save_unscoped(Employee::new("Rosa", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        EmployeeServiceError::Validation(ValidationError::BlankField("last_name"))
    ));

    let store = seed_store(&stores, "Paws");
    let hired = employees
        .add_to_store(store.id, Employee::new("Rosa", "Vane"))
        .unwrap();

    let mut rename = Employee::new("Rosalind", "Vane");
    rename.id = Some(hired.id);
    let renamed = employees.save_unscoped(rename).unwrap();

    assert_eq!(renamed.first_name, "Rosalind");
    assert_eq!(renamed.store_id, Some(store.id), "assignment must survive");
}

#[test]
fn listings_are_ordered_by_name() {
    let conn = setup();
    let stores = store_service(&conn);
    let employees = employee_service(&conn);

    let store = seed_store(&stores, "Paws");
    employees
        .add_to_store(store.id, Employee::new("Zoe", "Alder"))
        .unwrap();
    employees
        .add_to_store(store.id, Employee::new("Ana", "Alder"))
        .unwrap();
    employees
        .add_to_store(store.id, Employee::new("Mia", "Brook"))
        .unwrap();

    let listed = employees.list_by_store(store.id).unwrap();
    let names: Vec<_> = listed
        .iter()
        .map(|e| format!("{} {}", e.first_name, e.last_name))
        .collect();
    assert_eq!(names, vec!["Ana Alder", "Zoe Alder", "Mia Brook"]);

    let err = employees.list_by_store(1234).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::StoreNotFound(1234)));
}

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn store_service(conn: &Connection) -> StoreService<SqliteStoreRepository<'_>> {
    StoreService::new(SqliteStoreRepository::try_new(conn).unwrap())
}

fn employee_service(conn: &Connection) -> EmployeeService<SqliteEmployeeRepository<'_>> {
    EmployeeService::new(SqliteEmployeeRepository::try_new(conn).unwrap())
}

fn seed_store(service: &StoreService<SqliteStoreRepository<'_>>, name: &str) -> StoreRecord {
    service.save_store(Store::new(name, "555-0100")).unwrap()
}
