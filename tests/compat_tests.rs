use serde_json::{json, Value};
use serial_test::serial;
use userdir::metrics::{self, names};
use userdir::{
    display_users, export_users_to_string, filter_users, get_user_by_id, global_store, Criteria,
    Field, User,
};

fn sample_records() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "John Doe", "email": "john@example.com", "role": "Admin",
               "status": "Active", "join_date": "2023-01-15", "last_login": "2025-11-26"}),
        json!({"id": 2, "name": "Jane Smith", "email": "jane@example.com", "role": "User",
               "status": "Active", "join_date": "2023-03-10", "last_login": "2025-11-25"}),
        json!({"id": 3, "name": "Bob Johnson", "email": "bob@example.com", "role": "User",
               "status": "Inactive", "join_date": "2023-06-20", "last_login": "2025-10-15"}),
    ]
}

#[test]
fn test_display_users_compact_lines() {
    let out = display_users(&sample_records(), false, false).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "ID: 1 | Name: John Doe | Email: john@example.com | Role: Admin | Status: Active | Join Date: 2023-01-15 | Last Login: 2025-11-26"
    );
    assert!(!out.contains("Total users processed"));
}

#[test]
fn test_display_users_with_total() {
    let out = display_users(&sample_records(), true, true).unwrap();
    assert!(out.ends_with("\n\nTotal users processed: 3"));
}

#[test]
fn test_display_users_empty() {
    assert_eq!(display_users(&[], false, false).unwrap(), "");
    assert_eq!(
        display_users(&[], true, false).unwrap(),
        "Total users processed: 0"
    );
}

#[test]
fn test_display_users_repairs_incomplete_records() {
    let out = display_users(&[json!({"id": 9, "name": "Partial"})], false, false).unwrap();
    assert_eq!(
        out,
        "ID: 9 | Name: Partial | Email: UNKNOWN | Role: UNKNOWN | Status: UNKNOWN | Join Date: 1970-01-01 | Last Login: 1970-01-01"
    );
}

#[test]
fn test_get_user_by_id() {
    let records = sample_records();
    assert_eq!(
        get_user_by_id(&records, 2).unwrap().map(|u| u.email),
        Some("jane@example.com".to_string())
    );
    assert_eq!(get_user_by_id(&records, 42).unwrap(), None);
    assert_eq!(get_user_by_id(&[], 1).unwrap(), None);
}

#[test]
fn test_filter_users() {
    let records = sample_records();
    let users = filter_users(&records, &Criteria::new().with(Field::Role, "User")).unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Jane Smith", "Bob Johnson"]);

    let by_email = filter_users(&records, &Criteria::new().with(Field::Email, "JOHN@")).unwrap();
    assert_eq!(by_email.len(), 1);
}

#[test]
fn test_export_users_to_string() {
    let out = export_users_to_string(&sample_records()[..1]).unwrap();

    let expected = format!(
        "USER_EXPORT_START\n{}\nUser ID: 1\n  Name: John Doe\n  Email: john@example.com\n  Role: Admin\n  Status: Active\n  Join Date: 2023-01-15\n  Last Login: 2025-11-26\n{}\nUSER_EXPORT_END\n",
        "=".repeat(80),
        "-".repeat(80)
    );
    assert_eq!(out, expected);
}

#[test]
fn test_export_validates_records() {
    let out = export_users_to_string(&[json!({"id": "4", "name": "Partial"}), json!(null)]).unwrap();
    assert!(out.contains("User ID: 4\n  Name: Partial\n  Email: UNKNOWN\n"));
    assert_eq!(out.matches("User ID:").count(), 1);
}

#[test]
fn test_export_empty() {
    assert_eq!(
        export_users_to_string(&[]).unwrap(),
        format!("USER_EXPORT_START\n{}\nUSER_EXPORT_END\n", "=".repeat(80))
    );
}

#[test]
#[serial]
fn test_operations_are_counted() {
    let global = metrics::global();
    let records = sample_records();

    let display_before = global.get(names::DISPLAY_OPERATIONS);
    let lookup_before = global.get(names::ID_LOOKUP_OPERATIONS);
    let filter_before = global.get(names::FILTER_OPERATIONS);
    let export_before = global.get(names::EXPORT_OPERATIONS);

    display_users(&records, true, false).unwrap();
    get_user_by_id(&records, 1).unwrap();
    get_user_by_id(&records, 2).unwrap();
    filter_users(&records, &Criteria::new()).unwrap();
    export_users_to_string(&records).unwrap();

    assert!(global.get(names::DISPLAY_OPERATIONS) >= display_before + 1);
    assert!(global.get(names::ID_LOOKUP_OPERATIONS) >= lookup_before + 2);
    assert!(global.get(names::FILTER_OPERATIONS) >= filter_before + 1);
    assert!(global.get(names::EXPORT_OPERATIONS) >= export_before + 1);
}

#[test]
#[serial]
fn test_global_store_is_shared() {
    let store = global_store();
    store.insert(User::new(90_001, "Global One", "g1@example.com").with_role("Tester"));

    let again = global_store();
    assert!(std::ptr::eq(store, again));
    assert_eq!(
        again
            .filter_by(&Criteria::new().with(Field::Role, "Tester"))
            .len(),
        1
    );

    store.remove(90_001);
    assert!(!again.contains(90_001));
}
