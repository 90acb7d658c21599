mod common;

use class_attendance::console::Console;
use class_attendance::models::Status;
use common::{add_student, test_db};
use std::io::Cursor;

fn run_script(manager: &class_attendance::AttendanceManager, script: &str) -> String {
    let mut output = Vec::new();
    Console::new(manager, Cursor::new(script.as_bytes()), &mut output)
        .run()
        .expect("Console failed");
    String::from_utf8(output).expect("Console wrote invalid UTF-8")
}

#[test]
fn test_console_adds_and_marks_a_student() {
    let db = test_db();

    let output = run_script(
        &db.manager,
        "1\nAda Lovelace\nada@example.com\nREG001\n\n\
         4\n1\n2\n2025-02-03\n3\n\
         0\n",
    );

    assert!(output.contains("✓ SUCCESS: Student 'Ada Lovelace' added successfully with ID: 1"));
    assert!(output.contains("✓ SUCCESS: Attendance marked for Ada Lovelace (Period 2)"));
    assert!(output.contains("Thank you for using Attendance Management System!"));

    let history = db.manager.student_attendance(1).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, Status::Late);
}

#[test]
fn test_console_reports_errors_and_keeps_going() {
    let db = test_db();
    add_student(&db.manager, "Ada Lovelace", "ada@example.com");

    let output = run_script(&db.manager, "9\n42\n42\n3\n");

    assert!(output.contains("✗ ERROR: Student with ID 42 not found"));
    assert!(output.contains("✗ Invalid choice. Please select 0-11."));
    assert!(output.contains("Ada Lovelace"));
}

#[test]
fn test_console_exits_at_end_of_input() {
    let db = test_db();

    let output = run_script(&db.manager, "");
    assert!(output.contains("Thank you for using Attendance Management System!"));
}

#[test]
fn test_console_bulk_marks_the_roster() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    let alan = add_student(&db.manager, "Alan Turing", "alan@example.com");

    // Ada is skipped, Alan is marked absent.
    let output = run_script(&db.manager, "5\n2025-02-03\n1\n\n2\n0\n");

    assert!(output.contains("Successful: 1"));
    assert!(db.manager.student_attendance(ada.id).unwrap().is_empty());
    assert_eq!(
        db.manager.student_attendance(alan.id).unwrap()[0].status,
        Status::Absent
    );
}

#[test]
fn test_console_rejects_an_oversized_batch() {
    let db = test_db();

    let output = run_script(&db.manager, "2\n18446744073709551615\n2\n3\nAda Lovelace\n");

    assert!(output.contains("✗ ERROR: Can add at most 100 students at a time"));
    // The batch of three ends early when the input runs out.
    assert!(output.contains("Student 1:"));
    assert!(!output.contains("Student 2:"));
    assert!(output.contains("Thank you for using Attendance Management System!"));
    assert_eq!(db.manager.num_students().unwrap(), 0);
}

#[test]
fn test_console_asks_again_after_an_unknown_status() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    let alan = add_student(&db.manager, "Alan Turing", "alan@example.com");

    let output = run_script(&db.manager, "5\n2025-02-03\n1\n1\nbogus\n2\n0\n");

    assert!(output.contains("✗ ERROR: Invalid status 'bogus'"));
    assert!(output.contains("Successful: 2"));
    assert_eq!(
        db.manager.student_attendance(ada.id).unwrap()[0].status,
        Status::Present
    );
    assert_eq!(
        db.manager.student_attendance(alan.id).unwrap()[0].status,
        Status::Absent
    );
}
