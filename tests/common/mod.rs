#![allow(dead_code)]

use class_attendance::manager::{AttendanceManager, MarkOutcome};
use class_attendance::models::{DateInput, MarkRequest, Student, StudentForm};
use tempfile::{TempDir, tempdir};

/// A manager backed by a fresh database file. The file is removed when this is dropped.
pub struct TestDb {
    pub manager: AttendanceManager,
    _dir: TempDir,
}

pub fn test_db() -> TestDb {
    let dir = tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("attendance.db");

    let manager =
        AttendanceManager::open(&db_path.to_string_lossy()).expect("Failed to create database");

    TestDb { manager, _dir: dir }
}

pub fn form(name: &str, email: &str) -> StudentForm {
    StudentForm {
        name: name.to_string(),
        email: email.to_string(),
        ..StudentForm::default()
    }
}

pub fn add_student(manager: &AttendanceManager, name: &str, email: &str) -> Student {
    manager
        .add_student(&form(name, email))
        .expect("Failed to add student")
}

pub fn request(student_id: i32, date: &str, period: i32, status: &str) -> MarkRequest {
    MarkRequest {
        student_id,
        faculty_id: None,
        subject: None,
        date: Some(DateInput::from(date)),
        period,
        status: status.to_string(),
    }
}

pub fn mark(
    manager: &AttendanceManager,
    student_id: i32,
    date: &str,
    period: i32,
    status: &str,
) -> MarkOutcome {
    manager
        .mark_attendance(&request(student_id, date, period, status))
        .expect("Failed to mark attendance")
}
