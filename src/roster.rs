//! Reading students and bulk attendance marks from CSV files.
//!
//! Both formats need a header row. Columns are matched by name, so their order does not matter
//! and optional columns may be left out entirely:
//!
//! ```text
//! name,email,reg_no,phone,cgpa
//! Ada Lovelace,ada@example.com,REG001,,9.1
//! ```
//!
//! ```text
//! student_id,status,period,date,faculty_id,subject
//! 1,Present,1,2025-02-03,1,Mathematics
//! 2,Late,1,2025-02-03,1,Mathematics
//! ```

use crate::error::Result;
use crate::models::{BulkEntry, StudentForm};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Reads every student from a CSV roster.
pub fn read_students(path: &Path) -> Result<Vec<StudentForm>> {
    let students = read_records(ReaderBuilder::new().trim(Trim::All).from_path(path)?)?;
    info!(path = %path.display(), count = students.len(), "read student roster");
    Ok(students)
}

/// Reads every attendance mark from a CSV file.
pub fn read_marks(path: &Path) -> Result<Vec<BulkEntry>> {
    let marks = read_records(ReaderBuilder::new().trim(Trim::All).from_path(path)?)?;
    info!(path = %path.display(), count = marks.len(), "read attendance marks");
    Ok(marks)
}

fn read_records<T: DeserializeOwned, R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<T>> {
    Ok(reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?)
}
