use crate::error::AttendanceError;
use crate::schema::{attendance, faculty, students};
use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A student on the roster.
#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub id: i32,
    pub reg_no: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub board: Option<String>,
    pub marks: Option<f64>,
    pub cgpa: Option<f64>,
    pub join_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// The unvalidated fields used to add a student, shared by the command line, CSV imports and
/// the HTTP API.
#[derive(Args, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StudentForm {
    /// The student's full name.
    #[arg(long)]
    pub name: String,

    /// The student's email address, which must be unique.
    #[arg(long)]
    pub email: String,

    /// The registration number, which must be unique if given.
    #[arg(long)]
    pub reg_no: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// The board the student completed school under.
    #[arg(long)]
    pub board: Option<String>,

    #[arg(long)]
    pub marks: Option<f64>,

    #[arg(long)]
    pub cgpa: Option<f64>,

    /// The join date as `YYYY-MM-DD`, defaulting to today.
    #[arg(long)]
    pub join_date: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = students)]
pub struct NewStudent<'a> {
    pub reg_no: Option<&'a str>,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub board: Option<&'a str>,
    pub marks: Option<f64>,
    pub cgpa: Option<f64>,
    pub join_date: NaiveDate,
}

/// A faculty member and the subject they teach.
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = faculty)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Faculty {
    pub id: i32,
    pub name: String,
    pub subject: String,
}

#[derive(Insertable)]
#[diesel(table_name = faculty)]
pub struct NewFaculty<'a> {
    pub name: &'a str,
    pub subject: &'a str,
}

/// One attendance mark. There is at most one record per `(student_id, date, period)`.
#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AttendanceRecord {
    pub id: i32,
    pub student_id: i32,
    pub faculty_id: Option<i32>,
    pub subject: Option<String>,
    pub date: NaiveDate,
    pub period: i32,
    pub status: Status,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = attendance)]
pub struct NewAttendance<'a> {
    pub student_id: i32,
    pub faculty_id: Option<i32>,
    pub subject: Option<&'a str>,
    pub date: NaiveDate,
    pub period: i32,
    pub status: Status,
}

/// The attendance status of a student for a single period.
#[derive(
    AsExpression, FromSqlRow, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
#[diesel(sql_type = Text)]
pub enum Status {
    Present,
    Absent,
    Late,
}

impl Status {
    /// Every valid status, in display order.
    pub const ALL: [Status; 3] = [Status::Present, Status::Absent, Status::Late];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Present => "Present",
            Status::Absent => "Absent",
            Status::Late => "Late",
        }
    }

    /// The valid statuses as a comma separated list, for error messages.
    pub fn allowed() -> String {
        Self::ALL.map(Status::as_str).join(", ")
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AttendanceError::InvalidStatus(s.to_string()))
    }
}

impl ToSql<Text, Sqlite> for Status {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Status {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        Ok(text.parse()?)
    }
}

/// A date as handed to an operation: either already structured or still text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    Text(String),
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A request to mark a single student for a single period.
///
/// The status is kept as text so that validation can report exactly what was submitted.
#[derive(Debug, Clone)]
pub struct MarkRequest {
    pub student_id: i32,
    pub faculty_id: Option<i32>,
    pub subject: Option<String>,
    /// Defaults to today when absent.
    pub date: Option<DateInput>,
    pub period: i32,
    pub status: String,
}

/// One line of a bulk marking request.
///
/// Missing statuses default to `Present` and missing periods to the first period.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BulkEntry {
    pub student_id: i32,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub faculty_id: Option<i32>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub period: Option<i32>,
}

impl From<&BulkEntry> for MarkRequest {
    fn from(entry: &BulkEntry) -> Self {
        Self {
            student_id: entry.student_id,
            faculty_id: entry.faculty_id,
            subject: entry.subject.clone(),
            date: entry.date.clone().map(DateInput::Text),
            period: entry.period.unwrap_or(crate::periods::FIRST_PERIOD),
            status: entry
                .status
                .clone()
                .unwrap_or_else(|| Status::Present.to_string()),
        }
    }
}
