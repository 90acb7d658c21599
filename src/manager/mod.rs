//! The [`AttendanceManager`] owns the database pool and exposes every operation on students,
//! faculty and attendance marks.
//!
//! Marking lives in [`marking`] and reporting queries in [`reports`]; both add methods to the
//! same manager.

mod marking;
mod reports;

pub use marking::{MarkAction, MarkOutcome};

use crate::config::DatabaseSettings;
use crate::error::{AttendanceError, Result};
use crate::models::{DateInput, Faculty, NewFaculty, NewStudent, Student, StudentForm};
use crate::schema::{faculty, students};
use crate::validate::{normalize_email, parse_date, validate_email};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// The schema migrations, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Per-connection settings that SQLite does not persist in the database file.
#[derive(Debug)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// The manager for recording, modifying, and retrieving attendance data.
///
/// Cloning is cheap: clones share the same connection pool. Every method checks out one
/// connection for its duration and hands it back when it returns, whatever the outcome.
#[derive(Clone)]
pub struct AttendanceManager {
    pool: DbPool,
}

/// The outcome of one entry in a bulk operation.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EntryResult {
    pub success: bool,
    pub message: String,
}

/// The outcome of a bulk operation. Entries succeed or fail independently.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    pub success_count: usize,
    pub failed_count: usize,
    pub results: Vec<EntryResult>,
}

impl BulkOutcome {
    fn push(&mut self, result: Result<String>, label: impl FnOnce() -> String) {
        let entry = match result {
            Ok(message) => {
                self.success_count += 1;
                EntryResult {
                    success: true,
                    message,
                }
            }
            Err(err) => {
                self.failed_count += 1;
                EntryResult {
                    success: false,
                    message: format!("{}: {err}", label()),
                }
            }
        };

        self.results.push(entry);
    }

    /// One message per entry, in input order.
    pub fn messages(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.message.as_str()).collect()
    }

    /// The messages of the entries that failed.
    pub fn errors(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.message.as_str())
            .collect()
    }
}

impl AttendanceManager {
    /// Opens a connection pool to the `sqlite3` database at `settings.url`, creating the file and
    /// its parent directory if needed, and applies any pending migrations.
    pub fn connect(settings: &DatabaseSettings) -> Result<Self> {
        if let Some(parent) = Path::new(&settings.url).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = ConnectionManager::<SqliteConnection>::new(&settings.url);
        let pool = Pool::builder()
            .max_size(settings.max_connections)
            .connection_timeout(Duration::from_secs(settings.connection_timeout_secs))
            .connection_customizer(Box::new(SqlitePragmas {
                busy_timeout: Duration::from_secs(5),
            }))
            .build(manager)?;

        let this = Self { pool };
        this.run_migrations()?;

        info!(url = %settings.url, max_connections = settings.max_connections, "database ready");
        Ok(this)
    }

    /// Shorthand for [`AttendanceManager::connect`] with default pool settings.
    pub fn open(database_url: &str) -> Result<Self> {
        Self::connect(&DatabaseSettings {
            url: database_url.to_string(),
            ..DatabaseSettings::default()
        })
    }

    fn run_migrations(&self) -> Result<()> {
        let mut conn = self.conn()?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| AttendanceError::Migration(err.to_string()))?;

        for version in applied {
            info!(%version, "applied migration");
        }

        Ok(())
    }

    /// Checks a connection out of the pool. It returns to the pool when dropped.
    pub(crate) fn conn(&self) -> Result<DbConnection> {
        let conn = self.pool.get()?;
        debug!("database connection obtained from pool");
        Ok(conn)
    }

    /// Runs a trivial query to check that the database is reachable.
    pub fn ping(&self) -> Result<()> {
        self.conn()?.batch_execute("SELECT 1")?;
        Ok(())
    }

    /// Returns the total number of students on the roster.
    pub fn num_students(&self) -> Result<usize> {
        let mut conn = self.conn()?;

        let count: i64 = students::table.count().get_result(&mut conn)?;
        Ok(count as usize)
    }

    /// Retrieves all students on the roster, ordered by name.
    pub fn list_students(&self) -> Result<Vec<Student>> {
        let mut conn = self.conn()?;

        let roster = load_roster(&mut conn)?;
        info!(count = roster.len(), "retrieved students");
        Ok(roster)
    }

    /// Retrieves a specific student based on their ID.
    pub fn get_student(&self, student_id: i32) -> Result<Option<Student>> {
        let mut conn = self.conn()?;

        let student = find_student(&mut conn, student_id)?;
        if student.is_none() {
            debug!(student_id, "no student found");
        }
        Ok(student)
    }

    /// Adds a student after validating the form.
    ///
    /// The email is trimmed and lower-cased before it is checked and stored, so two emails that
    /// only differ in case count as duplicates. A registration number that is already taken is
    /// rejected too.
    pub fn add_student(&self, form: &StudentForm) -> Result<Student> {
        let name = form.name.trim();
        if name.is_empty() {
            warn!("attempted to add a student with an empty name");
            return Err(AttendanceError::EmptyField("Student name"));
        }

        let email = normalize_email(&form.email);
        if email.is_empty() {
            warn!("attempted to add a student with an empty email");
            return Err(AttendanceError::EmptyField("Student email"));
        }
        if !validate_email(&email) {
            warn!(%email, "invalid email format");
            return Err(AttendanceError::InvalidEmail(email));
        }

        let reg_no = trimmed(form.reg_no.as_deref());
        let join_date = form.join_date.clone().map(DateInput::Text);
        let join_date = parse_date(join_date.as_ref())?;

        let new_student = NewStudent {
            reg_no,
            name,
            email: &email,
            phone: trimmed(form.phone.as_deref()),
            board: trimmed(form.board.as_deref()),
            marks: form.marks,
            cgpa: form.cgpa,
            join_date,
        };

        let mut conn = self.conn()?;
        let student = conn.immediate_transaction(|conn| {
            if student_by_email(conn, &email)?.is_some() {
                return Err(duplicate("email", &email));
            }

            if let Some(reg_no) = reg_no {
                let taken_reg_no = students::table
                    .filter(students::reg_no.eq(reg_no))
                    .select(students::id)
                    .first::<i32>(conn)
                    .optional()?;
                if taken_reg_no.is_some() {
                    return Err(duplicate("registration number", reg_no));
                }
            }

            diesel::insert_into(students::table)
                .values(&new_student)
                .returning(Student::as_returning())
                .get_result(conn)
                .map_err(|err| match err {
                    // Another writer got there between the check and the insert.
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                        violated_duplicate(info.message(), &email, reg_no)
                    }
                    other => other.into(),
                })
        })?;

        info!(student_id = student.id, name = %student.name, email = %student.email, "added student");
        Ok(student)
    }

    /// Adds each student independently. A failure never stops the remaining entries.
    pub fn add_students_bulk(&self, forms: &[StudentForm]) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();

        for form in forms {
            let result = self.add_student(form).map(|student| {
                format!(
                    "Student '{}' added successfully with ID: {}",
                    student.name, student.id
                )
            });
            outcome.push(result, || format!("Student '{}'", form.name.trim()));
        }

        info!(
            successful = outcome.success_count,
            failed = outcome.failed_count,
            "bulk student import completed"
        );
        outcome
    }

    /// Looks a student up by email. The email is normalized first, so case and surrounding
    /// whitespace do not matter.
    pub fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        let email = normalize_email(email);
        let mut conn = self.conn()?;

        Ok(student_by_email(&mut conn, &email)?)
    }

    /// Retrieves all faculty, ordered by name.
    pub fn list_faculty(&self) -> Result<Vec<Faculty>> {
        let mut conn = self.conn()?;

        Ok(load_faculty(&mut conn)?)
    }

    pub fn get_faculty(&self, faculty_id: i32) -> Result<Option<Faculty>> {
        let mut conn = self.conn()?;

        Ok(faculty::table
            .find(faculty_id)
            .select(Faculty::as_select())
            .first(&mut conn)
            .optional()?)
    }

    /// Returns the faculty member with this name and subject, adding them if they are new.
    pub fn ensure_faculty(&self, name: &str, subject: &str) -> Result<Faculty> {
        let (name, subject) = (name.trim(), subject.trim());
        if name.is_empty() {
            return Err(AttendanceError::EmptyField("Faculty name"));
        }
        if subject.is_empty() {
            return Err(AttendanceError::EmptyField("Faculty subject"));
        }

        let mut conn = self.conn()?;
        conn.immediate_transaction(|conn| {
            let existing = faculty::table
                .filter(faculty::name.eq(name))
                .filter(faculty::subject.eq(subject))
                .select(Faculty::as_select())
                .first(conn)
                .optional()?;

            if let Some(member) = existing {
                return Ok(member);
            }

            let member = diesel::insert_into(faculty::table)
                .values(&NewFaculty { name, subject })
                .returning(Faculty::as_returning())
                .get_result(conn)?;

            info!(faculty_id = member.id, name, subject, "added faculty");
            Ok(member)
        })
    }
}

pub(crate) fn find_student(
    conn: &mut SqliteConnection,
    student_id: i32,
) -> QueryResult<Option<Student>> {
    students::table
        .find(student_id)
        .select(Student::as_select())
        .first(conn)
        .optional()
}

/// Like [`find_student`], but a missing student is an error.
pub(crate) fn require_student(conn: &mut SqliteConnection, student_id: i32) -> Result<Student> {
    find_student(conn, student_id)?.ok_or_else(|| {
        warn!(student_id, "student not found");
        AttendanceError::StudentNotFound(student_id)
    })
}

/// `email` must already be normalized.
fn student_by_email(conn: &mut SqliteConnection, email: &str) -> QueryResult<Option<Student>> {
    students::table
        .filter(students::email.eq(email))
        .select(Student::as_select())
        .first(conn)
        .optional()
}

pub(crate) fn load_roster(conn: &mut SqliteConnection) -> QueryResult<Vec<Student>> {
    students::table
        .order((students::name.asc(), students::id.asc()))
        .select(Student::as_select())
        .load(conn)
}

pub(crate) fn load_faculty(conn: &mut SqliteConnection) -> QueryResult<Vec<Faculty>> {
    faculty::table
        .order((faculty::name.asc(), faculty::id.asc()))
        .select(Faculty::as_select())
        .load(conn)
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Picks the duplicated field from SQLite's `UNIQUE constraint failed: students.<column>`
/// message.
fn violated_duplicate(message: &str, email: &str, reg_no: Option<&str>) -> AttendanceError {
    match reg_no {
        Some(reg_no) if message.contains("students.reg_no") => {
            duplicate("registration number", reg_no)
        }
        _ => duplicate("email", email),
    }
}

fn duplicate(field: &'static str, value: &str) -> AttendanceError {
    warn!(field, value, "student already exists");
    AttendanceError::DuplicateStudent {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_names_the_colliding_column() {
        let err = violated_duplicate(
            "UNIQUE constraint failed: students.reg_no",
            "ada@example.com",
            Some("REG001"),
        );
        assert!(matches!(
            err,
            AttendanceError::DuplicateStudent { field: "registration number", ref value }
                if value == "REG001"
        ));

        let err = violated_duplicate(
            "UNIQUE constraint failed: students.email",
            "ada@example.com",
            Some("REG001"),
        );
        assert!(matches!(
            err,
            AttendanceError::DuplicateStudent { field: "email", ref value }
                if value == "ada@example.com"
        ));
    }
}
