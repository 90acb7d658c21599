use super::{AttendanceManager, BulkOutcome, require_student};
use crate::error::{AttendanceError, Result};
use crate::models::{AttendanceRecord, BulkEntry, MarkRequest, NewAttendance, Status};
use crate::schema::{attendance, faculty};
use crate::validate::{parse_date, validate_period};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

/// Whether marking created a new record or changed an existing one.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkAction {
    Inserted,
    Updated,
}

#[derive(Serialize, Debug, Clone)]
pub struct MarkOutcome {
    pub action: MarkAction,
    pub message: String,
    pub record: AttendanceRecord,
}

impl AttendanceManager {
    /// Marks one student for one period, replacing any earlier mark for the same student, date
    /// and period.
    ///
    /// Input is validated in order (status, period, date, student, faculty) and nothing is
    /// written if any check fails. An existing record keeps its ID and creation time; only its
    /// status, faculty and subject change. Marking twice with the same arguments therefore
    /// leaves a single record.
    pub fn mark_attendance(&self, request: &MarkRequest) -> Result<MarkOutcome> {
        let status: Status = request.status.parse().inspect_err(|_| {
            warn!(status = %request.status, "invalid attendance status");
        })?;

        if !validate_period(request.period) {
            warn!(period = request.period, "invalid period");
            return Err(AttendanceError::InvalidPeriod(request.period));
        }

        let date = parse_date(request.date.as_ref()).inspect_err(|err| {
            warn!(error = %err, "invalid attendance date");
        })?;

        let subject = request
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut conn = self.conn()?;
        let outcome = conn.immediate_transaction(|conn| {
            let student = require_student(conn, request.student_id)?;

            if let Some(faculty_id) = request.faculty_id {
                let known: i64 = faculty::table
                    .filter(faculty::id.eq(faculty_id))
                    .count()
                    .get_result(conn)?;
                if known == 0 {
                    warn!(faculty_id, "faculty not found");
                    return Err(AttendanceError::FacultyNotFound(faculty_id));
                }
            }

            let action = match find_record(conn, student.id, date, request.period)? {
                Some(_) => MarkAction::Updated,
                None => MarkAction::Inserted,
            };

            diesel::insert_into(attendance::table)
                .values(&NewAttendance {
                    student_id: student.id,
                    faculty_id: request.faculty_id,
                    subject,
                    date,
                    period: request.period,
                    status,
                })
                .on_conflict((attendance::student_id, attendance::date, attendance::period))
                .do_update()
                .set((
                    attendance::status.eq(status),
                    attendance::faculty_id.eq(request.faculty_id),
                    attendance::subject.eq(subject),
                ))
                .execute(conn)?;

            let record = find_record(conn, student.id, date, request.period)?
                .ok_or(diesel::result::Error::NotFound)?;

            let verb = match action {
                MarkAction::Inserted => "marked",
                MarkAction::Updated => "updated",
            };

            Ok(MarkOutcome {
                action,
                message: format!(
                    "Attendance {verb} for {} (Period {})",
                    student.name, request.period
                ),
                record,
            })
        })?;

        info!(
            student_id = request.student_id,
            %date,
            period = request.period,
            %status,
            action = ?outcome.action,
            "{}",
            outcome.message
        );
        Ok(outcome)
    }

    /// Marks every entry independently and in order.
    ///
    /// There is no transaction across entries: a failing entry is reported in the outcome and
    /// the rest are still written.
    pub fn mark_bulk_attendance(&self, entries: &[BulkEntry]) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();

        for entry in entries {
            let result = self
                .mark_attendance(&MarkRequest::from(entry))
                .map(|marked| marked.message);
            outcome.push(result, || format!("Student {}", entry.student_id));
        }

        info!(
            successful = outcome.success_count,
            failed = outcome.failed_count,
            "bulk attendance marking completed"
        );
        outcome
    }
}

fn find_record(
    conn: &mut SqliteConnection,
    student_id: i32,
    date: NaiveDate,
    period: i32,
) -> QueryResult<Option<AttendanceRecord>> {
    attendance::table
        .filter(attendance::student_id.eq(student_id))
        .filter(attendance::date.eq(date))
        .filter(attendance::period.eq(period))
        .select(AttendanceRecord::as_select())
        .first(conn)
        .optional()
}
