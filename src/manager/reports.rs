use super::{AttendanceManager, load_faculty, load_roster, require_student};
use crate::error::{AttendanceError, Result};
use crate::models::{AttendanceRecord, Status};
use crate::report::{
    self, AttendanceSummary, DailyAnalysis, DateEntry, HistoryEntry, StudentAnalytics, StudentGrid,
};
use crate::schema::attendance;
use crate::validate::validate_period;
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::debug;

impl AttendanceManager {
    /// Counts a student's marks per status over their whole history.
    pub fn attendance_summary(&self, student_id: i32) -> Result<AttendanceSummary> {
        let mut conn = self.conn()?;
        require_student(&mut conn, student_id)?;

        let statuses: Vec<Status> = attendance::table
            .filter(attendance::student_id.eq(student_id))
            .select(attendance::status)
            .load(&mut conn)?;

        Ok(report::summarize(statuses))
    }

    /// Lists a student's marks, newest first.
    pub fn student_attendance(&self, student_id: i32) -> Result<Vec<HistoryEntry>> {
        let mut conn = self.conn()?;
        require_student(&mut conn, student_id)?;

        let records = attendance::table
            .filter(attendance::student_id.eq(student_id))
            .order((attendance::date.desc(), attendance::period.desc()))
            .select(AttendanceRecord::as_select())
            .load(&mut conn)?;
        let faculty = load_faculty(&mut conn)?;

        Ok(report::history(&records, &faculty))
    }

    /// Per-period and per-student breakdown of a single day.
    pub fn daily_analysis(&self, date: NaiveDate) -> Result<DailyAnalysis> {
        let mut conn = self.conn()?;

        let students = load_roster(&mut conn)?;
        let records = records_on(&mut conn, date, None)?;
        debug!(%date, records = records.len(), "loaded records for daily analysis");

        Ok(report::daily_analysis(date, &students, &records))
    }

    /// Every student joined with their marks on `date`, optionally for a single period.
    ///
    /// Students without a matching mark are still listed, with empty attendance fields.
    pub fn attendance_by_date(&self, date: NaiveDate, period: Option<i32>) -> Result<Vec<DateEntry>> {
        if let Some(period) = period.filter(|&p| !validate_period(p)) {
            return Err(AttendanceError::InvalidPeriod(period));
        }

        let mut conn = self.conn()?;

        let students = load_roster(&mut conn)?;
        let records = records_on(&mut conn, date, period)?;
        let faculty = load_faculty(&mut conn)?;

        Ok(report::attendance_by_date(date, &students, &records, &faculty))
    }

    /// The by-date view laid out as one row per student with a `period -> mark` map.
    pub fn daily_grid(&self, date: NaiveDate) -> Result<Vec<StudentGrid>> {
        Ok(report::daily_grid(&self.attendance_by_date(date, None)?))
    }

    /// Attendance totals and percentage for every student, ordered by name.
    pub fn attendance_analytics(&self) -> Result<Vec<StudentAnalytics>> {
        let mut conn = self.conn()?;

        let students = load_roster(&mut conn)?;
        let marks: Vec<(i32, Status)> = attendance::table
            .select((attendance::student_id, attendance::status))
            .load(&mut conn)?;

        Ok(report::analytics(&students, &marks))
    }
}

fn records_on(
    conn: &mut SqliteConnection,
    date: NaiveDate,
    period: Option<i32>,
) -> QueryResult<Vec<AttendanceRecord>> {
    let mut query = attendance::table
        .filter(attendance::date.eq(date))
        .select(AttendanceRecord::as_select())
        .into_boxed();

    if let Some(period) = period {
        query = query.filter(attendance::period.eq(period));
    }

    query
        .order((attendance::student_id.asc(), attendance::period.asc()))
        .load(conn)
}
