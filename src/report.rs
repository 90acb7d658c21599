//! Aggregation of raw attendance rows into summaries.
//!
//! Everything here works on rows that have already been loaded, so the arithmetic can be
//! tested without a database. The queries that feed these functions live in
//! [`crate::manager`].

use crate::models::{AttendanceRecord, Faculty, Status, Student};
use crate::periods;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Percentage of `present` out of `total`, rounded half away from zero to two decimals.
///
/// An empty history counts as 0%.
pub fn attendance_percentage(present: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }

    // Scale first so the rounding happens on the integer hundredths.
    (f64::from(present) * 10_000.0 / f64::from(total)).round() / 100.0
}

/// Number of marks per [`Status`].
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub present: u32,
    pub absent: u32,
    pub late: u32,
}

impl StatusCounts {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Present => self.present += 1,
            Status::Absent => self.absent += 1,
            Status::Late => self.late += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.absent + self.late
    }

    pub fn percentage(&self) -> f64 {
        attendance_percentage(self.present, self.total())
    }
}

impl FromIterator<Status> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        let mut counts = Self::default();
        iter.into_iter().for_each(|status| counts.record(status));
        counts
    }
}

/// A single student's attendance over every recorded period.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AttendanceSummary {
    pub total: u32,
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    pub attendance_percentage: f64,
}

pub fn summarize(statuses: impl IntoIterator<Item = Status>) -> AttendanceSummary {
    let counts: StatusCounts = statuses.into_iter().collect();

    AttendanceSummary {
        total: counts.total(),
        present: counts.present,
        absent: counts.absent,
        late: counts.late,
        attendance_percentage: counts.percentage(),
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: i32,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PeriodStatus {
    pub period: i32,
    pub status: Status,
}

/// One student's marks for a single day.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StudentDay {
    pub student_id: i32,
    pub reg_no: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
    /// Ordered by period. Empty when the student has no marks that day.
    pub period_details: Vec<PeriodStatus>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DailyAnalysis {
    pub date: NaiveDate,
    pub period_summary: Vec<PeriodSummary>,
    pub student_daily: Vec<StudentDay>,
}

/// Breaks a day down per period and per student.
///
/// Every period of the timetable and every student appears in the result, even when nothing was
/// recorded for them.
pub fn daily_analysis(
    date: NaiveDate,
    students: &[Student],
    records: &[AttendanceRecord],
) -> DailyAnalysis {
    let day: Vec<&AttendanceRecord> = records.iter().filter(|r| r.date == date).collect();

    let period_summary = periods::period_numbers()
        .map(|period| PeriodSummary {
            period,
            counts: day
                .iter()
                .filter(|r| r.period == period)
                .map(|r| r.status)
                .collect(),
        })
        .collect();

    let by_student = group_by_student(day.iter().copied());

    let student_daily = sorted_by_name(students)
        .into_iter()
        .map(|student| {
            let marks = by_student.get(&student.id).map(Vec::as_slice).unwrap_or(&[]);

            StudentDay {
                student_id: student.id,
                reg_no: student.reg_no.clone(),
                name: student.name.clone(),
                counts: marks.iter().map(|r| r.status).collect(),
                period_details: marks
                    .iter()
                    .map(|r| PeriodStatus {
                        period: r.period,
                        status: r.status,
                    })
                    .collect(),
            }
        })
        .collect();

    DailyAnalysis {
        date,
        period_summary,
        student_daily,
    }
}

/// One line of the by-date view: a student joined with one of their marks for that date.
///
/// A student with no marks on the date appears once with every attendance field empty.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DateEntry {
    pub student_id: i32,
    pub reg_no: Option<String>,
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    pub attendance_id: Option<i32>,
    pub period: Option<i32>,
    pub status: Option<Status>,
    pub subject: Option<String>,
    pub faculty_name: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Joins every student with their marks for `date`, ordered by student name then period.
///
/// `records` should already be restricted to the date (and period, if one was asked for).
pub fn attendance_by_date(
    date: NaiveDate,
    students: &[Student],
    records: &[AttendanceRecord],
    faculty: &[Faculty],
) -> Vec<DateEntry> {
    let names = faculty_names(faculty);
    let by_student = group_by_student(records.iter().filter(|r| r.date == date));

    let mut entries = Vec::new();
    for student in sorted_by_name(students) {
        let blank = DateEntry {
            student_id: student.id,
            reg_no: student.reg_no.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            date,
            attendance_id: None,
            period: None,
            status: None,
            subject: None,
            faculty_name: None,
            created_at: None,
        };

        match by_student.get(&student.id) {
            None => entries.push(blank),
            Some(marks) => entries.extend(marks.iter().map(|record| DateEntry {
                attendance_id: Some(record.id),
                period: Some(record.period),
                status: Some(record.status),
                subject: record.subject.clone(),
                faculty_name: faculty_name(&names, record.faculty_id),
                created_at: Some(record.created_at),
                ..blank.clone()
            })),
        }
    }

    entries
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PeriodCell {
    pub status: Status,
    pub subject: Option<String>,
    pub faculty: Option<String>,
}

/// A student's day laid out as `period -> mark`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StudentGrid {
    pub id: i32,
    pub reg_no: Option<String>,
    pub name: String,
    pub periods: BTreeMap<i32, PeriodCell>,
}

/// Folds the by-date view into one row per student.
pub fn daily_grid(entries: &[DateEntry]) -> Vec<StudentGrid> {
    let mut grid: Vec<StudentGrid> = Vec::new();

    for entry in entries {
        if grid.last().is_none_or(|row| row.id != entry.student_id) {
            grid.push(StudentGrid {
                id: entry.student_id,
                reg_no: entry.reg_no.clone(),
                name: entry.name.clone(),
                periods: BTreeMap::new(),
            });
        }

        if let (Some(period), Some(status), Some(row)) = (entry.period, entry.status, grid.last_mut())
        {
            row.periods.insert(
                period,
                PeriodCell {
                    status,
                    subject: entry.subject.clone(),
                    faculty: entry.faculty_name.clone(),
                },
            );
        }
    }

    grid
}

/// A student's attendance across the whole history.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StudentAnalytics {
    pub student_id: i32,
    pub reg_no: Option<String>,
    pub name: String,
    pub total_present: u32,
    pub total_absent: u32,
    pub total_late: u32,
    pub total_classes: u32,
    pub attendance_percentage: f64,
}

/// Computes per-student totals for every student, ordered by name.
pub fn analytics(students: &[Student], marks: &[(i32, Status)]) -> Vec<StudentAnalytics> {
    let mut counts: HashMap<i32, StatusCounts> = HashMap::new();
    for &(student_id, status) in marks {
        counts.entry(student_id).or_default().record(status);
    }

    sorted_by_name(students)
        .into_iter()
        .map(|student| {
            let tally = counts.get(&student.id).copied().unwrap_or_default();

            StudentAnalytics {
                student_id: student.id,
                reg_no: student.reg_no.clone(),
                name: student.name.clone(),
                total_present: tally.present,
                total_absent: tally.absent,
                total_late: tally.late,
                total_classes: tally.total(),
                attendance_percentage: tally.percentage(),
            }
        })
        .collect()
}

/// One line of a student's attendance history.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i32,
    pub date: NaiveDate,
    pub period: i32,
    pub subject: Option<String>,
    pub faculty_name: Option<String>,
    pub status: Status,
    pub created_at: NaiveDateTime,
}

/// Lists marks newest first: by date descending, then period descending.
pub fn history(records: &[AttendanceRecord], faculty: &[Faculty]) -> Vec<HistoryEntry> {
    let names = faculty_names(faculty);

    let mut entries: Vec<HistoryEntry> = records
        .iter()
        .map(|record| HistoryEntry {
            id: record.id,
            date: record.date,
            period: record.period,
            subject: record.subject.clone(),
            faculty_name: faculty_name(&names, record.faculty_id),
            status: record.status,
            created_at: record.created_at,
        })
        .collect();

    entries.sort_by(|a, b| (b.date, b.period).cmp(&(a.date, a.period)));
    entries
}

fn group_by_student<'a>(
    records: impl Iterator<Item = &'a AttendanceRecord>,
) -> HashMap<i32, Vec<&'a AttendanceRecord>> {
    let mut grouped: HashMap<i32, Vec<&AttendanceRecord>> = HashMap::new();
    for record in records {
        grouped.entry(record.student_id).or_default().push(record);
    }

    for marks in grouped.values_mut() {
        marks.sort_by_key(|r| r.period);
    }

    grouped
}

fn sorted_by_name(students: &[Student]) -> Vec<&Student> {
    let mut sorted: Vec<&Student> = students.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    sorted
}

fn faculty_names(faculty: &[Faculty]) -> HashMap<i32, &str> {
    faculty.iter().map(|f| (f.id, f.name.as_str())).collect()
}

fn faculty_name(names: &HashMap<i32, &str>, faculty_id: Option<i32>) -> Option<String> {
    faculty_id
        .and_then(|id| names.get(&id))
        .map(|name| name.to_string())
}
