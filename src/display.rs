//! Renders roster and attendance data as text tables for the terminal.

use crate::manager::BulkOutcome;
use crate::models::{Faculty, Student};
use crate::periods::{BREAKS, PERIOD_TIMINGS};
use crate::report::{AttendanceSummary, DailyAnalysis, DateEntry, HistoryEntry, StudentAnalytics};
use std::fmt::Display;
use tabled::{Table, Tabled, settings::Style};

fn render<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// The roster, one line per student.
pub fn students_table(students: &[Student]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: i32,
        #[tabled(rename = "Reg No")]
        reg_no: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Email")]
        email: String,
        #[tabled(rename = "CGPA")]
        cgpa: String,
        #[tabled(rename = "Join Date")]
        join_date: String,
    }

    render(students.iter().map(|student| Row {
        id: student.id,
        reg_no: or_dash(student.reg_no.as_deref()),
        name: student.name.clone(),
        email: student.email.clone(),
        cgpa: or_dash(student.cgpa),
        join_date: student.join_date.to_string(),
    }))
}

pub fn faculty_table(faculty: &[Faculty]) -> String {
    #[derive(Tabled)]
    struct Row<'a> {
        #[tabled(rename = "ID")]
        id: i32,
        #[tabled(rename = "Name")]
        name: &'a str,
        #[tabled(rename = "Subject")]
        subject: &'a str,
    }

    render(faculty.iter().map(|member| Row {
        id: member.id,
        name: &member.name,
        subject: &member.subject,
    }))
}

/// The by-date view. Students without a mark show dashes.
pub fn date_table(entries: &[DateEntry]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: i32,
        #[tabled(rename = "Student Name")]
        name: String,
        #[tabled(rename = "Email")]
        email: String,
        #[tabled(rename = "Period")]
        period: String,
        #[tabled(rename = "Status")]
        status: String,
        #[tabled(rename = "Subject")]
        subject: String,
        #[tabled(rename = "Faculty")]
        faculty: String,
    }

    render(entries.iter().map(|entry| Row {
        id: entry.student_id,
        name: entry.name.clone(),
        email: entry.email.clone(),
        period: or_dash(entry.period),
        status: or_dash(entry.status),
        subject: or_dash(entry.subject.as_deref()),
        faculty: or_dash(entry.faculty_name.as_deref()),
    }))
}

pub fn history_table(history: &[HistoryEntry]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Period")]
        period: i32,
        #[tabled(rename = "Status")]
        status: String,
        #[tabled(rename = "Subject")]
        subject: String,
        #[tabled(rename = "Faculty")]
        faculty: String,
        #[tabled(rename = "Marked At")]
        marked_at: String,
    }

    render(history.iter().map(|entry| Row {
        date: entry.date.to_string(),
        period: entry.period,
        status: entry.status.to_string(),
        subject: or_dash(entry.subject.as_deref()),
        faculty: or_dash(entry.faculty_name.as_deref()),
        marked_at: entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    }))
}

/// A student's details followed by their attendance statistics.
pub fn summary_text(student: &Student, summary: &AttendanceSummary) -> String {
    format!(
        "ATTENDANCE SUMMARY - {}\n\
         Email: {}\n\
         Join Date: {}\n\
         \n\
         Total Classes: {}\n\
         Present: {}\n\
         Absent: {}\n\
         Late: {}\n\
         Attendance Percentage: {:.2}%",
        student.name,
        student.email,
        student.join_date,
        summary.total,
        summary.present,
        summary.absent,
        summary.late,
        summary.attendance_percentage,
    )
}

/// Two tables: counts per period, then each student's marks for the day.
pub fn daily_tables(analysis: &DailyAnalysis) -> String {
    #[derive(Tabled)]
    struct PeriodRow {
        #[tabled(rename = "Period")]
        period: i32,
        #[tabled(rename = "Present")]
        present: u32,
        #[tabled(rename = "Absent")]
        absent: u32,
        #[tabled(rename = "Late")]
        late: u32,
    }

    #[derive(Tabled)]
    struct StudentRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Reg No")]
        reg_no: String,
        #[tabled(rename = "Present")]
        present: u32,
        #[tabled(rename = "Absent")]
        absent: u32,
        #[tabled(rename = "Late")]
        late: u32,
        #[tabled(rename = "Periods")]
        details: String,
    }

    let periods = render(analysis.period_summary.iter().map(|p| PeriodRow {
        period: p.period,
        present: p.counts.present,
        absent: p.counts.absent,
        late: p.counts.late,
    }));

    let students = render(analysis.student_daily.iter().map(|s| StudentRow {
        name: s.name.clone(),
        reg_no: or_dash(s.reg_no.as_deref()),
        present: s.counts.present,
        absent: s.counts.absent,
        late: s.counts.late,
        details: s
            .period_details
            .iter()
            .map(|d| format!("{}:{}", d.period, d.status))
            .collect::<Vec<_>>()
            .join(", "),
    }));

    format!(
        "Daily analysis for {}\n{periods}\n{students}",
        analysis.date
    )
}

pub fn analytics_table(rows: &[StudentAnalytics]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Reg No")]
        reg_no: String,
        #[tabled(rename = "Present")]
        present: u32,
        #[tabled(rename = "Absent")]
        absent: u32,
        #[tabled(rename = "Late")]
        late: u32,
        #[tabled(rename = "Classes")]
        classes: u32,
        #[tabled(rename = "Attendance %")]
        percentage: String,
    }

    render(rows.iter().map(|row| Row {
        name: row.name.clone(),
        reg_no: or_dash(row.reg_no.as_deref()),
        present: row.total_present,
        absent: row.total_absent,
        late: row.total_late,
        classes: row.total_classes,
        percentage: format!("{:.2}", row.attendance_percentage),
    }))
}

/// The timetable, with breaks listed in between the periods they separate.
pub fn periods_table() -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Slot")]
        slot: String,
        #[tabled(rename = "Start")]
        start: &'static str,
        #[tabled(rename = "End")]
        end: &'static str,
    }

    let mut rows = Vec::new();
    for timing in PERIOD_TIMINGS {
        rows.push(Row {
            slot: timing.name.to_string(),
            start: timing.start,
            end: timing.end,
        });

        if let Some(gap) = BREAKS.iter().find(|b| b.after_period == timing.period) {
            rows.push(Row {
                slot: "Break".to_string(),
                start: gap.start,
                end: gap.end,
            });
        }
    }

    render(rows)
}

/// Counts followed by one line per entry.
pub fn bulk_outcome_text(title: &str, outcome: &BulkOutcome) -> String {
    let mut text = format!(
        "{title}:\n  Successful: {}\n  Failed: {}",
        outcome.success_count, outcome.failed_count
    );

    for result in &outcome.results {
        let mark = if result.success { "✓" } else { "✗" };
        text.push_str(&format!("\n  {mark} {}", result.message));
    }

    text
}
