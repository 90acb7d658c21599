//! The interactive, menu-driven front end.
//!
//! The console reads from any [`BufRead`] and writes to any [`Write`], so it can be driven by a
//! terminal or by a script. End of input behaves like choosing "Exit".

use crate::display;
use crate::error::{AttendanceError, Result};
use crate::manager::AttendanceManager;
use crate::models::{BulkEntry, DateInput, MarkRequest, Status, StudentForm};
use crate::validate::{parse_date, today};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{error, info};

const MENU: &str = "\
------------------------------------------------------------
MAIN MENU
------------------------------------------------------------
1. Add New Student
2. Add Multiple Students
3. View All Students
4. Mark Attendance
5. Mark Bulk Attendance
6. View Today's Attendance
7. View Attendance by Date
8. View Student Attendance History
9. View Student Attendance Summary
10. View Daily Analysis
11. View Attendance Analytics
0. Exit
------------------------------------------------------------";

/// Largest number of students "Add Multiple Students" will ask for in one go.
const MAX_BATCH: usize = 100;

pub struct Console<'a, R, W> {
    manager: &'a AttendanceManager,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(manager: &'a AttendanceManager, input: R, output: W) -> Self {
        Self {
            manager,
            input,
            output,
        }
    }

    /// Shows the menu until the user exits or the input ends.
    ///
    /// Failed operations are reported and the menu is shown again. Only I/O errors on the
    /// console itself end the loop early.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "ATTENDANCE MANAGEMENT SYSTEM")?;
        info!("console started");

        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(choice) = self.prompt("Enter your choice (0-11): ")? else {
                break;
            };

            let result = match choice.as_str() {
                "0" => break,
                "1" => self.add_student(),
                "2" => self.add_students(),
                "3" => self.view_students(),
                "4" => self.mark(),
                "5" => self.mark_bulk(),
                "6" => self.view_date(Some(today())),
                "7" => self.view_date(None),
                "8" => self.view_history(),
                "9" => self.view_summary(),
                "10" => self.view_daily(),
                "11" => self.view_analytics(),
                _ => {
                    writeln!(self.output, "✗ Invalid choice. Please select 0-11.")?;
                    continue;
                }
            };

            match result {
                Ok(()) => {}
                Err(AttendanceError::Io(err)) => return Err(AttendanceError::Io(err)),
                Err(err) => {
                    error!(error = %err, choice = %choice, "console operation failed");
                    writeln!(self.output, "✗ ERROR: {err}")?;
                }
            }
        }

        writeln!(self.output, "Thank you for using Attendance Management System!")?;
        info!("console closed");
        Ok(())
    }

    /// Prints `label` and reads one trimmed line. `None` means the input has ended.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`Console::prompt`], but the end of input is an empty answer.
    fn ask(&mut self, label: &str) -> Result<String> {
        Ok(self.prompt(label)?.unwrap_or_default())
    }

    /// Reads a number. Anything else is reported on the console and gives `None`.
    fn ask_number<T: FromStr>(&mut self, label: &str) -> Result<Option<T>> {
        let answer = self.ask(label)?;
        match answer.parse() {
            Ok(number) => Ok(Some(number)),
            Err(_) => {
                writeln!(self.output, "✗ ERROR: '{answer}' is not a number")?;
                Ok(None)
            }
        }
    }

    /// An empty answer means today.
    fn ask_date(&mut self) -> Result<Option<DateInput>> {
        let answer = self.ask("Enter date (YYYY-MM-DD, Enter for today): ")?;
        Ok((!answer.is_empty()).then_some(DateInput::Text(answer)))
    }

    /// `None` when the answer is empty, so callers can skip an entry. Unrecognized answers are
    /// reported and asked again.
    fn ask_status(&mut self, label: &str) -> Result<Option<Status>> {
        loop {
            let answer = self.ask(label)?;
            let status = match answer.as_str() {
                "" => return Ok(None),
                "1" => Status::Present,
                "2" => Status::Absent,
                "3" => Status::Late,
                other => match other.parse() {
                    Ok(status) => status,
                    Err(err) => {
                        writeln!(self.output, "✗ ERROR: {err}")?;
                        continue;
                    }
                },
            };
            return Ok(Some(status));
        }
    }

    fn add_student(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Add New Student ---")?;
        let form = StudentForm {
            name: self.ask("Enter student name: ")?,
            email: self.ask("Enter student email: ")?,
            reg_no: Some(self.ask("Enter registration number (optional): ")?),
            join_date: Some(self.ask("Enter join date (YYYY-MM-DD, Enter for today): ")?)
                .filter(|d| !d.is_empty()),
            ..StudentForm::default()
        };

        let student = self.manager.add_student(&form)?;
        writeln!(
            self.output,
            "✓ SUCCESS: Student '{}' added successfully with ID: {}",
            student.name, student.id
        )?;
        Ok(())
    }

    fn add_students(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Add Multiple Students ---")?;
        let Some(count) = self.ask_number::<usize>("How many students to add? ")? else {
            return Ok(());
        };

        if count > MAX_BATCH {
            writeln!(
                self.output,
                "✗ ERROR: Can add at most {MAX_BATCH} students at a time"
            )?;
            return Ok(());
        }

        let mut forms = Vec::new();
        for i in 1..=count {
            writeln!(self.output, "Student {i}:")?;
            let Some(name) = self.prompt("  Name: ")? else {
                break;
            };
            let Some(email) = self.prompt("  Email: ")? else {
                break;
            };
            forms.push(StudentForm {
                name,
                email,
                ..StudentForm::default()
            });
        }

        let outcome = self.manager.add_students_bulk(&forms);
        writeln!(
            self.output,
            "{}",
            display::bulk_outcome_text("BULK IMPORT RESULTS", &outcome)
        )?;
        Ok(())
    }

    fn view_students(&mut self) -> Result<()> {
        let students = self.manager.list_students()?;
        if students.is_empty() {
            writeln!(self.output, "No students found in the database.")?;
        } else {
            writeln!(self.output, "\nTotal Students: {}", students.len())?;
            writeln!(self.output, "{}", display::students_table(&students))?;
        }
        Ok(())
    }

    fn mark(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Mark Attendance ---")?;
        let Some(student_id) = self.ask_number::<i32>("Enter student ID: ")? else {
            return Ok(());
        };
        let Some(period) = self.ask_number::<i32>("Enter period (1-5): ")? else {
            return Ok(());
        };
        let date = self.ask_date()?;
        let status = self
            .ask_status("Status: 1. Present  2. Absent  3. Late (Enter for Present): ")?
            .unwrap_or(Status::Present);

        let outcome = self.manager.mark_attendance(&MarkRequest {
            student_id,
            faculty_id: None,
            subject: None,
            date,
            period,
            status: status.to_string(),
        })?;
        writeln!(self.output, "✓ SUCCESS: {}", outcome.message)?;
        Ok(())
    }

    fn mark_bulk(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Mark Bulk Attendance ---")?;
        let students = self.manager.list_students()?;
        if students.is_empty() {
            writeln!(self.output, "No students found in database.")?;
            return Ok(());
        }

        let date = self.ask_date()?.map(|d| match d {
            DateInput::Text(text) => text,
            DateInput::Date(date) => date.to_string(),
        });
        let Some(period) = self.ask_number::<i32>("Enter period (1-5): ")? else {
            return Ok(());
        };

        let mut entries = Vec::new();
        for student in &students {
            let label = format!(
                "Status for {} (ID {}) [1. Present 2. Absent 3. Late, Enter to skip]: ",
                student.name, student.id
            );
            if let Some(status) = self.ask_status(&label)? {
                entries.push(BulkEntry {
                    student_id: student.id,
                    date: date.clone(),
                    status: Some(status.to_string()),
                    period: Some(period),
                    ..BulkEntry::default()
                });
            }
        }

        if entries.is_empty() {
            writeln!(self.output, "No attendance records to mark.")?;
            return Ok(());
        }

        let outcome = self.manager.mark_bulk_attendance(&entries);
        writeln!(
            self.output,
            "{}",
            display::bulk_outcome_text("BULK ATTENDANCE RESULTS", &outcome)
        )?;
        Ok(())
    }

    fn view_date(&mut self, date: Option<chrono::NaiveDate>) -> Result<()> {
        let date = match date {
            Some(date) => date,
            None => {
                let input = self.ask_date()?;
                parse_date(input.as_ref())?
            }
        };

        let entries = self.manager.attendance_by_date(date, None)?;
        writeln!(self.output, "\nDate: {date}")?;
        writeln!(self.output, "{}", display::date_table(&entries))?;
        Ok(())
    }

    fn view_history(&mut self) -> Result<()> {
        let Some(student_id) = self.ask_number::<i32>("Enter student ID: ")? else {
            return Ok(());
        };
        let history = self.manager.student_attendance(student_id)?;

        if history.is_empty() {
            writeln!(self.output, "No attendance records found for student {student_id}")?;
        } else {
            writeln!(self.output, "{}", display::history_table(&history))?;
        }
        Ok(())
    }

    fn view_summary(&mut self) -> Result<()> {
        let Some(student_id) = self.ask_number::<i32>("Enter student ID: ")? else {
            return Ok(());
        };
        let student = self
            .manager
            .get_student(student_id)?
            .ok_or(AttendanceError::StudentNotFound(student_id))?;
        let summary = self.manager.attendance_summary(student_id)?;

        writeln!(self.output, "{}", display::summary_text(&student, &summary))?;
        Ok(())
    }

    fn view_daily(&mut self) -> Result<()> {
        let input = self.ask_date()?;
        let analysis = self.manager.daily_analysis(parse_date(input.as_ref())?)?;

        writeln!(self.output, "{}", display::daily_tables(&analysis))?;
        Ok(())
    }

    fn view_analytics(&mut self) -> Result<()> {
        let rows = self.manager.attendance_analytics()?;

        writeln!(self.output, "{}", display::analytics_table(&rows))?;
        Ok(())
    }
}
