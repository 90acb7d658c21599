use anyhow::Context;
use class_attendance::cli::{Cli, Command};
use class_attendance::console::Console;
use class_attendance::logging::init_logging;
use class_attendance::models::{DateInput, MarkRequest};
use class_attendance::validate::parse_date;
use class_attendance::{AttendanceError, AttendanceManager, api, config::Settings, display, roster};
use clap::Parser;
use std::io;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    let _guard = init_logging(&settings.logging)?;
    let manager = AttendanceManager::connect(&settings.database)?;

    match cli.command {
        Command::Serve => {
            actix_web::rt::System::new().block_on(api::serve(manager, &settings.server))?;
        }
        Command::Menu => {
            let stdin = io::stdin();
            Console::new(&manager, stdin.lock(), io::stdout()).run()?;
        }
        Command::AddStudent(form) => {
            let student = manager.add_student(&form)?;
            println!(
                "Student '{}' added successfully with ID: {}",
                student.name, student.id
            );
        }
        Command::ImportStudents { file_path } => {
            let forms = roster::read_students(&file_path)?;
            let outcome = manager.add_students_bulk(&forms);
            println!("{}", display::bulk_outcome_text("BULK IMPORT RESULTS", &outcome));
        }
        Command::ListStudents => {
            let students = manager.list_students()?;
            println!("Total Students: {}", students.len());
            println!("{}", display::students_table(&students));
        }
        Command::ListFaculty => {
            println!("{}", display::faculty_table(&manager.list_faculty()?));
        }
        Command::Mark(args) => {
            let outcome = manager.mark_attendance(&MarkRequest::from(args))?;
            println!("{}", outcome.message);
        }
        Command::BulkMark { file_path } => {
            let entries = roster::read_marks(&file_path)?;
            let outcome = manager.mark_bulk_attendance(&entries);
            println!(
                "{}",
                display::bulk_outcome_text("BULK ATTENDANCE RESULTS", &outcome)
            );
        }
        Command::ShowDate { date, period } => {
            let date = parse_date(date.map(DateInput::Text).as_ref())?;
            let entries = manager.attendance_by_date(date, period)?;
            println!("Date: {date}");
            println!("{}", display::date_table(&entries));
        }
        Command::History { student_id } => {
            let history = manager.student_attendance(student_id)?;
            println!("{}", display::history_table(&history));
        }
        Command::Summary { student_id } => {
            let student = manager
                .get_student(student_id)?
                .ok_or(AttendanceError::StudentNotFound(student_id))?;
            let summary = manager.attendance_summary(student_id)?;
            println!("{}", display::summary_text(&student, &summary));
        }
        Command::Daily { date } => {
            let date = parse_date(date.map(DateInput::Text).as_ref())?;
            println!("{}", display::daily_tables(&manager.daily_analysis(date)?));
        }
        Command::Analytics => {
            println!("{}", display::analytics_table(&manager.attendance_analytics()?));
        }
        Command::Periods => {
            println!("{}", display::periods_table());
        }
    }

    Ok(())
}
