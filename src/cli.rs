//! This module contains the command-line interface [`Cli`] parser for managing student attendance
//! records.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{DateInput, MarkRequest, Status, StudentForm};

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(version, about = "Record and report classroom attendance")]
pub struct Cli {
    /// Path to a configuration file. Defaults to `config.toml` in the working directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The different commands available for managing student attendance records.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API.
    Serve,

    /// Start the interactive menu.
    Menu,

    /// Add a new student to the roster.
    AddStudent(StudentForm),

    /// Add multiple students from a CSV file with a header row.
    ImportStudents { file_path: PathBuf },

    /// List every student on the roster.
    ListStudents,

    /// List every faculty member.
    ListFaculty,

    /// Mark a student for one period.
    Mark(MarkArgs),

    /// Mark multiple students from a CSV file with a header row.
    BulkMark { file_path: PathBuf },

    /// Show every student's marks for a date.
    ShowDate {
        /// The date as `YYYY-MM-DD`, defaulting to today.
        #[arg(long)]
        date: Option<String>,

        /// Only show this period.
        #[arg(long)]
        period: Option<i32>,
    },

    /// Show a student's attendance history.
    History { student_id: i32 },

    /// Show a student's attendance totals and percentage.
    Summary { student_id: i32 },

    /// Show the per-period and per-student breakdown of a day.
    Daily {
        /// The date as `YYYY-MM-DD`, defaulting to today.
        #[arg(long)]
        date: Option<String>,
    },

    /// Show attendance percentages for every student.
    Analytics,

    /// Show the timetable of periods and breaks.
    Periods,
}

#[derive(Args, Debug)]
pub struct MarkArgs {
    /// The ID of the student to mark.
    pub student_id: i32,

    /// One of `Present`, `Absent` or `Late`.
    #[arg(long, default_value_t = Status::Present.to_string())]
    pub status: String,

    /// The period, from 1 to 5.
    #[arg(long, default_value_t = 1)]
    pub period: i32,

    /// The date as `YYYY-MM-DD`, defaulting to today.
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub faculty_id: Option<i32>,

    #[arg(long)]
    pub subject: Option<String>,
}

impl From<MarkArgs> for MarkRequest {
    fn from(args: MarkArgs) -> Self {
        Self {
            student_id: args.student_id,
            faculty_id: args.faculty_id,
            subject: args.subject,
            date: args.date.map(DateInput::Text),
            period: args.period,
            status: args.status,
        }
    }
}
