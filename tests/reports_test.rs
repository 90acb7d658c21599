mod common;

use chrono::NaiveDate;
use class_attendance::AttendanceError;
use class_attendance::models::Status;
use common::{add_student, mark, test_db};

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

#[test]
fn test_summary_percentage() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");

    mark(&db.manager, ada.id, "2025-02-03", 1, "Present");
    mark(&db.manager, ada.id, "2025-02-03", 2, "Present");
    mark(&db.manager, ada.id, "2025-02-04", 1, "Present");
    mark(&db.manager, ada.id, "2025-02-04", 2, "Absent");

    let summary = db.manager.attendance_summary(ada.id).unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.present, 3);
    assert_eq!(summary.absent, 1);
    assert_eq!(summary.late, 0);
    assert_eq!(summary.attendance_percentage, 75.0);
}

#[test]
fn test_summary_rounds_to_two_decimals() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");

    mark(&db.manager, ada.id, "2025-02-03", 1, "Present");
    mark(&db.manager, ada.id, "2025-02-03", 2, "Present");
    mark(&db.manager, ada.id, "2025-02-03", 3, "Late");

    let summary = db.manager.attendance_summary(ada.id).unwrap();
    assert_eq!(summary.attendance_percentage, 66.67);
}

#[test]
fn test_summary_without_records_is_zero() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");

    let summary = db.manager.attendance_summary(ada.id).unwrap();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.attendance_percentage, 0.0);
}

#[test]
fn test_summary_of_unknown_student_is_not_found() {
    let db = test_db();

    let err = db.manager.attendance_summary(5).unwrap_err();
    assert!(matches!(err, AttendanceError::StudentNotFound(5)));
    assert!(err.is_not_found());
}

#[test]
fn test_attendance_by_date_includes_unmarked_students() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    add_student(&db.manager, "Alan Turing", "alan@example.com");

    mark(&db.manager, ada.id, "2025-02-03", 2, "Late");
    mark(&db.manager, ada.id, "2025-02-03", 1, "Present");
    mark(&db.manager, ada.id, "2025-02-04", 1, "Absent");

    let entries = db
        .manager
        .attendance_by_date(date("2025-02-03"), None)
        .unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].name, "Ada Lovelace");
    assert_eq!(entries[0].period, Some(1));
    assert_eq!(entries[1].period, Some(2));
    assert_eq!(entries[1].status, Some(Status::Late));
    assert_eq!(entries[2].name, "Alan Turing");
    assert_eq!(entries[2].status, None);
    assert_eq!(entries[2].period, None);

    let period_two = db
        .manager
        .attendance_by_date(date("2025-02-03"), Some(2))
        .unwrap();
    assert_eq!(period_two.len(), 2);
    assert_eq!(period_two[0].status, Some(Status::Late));

    let err = db
        .manager
        .attendance_by_date(date("2025-02-03"), Some(8))
        .unwrap_err();
    assert!(matches!(err, AttendanceError::InvalidPeriod(8)));
}

#[test]
fn test_daily_analysis_of_an_empty_day() {
    let db = test_db();
    add_student(&db.manager, "Grace Hopper", "grace@example.com");
    add_student(&db.manager, "Ada Lovelace", "ada@example.com");

    let analysis = db.manager.daily_analysis(date("2025-02-03")).unwrap();

    assert_eq!(analysis.period_summary.len(), 5);
    for (i, summary) in analysis.period_summary.iter().enumerate() {
        assert_eq!(summary.period, i as i32 + 1);
        assert_eq!(summary.counts.total(), 0);
    }

    assert_eq!(analysis.student_daily.len(), 2);
    assert_eq!(analysis.student_daily[0].name, "Ada Lovelace");
    assert!(analysis.student_daily.iter().all(|s| s.period_details.is_empty()));
}

#[test]
fn test_daily_analysis_counts_per_period_and_student() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    let alan = add_student(&db.manager, "Alan Turing", "alan@example.com");

    mark(&db.manager, ada.id, "2025-02-03", 1, "Present");
    mark(&db.manager, alan.id, "2025-02-03", 1, "Absent");
    mark(&db.manager, ada.id, "2025-02-03", 3, "Late");
    mark(&db.manager, alan.id, "2025-02-04", 3, "Late");

    let analysis = db.manager.daily_analysis(date("2025-02-03")).unwrap();

    let first = &analysis.period_summary[0];
    assert_eq!((first.counts.present, first.counts.absent, first.counts.late), (1, 1, 0));
    let third = &analysis.period_summary[2];
    assert_eq!(third.counts.late, 1);

    let ada_day = &analysis.student_daily[0];
    assert_eq!(ada_day.counts.present, 1);
    assert_eq!(ada_day.counts.late, 1);
    let periods: Vec<i32> = ada_day.period_details.iter().map(|d| d.period).collect();
    assert_eq!(periods, [1, 3]);
}

#[test]
fn test_daily_grid_folds_periods_per_student() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    add_student(&db.manager, "Alan Turing", "alan@example.com");

    mark(&db.manager, ada.id, "2025-02-03", 1, "Present");
    mark(&db.manager, ada.id, "2025-02-03", 4, "Absent");

    let grid = db.manager.daily_grid(date("2025-02-03")).unwrap();

    assert_eq!(grid.len(), 2);
    assert_eq!(grid[0].periods.len(), 2);
    assert_eq!(grid[0].periods[&4].status, Status::Absent);
    assert!(grid[1].periods.is_empty());
}

#[test]
fn test_analytics_lists_every_student() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    add_student(&db.manager, "Alan Turing", "alan@example.com");

    mark(&db.manager, ada.id, "2025-02-03", 1, "Present");
    mark(&db.manager, ada.id, "2025-02-03", 2, "Absent");

    let rows = db.manager.attendance_analytics().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].total_classes, 2);
    assert_eq!(rows[0].attendance_percentage, 50.0);
    assert_eq!(rows[1].name, "Alan Turing");
    assert_eq!(rows[1].total_classes, 0);
    assert_eq!(rows[1].attendance_percentage, 0.0);
}

#[test]
fn test_history_is_newest_first() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");

    mark(&db.manager, ada.id, "2025-02-03", 1, "Present");
    mark(&db.manager, ada.id, "2025-02-04", 1, "Late");
    mark(&db.manager, ada.id, "2025-02-04", 3, "Absent");

    let history = db.manager.student_attendance(ada.id).unwrap();
    let keys: Vec<(NaiveDate, i32)> = history.iter().map(|h| (h.date, h.period)).collect();

    assert_eq!(
        keys,
        [
            (date("2025-02-04"), 3),
            (date("2025-02-04"), 1),
            (date("2025-02-03"), 1),
        ]
    );

    assert!(matches!(
        db.manager.student_attendance(99),
        Err(AttendanceError::StudentNotFound(99))
    ));
}
