use super::run;
use crate::error::{AttendanceError, Result};
use crate::manager::AttendanceManager;
use crate::models::{BulkEntry, DateInput, StudentForm};
use crate::periods::{BREAKS, PERIOD_TIMINGS};
use crate::validate::parse_date;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

type Manager = web::Data<AttendanceManager>;

#[derive(Deserialize)]
pub(crate) struct DateQuery {
    date: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct PeriodQuery {
    period: Option<i32>,
}

/// The body of `POST /attendance/mark`. Every field is required; they are optional here so that
/// all missing fields can be reported at once.
#[derive(Deserialize)]
pub(crate) struct MarkBody {
    faculty_id: Option<i32>,
    subject: Option<String>,
    date: Option<String>,
    period: Option<i32>,
    attendance: Option<Vec<MarkItem>>,
}

#[derive(Deserialize)]
struct MarkItem {
    student_id: i32,
    status: String,
}

impl MarkBody {
    fn into_entries(self) -> Result<Vec<BulkEntry>> {
        let mut missing = Vec::new();
        if self.faculty_id.is_none() {
            missing.push("faculty_id");
        }
        if self.subject.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("subject");
        }
        if self.date.as_deref().is_none_or(|d| d.trim().is_empty()) {
            missing.push("date");
        }
        if self.period.is_none() {
            missing.push("period");
        }
        if self.attendance.as_ref().is_none_or(Vec::is_empty) {
            missing.push("attendance");
        }
        if !missing.is_empty() {
            return Err(AttendanceError::MissingField(missing.join(", ")));
        }

        Ok(self
            .attendance
            .unwrap_or_default()
            .into_iter()
            .map(|item| BulkEntry {
                student_id: item.student_id,
                date: self.date.clone(),
                status: Some(item.status),
                faculty_id: self.faculty_id,
                subject: self.subject.clone(),
                period: self.period,
            })
            .collect())
    }
}

#[get("/health")]
pub(crate) async fn health(manager: Manager) -> Result<HttpResponse> {
    run(&manager, |m| m.ping()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Attendance API is running",
        "timestamp": chrono::Local::now().to_rfc3339(),
    })))
}

#[get("/students")]
pub(crate) async fn list_students(manager: Manager) -> Result<HttpResponse> {
    let students = run(&manager, |m| m.list_students()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "count": students.len(),
        "data": students,
    })))
}

#[get("/students/{id}")]
pub(crate) async fn get_student(manager: Manager, path: web::Path<i32>) -> Result<HttpResponse> {
    let student_id = path.into_inner();
    let student = run(&manager, move |m| m.get_student(student_id))
        .await?
        .ok_or(AttendanceError::StudentNotFound(student_id))?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": student,
    })))
}

async fn create_student(manager: Manager, form: StudentForm) -> Result<HttpResponse> {
    let student = run(&manager, move |m| m.add_student(&form)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": format!("Student '{}' added successfully with ID: {}", student.name, student.id),
        "data": student,
    })))
}

#[post("/student/add")]
pub(crate) async fn add_student(
    manager: Manager,
    body: web::Json<StudentForm>,
) -> Result<HttpResponse> {
    create_student(manager, body.into_inner()).await
}

/// The older path for adding a student, kept for existing clients.
#[post("/students/add")]
pub(crate) async fn add_student_legacy(
    manager: Manager,
    body: web::Json<StudentForm>,
) -> Result<HttpResponse> {
    create_student(manager, body.into_inner()).await
}

#[get("/faculty")]
pub(crate) async fn list_faculty(manager: Manager) -> Result<HttpResponse> {
    let faculty = run(&manager, |m| m.list_faculty()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "count": faculty.len(),
        "data": faculty,
    })))
}

/// Marks a whole class for one period. Entries are marked independently, so a failing entry is
/// reported in `errors` and does not turn the response into an error.
#[post("/attendance/mark")]
pub(crate) async fn mark_attendance(
    manager: Manager,
    body: web::Json<MarkBody>,
) -> Result<HttpResponse> {
    let entries = body.into_inner().into_entries()?;
    let outcome = run(&manager, move |m| Ok(m.mark_bulk_attendance(&entries))).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": format!("Attendance marked successfully for {} students", outcome.success_count),
        "success_count": outcome.success_count,
        "error_count": outcome.failed_count,
        "errors": outcome.errors(),
        "results": outcome.results,
    })))
}

#[get("/attendance/daily")]
pub(crate) async fn daily_attendance(
    manager: Manager,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    let date = parse_date(query.into_inner().date.map(DateInput::Text).as_ref())?;
    let grid = run(&manager, move |m| m.daily_grid(date)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "date": date,
        "data": grid,
    })))
}

#[get("/attendance/date/{date}")]
pub(crate) async fn attendance_by_date(
    manager: Manager,
    path: web::Path<String>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    let date = parse_date(Some(&DateInput::Text(path.into_inner())))?;
    let period = query.period;
    let entries = run(&manager, move |m| m.attendance_by_date(date, period)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "date": date,
        "count": entries.len(),
        "data": entries,
    })))
}

#[get("/attendance/student/{id}")]
pub(crate) async fn student_attendance(
    manager: Manager,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let student_id = path.into_inner();
    let history = run(&manager, move |m| m.student_attendance(student_id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "count": history.len(),
        "data": history,
    })))
}

#[get("/attendance/analytics")]
pub(crate) async fn attendance_analytics(manager: Manager) -> Result<HttpResponse> {
    let rows = run(&manager, |m| m.attendance_analytics()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "count": rows.len(),
        "data": rows,
    })))
}

#[get("/reports/daily/{date}")]
pub(crate) async fn daily_report(manager: Manager, path: web::Path<String>) -> Result<HttpResponse> {
    let date = parse_date(Some(&DateInput::Text(path.into_inner())))?;
    let analysis = run(&manager, move |m| m.daily_analysis(date)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": analysis,
    })))
}

#[get("/reports/summary/{id}")]
pub(crate) async fn summary_report(manager: Manager, path: web::Path<i32>) -> Result<HttpResponse> {
    let student_id = path.into_inner();
    let (student, summary) = run(&manager, move |m| {
        let student = m
            .get_student(student_id)?
            .ok_or(AttendanceError::StudentNotFound(student_id))?;
        Ok((student, m.attendance_summary(student_id)?))
    })
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": {
            "student": student,
            "summary": summary,
        },
    })))
}

#[get("/periods")]
pub(crate) async fn periods() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "success",
        "data": PERIOD_TIMINGS,
        "breaks": BREAKS,
    }))
}
