mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use class_attendance::api;
use common::{add_student, mark, test_db};
use serde_json::{Value, json};

macro_rules! app {
    ($manager:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($manager.clone()))
                .configure(api::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let db = test_db();
    let app = app!(db.manager);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_mark_attendance_for_a_class() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    let alan = add_student(&db.manager, "Alan Turing", "alan@example.com");
    let lecturer = db
        .manager
        .ensure_faculty("Dr. Sarah Johnson", "Mathematics")
        .unwrap();
    let app = app!(db.manager);

    let req = test::TestRequest::post()
        .uri("/api/attendance/mark")
        .set_json(json!({
            "faculty_id": lecturer.id,
            "subject": "Mathematics",
            "date": "2025-02-03",
            "period": 2,
            "attendance": [
                {"student_id": ada.id, "status": "Present"},
                {"student_id": alan.id, "status": "Excused"},
                {"student_id": 999, "status": "Late"},
            ],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["success_count"], 1);
    assert_eq!(body["error_count"], 2);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["message"],
        "Attendance marked successfully for 1 students"
    );

    let history = db.manager.student_attendance(ada.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].faculty_name.as_deref(), Some("Dr. Sarah Johnson"));
}

#[actix_web::test]
async fn test_mark_attendance_with_missing_fields() {
    let db = test_db();
    let app = app!(db.manager);

    let req = test::TestRequest::post()
        .uri("/api/attendance/mark")
        .set_json(json!({
            "faculty_id": 1,
            "date": "2025-02-03",
            "attendance": [],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "Missing required fields: subject, period, attendance"
    );
}

#[actix_web::test]
async fn test_malformed_body_uses_the_error_envelope() {
    let db = test_db();
    let app = app!(db.manager);

    let req = test::TestRequest::post()
        .uri("/api/attendance/mark")
        .set_json(json!({"period": "first"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
}

#[actix_web::test]
async fn test_student_endpoints() {
    let db = test_db();
    let app = app!(db.manager);

    let req = test::TestRequest::post()
        .uri("/api/student/add")
        .set_json(json!({
            "reg_no": "REG001",
            "name": "Ada Lovelace",
            "email": "Ada@Example.com",
            "cgpa": 9.1,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["email"], "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/students/add")
        .set_json(json!({"name": "Ada Again", "email": "ada@example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get().uri("/api/students").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Ada Lovelace");

    let req = test::TestRequest::get()
        .uri(&format!("/api/students/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/students/404").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Student with ID 404 not found");
}

#[actix_web::test]
async fn test_summary_report() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    mark(&db.manager, ada.id, "2025-02-03", 1, "Present");
    mark(&db.manager, ada.id, "2025-02-03", 2, "Absent");
    let app = app!(db.manager);

    let req = test::TestRequest::get()
        .uri(&format!("/api/reports/summary/{}", ada.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["student"]["name"], "Ada Lovelace");
    assert_eq!(body["data"]["summary"]["total"], 2);
    assert_eq!(body["data"]["summary"]["attendance_percentage"], 50.0);

    let req = test::TestRequest::get()
        .uri("/api/reports/summary/77")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_daily_views() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    add_student(&db.manager, "Alan Turing", "alan@example.com");
    mark(&db.manager, ada.id, "2025-02-03", 3, "Late");
    let app = app!(db.manager);

    let req = test::TestRequest::get()
        .uri("/api/attendance/daily?date=2025-02-03")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["date"], "2025-02-03");
    assert_eq!(body["data"][0]["periods"]["3"]["status"], "Late");
    assert!(body["data"][1]["periods"].as_object().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/api/attendance/date/2025-02-03?period=3")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);

    let req = test::TestRequest::get()
        .uri("/api/reports/daily/2025-02-03")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["period_summary"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["period_summary"][2]["late"], 1);

    let req = test::TestRequest::get()
        .uri("/api/reports/daily/03-02-2025")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_analytics_and_history() {
    let db = test_db();
    let ada = add_student(&db.manager, "Ada Lovelace", "ada@example.com");
    add_student(&db.manager, "Alan Turing", "alan@example.com");
    mark(&db.manager, ada.id, "2025-02-03", 1, "Present");
    let app = app!(db.manager);

    let req = test::TestRequest::get()
        .uri("/api/attendance/analytics")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["attendance_percentage"], 100.0);
    assert_eq!(body["data"][1]["total_classes"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance/student/{}", ada.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["status"], "Present");
}

#[actix_web::test]
async fn test_periods() {
    let db = test_db();
    let app = app!(db.manager);

    let req = test::TestRequest::get().uri("/api/periods").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"][0]["start"], "09:00");
    assert_eq!(body["breaks"].as_array().unwrap().len(), 2);
}
