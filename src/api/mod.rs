//! The JSON API, served by actix-web under `/api`.
//!
//! Every response uses the same envelope: `{"status": "success", "data": ...}` on success and
//! `{"status": "error", "message": ...}` on failure.

mod handlers;

use crate::config::ServerSettings;
use crate::error::{AttendanceError, Result};
use crate::manager::AttendanceManager;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, middleware, web};
use serde_json::json;
use tracing::{error, info};

/// Registers every route under the `/api` scope.
///
/// Malformed JSON bodies, query strings and path segments are answered with a 400 in the usual
/// error envelope instead of actix's plain-text default.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request(&err.to_string());
        InternalError::from_response(err, response).into()
    });
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let response = bad_request(&err.to_string());
        InternalError::from_response(err, response).into()
    });
    let path_config = web::PathConfig::default().error_handler(|err, _req| {
        let response = bad_request(&err.to_string());
        InternalError::from_response(err, response).into()
    });

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .app_data(query_config)
            .app_data(path_config)
            .service(handlers::health)
            .service(handlers::list_students)
            .service(handlers::get_student)
            .service(handlers::add_student)
            .service(handlers::add_student_legacy)
            .service(handlers::list_faculty)
            .service(handlers::mark_attendance)
            .service(handlers::daily_attendance)
            .service(handlers::attendance_by_date)
            .service(handlers::student_attendance)
            .service(handlers::attendance_analytics)
            .service(handlers::daily_report)
            .service(handlers::summary_report)
            .service(handlers::periods),
    );
}

/// Runs the API until the server is shut down.
pub async fn serve(manager: AttendanceManager, settings: &ServerSettings) -> std::io::Result<()> {
    let manager = web::Data::new(manager);

    info!(host = %settings.host, port = settings.port, "starting attendance API");
    HttpServer::new(move || {
        App::new()
            .app_data(manager.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}

/// Runs a blocking manager call on actix's thread pool.
async fn run<T, F>(manager: &web::Data<AttendanceManager>, job: F) -> Result<T>
where
    F: FnOnce(&AttendanceManager) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let manager = manager.clone();
    web::block(move || job(&manager)).await.map_err(|err| {
        error!(error = %err, "blocking task failed");
        AttendanceError::Blocking
    })?
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "status": "error",
        "message": message,
    }))
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else if matches!(self, Self::DuplicateStudent { .. }) {
            StatusCode::CONFLICT
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "message": self.to_string(),
        }))
    }
}
