// src/api/handlers/attendance.rs
use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web::{self, Data, Query},
    HttpResponse,
};
use chrono::Local;
use tracing::{error, info};

use crate::{
    api::types::{AttendanceQuery, SessionResponse},
    core::services::MonitorService,
    storage::SessionId,
    utils::error::{MonitorError, Result},
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/get-attendance").route(web::get().to(get_attendance)))
        .service(web::resource("/download-attendance").route(web::get().to(download_attendance)))
        .service(web::resource("/reset-session").route(web::post().to(reset_session)))
        .service(web::resource("/session").route(web::get().to(get_session)));
}

/// Runs blocking ledger I/O off the async workers.
async fn blocking<F, T>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(task)
        .await
        .map_err(|e| MonitorError::Task(e.to_string()))?
}

async fn get_attendance(
    service: Data<MonitorService>,
    query: Query<AttendanceQuery>,
) -> Result<HttpResponse> {
    let session_id = query.into_inner().session_id.map(SessionId::new);

    let records = blocking(move || service.attendance(session_id.as_ref()))
        .await
        .map_err(|e| {
            error!("Failed to read attendance: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(records))
}

async fn download_attendance(service: Data<MonitorService>) -> Result<HttpResponse> {
    let bytes = blocking(move || service.export_attendance()).await?;
    let file_name = format!("attendance_{}.json", Local::now().format("%Y-%m-%d"));

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes))
}

async fn reset_session(service: Data<MonitorService>) -> Result<HttpResponse> {
    let session = blocking(move || service.reset_session()).await?;
    info!("Session reset via API: {}", session.id);
    Ok(HttpResponse::Ok().json(SessionResponse::from(session)))
}

async fn get_session(service: Data<MonitorService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(SessionResponse::from(service.current_session())))
}
