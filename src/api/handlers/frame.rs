use actix_web::{
    web::{self, Data, Json},
    HttpResponse,
};
use tracing::{error, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    api::types::ProcessFrameRequest,
    core::{providers::Frame, services::MonitorService},
    utils::error::MonitorError,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/process-frame").route(web::post().to(process_frame)));
}

async fn process_frame(
    service: Data<MonitorService>,
    request: Json<ProcessFrameRequest>,
) -> Result<HttpResponse, MonitorError> {
    let request_id = Uuid::new_v4();

    async move {
        let frame = Frame::from_data_url(&request.frame).map_err(|e| {
            warn!("Rejected frame: {}", e);
            e
        })?;

        let analysis = service.analyze(&frame).await.map_err(|e| {
            error!("Frame processing failed: {}", e);
            e
        })?;

        Ok::<_, MonitorError>(HttpResponse::Ok().json(analysis))
    }
    .instrument(info_span!("process_frame", %request_id))
    .await
}
