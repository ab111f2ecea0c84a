// src/api/handlers/verification.rs
use std::time::Instant;

use actix_multipart::Multipart;
use actix_web::{
    web::{self, Data, Query},
    HttpResponse, Resource,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    api::{
        multipart,
        types::{PhotoSubmission, RequestParams},
    },
    core::{
        exif::{ExtractionError, GpsExtractor},
        mission::MissionRegistry,
        services::verification::{VerificationReason, VerificationResult, VerificationService},
    },
    utils::{config::Config, error::Result, metrics::Metrics},
};

pub fn resource() -> Resource {
    web::resource("/verify_exif").route(web::post().to(verify_exif))
}

async fn verify_exif(
    registry: Data<MissionRegistry>,
    service: Data<VerificationService>,
    extractor: Data<dyn GpsExtractor>,
    metrics: Data<Metrics>,
    config: Data<Config>,
    query: Query<RequestParams>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let started = Instant::now();
    let submission =
        multipart::read_submission(payload, config.upload.max_file_size, query.into_inner()).await?;

    info!(
        user_id = %submission.user_id,
        mission_id = %submission.mission_id,
        bytes = submission.file.len(),
        "Received verification request"
    );

    if let Some(mission) = registry.get(&submission.mission_id) {
        if mission.user_id != submission.user_id {
            warn!(
                mission_id = %mission.id,
                owner = %mission.user_id,
                submitted_by = %submission.user_id,
                "Mission submitted by a different user"
            );
        }
    }

    let mission_id = submission.mission_id.clone();
    let result = verify_in_background(registry, service, extractor, &config, submission).await;

    metrics.record_verification(&result.reason, started.elapsed());
    info!(
        mission_id = %mission_id,
        verified = result.verified,
        reason = result.reason.kind(),
        "Verification finished"
    );

    Ok(HttpResponse::Ok().json(result))
}

// EXIF parsing is blocking work; keep it off the async workers.
async fn verify_in_background(
    registry: Data<MissionRegistry>,
    service: Data<VerificationService>,
    extractor: Data<dyn GpsExtractor>,
    config: &Config,
    submission: PhotoSubmission,
) -> VerificationResult {
    let task = web::block(move || {
        let extractor: &dyn GpsExtractor = &**extractor;
        service.verify_photo(
            &registry,
            extractor,
            &submission.mission_id,
            &submission.file,
            Utc::now(),
        )
    });

    let failure = match tokio::time::timeout(config.get_extraction_timeout(), task).await {
        Ok(Ok(result)) => return result,
        Ok(Err(e)) => {
            error!("Verification task failed: {}", e);
            ExtractionError::Aborted(e.to_string())
        }
        Err(_) => {
            warn!("Verification timed out");
            ExtractionError::Timeout(config.upload.extraction_timeout_secs)
        }
    };

    VerificationResult::rejected(VerificationReason::ExifError(failure.to_string()))
}
