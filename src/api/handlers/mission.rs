// src/api/handlers/mission.rs
use actix_multipart::Multipart;
use actix_web::{
    web::{self, Data, Form, Query},
    Either, HttpResponse, Resource,
};
use tracing::info;

use crate::{
    api::{
        multipart,
        types::{CreateMissionResponse, RequestParams},
    },
    core::mission::MissionRegistry,
    utils::{
        config::Config,
        error::Result,
        metrics::Metrics,
    },
};

// user_id never needs more than this
const PARAMS_LIMIT: usize = 4096;

pub fn resource() -> Resource {
    web::resource("/create_mission").route(web::post().to(create_mission))
}

async fn create_mission(
    registry: Data<MissionRegistry>,
    metrics: Data<Metrics>,
    config: Data<Config>,
    query: Query<RequestParams>,
    body: Option<Either<Form<RequestParams>, Multipart>>,
) -> Result<HttpResponse> {
    let params = match body {
        Some(Either::Left(form)) => form.into_inner(),
        Some(Either::Right(payload)) => {
            multipart::read_fields(payload, PARAMS_LIMIT, &["user_id"])
                .await?
                .take_params()?
        }
        None => RequestParams::default(),
    };
    let user_id = params.or(query.into_inner()).user_id()?;

    let mission = registry.create_mission(&user_id);
    metrics.record_mission_created();

    info!(mission_id = %mission.id, user_id = %user_id, "Mission issued");
    Ok(HttpResponse::Ok().json(CreateMissionResponse::new(&mission, config.mission_window_secs())))
}
