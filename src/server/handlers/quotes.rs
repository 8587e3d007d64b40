use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use crate::api::EstimateRequest;
use crate::entities::Estimate;
use crate::error::Error;
use crate::server::DynAPI;

use super::{json_body, Body};

pub async fn create(
    Extension(api): Extension<DynAPI>,
    body: Body<EstimateRequest>,
) -> Result<Json<Estimate>, Error> {
    let estimate = api.create_estimate(json_body(body)?).await?;

    Ok(estimate.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(token): Path<Uuid>,
) -> Result<Json<Estimate>, Error> {
    let estimate = api.find_estimate(token).await?;

    Ok(estimate.into())
}
