use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{RateCardParams, VehicleRateCard};
use crate::error::Error;
use crate::server::DynAPI;

use super::{json_body, Body};

#[derive(Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    active: bool,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    body: Body<RateCardParams>,
) -> Result<Json<VehicleRateCard>, Error> {
    let card = api.create_rate_card(json_body(body)?).await?;

    Ok(card.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<VehicleRateCard>>, Error> {
    let cards = api.list_rate_cards(params.active).await?;

    Ok(cards.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleRateCard>, Error> {
    let card = api.find_rate_card(id).await?;

    Ok(card.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    body: Body<RateCardParams>,
) -> Result<Json<VehicleRateCard>, Error> {
    let card = api.update_rate_card(id, json_body(body)?).await?;

    Ok(card.into())
}

pub async fn activate(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleRateCard>, Error> {
    let card = api.set_rate_card_status(id, true).await?;

    Ok(card.into())
}

pub async fn deactivate(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleRateCard>, Error> {
    let card = api.set_rate_card_status(id, false).await?;

    Ok(card.into())
}
