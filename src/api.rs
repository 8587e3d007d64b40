use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, Estimate, RateCardParams, VehicleRateCard};
use crate::error::Error;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub origin: Option<Coordinates>,
    pub destination: Option<Coordinates>,
    #[serde(default)]
    pub waiting_time_in_minutes: Option<f64>,
    #[serde(default)]
    pub vehicle_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub is_night_time: Option<bool>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[async_trait]
pub trait RateCardAPI {
    async fn create_rate_card(&self, params: RateCardParams) -> Result<VehicleRateCard, Error>;
    async fn find_rate_card(&self, id: Uuid) -> Result<VehicleRateCard, Error>;
    async fn list_rate_cards(&self, active_only: bool) -> Result<Vec<VehicleRateCard>, Error>;
    async fn update_rate_card(
        &self,
        id: Uuid,
        params: RateCardParams,
    ) -> Result<VehicleRateCard, Error>;
    async fn set_rate_card_status(&self, id: Uuid, active: bool)
        -> Result<VehicleRateCard, Error>;
}

#[async_trait]
pub trait QuoteAPI {
    async fn create_estimate(&self, request: EstimateRequest) -> Result<Estimate, Error>;
    async fn find_estimate(&self, token: Uuid) -> Result<Estimate, Error>;
}

pub trait API: RateCardAPI + QuoteAPI {}
