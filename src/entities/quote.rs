use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{TimeDetection, TripContext};
use crate::pricing::round2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub rain: bool,
    pub tolls: bool,
    pub is_night_time: bool,
    pub time_detection: TimeDetection,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_fare: f64,
    pub distance_cost: f64,
    pub time_cost: f64,
    pub waiting_time_cost: f64,
    pub night_surcharge: f64,
    pub fuel_surcharge: f64,
    pub toll_cost: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    pub vehicle_id: Uuid,
    pub vehicle_name: String,
    pub vehicle_type: Option<String>,
    pub vehicle_image: Option<String>,
    pub total_price: f64,
    pub distance_in_km: f64,
    pub duration_in_minutes: f64,
    pub pricing: PriceBreakdown,
    pub conditions: Conditions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub distance_in_km: f64,
    pub duration_in_minutes: f64,
    pub conditions: Conditions,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
    pub route_info: RouteInfo,
    pub vehicle_prices: Vec<FareQuote>,
}

impl Conditions {
    pub fn of(trip: &TripContext) -> Self {
        Self {
            rain: trip.rain,
            tolls: trip.tolls,
            is_night_time: trip.is_night_time,
            time_detection: trip.time_detection,
        }
    }
}

impl RouteInfo {
    pub fn of(trip: &TripContext) -> Self {
        Self {
            distance_in_km: round2(trip.distance_km),
            duration_in_minutes: round2(trip.traffic_duration_min),
            conditions: Conditions::of(trip),
        }
    }
}

impl Estimate {
    pub fn new(trip: &TripContext, vehicle_prices: Vec<FareQuote>) -> Self {
        Self {
            token: Uuid::new_v4(),
            created_at: Utc::now(),
            route_info: RouteInfo::of(trip),
            vehicle_prices,
        }
    }
}
