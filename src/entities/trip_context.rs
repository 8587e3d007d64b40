use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, RouteMetrics, TollInfo, Weather};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeDetection {
    Manual,
    AutoDetected,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TripContext {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub distance_km: f64,
    pub duration_min: f64,
    pub traffic_duration_min: f64,
    pub waiting_time_min: f64,
    pub rain: bool,
    pub tolls: bool,
    pub toll_price: f64,
    pub is_night_time: bool,
    pub time_detection: TimeDetection,
}

impl TripContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin: Coordinates,
        destination: Coordinates,
        route: RouteMetrics,
        weather: &Weather,
        tolls: &TollInfo,
        waiting_time_min: f64,
        is_night_time: bool,
        time_detection: TimeDetection,
    ) -> Self {
        Self {
            origin,
            destination,
            distance_km: route.distance_km,
            duration_min: route.duration_min,
            traffic_duration_min: route.traffic_duration_min,
            waiting_time_min,
            rain: weather.is_raining,
            tolls: tolls.present,
            toll_price: if tolls.present { tolls.price } else { 0.0 },
            is_night_time,
            time_detection,
        }
    }
}
