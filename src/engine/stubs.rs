use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::{Coordinates, RouteMetrics, TollInfo, Weather},
    error::{upstream_error, Error},
    external::{DirectionsProvider, Providers, TollProvider, WeatherProvider},
};

pub struct Fixed {
    pub route: Option<RouteMetrics>,
    pub weather: Option<Weather>,
    pub tolls: Option<TollInfo>,
}

#[async_trait]
impl DirectionsProvider for Fixed {
    async fn find_directions(&self, _: Coordinates, _: Coordinates) -> Result<RouteMetrics, Error> {
        self.route.clone().ok_or_else(upstream_error)
    }
}

#[async_trait]
impl WeatherProvider for Fixed {
    async fn find_weather(&self, _: Coordinates) -> Result<Weather, Error> {
        self.weather.clone().ok_or_else(upstream_error)
    }
}

#[async_trait]
impl TollProvider for Fixed {
    async fn find_tolls(&self, _: Coordinates, _: Coordinates) -> Result<TollInfo, Error> {
        self.tolls.clone().ok_or_else(upstream_error)
    }
}

impl Fixed {
    pub fn providers(self) -> Providers {
        let fixed = Arc::new(self);

        Providers {
            directions: fixed.clone(),
            weather: fixed.clone(),
            tolls: fixed,
        }
    }
}

pub fn route(distance_km: f64, duration_min: f64) -> RouteMetrics {
    RouteMetrics {
        distance_km,
        duration_min,
        traffic_duration_min: duration_min,
    }
}
