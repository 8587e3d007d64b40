mod cache;
pub mod google_maps;
pub mod google_routes;
pub mod open_weather;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::Config,
    entities::{Coordinates, RouteMetrics, TollInfo, Weather},
    error::Error,
};

pub use cache::{Cached, TtlCache};

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn find_directions(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteMetrics, Error>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn find_weather(&self, location: Coordinates) -> Result<Weather, Error>;
}

#[async_trait]
pub trait TollProvider: Send + Sync {
    async fn find_tolls(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<TollInfo, Error>;
}

#[derive(Clone)]
pub struct Providers {
    pub directions: Arc<dyn DirectionsProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub tolls: Arc<dyn TollProvider>,
}

impl Providers {
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::new();

        let directions = google_maps::GoogleMaps::new(
            client.clone(),
            config.google_maps_api_base.clone(),
            config.google_maps_api_key.clone(),
        );
        let tolls = google_routes::GoogleRoutes::new(
            client.clone(),
            config.google_routes_api_base.clone(),
            config.google_maps_api_key.clone(),
        );
        let weather = open_weather::OpenWeather::new(
            client,
            config.open_weather_api_base.clone(),
            config.open_weather_api_key.clone(),
        );

        Self {
            directions: Arc::new(Cached::<_, RouteMetrics>::new(
                directions,
                config.directions_ttl,
            )),
            weather: Arc::new(Cached::<_, Weather>::new(weather, config.weather_ttl)),
            tolls: Arc::new(Cached::<_, TollInfo>::new(tolls, config.tolls_ttl)),
        }
    }
}
