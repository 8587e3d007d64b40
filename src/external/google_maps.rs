use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{Coordinates, RouteMetrics},
    error::{invalid_input_error, upstream_error, Error},
    external::DirectionsProvider,
};

#[derive(Clone)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TextValue {
    pub value: f64,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Leg {
    pub distance: TextValue,
    pub duration: TextValue,
    #[serde(default)]
    pub duration_in_traffic: Option<TextValue>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
}

impl GoogleMaps {
    pub fn new(client: reqwest::Client, api_base: String, key: String) -> Self {
        Self {
            client,
            api_base,
            key,
        }
    }
}

#[async_trait]
impl DirectionsProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn find_directions(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteMetrics, Error> {
        let url = format!("https://{}/maps/api/directions/json", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("key", self.key.as_str())])
            .query(&[("origin", origin.key()), ("destination", destination.key())])
            .query(&[
                ("traffic_model", "best_guess"),
                ("departure_time", "now"),
                ("alternatives", "true"),
            ])
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error("directions request rejected"));
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        if data.status != "OK" {
            tracing::warn!(status = %data.status, "directions lookup failed");
            return Err(upstream_error());
        }

        route_metrics(&data.routes)
    }
}

pub fn route_metrics(routes: &[Route]) -> Result<RouteMetrics, Error> {
    let leg = routes
        .first()
        .and_then(|route| route.legs.first())
        .ok_or_else(|| {
            tracing::warn!("directions response has no route legs");
            upstream_error()
        })?;

    let duration_min = leg.duration.value / 60.0;
    let traffic_duration_min = match &leg.duration_in_traffic {
        Some(traffic) if traffic.value > 0.0 => traffic.value / 60.0,
        _ => duration_min,
    };

    Ok(RouteMetrics {
        distance_km: leg.distance.value / 1000.0,
        duration_min,
        traffic_duration_min,
    })
}

#[test]
fn converts_first_leg_to_km_and_minutes() {
    let data: Response = serde_json::from_value(serde_json::json!({
        "status": "OK",
        "routes": [
            {
                "legs": [{
                    "distance": {"text": "12.5 km", "value": 12500},
                    "duration": {"text": "30 mins", "value": 1800},
                    "duration_in_traffic": {"text": "45 mins", "value": 2700}
                }]
            },
            {
                "legs": [{
                    "distance": {"text": "20 km", "value": 20000},
                    "duration": {"text": "25 mins", "value": 1500}
                }]
            }
        ]
    }))
    .unwrap();

    let metrics = route_metrics(&data.routes).unwrap();
    assert_eq!(metrics.distance_km, 12.5);
    assert_eq!(metrics.duration_min, 30.0);
    assert_eq!(metrics.traffic_duration_min, 45.0);
}

#[test]
fn traffic_duration_defaults_to_duration() {
    let data: Response = serde_json::from_value(serde_json::json!({
        "status": "OK",
        "routes": [{"legs": [{
            "distance": {"value": 3000},
            "duration": {"value": 600}
        }]}]
    }))
    .unwrap();

    let metrics = route_metrics(&data.routes).unwrap();
    assert_eq!(metrics.traffic_duration_min, 10.0);
}

#[test]
fn missing_routes_is_upstream_error() {
    assert_eq!(route_metrics(&[]).unwrap_err().code, 4);
    assert_eq!(route_metrics(&[Route { legs: vec![] }]).unwrap_err().code, 4);
}
