use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{
    entities::{Coordinates, TollInfo},
    error::{invalid_input_error, upstream_error, Error},
    external::TollProvider,
};

#[derive(Clone)]
pub struct GoogleRoutes {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub units: Option<Value>,
    #[serde(default)]
    pub nanos: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTollInfo {
    #[serde(default)]
    pub estimated_price: Option<Vec<Money>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl RouteTollInfo {
    fn is_empty(&self) -> bool {
        self.estimated_price.is_none() && self.other.is_empty()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelAdvisory {
    #[serde(default)]
    pub toll_info: Option<RouteTollInfo>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default)]
    pub travel_advisory: Option<TravelAdvisory>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Response {
    #[serde(default)]
    routes: Vec<Route>,
}

impl GoogleRoutes {
    pub fn new(client: reqwest::Client, api_base: String, key: String) -> Self {
        Self {
            client,
            api_base,
            key,
        }
    }
}

fn waypoint(coordinates: Coordinates) -> Value {
    json!({
        "location": {
            "latLng": {
                "latitude": coordinates.lat,
                "longitude": coordinates.lng,
            }
        }
    })
}

#[async_trait]
impl TollProvider for GoogleRoutes {
    #[tracing::instrument(skip(self))]
    async fn find_tolls(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<TollInfo, Error> {
        let url = format!("https://{}/directions/v2:computeRoutes", self.api_base);

        let body = json!({
            "origin": waypoint(origin),
            "destination": waypoint(destination),
            "travelMode": "DRIVE",
            "extraComputations": ["TOLLS"],
            "regionCode": "IN",
            "computeAlternativeRoutes": true,
        });

        let res = self
            .client
            .post(url)
            .query(&[("key", self.key.as_str())])
            .header(
                "X-Goog-FieldMask",
                "routes.distanceMeters,routes.duration,routes.travelAdvisory.tollInfo",
            )
            .json(&body)
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error("toll request rejected"));
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        Ok(toll_info(&data.routes))
    }
}

// Any toll advisory on the first route means tolls, even when unpriced.
pub fn toll_info(routes: &[Route]) -> TollInfo {
    let info = routes
        .first()
        .and_then(|route| route.travel_advisory.as_ref())
        .and_then(|advisory| advisory.toll_info.as_ref())
        .filter(|info| !info.is_empty());

    match info {
        Some(info) => TollInfo {
            present: true,
            price: info
                .estimated_price
                .as_deref()
                .and_then(<[Money]>::first)
                .map_or(0.0, amount),
        },
        None => TollInfo::default(),
    }
}

/// `units` is an int64 that the API encodes as a string.
fn amount(money: &Money) -> f64 {
    let units = match &money.units {
        Some(Value::String(s)) => s.parse::<f64>().unwrap_or(0.0),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    };
    let nanos = money.nanos.unwrap_or(0) as f64 / 1e9;

    (units + nanos).max(0.0)
}

#[test]
fn reads_first_estimated_price() {
    let data: Response = serde_json::from_value(json!({
        "routes": [
            {
                "distanceMeters": 52000,
                "travelAdvisory": {
                    "tollInfo": {
                        "estimatedPrice": [
                            {"currencyCode": "INR", "units": "145", "nanos": 500000000},
                            {"currencyCode": "INR", "units": "300"}
                        ]
                    }
                }
            },
            {"travelAdvisory": {}}
        ]
    }))
    .unwrap();

    assert_eq!(
        toll_info(&data.routes),
        TollInfo {
            present: true,
            price: 145.5
        }
    );
}

#[test]
fn no_toll_advisory_means_no_tolls() {
    let data: Response = serde_json::from_value(json!({
        "routes": [{"distanceMeters": 4000, "travelAdvisory": {"tollInfo": {}}}]
    }))
    .unwrap();
    assert_eq!(toll_info(&data.routes), TollInfo::default());

    let data: Response = serde_json::from_value(json!({})).unwrap();
    assert_eq!(toll_info(&data.routes), TollInfo::default());
}

#[test]
fn unpriced_toll_advisory_still_means_tolls() {
    let data: Response = serde_json::from_value(json!({
        "routes": [{"travelAdvisory": {"tollInfo": {"estimatedPrice": []}}}]
    }))
    .unwrap();

    assert_eq!(
        toll_info(&data.routes),
        TollInfo {
            present: true,
            price: 0.0
        }
    );
}
