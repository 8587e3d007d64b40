use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    entities::{Coordinates, Weather},
    error::{invalid_input_error, upstream_error, Error},
    external::WeatherProvider,
};

#[derive(Clone)]
pub struct OpenWeather {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Measurements {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    main: Option<Measurements>,
    #[serde(default)]
    rain: Option<Value>,
}

impl OpenWeather {
    pub fn new(client: reqwest::Client, api_base: String, key: String) -> Self {
        Self {
            client,
            api_base,
            key,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeather {
    #[tracing::instrument(skip(self))]
    async fn find_weather(&self, location: Coordinates) -> Result<Weather, Error> {
        let url = format!("https://{}/data/2.5/weather", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("lat", location.lat), ("lon", location.lng)])
            .query(&[("appid", self.key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error("weather request rejected"));
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        Ok(weather(data))
    }
}

fn weather(data: Response) -> Weather {
    let descriptions: Vec<String> = data
        .weather
        .iter()
        .map(|c| c.description.to_lowercase())
        .collect();

    let is_raining = data.rain.is_some()
        || data.weather.iter().any(|c| c.main == "Rain")
        || descriptions.iter().any(|d| d.contains("rain"));

    Weather {
        is_raining,
        temperature: data.main.as_ref().and_then(|m| m.temp),
        humidity: data.main.as_ref().and_then(|m| m.humidity),
        descriptions,
    }
}

#[test]
fn detects_rain_from_description() {
    let data: Response = serde_json::from_value(serde_json::json!({
        "weather": [{"main": "Drizzle", "description": "Light Intensity Drizzle Rain"}],
        "main": {"temp": 24.1, "humidity": 88}
    }))
    .unwrap();

    let weather = weather(data);
    assert!(weather.is_raining);
    assert_eq!(weather.temperature, Some(24.1));
    assert_eq!(weather.humidity, Some(88.0));
}

#[test]
fn detects_rain_from_precipitation_block() {
    let data: Response = serde_json::from_value(serde_json::json!({
        "weather": [{"main": "Clouds", "description": "overcast clouds"}],
        "rain": {"1h": 0.3}
    }))
    .unwrap();

    assert!(weather(data).is_raining);
}

#[test]
fn clear_sky_is_dry() {
    let data: Response = serde_json::from_value(serde_json::json!({
        "weather": [{"main": "Clear", "description": "clear sky"}],
        "main": {"temp": 31.0}
    }))
    .unwrap();

    let weather = weather(data);
    assert!(!weather.is_raining);
    assert_eq!(weather.descriptions, vec!["clear sky".to_string()]);
}
