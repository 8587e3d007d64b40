use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use crate::error::{config_error, Error};

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub google_maps_api_base: String,
    pub google_routes_api_base: String,
    pub google_maps_api_key: String,
    pub open_weather_api_base: String,
    pub open_weather_api_key: String,
    pub default_timezone: String,
    pub directions_ttl: Duration,
    pub weather_ttl: Duration,
    pub tolls_ttl: Duration,
    pub estimate_ttl: Duration,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Ok(Self {
            addr: try_load("TARIFF_ADDR", "127.0.0.1:3000")?,
            database_url: env::var("DATABASE_URL").ok(),
            database_max_connections: try_load("DATABASE_MAX_CONNECTIONS", "5")?,
            google_maps_api_base: try_load("GOOGLE_MAPS_API_BASE", "maps.googleapis.com")?,
            google_routes_api_base: try_load("GOOGLE_ROUTES_API_BASE", "routes.googleapis.com")?,
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")?,
            open_weather_api_base: try_load("OPEN_WEATHER_API_BASE", "api.openweathermap.org")?,
            open_weather_api_key: env::var("OPEN_WEATHER_API_KEY")?,
            default_timezone: try_load("TARIFF_DEFAULT_TIMEZONE", "Asia/Kolkata")?,
            directions_ttl: Duration::from_secs(try_load("TARIFF_DIRECTIONS_TTL_SECS", "900")?),
            weather_ttl: Duration::from_secs(try_load("TARIFF_WEATHER_TTL_SECS", "600")?),
            tolls_ttl: Duration::from_secs(try_load("TARIFF_TOLLS_TTL_SECS", "900")?),
            estimate_ttl: Duration::from_secs(try_load("TARIFF_ESTIMATE_TTL_SECS", "3600")?),
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, Error>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        tracing::info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &value)
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, Error>
where
    T::Err: Display,
{
    value.parse().map_err(|e| {
        tracing::warn!("invalid {key} value: {e}");
        config_error(format!("invalid {key} value"))
    })
}

#[test]
fn parses_typed_values() {
    let addr: SocketAddr = parse("TARIFF_ADDR", "0.0.0.0:8080").unwrap();
    assert_eq!(addr.port(), 8080);

    let ttl: u64 = parse("TARIFF_WEATHER_TTL_SECS", "600").unwrap();
    assert_eq!(ttl, 600);
}

#[test]
fn rejects_malformed_values() {
    let err = parse::<u32>("DATABASE_MAX_CONNECTIONS", "five").unwrap_err();

    assert_eq!(err.code, 6);
    assert!(err.message.contains("DATABASE_MAX_CONNECTIONS"));
}
