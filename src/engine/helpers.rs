use crate::{
    api::EstimateRequest,
    entities::{Coordinates, RouteMetrics, TollInfo, Weather},
    error::{invalid_input_error, route_unavailable_error, Error},
    external::Providers,
};

#[derive(Debug)]
pub struct ValidRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub waiting_time_min: f64,
}

pub fn validate_request(request: &EstimateRequest) -> Result<ValidRequest, Error> {
    let (origin, destination) = match (request.origin, request.destination) {
        (Some(origin), Some(destination)) => (origin, destination),
        _ => return Err(invalid_input_error("invalid origin or destination coordinates")),
    };

    origin.validate()?;
    destination.validate()?;

    let waiting_time_min = request.waiting_time_in_minutes.unwrap_or(0.0);
    if !waiting_time_min.is_finite() || waiting_time_min < 0.0 {
        return Err(invalid_input_error("waiting time must be zero or positive"));
    }

    Ok(ValidRequest {
        origin,
        destination,
        waiting_time_min,
    })
}

#[tracing::instrument(skip(providers))]
pub async fn gather_conditions(
    providers: &Providers,
    origin: Coordinates,
    destination: Coordinates,
) -> Result<(RouteMetrics, Weather, TollInfo), Error> {
    let (directions, weather, tolls) = futures::join!(
        providers.directions.find_directions(origin, destination),
        providers.weather.find_weather(origin),
        providers.tolls.find_tolls(origin, destination),
    );

    let route = directions.map_err(|err| {
        tracing::error!(%err, "directions fetch failed");
        route_unavailable_error()
    })?;

    let weather = weather.unwrap_or_else(|err| {
        tracing::warn!(%err, "weather fetch failed, assuming no rain");
        Weather::default()
    });

    let tolls = tolls.unwrap_or_else(|err| {
        tracing::warn!(%err, "tolls fetch failed, assuming no tolls");
        TollInfo::default()
    });

    Ok((route, weather, tolls))
}

#[test]
fn requires_both_endpoints() {
    let request = EstimateRequest {
        origin: Some(Coordinates { lat: 12.9, lng: 77.6 }),
        ..Default::default()
    };

    assert_eq!(validate_request(&request).unwrap_err().code, 101);
}

#[test]
fn rejects_negative_waiting_time() {
    let point = Coordinates { lat: 12.9, lng: 77.6 };
    let mut request = EstimateRequest {
        origin: Some(point),
        destination: Some(point),
        waiting_time_in_minutes: Some(-3.0),
        ..Default::default()
    };

    assert!(validate_request(&request).is_err());

    request.waiting_time_in_minutes = None;
    assert_eq!(validate_request(&request).unwrap().waiting_time_min, 0.0);
}

#[test]
fn rejects_out_of_range_destination() {
    let request = EstimateRequest {
        origin: Some(Coordinates { lat: 12.9, lng: 77.6 }),
        destination: Some(Coordinates { lat: 12.9, lng: 277.6 }),
        ..Default::default()
    };

    assert_eq!(validate_request(&request).unwrap_err().code, 101);
}
