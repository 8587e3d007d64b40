use super::{helpers, Engine};

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::{EstimateRequest, QuoteAPI},
    db::RateCardFilter,
    entities::{Estimate, TripContext},
    error::{no_eligible_vehicles_error, not_found_error, Error},
    pricing,
};

#[async_trait]
impl QuoteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_estimate(&self, request: EstimateRequest) -> Result<Estimate, Error> {
        let started = Instant::now();

        let valid = helpers::validate_request(&request)?;

        let timezone = request
            .timezone
            .as_deref()
            .unwrap_or(&self.default_timezone);
        let (is_night_time, time_detection) =
            pricing::resolve_night_time(request.is_night_time, timezone, Utc::now());

        let filter = RateCardFilter::active(request.vehicle_ids);
        let for_specific_ids = filter.ids.is_some();

        let cards = self.store.list_rate_cards(filter).await?;

        if cards.is_empty() {
            return Err(no_eligible_vehicles_error(match for_specific_ids {
                true => "no active vehicles found for the specified vehicle ids",
                false => "no active vehicles found",
            }));
        }

        let (route, weather, tolls) =
            helpers::gather_conditions(&self.providers, valid.origin, valid.destination).await?;

        pricing::validate_geometry(route.distance_km, route.duration_min)?;

        let trip = TripContext::new(
            valid.origin,
            valid.destination,
            route,
            &weather,
            &tolls,
            valid.waiting_time_min,
            is_night_time,
            time_detection,
        );

        let quotes = pricing::estimate(&trip, &cards)?;
        let estimate = Estimate::new(&trip, quotes);

        self.store.insert_estimate(&estimate).await?;

        tracing::info!(
            token = %estimate.token,
            distance_km = trip.distance_km,
            duration_min = trip.duration_min,
            traffic_duration_min = trip.traffic_duration_min,
            rain = trip.rain,
            tolls = trip.tolls,
            toll_price = trip.toll_price,
            is_night_time = trip.is_night_time,
            ?time_detection,
            vehicles = cards.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fares calculated"
        );

        Ok(estimate)
    }

    #[tracing::instrument(skip(self))]
    async fn find_estimate(&self, token: Uuid) -> Result<Estimate, Error> {
        self.store
            .find_estimate(token)
            .await?
            .ok_or_else(not_found_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RateCardAPI;
    use crate::db::MemoryStore;
    use crate::engine::stubs::{route, Fixed};
    use crate::entities::{Coordinates, RateCardParams, TimeDetection, TollInfo, Weather};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::block_on;

    const ORIGIN: Coordinates = Coordinates { lat: 12.9716, lng: 77.5946 };
    const DESTINATION: Coordinates = Coordinates { lat: 13.1986, lng: 77.7066 };

    fn engine_keeping(providers: Fixed, estimate_ttl: Duration) -> Engine {
        Engine::new(
            Arc::new(MemoryStore::new(estimate_ttl)),
            providers.providers(),
            "Asia/Kolkata".into(),
        )
    }

    fn engine(providers: Fixed) -> Engine {
        engine_keeping(providers, Duration::from_secs(600))
    }

    fn all_up() -> Fixed {
        Fixed {
            route: Some(route(5.0, 10.0)),
            weather: Some(Weather {
                is_raining: true,
                ..Default::default()
            }),
            tolls: Some(TollInfo {
                present: true,
                price: 45.0,
            }),
        }
    }

    fn request() -> EstimateRequest {
        EstimateRequest {
            origin: Some(ORIGIN),
            destination: Some(DESTINATION),
            is_night_time: Some(false),
            ..Default::default()
        }
    }

    fn add_card(engine: &Engine, name: &str, min_fare: f64, toll_extra: bool) -> Uuid {
        let params = RateCardParams {
            name: name.into(),
            base_fare: Some(50.0),
            base_km: Some(2.0),
            per_km: Some(10.0),
            per_min: Some(1.0),
            night_percent: Some(0.0),
            min_fare: Some(min_fare),
            waiting_charge_per_min: Some(0.0),
            fuel_surcharge_per_km: Some(0.0),
            toll_extra,
            ..Default::default()
        };

        let card = block_on(engine.create_rate_card(params)).unwrap();
        block_on(engine.set_rate_card_status(card.id, true)).unwrap();
        card.id
    }

    #[test]
    fn prices_active_vehicles_cheapest_first() {
        let engine = engine(all_up());
        add_card(&engine, "Toll Sedan", 60.0, true);
        add_card(&engine, "Sedan", 60.0, false);
        let inactive = block_on(engine.create_rate_card(RateCardParams {
            name: "Parked".into(),
            ..Default::default()
        }))
        .unwrap();

        let estimate = block_on(engine.create_estimate(request())).unwrap();

        assert_eq!(estimate.route_info.distance_in_km, 5.0);
        assert_eq!(estimate.route_info.duration_in_minutes, 10.0);
        assert!(estimate.route_info.conditions.rain);
        assert!(estimate.route_info.conditions.tolls);
        assert_eq!(
            estimate.route_info.conditions.time_detection,
            TimeDetection::Manual
        );

        let names: Vec<&str> = estimate
            .vehicle_prices
            .iter()
            .map(|q| q.vehicle_name.as_str())
            .collect();
        assert_eq!(names, vec!["Sedan", "Toll Sedan"]);
        assert_eq!(estimate.vehicle_prices[0].total_price, 90.0);
        assert_eq!(estimate.vehicle_prices[1].total_price, 135.0);
        assert!(estimate
            .vehicle_prices
            .iter()
            .all(|q| q.vehicle_id != inactive.id));

        let found = block_on(engine.find_estimate(estimate.token)).unwrap();
        assert_eq!(found, estimate);
    }

    #[test]
    fn restricts_to_requested_vehicle_ids() {
        let engine = engine(all_up());
        add_card(&engine, "Sedan", 60.0, false);
        let suv = add_card(&engine, "SUV", 150.0, false);

        let estimate = block_on(engine.create_estimate(EstimateRequest {
            vehicle_ids: Some(vec![suv]),
            ..request()
        }))
        .unwrap();

        assert_eq!(estimate.vehicle_prices.len(), 1);
        assert_eq!(estimate.vehicle_prices[0].vehicle_id, suv);
        assert_eq!(estimate.vehicle_prices[0].total_price, 150.0);
    }

    #[test]
    fn no_active_vehicles_is_an_error() {
        let engine = engine(all_up());

        let err = block_on(engine.create_estimate(request())).unwrap_err();
        assert_eq!(err.code, 103);
        assert_eq!(err.message, "no active vehicles found");

        add_card(&engine, "Sedan", 60.0, false);
        let err = block_on(engine.create_estimate(EstimateRequest {
            vehicle_ids: Some(vec![Uuid::new_v4()]),
            ..request()
        }))
        .unwrap_err();
        assert_eq!(err.code, 103);
    }

    #[test]
    fn weather_and_toll_failures_degrade() {
        let engine = engine(Fixed {
            route: Some(route(5.0, 10.0)),
            weather: None,
            tolls: None,
        });
        add_card(&engine, "Toll Sedan", 60.0, true);

        let estimate = block_on(engine.create_estimate(request())).unwrap();

        assert!(!estimate.route_info.conditions.rain);
        assert!(!estimate.route_info.conditions.tolls);
        assert_eq!(estimate.vehicle_prices[0].pricing.toll_cost, 0.0);
        assert_eq!(estimate.vehicle_prices[0].total_price, 90.0);
    }

    #[test]
    fn directions_failure_is_fatal() {
        let engine = engine(Fixed {
            route: None,
            ..all_up()
        });
        add_card(&engine, "Sedan", 60.0, false);

        let err = block_on(engine.create_estimate(request())).unwrap_err();
        assert_eq!(err.code, 105);
    }

    #[test]
    fn zero_length_route_is_rejected() {
        let engine = engine(Fixed {
            route: Some(route(0.0, 10.0)),
            ..all_up()
        });
        add_card(&engine, "Sedan", 60.0, false);

        let err = block_on(engine.create_estimate(request())).unwrap_err();
        assert_eq!(err.code, 104);
    }

    #[test]
    fn auto_detects_night_time_when_not_given() {
        let engine = engine(all_up());
        add_card(&engine, "Sedan", 60.0, false);

        let estimate = block_on(engine.create_estimate(EstimateRequest {
            is_night_time: None,
            timezone: Some("Asia/Kolkata".into()),
            ..request()
        }))
        .unwrap();

        assert_eq!(
            estimate.route_info.conditions.time_detection,
            TimeDetection::AutoDetected
        );
    }

    #[test]
    fn unknown_estimate_token() {
        let engine = engine(all_up());

        let err = block_on(engine.find_estimate(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.code, 102);
    }

    #[test]
    fn expired_estimates_are_not_found() {
        let engine = engine_keeping(all_up(), Duration::ZERO);
        add_card(&engine, "Sedan", 60.0, false);

        let estimate = block_on(engine.create_estimate(request())).unwrap();

        let err = block_on(engine.find_estimate(estimate.token)).unwrap_err();
        assert_eq!(err.code, 102);
    }
}
