use crate::{
    entities::{Conditions, FareQuote, PriceBreakdown, Rates, TripContext, VehicleRateCard},
    error::{invalid_trip_geometry_error, no_eligible_vehicles_error, Error},
    pricing::round2,
};

// Ceiling for any single component and for the total.
const MAX_FARE: f64 = 1e12;

#[derive(Debug)]
struct Components {
    base_fare: f64,
    distance_cost: f64,
    time_cost: f64,
    waiting_cost: f64,
    night_surcharge: f64,
    fuel_surcharge: f64,
    toll_cost: f64,
}

impl Components {
    fn compute(trip: &TripContext, rates: &Rates) -> Self {
        let chargeable_distance = (trip.distance_km - rates.base_km).max(0.0);
        let distance_cost = chargeable_distance * rates.per_km;

        let night_surcharge = match trip.is_night_time {
            true => (rates.base_fare + distance_cost) * rates.night_percent / 100.0,
            false => 0.0,
        };

        let toll_cost = match trip.tolls && rates.toll_extra {
            true => trip.toll_price,
            false => 0.0,
        };

        Self {
            base_fare: rates.base_fare,
            distance_cost,
            time_cost: trip.traffic_duration_min * rates.per_min,
            waiting_cost: trip.waiting_time_min * rates.waiting_charge_per_min,
            night_surcharge,
            fuel_surcharge: trip.distance_km * rates.fuel_surcharge_per_km,
            toll_cost,
        }
        .clamped()
    }

    fn clamped(self) -> Self {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, MAX_FARE) };

        Self {
            base_fare: clamp(self.base_fare),
            distance_cost: clamp(self.distance_cost),
            time_cost: clamp(self.time_cost),
            waiting_cost: clamp(self.waiting_cost),
            night_surcharge: clamp(self.night_surcharge),
            fuel_surcharge: clamp(self.fuel_surcharge),
            toll_cost: clamp(self.toll_cost),
        }
    }

    fn total(&self) -> f64 {
        self.base_fare
            + self.distance_cost
            + self.time_cost
            + self.waiting_cost
            + self.night_surcharge
            + self.fuel_surcharge
            + self.toll_cost
    }

    fn breakdown(&self) -> PriceBreakdown {
        PriceBreakdown {
            base_fare: round2(self.base_fare),
            distance_cost: round2(self.distance_cost),
            time_cost: round2(self.time_cost),
            waiting_time_cost: round2(self.waiting_cost),
            night_surcharge: round2(self.night_surcharge),
            fuel_surcharge: round2(self.fuel_surcharge),
            toll_cost: round2(self.toll_cost),
        }
    }
}

pub fn validate_geometry(distance_km: f64, duration_min: f64) -> Result<(), Error> {
    let positive = |v: f64| v.is_finite() && v > 0.0;

    if !positive(distance_km) || !positive(duration_min) {
        return Err(invalid_trip_geometry_error());
    }

    Ok(())
}

pub fn quote(trip: &TripContext, card: &VehicleRateCard) -> FareQuote {
    let rates = card.rates();
    let components = Components::compute(trip, &rates);
    let total_price = components.total().max(rates.min_fare).min(MAX_FARE);

    FareQuote {
        vehicle_id: card.id,
        vehicle_name: card.params.name.clone(),
        vehicle_type: card.params.vehicle_type.clone(),
        vehicle_image: card.params.image_url.clone(),
        total_price: round2(total_price),
        distance_in_km: round2(trip.distance_km),
        duration_in_minutes: round2(trip.traffic_duration_min),
        pricing: components.breakdown(),
        conditions: Conditions::of(trip),
        missing_fields: card.missing_fields().into_iter().map(String::from).collect(),
    }
}

/// Prices every card and orders the quotes cheapest first. Cards with equal
/// totals keep their input order.
#[tracing::instrument(skip_all, fields(vehicles = cards.len()))]
pub fn estimate(trip: &TripContext, cards: &[VehicleRateCard]) -> Result<Vec<FareQuote>, Error> {
    validate_geometry(trip.distance_km, trip.traffic_duration_min)?;

    if cards.is_empty() {
        return Err(no_eligible_vehicles_error("no active vehicles found"));
    }

    let mut quotes: Vec<FareQuote> = cards
        .iter()
        .map(|card| {
            let missing = card.missing_fields();
            if !missing.is_empty() {
                tracing::warn!(
                    vehicle_id = %card.id,
                    ?missing,
                    "vehicle has incomplete pricing data, missing rates count as 0"
                );
            }

            quote(trip, card)
        })
        .collect();

    quotes.sort_by(|a, b| a.total_price.total_cmp(&b.total_price));

    Ok(quotes)
}
