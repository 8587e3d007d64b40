mod conditions;
mod coordinates;
mod quote;
mod rate_card;
mod trip_context;

pub use conditions::{RouteMetrics, TollInfo, Weather};
pub use coordinates::Coordinates;
pub use quote::{Conditions, Estimate, FareQuote, PriceBreakdown, RouteInfo};
pub use rate_card::{RateCardParams, Rates, VehicleRateCard};
pub use trip_context::{TimeDetection, TripContext};
