mod fare;
mod night;

pub use fare::{estimate, quote, validate_geometry};
pub use night::{is_night_hour, is_night_time_at, resolve_night_time};

pub fn round2(value: f64) -> f64 {
    // past 1e15 an f64 has no hundredths left to round
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }

    (value * 100.0).round() / 100.0
}

#[test]
fn round2_rounds_half_up() {
    assert_eq!(round2(1.005_000_1), 1.01);
    assert_eq!(round2(12.344), 12.34);
    assert_eq!(round2(0.125), 0.13);
    assert_eq!(round2(90.0), 90.0);
    assert_eq!(round2(1e300), 1e300);
    assert_eq!(round2(1e12 + 0.004), 1e12);
}
