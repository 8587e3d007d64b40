use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl Coordinates {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(invalid_input_error("invalid origin or destination coordinates"));
        }

        if self.lat.abs() > 90.0 || self.lng.abs() > 180.0 {
            return Err(invalid_input_error(
                "invalid coordinate ranges: latitude must be between -90 and 90, longitude between -180 and 180",
            ));
        }

        Ok(())
    }

    pub fn key(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

#[test]
fn accepts_long_field_names() {
    let coordinates: Coordinates =
        serde_json::from_value(serde_json::json!({"latitude": 12.97, "longitude": 77.59})).unwrap();

    assert_eq!(coordinates, Coordinates { lat: 12.97, lng: 77.59 });
    assert_eq!(coordinates.key(), "12.97,77.59");
}

#[test]
fn rejects_out_of_range() {
    assert!(Coordinates { lat: 0.0, lng: 0.0 }.validate().is_ok());
    assert!(Coordinates { lat: 91.0, lng: 0.0 }.validate().is_err());
    assert!(Coordinates { lat: 0.0, lng: -180.5 }.validate().is_err());
    assert!(Coordinates { lat: f64::NAN, lng: 0.0 }.validate().is_err());
}
