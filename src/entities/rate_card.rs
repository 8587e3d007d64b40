use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRateCard {
    pub id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub params: RateCardParams,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCardParams {
    pub name: String,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub base_fare: Option<f64>,
    #[serde(default, rename = "baseKM")]
    pub base_km: Option<f64>,
    #[serde(default, rename = "perKM")]
    pub per_km: Option<f64>,
    #[serde(default)]
    pub per_min: Option<f64>,
    #[serde(default)]
    pub night_percent: Option<f64>,
    #[serde(default)]
    pub min_fare: Option<f64>,
    #[serde(default)]
    pub waiting_charge_per_min: Option<f64>,
    #[serde(default, rename = "fuelSurchargePerKM")]
    pub fuel_surcharge_per_km: Option<f64>,
    #[serde(default)]
    pub toll_extra: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rates {
    pub base_fare: f64,
    pub base_km: f64,
    pub per_km: f64,
    pub per_min: f64,
    pub night_percent: f64,
    pub min_fare: f64,
    pub waiting_charge_per_min: f64,
    pub fuel_surcharge_per_km: f64,
    pub toll_extra: bool,
}

impl VehicleRateCard {
    pub fn new(params: RateCardParams) -> Self {
        Self {
            id: Uuid::new_v4(),
            active: false,
            created_at: Utc::now(),
            params,
        }
    }

    pub fn rates(&self) -> Rates {
        self.params.rates()
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.params.missing_fields()
    }
}

impl RateCardParams {
    fn numeric_fields(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("baseFare", self.base_fare),
            ("baseKM", self.base_km),
            ("perKM", self.per_km),
            ("perMin", self.per_min),
            ("nightPercent", self.night_percent),
            ("minFare", self.min_fare),
            ("waitingChargePerMin", self.waiting_charge_per_min),
            ("fuelSurchargePerKM", self.fuel_surcharge_per_km),
        ]
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.numeric_fields()
            .into_iter()
            .filter(|(_, value)| !value.map_or(false, f64::is_finite))
            .map(|(name, _)| name)
            .collect()
    }

    pub fn out_of_range_field(&self, max: f64) -> Option<&'static str> {
        self.numeric_fields()
            .into_iter()
            .find(|(_, value)| value.map_or(false, |v| !v.is_finite() || v > max))
            .map(|(name, _)| name)
    }

    pub fn rates(&self) -> Rates {
        Rates {
            base_fare: non_negative(self.base_fare),
            base_km: non_negative(self.base_km),
            per_km: non_negative(self.per_km),
            per_min: non_negative(self.per_min),
            night_percent: non_negative(self.night_percent),
            min_fare: non_negative(self.min_fare),
            waiting_charge_per_min: non_negative(self.waiting_charge_per_min),
            fuel_surcharge_per_km: non_negative(self.fuel_surcharge_per_km),
            toll_extra: self.toll_extra,
        }
    }
}

fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

#[test]
fn missing_and_negative_rates_resolve_to_zero() {
    let params = RateCardParams {
        name: "Auto".into(),
        base_fare: Some(30.0),
        per_km: Some(-4.0),
        per_min: Some(f64::NAN),
        ..Default::default()
    };

    let rates = params.rates();
    assert_eq!(rates.base_fare, 30.0);
    assert_eq!(rates.per_km, 0.0);
    assert_eq!(rates.per_min, 0.0);
    assert_eq!(rates.min_fare, 0.0);

    let missing = params.missing_fields();
    assert!(missing.contains(&"perMin"));
    assert!(missing.contains(&"minFare"));
    assert!(!missing.contains(&"baseFare"));
    assert!(!missing.contains(&"perKM"));
}

#[test]
fn flags_rates_out_of_range() {
    let mut params = RateCardParams {
        name: "Auto".into(),
        base_fare: Some(30.0),
        per_km: Some(-4.0),
        ..Default::default()
    };
    assert_eq!(params.out_of_range_field(1e6), None);

    params.per_min = Some(2e6);
    assert_eq!(params.out_of_range_field(1e6), Some("perMin"));

    params.per_min = Some(f64::NAN);
    assert_eq!(params.out_of_range_field(1e6), Some("perMin"));
}

#[test]
fn deserializes_original_field_names() {
    let params: RateCardParams = serde_json::from_value(serde_json::json!({
        "name": "Mini",
        "vehicleType": "Car",
        "baseFare": 50,
        "baseKM": 2,
        "perKM": 10,
        "perMin": 1,
        "nightPercent": 15,
        "minFare": 60,
        "waitingChargePerMin": 2,
        "fuelSurchargePerKM": 0.5,
        "tollExtra": true
    }))
    .unwrap();

    assert!(params.missing_fields().is_empty());
    assert_eq!(params.base_km, Some(2.0));
    assert_eq!(params.fuel_surcharge_per_km, Some(0.5));
    assert!(params.toll_extra);
}
