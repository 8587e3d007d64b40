use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RateCardFilter, Store};
use crate::{
    entities::{Estimate, RateCardParams, VehicleRateCard},
    error::{invalid_input_error, Error},
    external::TtlCache,
};

pub struct MemoryStore {
    rate_cards: RwLock<Vec<VehicleRateCard>>,
    estimates: TtlCache<Estimate>,
}

impl MemoryStore {
    pub fn new(estimate_ttl: Duration) -> Self {
        Self {
            rate_cards: RwLock::new(vec![]),
            estimates: TtlCache::new(estimate_ttl),
        }
    }

    async fn modify_rate_card(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut VehicleRateCard) + Send,
    ) -> Option<VehicleRateCard> {
        let mut rate_cards = self.rate_cards.write().await;

        let card = rate_cards.iter_mut().find(|c| c.id == id)?;
        change(card);

        Some(card.clone())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_rate_card(&self, card: &VehicleRateCard) -> Result<(), Error> {
        let mut rate_cards = self.rate_cards.write().await;

        if rate_cards.iter().any(|c| c.id == card.id) {
            return Err(invalid_input_error("duplicate rate card id"));
        }

        rate_cards.push(card.clone());
        Ok(())
    }

    async fn update_rate_card_params(
        &self,
        id: Uuid,
        params: &RateCardParams,
    ) -> Result<Option<VehicleRateCard>, Error> {
        let params = params.clone();

        Ok(self.modify_rate_card(id, |card| card.params = params).await)
    }

    async fn set_rate_card_status(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<Option<VehicleRateCard>, Error> {
        Ok(self.modify_rate_card(id, |card| card.active = active).await)
    }

    async fn find_rate_card(&self, id: Uuid) -> Result<Option<VehicleRateCard>, Error> {
        let rate_cards = self.rate_cards.read().await;

        Ok(rate_cards.iter().find(|c| c.id == id).cloned())
    }

    async fn list_rate_cards(&self, filter: RateCardFilter) -> Result<Vec<VehicleRateCard>, Error> {
        let rate_cards = self.rate_cards.read().await;

        Ok(rate_cards
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn insert_estimate(&self, estimate: &Estimate) -> Result<(), Error> {
        self.estimates
            .insert(estimate.token.to_string(), estimate.clone())
            .await;

        Ok(())
    }

    async fn find_estimate(&self, token: Uuid) -> Result<Option<Estimate>, Error> {
        Ok(self.estimates.get(&token.to_string()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Coordinates, RouteMetrics, TimeDetection, TollInfo, TripContext, Weather};
    use tokio_test::block_on;

    fn estimate() -> Estimate {
        let point = Coordinates { lat: 28.61, lng: 77.2 };
        let trip = TripContext::new(
            point,
            point,
            RouteMetrics {
                distance_km: 3.0,
                duration_min: 9.0,
                traffic_duration_min: 9.0,
            },
            &Weather::default(),
            &TollInfo::default(),
            0.0,
            false,
            TimeDetection::Manual,
        );

        Estimate::new(&trip, vec![])
    }

    #[test]
    fn lists_in_insertion_order() {
        let store = MemoryStore::new(Duration::from_secs(60));

        let mut cards = vec![];
        for name in ["Bike", "Auto", "Mini"] {
            let mut card = VehicleRateCard::new(RateCardParams {
                name: name.into(),
                ..Default::default()
            });
            card.active = name != "Auto";
            block_on(store.insert_rate_card(&card)).unwrap();
            cards.push(card);
        }

        let all = block_on(store.list_rate_cards(RateCardFilter::default())).unwrap();
        assert_eq!(all, cards);

        let active = block_on(store.list_rate_cards(RateCardFilter::active(None))).unwrap();
        let names: Vec<&str> = active.iter().map(|c| c.params.name.as_str()).collect();
        assert_eq!(names, vec!["Bike", "Mini"]);

        assert!(block_on(store.insert_rate_card(&cards[0])).is_err());
    }

    #[test]
    fn updates_touch_one_field() {
        let store = MemoryStore::new(Duration::from_secs(60));
        let card = VehicleRateCard::new(RateCardParams {
            name: "Mini".into(),
            ..Default::default()
        });
        block_on(store.insert_rate_card(&card)).unwrap();

        let active = block_on(store.set_rate_card_status(card.id, true))
            .unwrap()
            .unwrap();
        assert!(active.active);

        let renamed = RateCardParams {
            name: "Mini XL".into(),
            ..Default::default()
        };
        let updated = block_on(store.update_rate_card_params(card.id, &renamed))
            .unwrap()
            .unwrap();
        assert!(updated.active);
        assert_eq!(updated.params, renamed);
        assert_eq!(updated.created_at, card.created_at);

        assert!(block_on(store.set_rate_card_status(Uuid::new_v4(), true))
            .unwrap()
            .is_none());
    }

    #[test]
    fn keeps_estimates_until_they_expire() {
        let store = MemoryStore::new(Duration::from_secs(60));
        let kept = estimate();
        block_on(store.insert_estimate(&kept)).unwrap();
        assert_eq!(block_on(store.find_estimate(kept.token)).unwrap(), Some(kept));

        let store = MemoryStore::new(Duration::ZERO);
        let expired = estimate();
        block_on(store.insert_estimate(&expired)).unwrap();
        assert_eq!(block_on(store.find_estimate(expired.token)).unwrap(), None);

        block_on(store.insert_estimate(&estimate())).unwrap();
        assert_eq!(block_on(store.estimates.len()), 1);
    }
}
