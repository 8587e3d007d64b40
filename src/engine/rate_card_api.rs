use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::RateCardAPI,
    db::RateCardFilter,
    entities::{RateCardParams, VehicleRateCard},
    error::{invalid_input_error, not_found_error, Error},
};

const MAX_RATE: f64 = 1_000_000.0;

fn check_params(params: &RateCardParams) -> Result<(), Error> {
    if params.name.trim().is_empty() {
        return Err(invalid_input_error("rate card name is required"));
    }

    if let Some(field) = params.out_of_range_field(MAX_RATE) {
        return Err(invalid_input_error(format!(
            "{field} must be a finite number not above {MAX_RATE}"
        )));
    }

    let missing = params.missing_fields();
    if !missing.is_empty() {
        tracing::warn!(
            name = %params.name,
            ?missing,
            "rate card saved with missing rates, they will be priced as 0"
        );
    }

    Ok(())
}

#[async_trait]
impl RateCardAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_rate_card(&self, params: RateCardParams) -> Result<VehicleRateCard, Error> {
        check_params(&params)?;

        let card = VehicleRateCard::new(params);
        self.store.insert_rate_card(&card).await?;

        Ok(card)
    }

    #[tracing::instrument(skip(self))]
    async fn find_rate_card(&self, id: Uuid) -> Result<VehicleRateCard, Error> {
        self.store
            .find_rate_card(id)
            .await?
            .ok_or_else(not_found_error)
    }

    #[tracing::instrument(skip(self))]
    async fn list_rate_cards(&self, active_only: bool) -> Result<Vec<VehicleRateCard>, Error> {
        let filter = RateCardFilter {
            active_only,
            ids: None,
        };

        self.store.list_rate_cards(filter).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_rate_card(
        &self,
        id: Uuid,
        params: RateCardParams,
    ) -> Result<VehicleRateCard, Error> {
        check_params(&params)?;

        self.store
            .update_rate_card_params(id, &params)
            .await?
            .ok_or_else(not_found_error)
    }

    #[tracing::instrument(skip(self))]
    async fn set_rate_card_status(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<VehicleRateCard, Error> {
        let card = self
            .store
            .set_rate_card_status(id, active)
            .await?
            .ok_or_else(not_found_error)?;

        tracing::info!(id = %card.id, active, "rate card status set");

        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, Store};
    use crate::engine::stubs::Fixed;
    use crate::entities::Estimate;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::block_on;

    fn engine_with(store: Arc<dyn Store>) -> Engine {
        let providers = Fixed {
            route: None,
            weather: None,
            tolls: None,
        }
        .providers();

        Engine::new(store, providers, "Asia/Kolkata".into())
    }

    fn engine() -> Engine {
        engine_with(Arc::new(MemoryStore::new(Duration::from_secs(60))))
    }

    // Holds parameter writes back so a status change lands in between.
    struct SlowParams(MemoryStore);

    #[async_trait]
    impl Store for SlowParams {
        async fn insert_rate_card(&self, card: &VehicleRateCard) -> Result<(), Error> {
            self.0.insert_rate_card(card).await
        }

        async fn update_rate_card_params(
            &self,
            id: Uuid,
            params: &RateCardParams,
        ) -> Result<Option<VehicleRateCard>, Error> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.0.update_rate_card_params(id, params).await
        }

        async fn set_rate_card_status(
            &self,
            id: Uuid,
            active: bool,
        ) -> Result<Option<VehicleRateCard>, Error> {
            self.0.set_rate_card_status(id, active).await
        }

        async fn find_rate_card(&self, id: Uuid) -> Result<Option<VehicleRateCard>, Error> {
            self.0.find_rate_card(id).await
        }

        async fn list_rate_cards(
            &self,
            filter: RateCardFilter,
        ) -> Result<Vec<VehicleRateCard>, Error> {
            self.0.list_rate_cards(filter).await
        }

        async fn insert_estimate(&self, estimate: &Estimate) -> Result<(), Error> {
            self.0.insert_estimate(estimate).await
        }

        async fn find_estimate(&self, token: Uuid) -> Result<Option<Estimate>, Error> {
            self.0.find_estimate(token).await
        }
    }

    fn params(name: &str) -> RateCardParams {
        RateCardParams {
            name: name.into(),
            base_fare: Some(40.0),
            per_km: Some(12.0),
            ..Default::default()
        }
    }

    #[test]
    fn new_cards_start_inactive() {
        let engine = engine();

        let card = block_on(engine.create_rate_card(params("Mini"))).unwrap();
        assert!(!card.active);

        let found = block_on(engine.find_rate_card(card.id)).unwrap();
        assert_eq!(found, card);

        assert!(block_on(engine.list_rate_cards(true)).unwrap().is_empty());
        assert_eq!(block_on(engine.list_rate_cards(false)).unwrap().len(), 1);
    }

    #[test]
    fn activate_and_deactivate() {
        let engine = engine();
        let card = block_on(engine.create_rate_card(params("Auto"))).unwrap();

        let card = block_on(engine.set_rate_card_status(card.id, true)).unwrap();
        assert!(card.active);
        assert_eq!(block_on(engine.list_rate_cards(true)).unwrap(), vec![card.clone()]);

        let card = block_on(engine.set_rate_card_status(card.id, false)).unwrap();
        assert!(!card.active);
        assert!(block_on(engine.list_rate_cards(true)).unwrap().is_empty());
    }

    #[test]
    fn update_replaces_params_and_keeps_status() {
        let engine = engine();
        let card = block_on(engine.create_rate_card(params("Bike"))).unwrap();
        block_on(engine.set_rate_card_status(card.id, true)).unwrap();

        let mut changed = params("Bike XL");
        changed.min_fare = Some(35.0);

        let updated = block_on(engine.update_rate_card(card.id, changed.clone())).unwrap();
        assert!(updated.active);
        assert_eq!(updated.params, changed);
        assert_eq!(updated.created_at, card.created_at);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let engine = engine();

        assert_eq!(block_on(engine.find_rate_card(Uuid::new_v4())).unwrap_err().code, 102);
        assert_eq!(
            block_on(engine.set_rate_card_status(Uuid::new_v4(), true))
                .unwrap_err()
                .code,
            102
        );
        assert_eq!(
            block_on(engine.update_rate_card(Uuid::new_v4(), params("Ghost")))
                .unwrap_err()
                .code,
            102
        );
    }

    #[test]
    fn concurrent_update_keeps_activation() {
        let store = MemoryStore::new(Duration::from_secs(60));
        let engine = engine_with(Arc::new(SlowParams(store)));
        let card = block_on(engine.create_rate_card(params("Auto"))).unwrap();

        let (updated, activated) = block_on(async {
            tokio::join!(
                engine.update_rate_card(card.id, params("Auto Plus")),
                engine.set_rate_card_status(card.id, true),
            )
        });

        assert!(activated.unwrap().active);
        assert_eq!(updated.unwrap().params.name, "Auto Plus");

        let stored = block_on(engine.find_rate_card(card.id)).unwrap();
        assert!(stored.active);
        assert_eq!(stored.params.name, "Auto Plus");
    }

    #[test]
    fn absurd_rates_are_rejected() {
        let engine = engine();

        let mut huge = params("Rocket");
        huge.per_km = Some(1e308);
        let err = block_on(engine.create_rate_card(huge)).unwrap_err();
        assert_eq!(err.code, 101);
        assert!(err.message.contains("perKM"));

        let card = block_on(engine.create_rate_card(params("Mini"))).unwrap();
        let mut infinite = params("Mini");
        infinite.min_fare = Some(f64::INFINITY);
        assert_eq!(
            block_on(engine.update_rate_card(card.id, infinite))
                .unwrap_err()
                .code,
            101
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let engine = engine();

        assert_eq!(block_on(engine.create_rate_card(params("  "))).unwrap_err().code, 101);
    }
}
