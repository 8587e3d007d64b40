mod memory;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    types::Json,
    Executor, Pool, Postgres, Row,
};
use uuid::Uuid;

use crate::{
    entities::{Estimate, RateCardParams, VehicleRateCard},
    error::Error,
};

pub use memory::MemoryStore;

#[derive(Clone, Debug, Default)]
pub struct RateCardFilter {
    pub active_only: bool,
    pub ids: Option<Vec<Uuid>>,
}

impl RateCardFilter {
    pub fn active(ids: Option<Vec<Uuid>>) -> Self {
        Self {
            active_only: true,
            ids: ids.filter(|ids| !ids.is_empty()),
        }
    }

    pub fn matches(&self, card: &VehicleRateCard) -> bool {
        (!self.active_only || card.active)
            && self.ids.as_ref().map_or(true, |ids| ids.contains(&card.id))
    }
}

/// Persistence for rate cards and issued estimates. Listings are returned
/// in creation order. Each update touches a single aspect of a card and
/// returns the card as stored, or `None` for an unknown id.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_rate_card(&self, card: &VehicleRateCard) -> Result<(), Error>;
    async fn update_rate_card_params(
        &self,
        id: Uuid,
        params: &RateCardParams,
    ) -> Result<Option<VehicleRateCard>, Error>;
    async fn set_rate_card_status(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<Option<VehicleRateCard>, Error>;
    async fn find_rate_card(&self, id: Uuid) -> Result<Option<VehicleRateCard>, Error>;
    async fn list_rate_cards(&self, filter: RateCardFilter) -> Result<Vec<VehicleRateCard>, Error>;
    async fn insert_estimate(&self, estimate: &Estimate) -> Result<(), Error>;
    async fn find_estimate(&self, token: Uuid) -> Result<Option<Estimate>, Error>;
}

pub struct PgPool(pub Pool<Postgres>);

impl PgPool {
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Ok(Self(pool))
    }
}

#[derive(Debug)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip_all)]
    pub async fn new(PgPool(pool): PgPool) -> Result<Self, Error> {
        // rate card service, data holds the editable params
        pool.execute("CREATE TABLE IF NOT EXISTS rate_cards (id UUID PRIMARY KEY, active BOOLEAN NOT NULL, created_at TIMESTAMPTZ NOT NULL, data JSONB NOT NULL)")
            .await?;

        // quote service (KV store)
        pool.execute("CREATE TABLE IF NOT EXISTS estimates (token UUID PRIMARY KEY, data JSONB NOT NULL)")
            .await?;

        Ok(Self { pool })
    }
}

fn rate_card(row: &PgRow) -> Result<VehicleRateCard, Error> {
    let Json(params) = row.try_get("data")?;

    Ok(VehicleRateCard {
        id: row.try_get("id")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        params,
    })
}

#[async_trait]
impl Store for PgStore {
    #[tracing::instrument(skip(self, card), fields(id = %card.id))]
    async fn insert_rate_card(&self, card: &VehicleRateCard) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO rate_cards (id, active, created_at, data) VALUES ($1, $2, $3, $4)",
            )
            .bind(&card.id)
            .bind(card.active)
            .bind(&card.created_at)
            .bind(Json(&card.params)),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, params))]
    async fn update_rate_card_params(
        &self,
        id: Uuid,
        params: &RateCardParams,
    ) -> Result<Option<VehicleRateCard>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(
                sqlx::query(
                    "UPDATE rate_cards SET data = $2 WHERE id = $1 RETURNING id, active, created_at, data",
                )
                .bind(&id)
                .bind(Json(params)),
            )
            .await?;

        maybe_result.as_ref().map(rate_card).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn set_rate_card_status(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<Option<VehicleRateCard>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(
                sqlx::query(
                    "UPDATE rate_cards SET active = $2 WHERE id = $1 RETURNING id, active, created_at, data",
                )
                .bind(&id)
                .bind(active),
            )
            .await?;

        maybe_result.as_ref().map(rate_card).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn find_rate_card(&self, id: Uuid) -> Result<Option<VehicleRateCard>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(
                sqlx::query("SELECT id, active, created_at, data FROM rate_cards WHERE id = $1")
                    .bind(&id),
            )
            .await?;

        maybe_result.as_ref().map(rate_card).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn list_rate_cards(&self, filter: RateCardFilter) -> Result<Vec<VehicleRateCard>, Error> {
        let query = "
            SELECT
                id, active, created_at, data
            FROM
                rate_cards
            WHERE
                (NOT $1 OR active)
                AND ($2::UUID[] IS NULL OR id = ANY($2))
            ORDER BY
                created_at ASC
        ";

        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(
                sqlx::query(query)
                    .bind(filter.active_only)
                    .bind(filter.ids),
            )
            .await?;

        results.iter().map(rate_card).collect()
    }

    #[tracing::instrument(skip(self, estimate), fields(token = %estimate.token))]
    async fn insert_estimate(&self, estimate: &Estimate) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO estimates (token, data) VALUES ($1, $2)")
                .bind(&estimate.token)
                .bind(Json(estimate)),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_estimate(&self, token: Uuid) -> Result<Option<Estimate>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM estimates WHERE token = $1").bind(&token))
            .await?;

        match maybe_result {
            Some(result) => {
                let Json(estimate) = result.try_get("data")?;
                Ok(Some(estimate))
            }
            None => Ok(None),
        }
    }
}

#[test]
fn active_filter_ignores_empty_id_list() {
    use crate::entities::RateCardParams;

    let mut card = VehicleRateCard::new(RateCardParams {
        name: "Auto".into(),
        ..Default::default()
    });

    let filter = RateCardFilter::active(Some(vec![]));
    assert!(filter.ids.is_none());
    assert!(!filter.matches(&card));

    card.active = true;
    assert!(filter.matches(&card));
    assert!(!RateCardFilter::active(Some(vec![Uuid::new_v4()])).matches(&card));
    assert!(RateCardFilter::active(Some(vec![card.id])).matches(&card));
}
