use std::sync::Arc;

use tariff::config::Config;
use tariff::db::{MemoryStore, PgPool, PgStore, Store};
use tariff::engine::Engine;
use tariff::error::Error;
use tariff::external::Providers;
use tariff::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::load()?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pool = PgPool::new(url, config.database_max_connections).await?;
            Arc::new(PgStore::new(pool).await?)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, rate cards and estimates are kept in memory");
            Arc::new(MemoryStore::new(config.estimate_ttl))
        }
    };

    let providers = Providers::from_config(&config);
    let engine = Engine::new(store, providers, config.default_timezone.clone());

    serve(engine, config.addr).await;

    Ok(())
}
