mod helpers;
mod quote_api;
mod rate_card_api;
#[cfg(test)]
mod stubs;

use std::sync::Arc;

use crate::{api::API, db::Store, external::Providers};

pub struct Engine {
    store: Arc<dyn Store>,
    providers: Providers,
    default_timezone: String,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip(store, providers))]
    pub fn new(store: Arc<dyn Store>, providers: Providers, default_timezone: String) -> Self {
        Self {
            store,
            providers,
            default_timezone,
        }
    }
}

impl API for Engine {}
