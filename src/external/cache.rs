use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    entities::{Coordinates, RouteMetrics, TollInfo, Weather},
    error::Error,
    external::{DirectionsProvider, TollProvider, WeatherProvider},
};

pub struct TtlCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, T)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;

        match entries.get(key) {
            Some((inserted, value)) if inserted.elapsed() < self.ttl => Some(value.clone()),
            _ => None,
        }
    }

    pub async fn insert(&self, key: String, value: T) {
        let mut entries = self.entries.write().await;

        let ttl = self.ttl;
        entries.retain(|_, (inserted, _)| inserted.elapsed() < ttl);
        entries.insert(key, (Instant::now(), value));
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

pub struct Cached<P, T> {
    inner: P,
    cache: TtlCache<T>,
}

impl<P, T: Clone> Cached<P, T> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }
}

#[async_trait]
impl<P: DirectionsProvider> DirectionsProvider for Cached<P, RouteMetrics> {
    async fn find_directions(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteMetrics, Error> {
        let key = format!("directions:{}:{}", origin.key(), destination.key());

        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(%key, "cache hit");
            return Ok(hit);
        }

        let metrics = self.inner.find_directions(origin, destination).await?;
        self.cache.insert(key, metrics.clone()).await;

        Ok(metrics)
    }
}

#[async_trait]
impl<P: WeatherProvider> WeatherProvider for Cached<P, Weather> {
    async fn find_weather(&self, location: Coordinates) -> Result<Weather, Error> {
        let key = format!("weather:{}", location.key());

        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(%key, "cache hit");
            return Ok(hit);
        }

        let weather = self.inner.find_weather(location).await?;
        self.cache.insert(key, weather.clone()).await;

        Ok(weather)
    }
}

#[async_trait]
impl<P: TollProvider> TollProvider for Cached<P, TollInfo> {
    async fn find_tolls(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<TollInfo, Error> {
        let key = format!("tolls:{}:{}", origin.key(), destination.key());

        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(%key, "cache hit");
            return Ok(hit);
        }

        let tolls = self.inner.find_tolls(origin, destination).await?;
        self.cache.insert(key, tolls.clone()).await;

        Ok(tolls)
    }
}
