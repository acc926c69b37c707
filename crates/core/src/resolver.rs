//! # Entity Resolution
//!
//! Loads the provider, customer and service a booking refers to. The three
//! lookups run concurrently and are always joined; a branch that fails or
//! runs past the lookup timeout still completes before the join returns, so
//! no lookup is left pending. Only then are the results inspected, in the
//! fixed order provider, customer, service, and the first failure wins.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use eyre::{eyre, Result, WrapErr};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cache::{self, Cache};
use crate::errors::{BookingError, BookingResult, EntityKind};
use crate::models::{profile::Customer, profile::Provider, service::Service};
use crate::store::BookingStore;

/// Records resolved for one booking, captured for denormalization.
#[derive(Debug, Clone)]
pub struct ResolvedEntities {
    pub provider: Provider,
    pub customer: Customer,
    pub service: Service,
}

#[derive(Clone)]
pub struct EntityResolver {
    store: Arc<dyn BookingStore>,
    cache: Option<Arc<dyn Cache>>,
    lookup_timeout: Duration,
}

impl EntityResolver {
    pub fn new(store: Arc<dyn BookingStore>, cache: Option<Arc<dyn Cache>>, lookup_timeout: Duration) -> Self {
        Self {
            store,
            cache,
            lookup_timeout,
        }
    }

    pub async fn resolve(
        &self,
        brand_id: i32,
        provider_id: i64,
        customer_id: i64,
        service_id: Uuid,
    ) -> BookingResult<ResolvedEntities> {
        let (provider, customer, service) = tokio::join!(
            self.bounded("provider", self.provider(provider_id)),
            self.bounded("customer", self.customer(customer_id)),
            self.bounded("service", self.store.get_service(service_id)),
        );

        let provider = provider
            .wrap_err("error getting provider")?
            .filter(|provider| provider.belongs_to(brand_id))
            .ok_or(BookingError::NotFound(EntityKind::Provider))?;
        let customer = customer
            .wrap_err("error getting customer")?
            .filter(|customer| customer.brand_id == brand_id)
            .ok_or(BookingError::NotFound(EntityKind::Customer))?;
        let service = service
            .wrap_err("error getting service")?
            .filter(|service| service.brand_id == brand_id)
            .ok_or(BookingError::NotFound(EntityKind::Service))?;

        if !service.is_performed_by(provider.id) {
            return Err(BookingError::validation(format!(
                "Provider {} does not perform service {}",
                provider.id, service.id
            )));
        }

        debug!(brand_id, provider_id, customer_id, %service_id, "resolved booking entities");
        Ok(ResolvedEntities {
            provider,
            customer,
            service,
        })
    }

    /// Provider profile, read through the cache when one is configured.
    pub async fn provider(&self, id: i64) -> Result<Option<Provider>> {
        self.read_through(&cache::user_key(id), self.store.get_user_by_id(id))
            .await
    }

    /// Customer profile, read through the cache when one is configured.
    pub async fn customer(&self, id: i64) -> Result<Option<Customer>> {
        self.read_through(&cache::customer_key(id), self.store.get_customer_by_id(id))
            .await
    }

    async fn read_through<T, F>(&self, key: &str, fetch: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<Option<T>>>,
    {
        let Some(cache) = &self.cache else {
            return fetch.await;
        };

        if let Some(hit) = cache::get_json::<T>(cache.as_ref(), key).await {
            return Ok(Some(hit));
        }

        let record = fetch.await?;
        if let Some(record) = &record {
            cache::add_json(cache.as_ref(), key, record).await;
        }
        Ok(record)
    }

    async fn bounded<T, F>(&self, what: &'static str, lookup: F) -> Result<Option<T>>
    where
        F: Future<Output = Result<Option<T>>>,
    {
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(eyre!("{what} lookup timed out after {:?}", self.lookup_timeout)),
        }
    }
}
