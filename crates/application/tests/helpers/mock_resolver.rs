#![allow(dead_code)]

use async_trait::async_trait;
use dns_relay_application::ports::DnsResolver;
use dns_relay_domain::DomainError;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MockDnsResolver {
    responses: Arc<RwLock<HashMap<String, Vec<IpAddr>>>>,
    error_responses: Arc<RwLock<HashMap<String, DomainError>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    calls: Arc<AtomicUsize>,
    last_domain: Arc<RwLock<Option<String>>>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_response(&self, domain: &str, addresses: &[&str]) {
        let parsed = addresses.iter().map(|a| a.parse().unwrap()).collect();
        self.responses
            .write()
            .await
            .insert(domain.to_string(), parsed);
    }

    pub async fn set_response_error(&self, domain: &str, error: DomainError) {
        self.error_responses
            .write()
            .await
            .insert(domain.to_string(), error);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub async fn last_domain(&self) -> Option<String> {
        self.last_domain.read().await.clone()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, domain: &str) -> Result<Vec<IpAddr>, DomainError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self.last_domain.write().await = Some(domain.to_string());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.error_responses.read().await.get(domain) {
            return Err(error.clone());
        }

        Ok(self
            .responses
            .read()
            .await
            .get(domain)
            .cloned()
            .unwrap_or_default())
    }
}
