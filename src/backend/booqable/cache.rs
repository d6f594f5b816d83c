//! Discovery cache
//!
//! Keeps the winning [`EndpointConfig`] per resource kind for a configurable
//! TTL. A TTL of zero disables the cache and every operation probes from
//! scratch. Entries are dropped as soon as a call against them fails.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use super::prober::{EndpointConfig, ResourceKind};

#[derive(Debug)]
pub struct DiscoveryCache {
    ttl: Duration,
    entries: Mutex<HashMap<ResourceKind, (EndpointConfig, Instant)>>,
}

impl DiscoveryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, kind: ResourceKind) -> Option<EndpointConfig> {
        if !self.is_enabled() {
            return None;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(&kind) {
            Some((config, stored_at)) if stored_at.elapsed() < self.ttl => Some(config.clone()),
            Some(_) => {
                entries.remove(&kind);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, kind: ResourceKind, config: EndpointConfig) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(kind, (config, Instant::now()));
    }

    pub fn invalidate(&self, kind: ResourceKind) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.remove(&kind).is_some() {
            tracing::debug!(?kind, "Invalidated cached Booqable endpoint");
        }
    }
}
