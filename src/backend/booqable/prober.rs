/**
 * Endpoint Prober
 *
 * Finds a working `(base, auth, path)` triple for a resource kind by issuing
 * cheap read probes over the candidate space.
 *
 * # Enumeration
 *
 * Bases form the outer loop, auth schemes the middle loop and resource paths
 * the inner loop. The first 2xx wins and nothing is sent after it. The body
 * of the winning probe is returned with the configuration so the caller does
 * not need to fetch the same page again.
 *
 * # Exhaustion
 *
 * When no candidate succeeds the prober returns [`Discovery::Exhausted`] with
 * the complete attempt trace. A missing API key yields an exhausted result
 * with zero attempts.
 */

use serde_json::Value;

use super::candidates::{
    AuthScheme, CandidateSpace, INVENTORY_LIST_KEYS, INVENTORY_PATHS, PRODUCT_LIST_KEYS,
    PRODUCT_PATHS, RESERVATION_LIST_KEYS, RESERVATION_PATHS,
};
use super::client::RequestDescriptor;
use super::runner::{accept_success, AttemptLog, Runner};

/// Sort order requested on every list probe
pub const PROBE_SORT: &str = "-updated_at";

/// Resource kinds the prober can discover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Reservations,
    Products,
    InventoryItems,
}

impl ResourceKind {
    pub fn paths(&self) -> &'static [&'static str] {
        match self {
            Self::Reservations => RESERVATION_PATHS,
            Self::Products => PRODUCT_PATHS,
            Self::InventoryItems => INVENTORY_PATHS,
        }
    }

    /// Keys under which a list response carries its records
    pub fn list_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Reservations => RESERVATION_LIST_KEYS,
            Self::Products => PRODUCT_LIST_KEYS,
            Self::InventoryItems => INVENTORY_LIST_KEYS,
        }
    }
}

/// A working endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub base: String,
    pub auth: AuthScheme,
    pub resource_path: String,
}

/// Pagination parameters applied to list probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeParams {
    pub page: u32,
    pub per_page: u32,
}

impl ProbeParams {
    pub fn first_page(per_page: u32) -> Self {
        Self { page: 1, per_page }
    }

    pub fn with_page(self, page: u32) -> Self {
        Self { page, ..self }
    }
}

/// Outcome of a discovery sweep
#[derive(Debug, Clone)]
pub enum Discovery {
    Found {
        config: EndpointConfig,
        /// Parsed body of the winning probe
        body: Value,
        attempts: AttemptLog,
    },
    Exhausted {
        attempts: AttemptLog,
        missing_credential: bool,
    },
}

impl Discovery {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn attempts(&self) -> &AttemptLog {
        match self {
            Self::Found { attempts, .. } | Self::Exhausted { attempts, .. } => attempts,
        }
    }
}

/// A list GET against a specific configuration
pub fn list_request(
    space: &CandidateSpace,
    config: &EndpointConfig,
    params: ProbeParams,
) -> RequestDescriptor {
    RequestDescriptor::get(&config.base, config.resource_path.clone(), config.auth, space.credentials())
        .with_query("page", params.page)
        .with_query("per_page", params.per_page)
        .with_query("sort", PROBE_SORT)
}

/// Every probe for `kind`, in enumeration order
pub fn probe_candidates(
    space: &CandidateSpace,
    kind: ResourceKind,
    params: ProbeParams,
) -> Vec<RequestDescriptor> {
    let auths = space.read_auths();
    let mut candidates = Vec::with_capacity(space.bases().len() * auths.len() * kind.paths().len());
    for base in space.bases() {
        for auth in &auths {
            for path in kind.paths() {
                let config = EndpointConfig {
                    base: base.clone(),
                    auth: *auth,
                    resource_path: (*path).to_string(),
                };
                candidates.push(list_request(space, &config, params));
            }
        }
    }
    candidates
}

/// Probe the candidate space for a working list endpoint of `kind`
pub async fn probe(
    runner: &Runner,
    space: &CandidateSpace,
    kind: ResourceKind,
    params: ProbeParams,
) -> Discovery {
    let mut attempts = AttemptLog::new();
    if !space.has_credential() {
        tracing::warn!(?kind, "No Booqable API key configured, skipping discovery");
        return Discovery::Exhausted {
            attempts,
            missing_credential: true,
        };
    }

    let candidates = probe_candidates(space, kind, params);
    match runner.first_success(candidates, &mut attempts, accept_success).await {
        Some(hit) => {
            let config = EndpointConfig {
                base: hit.request.base,
                auth: hit.request.auth,
                resource_path: hit.request.path,
            };
            tracing::info!(
                ?kind,
                base = %config.base,
                path = %config.resource_path,
                auth = %config.auth,
                attempts = attempts.len(),
                "Discovered Booqable endpoint"
            );
            Discovery::Found {
                config,
                body: hit.value,
                attempts,
            }
        }
        None => {
            tracing::warn!(?kind, attempts = attempts.len(), "Booqable discovery exhausted");
            Discovery::Exhausted {
                attempts,
                missing_credential: false,
            }
        }
    }
}

/// Extract the record list of a list response
///
/// The first of `keys` holding an array wins; a bare array body is accepted
/// as well. Anything else is an empty list.
pub fn extract_list<'a>(body: &'a Value, keys: &[&str]) -> &'a [Value] {
    if let Some(items) = body.as_array() {
        return items;
    }
    keys.iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
