//! Booqable Integration Engine
//!
//! Discovery and reconciliation against a Booqable account whose base URL,
//! auth encoding and resource naming are only known at runtime.
//!
//! # Architecture
//!
//! - **`candidates`** - Static candidate space (bases, auth schemes, paths)
//! - **`client`** - Request descriptors and the reqwest wrapper
//! - **`runner`** - Generic first-success-wins runner, attempt log, deadline
//! - **`prober`** - Endpoint discovery over the candidate space
//! - **`cache`** - Optional TTL cache of discovered endpoints
//! - **`normalize`** - Field alias tables and canonical record mapping
//! - **`resolver`** - Product and customer resolution
//! - **`orders`** - Booking creation and line item attachment
//! - **`payment`** - Payment link creation, read-back and deep scan
//! - **`email`** - Payment link email drafts
//! - **`status`** - Mark paid / mark confirmed
//! - **`sync`** - Paginated reservation and inventory synchronization
//! - **`handlers`** - Axum handlers exposing the operations
//!
//! # Module Structure
//!
//! ```text
//! booqable/
//! ├── mod.rs         - Booqable service and error types
//! ├── candidates.rs  - Candidate space
//! ├── client.rs      - HTTP client
//! ├── runner.rs      - First-success runner
//! ├── prober.rs      - Endpoint discovery
//! ├── cache.rs       - Discovery cache
//! ├── normalize.rs   - Record normalization
//! ├── resolver.rs    - Products and customers
//! ├── orders.rs      - Booking orchestration
//! ├── payment.rs     - Payment links
//! ├── email.rs       - Email drafts
//! ├── status.rs      - Status updates
//! ├── sync.rs        - Synchronizers
//! └── handlers.rs    - HTTP handlers
//! ```
//!
//! # Failure Model
//!
//! Per-candidate failures are recorded and skipped. Only total exhaustion of
//! a required step surfaces as a [`BooqableError`], which always carries the
//! attempt trace.

pub mod candidates;
pub mod client;
pub mod runner;
pub mod prober;
pub mod cache;
pub mod normalize;
pub mod resolver;
pub mod orders;
pub mod payment;
pub mod email;
pub mod status;
pub mod sync;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::shared::booking::{Attempt, TriedSummary};
use crate::shared::config::BooqableSettings;
use crate::shared::SharedError;

use cache::DiscoveryCache;
use candidates::CandidateSpace;
use client::{BooqableClient, ClientError};
use prober::{Discovery, EndpointConfig, ProbeParams, ResourceKind};
use runner::{AttemptLog, Deadline, Runner};

/// Attempts kept in caller-visible traces
pub const TRACE_LIMIT: usize = 6;

/// Attempt trace attached to a failure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Trace {
    Attempts(Vec<Attempt>),
    Split(TriedSummary),
}

impl Trace {
    pub fn from_log(log: &AttemptLog) -> Self {
        Self::Attempts(log.head(TRACE_LIMIT))
    }

    pub fn split(create: &AttemptLog, fetch: &AttemptLog) -> Self {
        Self::Split(TriedSummary {
            create: create.head(TRACE_LIMIT),
            fetch: fetch.head(TRACE_LIMIT),
        })
    }
}

/// Failure of a whole Booqable operation
#[derive(Debug, Error)]
pub enum BooqableError {
    /// No API key, so no candidate was attempted
    #[error("Booqable API key is not configured")]
    MissingCredential,

    /// Discovery exhausted the candidate space
    #[error("Could not detect Booqable API endpoint")]
    Discovery { attempts: AttemptLog },

    /// A required step found no accepting endpoint
    #[error("{message}")]
    Rejected { message: String, trace: Trace },

    /// Caller input failed validation
    #[error(transparent)]
    Invalid(#[from] SharedError),
}

impl BooqableError {
    pub fn rejected(message: impl Into<String>, log: &AttemptLog) -> Self {
        let mut message = message.into();
        if log.deadline_exceeded() {
            message.push_str(" (operation deadline exceeded)");
        }
        Self::Rejected {
            message,
            trace: Trace::from_log(log),
        }
    }

    /// Convert an exhausted discovery into an error
    pub fn from_discovery(discovery: Discovery) -> Self {
        match discovery {
            Discovery::Exhausted {
                missing_credential: true,
                ..
            } => Self::MissingCredential,
            Discovery::Exhausted { attempts, .. } | Discovery::Found { attempts, .. } => {
                Self::Discovery { attempts }
            }
        }
    }
}

/// Shared entry point of all Booqable operations
///
/// Cheap to clone; the candidate space and cache are shared.
#[derive(Debug, Clone)]
pub struct Booqable {
    client: BooqableClient,
    space: Arc<CandidateSpace>,
    cache: Arc<DiscoveryCache>,
    deadline: Duration,
}

impl Booqable {
    pub fn new(settings: &BooqableSettings) -> Result<Self, ClientError> {
        Self::with_space(CandidateSpace::from_settings(settings), settings)
    }

    /// Build around an explicit candidate space
    pub fn with_space(space: CandidateSpace, settings: &BooqableSettings) -> Result<Self, ClientError> {
        Ok(Self {
            client: BooqableClient::new(settings.request_timeout)?,
            space: Arc::new(space),
            cache: Arc::new(DiscoveryCache::new(settings.discovery_ttl)),
            deadline: settings.operation_deadline,
        })
    }

    pub fn space(&self) -> &CandidateSpace {
        &self.space
    }

    pub fn cache(&self) -> &DiscoveryCache {
        &self.cache
    }

    /// A runner carrying a fresh operation deadline
    pub fn runner(&self) -> Runner {
        Runner::new(self.client.clone(), Deadline::after(self.deadline))
    }

    /// Discover a list endpoint for `kind`, consulting the cache first
    ///
    /// A cached configuration is verified with one GET; if that fails the
    /// entry is invalidated and the full sweep runs.
    pub async fn discover(&self, runner: &Runner, kind: ResourceKind, params: ProbeParams) -> Discovery {
        let mut attempts = AttemptLog::new();
        if let Some(config) = self.cache.get(kind) {
            let request = prober::list_request(&self.space, &config, params);
            if let Some(response) = runner.send(&request, &mut attempts).await {
                if response.is_success() {
                    tracing::debug!(?kind, base = %config.base, "Using cached Booqable endpoint");
                    return Discovery::Found {
                        config,
                        body: response.json,
                        attempts,
                    };
                }
            }
            self.cache.invalidate(kind);
        }

        let discovery = prober::probe(runner, &self.space, kind, params).await;
        match discovery {
            Discovery::Found {
                config,
                body,
                attempts: probe_attempts,
            } => {
                self.cache.put(kind, config.clone());
                attempts.extend(probe_attempts);
                Discovery::Found {
                    config,
                    body,
                    attempts,
                }
            }
            Discovery::Exhausted {
                attempts: probe_attempts,
                missing_credential,
            } => {
                attempts.extend(probe_attempts);
                Discovery::Exhausted {
                    attempts,
                    missing_credential,
                }
            }
        }
    }

    /// Find the working base origin with a minimal reservations probe
    pub async fn discover_base(&self, runner: &Runner) -> Result<EndpointConfig, BooqableError> {
        match self
            .discover(runner, ResourceKind::Reservations, ProbeParams::first_page(1))
            .await
        {
            Discovery::Found { config, .. } => Ok(config),
            exhausted => Err(BooqableError::from_discovery(exhausted)),
        }
    }

    /// Drop the cached endpoint of `kind` after a failed follow-up call
    pub fn invalidate(&self, kind: ResourceKind) {
        self.cache.invalidate(kind);
    }
}
