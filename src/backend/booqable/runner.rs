/**
 * First-Success Runner
 *
 * The generic search loop behind every upstream operation: walk an ordered
 * list of [`RequestDescriptor`]s, send them one at a time and stop at the
 * first response the caller's `accept` function turns into a value.
 *
 * # Outcomes
 *
 * Per-candidate failures (non-2xx, network errors, unusable bodies) are never
 * raised. Each call lands in the [`AttemptLog`]; exhaustion is `None`.
 *
 * # Deadline
 *
 * A runner carries the [`Deadline`] of one operation. Once it passes, no
 * further candidate is sent and the log is flagged `deadline_exceeded`.
 */

use std::time::Duration;

use tokio::time::Instant;

use crate::shared::booking::Attempt;

use super::client::{BooqableClient, ClientError, RequestDescriptor, UpstreamResponse};

/// Point in time after which an operation must stop calling upstream
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Instant::now() + budget,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Ordered record of every upstream call made by one search
#[derive(Debug, Clone, Default)]
pub struct AttemptLog {
    entries: Vec<Attempt>,
    deadline_exceeded: bool,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attempt: Attempt) {
        self.entries.push(attempt);
    }

    pub fn extend(&mut self, other: AttemptLog) {
        self.deadline_exceeded |= other.deadline_exceeded;
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Attempt] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First `n` attempts, for size-bounded responses
    pub fn head(&self, n: usize) -> Vec<Attempt> {
        self.entries.iter().take(n).cloned().collect()
    }

    pub fn deadline_exceeded(&self) -> bool {
        self.deadline_exceeded
    }

    pub fn mark_deadline_exceeded(&mut self) {
        self.deadline_exceeded = true;
    }
}

/// The winning candidate of a search
#[derive(Debug, Clone)]
pub struct Hit<T> {
    pub value: T,
    pub request: RequestDescriptor,
    pub response: UpstreamResponse,
}

fn attempt_for(request: &RequestDescriptor, outcome: &Result<UpstreamResponse, ClientError>) -> Attempt {
    let mut attempt = Attempt {
        base: request.base.clone(),
        path: request.path.clone(),
        method: request.method.to_string(),
        auth: request.auth.name().to_string(),
        status: None,
        error: None,
        sample: None,
    };
    match outcome {
        Ok(response) => {
            attempt.status = Some(response.status.as_u16());
            let sample = response.sample();
            if !sample.is_empty() {
                attempt.sample = Some(sample);
            }
        }
        Err(err) => attempt.error = Some(err.to_string()),
    }
    attempt
}

/// Sequential first-success-wins executor
#[derive(Debug, Clone)]
pub struct Runner {
    client: BooqableClient,
    deadline: Deadline,
}

impl Runner {
    pub fn new(client: BooqableClient, deadline: Deadline) -> Self {
        Self { client, deadline }
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Send a single request, recording it in `log`
    pub async fn send(
        &self,
        request: &RequestDescriptor,
        log: &mut AttemptLog,
    ) -> Option<UpstreamResponse> {
        if self.deadline.is_expired() {
            log.mark_deadline_exceeded();
            tracing::warn!(path = %request.path, "Operation deadline passed, not calling upstream");
            return None;
        }
        let outcome = self.client.send(request, self.deadline.remaining()).await;
        let attempt = attempt_for(request, &outcome);
        tracing::debug!(
            method = %attempt.method,
            base = %attempt.base,
            path = %attempt.path,
            auth = %attempt.auth,
            status = ?attempt.status,
            error = ?attempt.error,
            "Upstream attempt"
        );
        log.push(attempt);
        outcome.ok()
    }

    /// Try candidates in order until `accept` yields a value
    ///
    /// Returns `None` once the candidates are exhausted or the deadline
    /// passes. No request is sent after the first hit.
    pub async fn first_success<T, I, F>(
        &self,
        candidates: I,
        log: &mut AttemptLog,
        mut accept: F,
    ) -> Option<Hit<T>>
    where
        I: IntoIterator<Item = RequestDescriptor>,
        F: FnMut(&UpstreamResponse) -> Option<T>,
    {
        for request in candidates {
            let Some(response) = self.send(&request, log).await else {
                if log.deadline_exceeded() {
                    return None;
                }
                continue;
            };
            if let Some(value) = accept(&response) {
                return Some(Hit {
                    value,
                    request,
                    response,
                });
            }
        }
        None
    }
}

/// Accept any 2xx response, yielding its parsed body
pub fn accept_success(response: &UpstreamResponse) -> Option<serde_json::Value> {
    response.is_success().then(|| response.json.clone())
}
