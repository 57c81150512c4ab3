// src/fetch/mirrors.rs

use std::{fmt::Display, future::Future};

use tracing::warn;

/// Every provider in the list failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: usize,
    /// Error from the last provider tried; `None` only for an empty list.
    pub last: Option<E>,
}

/// Try `attempt` against each provider in order and return the first success.
///
/// One attempt per provider, no backoff: worst-case latency is bounded by
/// `providers.len()` times the per-attempt timeout.
pub async fn first_success<P, T, E, F, Fut>(providers: &[P], mut attempt: F) -> Result<T, Exhausted<E>>
where
    P: Display,
    E: Display,
    F: FnMut(&P) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last = None;
    for (i, provider) in providers.iter().enumerate() {
        match attempt(provider).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(provider = %provider, attempt = i + 1, of = providers.len(), error = %e, "provider failed; falling through");
                last = Some(e);
            }
        }
    }
    Err(Exhausted {
        attempts: providers.len(),
        last,
    })
}
