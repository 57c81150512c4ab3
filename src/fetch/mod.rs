// src/fetch/mod.rs

pub mod client;
pub mod mirrors;
pub mod models;

use async_trait::async_trait;

use crate::error::Result;
pub use client::ErgastClient;
pub use models::{ConstructorStanding, DriverStanding, ResultEntry, Round};

/// Round-oriented lookups the season builders need from the results API.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    /// The season's schedule. Fails with `NoRoundsFound` when it is empty.
    async fn rounds(&self, season: u32) -> Result<Vec<Round>>;

    /// Classified results of one round, or `None` when the round has not
    /// been run yet.
    async fn round_results(&self, season: u32, round: u32) -> Result<Option<Vec<ResultEntry>>>;

    /// Driver championship snapshot as of `round`; empty when not published.
    async fn driver_standings(&self, season: u32, round: u32) -> Result<Vec<DriverStanding>>;

    /// Constructor championship snapshot as of `round`; empty when not published.
    async fn constructor_standings(&self, season: u32, round: u32) -> Result<Vec<ConstructorStanding>>;
}
