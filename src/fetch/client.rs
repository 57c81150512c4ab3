// src/fetch/client.rs

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::mirrors::first_success;
use super::models::{ConstructorStanding, DriverStanding, Envelope, ResultEntry, Round};
use super::ResultsSource;
use crate::config::Config;
use crate::error::{PipelineError, Result};

/// Championship series prefix in every Ergast path.
const SERIES: &str = "f1";

/// Page size requested from list endpoints; a season never comes close.
const PAGE_LIMIT: u32 = 1000;

/// JSON client over an ordered list of Ergast mirrors.
#[derive(Debug, Clone)]
pub struct ErgastClient {
    http: Client,
    mirrors: Vec<String>,
}

impl ErgastClient {
    /// Build a client with the configured timeout and mirror order.
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(cfg.timeout)
            .user_agent(concat!("racepoints/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, cfg.mirrors.clone()))
    }

    pub fn with_http(http: Client, mirrors: Vec<String>) -> Self {
        Self { http, mirrors }
    }

    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }

    /// GET `relative_path` from the first mirror that answers with a 2xx and
    /// a body decodable as `T`.
    pub async fn fetch_json<T>(&self, relative_path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        first_success(&self.mirrors, |base| {
            let base = base.clone();
            async move { self.get_once::<T>(&base, relative_path, query).await }
        })
        .await
        .map_err(|exhausted| PipelineError::UpstreamUnavailable {
            path: relative_path.to_string(),
            last_error: exhausted
                .last
                .map(|e| format!("{:#}", e))
                .unwrap_or_else(|| "no mirrors configured".to_string()),
        })
    }

    /// Untyped variant of [`fetch_json`](Self::fetch_json).
    pub async fn fetch_resource(&self, relative_path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.fetch_json::<Value>(relative_path, query).await
    }

    async fn get_once<T>(&self, base: &str, relative_path: &str, query: &[(&str, String)]) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        let url = build_url(base, relative_path, query)?;
        debug!(%url, "GET");
        let body = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .json::<T>()
            .await
            .with_context(|| format!("Decoding JSON from {}", url))?;
        Ok(body)
    }

    async fn envelope(&self, relative_path: &str) -> Result<Envelope> {
        self.fetch_json(relative_path, &[("limit", PAGE_LIMIT.to_string())])
            .await
    }
}

/// `base` + `/` + `relative_path`, with `query` appended.
pub fn build_url(base: &str, relative_path: &str, query: &[(&str, String)]) -> anyhow::Result<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative_path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined).with_context(|| format!("parsing URL {}", joined))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in query {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

#[async_trait]
impl ResultsSource for ErgastClient {
    #[instrument(level = "debug", skip(self))]
    async fn rounds(&self, season: u32) -> Result<Vec<Round>> {
        let env = self.envelope(&format!("/{}/{}.json", SERIES, season)).await?;
        let races = env.mr_data.race_table.races;
        let mut rounds = Vec::with_capacity(races.len());
        for race in &races {
            match Round::from_race(race, season) {
                Some(r) => rounds.push(r),
                None => warn!(season, round = %race.round, "skipping schedule entry with unusable round number"),
            }
        }
        if rounds.is_empty() {
            return Err(PipelineError::NoRoundsFound(season));
        }
        info!(season, rounds = rounds.len(), "schedule fetched");
        Ok(rounds)
    }

    async fn round_results(&self, season: u32, round: u32) -> Result<Option<Vec<ResultEntry>>> {
        let env = self
            .envelope(&format!("/{}/{}/{}/results.json", SERIES, season, round))
            .await?;
        Ok(env
            .mr_data
            .race_table
            .races
            .into_iter()
            .next()
            .map(|race| race.results))
    }

    async fn driver_standings(&self, season: u32, round: u32) -> Result<Vec<DriverStanding>> {
        let env = self
            .envelope(&format!("/{}/{}/{}/driverStandings.json", SERIES, season, round))
            .await?;
        Ok(env
            .mr_data
            .standings_table
            .standings_lists
            .into_iter()
            .next()
            .map(|list| list.driver_standings)
            .unwrap_or_default())
    }

    async fn constructor_standings(&self, season: u32, round: u32) -> Result<Vec<ConstructorStanding>> {
        let env = self
            .envelope(&format!(
                "/{}/{}/{}/constructorStandings.json",
                SERIES, season, round
            ))
            .await?;
        Ok(env
            .mr_data
            .standings_table
            .standings_lists
            .into_iter()
            .next()
            .map(|list| list.constructor_standings)
            .unwrap_or_default())
    }
}
