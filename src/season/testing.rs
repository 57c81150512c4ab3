// src/season/testing.rs
//
// In-memory results source for the season builder tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{PipelineError, Result};
use crate::fetch::models::{Constructor, Driver};
use crate::fetch::{ConstructorStanding, DriverStanding, ResultEntry, ResultsSource, Round};

pub fn round(season: u32, number: u32, name: &str) -> Round {
    Round {
        season,
        round: number,
        race_name: name.to_string(),
        circuit_name: String::new(),
        locality: String::new(),
        country: String::new(),
        race_date: String::new(),
        race_time: String::new(),
    }
}

pub fn entry(position: &str, points: &str, code: &str, constructor_id: &str, constructor_name: &str) -> ResultEntry {
    ResultEntry {
        position: position.to_string(),
        points: points.to_string(),
        driver: driver(code),
        constructor: constructor(constructor_id, constructor_name),
    }
}

pub fn driver(code: &str) -> Driver {
    Driver {
        driver_id: code.to_lowercase(),
        code: code.to_string(),
        given_name: format!("{code} given"),
        family_name: format!("{code} family"),
    }
}

pub fn constructor(id: &str, name: &str) -> Constructor {
    Constructor {
        constructor_id: id.to_string(),
        name: name.to_string(),
    }
}

#[derive(Default)]
pub struct FakeSource {
    season: u32,
    rounds: Vec<Round>,
    results: HashMap<u32, Vec<ResultEntry>>,
    driver_standings: HashMap<u32, Vec<DriverStanding>>,
    constructor_standings: HashMap<u32, Vec<ConstructorStanding>>,
    failing_round: Option<u32>,
}

impl FakeSource {
    pub fn new(season: u32) -> Self {
        Self {
            season,
            ..Self::default()
        }
    }

    pub fn with_round(mut self, number: u32, name: &str) -> Self {
        self.rounds.push(round(self.season, number, name));
        self
    }

    pub fn with_results(mut self, number: u32, results: Vec<ResultEntry>) -> Self {
        self.results.insert(number, results);
        self
    }

    pub fn with_driver_standings(mut self, number: u32, rows: Vec<DriverStanding>) -> Self {
        self.driver_standings.insert(number, rows);
        self
    }

    pub fn with_constructor_standings(mut self, number: u32, rows: Vec<ConstructorStanding>) -> Self {
        self.constructor_standings.insert(number, rows);
        self
    }

    /// Every lookup for `number` fails as if all mirrors were down.
    pub fn failing_at(mut self, number: u32) -> Self {
        self.failing_round = Some(number);
        self
    }

    fn check(&self, round: u32, what: &str) -> Result<()> {
        if self.failing_round == Some(round) {
            return Err(PipelineError::UpstreamUnavailable {
                path: format!("/f1/{}/{}/{}.json", self.season, round, what),
                last_error: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ResultsSource for FakeSource {
    async fn rounds(&self, season: u32) -> Result<Vec<Round>> {
        if season != self.season || self.rounds.is_empty() {
            return Err(PipelineError::NoRoundsFound(season));
        }
        Ok(self.rounds.clone())
    }

    async fn round_results(&self, _season: u32, round: u32) -> Result<Option<Vec<ResultEntry>>> {
        self.check(round, "results")?;
        Ok(self.results.get(&round).cloned())
    }

    async fn driver_standings(&self, _season: u32, round: u32) -> Result<Vec<DriverStanding>> {
        self.check(round, "driverStandings")?;
        Ok(self.driver_standings.get(&round).cloned().unwrap_or_default())
    }

    async fn constructor_standings(&self, _season: u32, round: u32) -> Result<Vec<ConstructorStanding>> {
        self.check(round, "constructorStandings")?;
        Ok(self.constructor_standings.get(&round).cloned().unwrap_or_default())
    }
}
