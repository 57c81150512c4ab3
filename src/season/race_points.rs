// src/season/race_points.rs

use std::collections::HashMap;

use tracing::{debug, info, instrument};

use super::rows::{ConstructorResultRow, DriverResultRow};
use crate::constructors::abbreviate;
use crate::error::Result;
use crate::fetch::{models::parse_points, ResultEntry, ResultsSource, Round};

/// Per-round points for every driver and every constructor of a season.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RacePoints {
    pub drivers: Vec<DriverResultRow>,
    pub constructors: Vec<ConstructorResultRow>,
    /// Scheduled rounds the API had no results for yet.
    pub skipped_rounds: Vec<u32>,
}

/// List the season's rounds, then build race points for all of them.
#[instrument(level = "info", skip(source))]
pub async fn fetch_race_points<S>(source: &S, season: u32) -> Result<RacePoints>
where
    S: ResultsSource + ?Sized,
{
    let rounds = source.rounds(season).await?;
    race_points_for_rounds(source, &rounds).await
}

/// Fetch each round's results in order and derive the constructor totals.
pub async fn race_points_for_rounds<S>(source: &S, rounds: &[Round]) -> Result<RacePoints>
where
    S: ResultsSource + ?Sized,
{
    let mut out = RacePoints::default();

    for rd in rounds {
        let results = match source.round_results(rd.season, rd.round).await? {
            Some(results) => results,
            None => {
                info!(season = rd.season, round = rd.round, race = %rd.race_name, "no results yet; skipping round");
                out.skipped_rounds.push(rd.round);
                continue;
            }
        };

        let (drivers, constructors) = aggregate_round(rd, &results);
        debug!(
            round = rd.round,
            drivers = drivers.len(),
            constructors = constructors.len(),
            "round aggregated"
        );
        out.drivers.extend(drivers);
        out.constructors.extend(constructors);
    }

    Ok(out)
}

/// Driver rows in the API's classification order, plus one row per
/// constructor with its drivers' points summed, highest first.
///
/// The tally lives only for this call; ties keep first-encounter order.
pub fn aggregate_round(rd: &Round, results: &[ResultEntry]) -> (Vec<DriverResultRow>, Vec<ConstructorResultRow>) {
    struct Tally {
        code: String,
        name: String,
        points: f64,
    }

    let mut drivers = Vec::with_capacity(results.len());
    let mut tallies: Vec<Tally> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for res in results {
        let points = parse_points(&res.points);
        let constructor_code = res.constructor.constructor_id.trim().to_string();

        drivers.push(DriverResultRow {
            season: rd.season,
            round: rd.round,
            race_name: rd.race_name.clone(),
            position: res.position.clone(),
            points,
            driver_abbr: res.driver.code.trim().to_uppercase(),
            ergast_driver_id: res.driver.driver_id.trim().to_string(),
            driver_given_name: res.driver.given_name.clone(),
            driver_family_name: res.driver.family_name.clone(),
            constructor_abbr: abbreviate(&constructor_code).to_string(),
            constructor_code: constructor_code.clone(),
            constructor_name: res.constructor.name.clone(),
        });

        if constructor_code.is_empty() {
            continue;
        }
        match index.get(&constructor_code) {
            Some(&i) => {
                tallies[i].points += points;
                tallies[i].name = res.constructor.name.clone();
            }
            None => {
                index.insert(constructor_code.clone(), tallies.len());
                tallies.push(Tally {
                    code: constructor_code,
                    name: res.constructor.name.clone(),
                    points,
                });
            }
        }
    }

    // stable: equal totals stay in encounter order
    tallies.sort_by(|a, b| b.points.total_cmp(&a.points));

    let constructors = tallies
        .into_iter()
        .map(|t| ConstructorResultRow {
            season: rd.season,
            round: rd.round,
            race_name: rd.race_name.clone(),
            points: t.points,
            constructor_abbr: abbreviate(&t.code).to_string(),
            constructor_code: t.code,
            constructor_name: t.name,
        })
        .collect();

    (drivers, constructors)
}
