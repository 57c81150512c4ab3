// src/season/standings.rs

use tracing::{debug, instrument};

use super::rows::{ConstructorStandingRow, DriverStandingRow};
use crate::constructors::abbreviate;
use crate::error::Result;
use crate::fetch::models::{parse_count, parse_points, Constructor};
use crate::fetch::{ConstructorStanding, DriverStanding, ResultsSource, Round};

/// Round-by-round championship snapshots for drivers and constructors.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Standings {
    pub drivers: Vec<DriverStandingRow>,
    pub constructors: Vec<ConstructorStandingRow>,
}

#[instrument(level = "info", skip(source))]
pub async fn fetch_standings<S>(source: &S, season: u32) -> Result<Standings>
where
    S: ResultsSource + ?Sized,
{
    let rounds = source.rounds(season).await?;
    standings_for_rounds(source, &rounds).await
}

/// Two lookups per round, in round order. Points and wins are the
/// cumulative values the API reports; rows keep the API's ranking order.
pub async fn standings_for_rounds<S>(source: &S, rounds: &[Round]) -> Result<Standings>
where
    S: ResultsSource + ?Sized,
{
    let mut out = Standings::default();

    for rd in rounds {
        let drivers = source.driver_standings(rd.season, rd.round).await?;
        let constructors = source.constructor_standings(rd.season, rd.round).await?;

        if drivers.is_empty() {
            debug!(season = rd.season, round = rd.round, "no driver standings snapshot");
        }
        if constructors.is_empty() {
            debug!(season = rd.season, round = rd.round, "no constructor standings snapshot");
        }

        out.drivers.extend(driver_rows(rd, &drivers));
        out.constructors.extend(constructor_rows(rd, &constructors));
    }

    Ok(out)
}

/// A driver is credited to the first constructor listed for them.
pub fn driver_rows(rd: &Round, standings: &[DriverStanding]) -> Vec<DriverStandingRow> {
    standings
        .iter()
        .map(|row| {
            let fallback = Constructor::default();
            let con = row.constructors.first().unwrap_or(&fallback);
            let constructor_code = con.constructor_id.trim().to_string();
            DriverStandingRow {
                season: rd.season,
                round: rd.round,
                race_name: rd.race_name.clone(),
                position: row.position.clone(),
                points: parse_points(&row.points),
                wins: parse_count(&row.wins),
                driver_abbr: row.driver.code.trim().to_uppercase(),
                ergast_driver_id: row.driver.driver_id.trim().to_string(),
                driver_given_name: row.driver.given_name.clone(),
                driver_family_name: row.driver.family_name.clone(),
                constructor_abbr: abbreviate(&constructor_code).to_string(),
                constructor_code,
                constructor_name: con.name.clone(),
            }
        })
        .collect()
}

pub fn constructor_rows(rd: &Round, standings: &[ConstructorStanding]) -> Vec<ConstructorStandingRow> {
    standings
        .iter()
        .map(|row| {
            let constructor_code = row.constructor.constructor_id.trim().to_string();
            ConstructorStandingRow {
                season: rd.season,
                round: rd.round,
                race_name: rd.race_name.clone(),
                position: row.position.clone(),
                points: parse_points(&row.points),
                wins: parse_count(&row.wins),
                constructor_abbr: abbreviate(&constructor_code).to_string(),
                constructor_code,
                constructor_name: row.constructor.name.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::season::testing::{constructor, driver, FakeSource};

    fn driver_standing(position: &str, points: &str, wins: &str, code: &str, team: &str) -> DriverStanding {
        DriverStanding {
            position: position.into(),
            points: points.into(),
            wins: wins.into(),
            driver: driver(code),
            constructors: vec![constructor(team, team)],
        }
    }

    fn constructor_standing(position: &str, points: &str, wins: &str, team: &str) -> ConstructorStanding {
        ConstructorStanding {
            position: position.into(),
            points: points.into(),
            wins: wins.into(),
            constructor: constructor(team, team),
        }
    }

    #[tokio::test]
    async fn snapshots_are_copied_verbatim() {
        let source = FakeSource::new(2023)
            .with_round(1, "Bahrain Grand Prix")
            .with_round(2, "Saudi Arabian Grand Prix")
            .with_driver_standings(
                1,
                vec![
                    driver_standing("1", "25", "1", "VER", "red_bull"),
                    driver_standing("2", "18", "0", "PER", "red_bull"),
                ],
            )
            .with_driver_standings(
                2,
                vec![
                    // upstream order wins even when points disagree
                    driver_standing("1", "43", "1", "PER", "red_bull"),
                    driver_standing("2", "44", "1", "VER", "red_bull"),
                ],
            )
            .with_constructor_standings(2, vec![constructor_standing("1", "87", "2", "red_bull")]);

        let standings = fetch_standings(&source, 2023).await.unwrap();

        assert_eq!(standings.drivers.len(), 4);
        assert_eq!(standings.drivers[2].driver_abbr, "PER");
        assert_eq!(standings.drivers[3].points, 44.0);
        assert_eq!(standings.drivers[3].wins, 1);
        assert_eq!(standings.drivers[0].constructor_abbr, "RED");

        // round 1 had no constructor snapshot
        assert_eq!(standings.constructors.len(), 1);
        assert_eq!(standings.constructors[0].round, 2);
        assert_eq!(standings.constructors[0].wins, 2);
        assert_eq!(standings.constructors[0].points, 87.0);
    }

    #[test]
    fn driver_without_constructor_renders_blank_team() {
        let rd = crate::season::testing::round(2023, 1, "Bahrain Grand Prix");
        let mut row = driver_standing("20", "0", "0", "DEV", "alpha_tauri");
        row.constructors.clear();
        let rows = driver_rows(&rd, &[row]);
        assert_eq!(rows[0].constructor_code, "");
        assert_eq!(rows[0].constructor_abbr, "");
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let source = FakeSource::new(2023)
            .with_round(1, "Bahrain Grand Prix")
            .failing_at(1);
        let err = fetch_standings(&source, 2023).await.unwrap_err();
        assert!(matches!(err, PipelineError::UpstreamUnavailable { .. }));
    }
}
