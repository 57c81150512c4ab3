// src/fetch/models.rs
//
// Wire model for the Ergast `MRData` envelope. Ergast sends numbers as
// strings and omits empty collections, so every field defaults and numeric
// fields accept either representation.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Envelope {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MrData {
    #[serde(rename = "RaceTable")]
    pub race_table: RaceTable,
    #[serde(rename = "StandingsTable")]
    pub standings_table: StandingsTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RaceTable {
    #[serde(rename = "Races")]
    pub races: Vec<Race>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Race {
    #[serde(deserialize_with = "lenient_string")]
    pub season: String,
    #[serde(deserialize_with = "lenient_string")]
    pub round: String,
    pub race_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(rename = "Circuit")]
    pub circuit: Circuit,
    #[serde(rename = "Results")]
    pub results: Vec<ResultEntry>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Circuit {
    pub circuit_name: String,
    #[serde(rename = "Location")]
    pub location: Location,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Location {
    pub locality: String,
    pub country: String,
}

/// One classified driver in a race.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ResultEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub position: String,
    #[serde(deserialize_with = "lenient_string")]
    pub points: String,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Driver {
    pub driver_id: String,
    pub code: String,
    pub given_name: String,
    pub family_name: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Constructor {
    pub constructor_id: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StandingsTable {
    #[serde(rename = "StandingsLists")]
    pub standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StandingsList {
    #[serde(rename = "DriverStandings")]
    pub driver_standings: Vec<DriverStanding>,
    #[serde(rename = "ConstructorStandings")]
    pub constructor_standings: Vec<ConstructorStanding>,
}

/// Cumulative driver position as of one round.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DriverStanding {
    #[serde(deserialize_with = "lenient_string")]
    pub position: String,
    #[serde(deserialize_with = "lenient_string")]
    pub points: String,
    #[serde(deserialize_with = "lenient_string")]
    pub wins: String,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructors")]
    pub constructors: Vec<Constructor>,
}

/// Cumulative constructor position as of one round.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ConstructorStanding {
    #[serde(deserialize_with = "lenient_string")]
    pub position: String,
    #[serde(deserialize_with = "lenient_string")]
    pub points: String,
    #[serde(deserialize_with = "lenient_string")]
    pub wins: String,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
}

/// One scheduled event of a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub season: u32,
    pub round: u32,
    pub race_name: String,
    pub circuit_name: String,
    pub locality: String,
    pub country: String,
    pub race_date: String,
    pub race_time: String,
}

impl Round {
    /// Convert a schedule entry. `None` when the round number is unusable.
    pub fn from_race(race: &Race, requested_season: u32) -> Option<Self> {
        let round = race.round.trim().parse::<u32>().ok()?;
        let season = race
            .season
            .trim()
            .parse::<u32>()
            .unwrap_or(requested_season);
        Some(Self {
            season,
            round,
            race_name: race.race_name.clone(),
            circuit_name: race.circuit.circuit_name.clone(),
            locality: race.circuit.location.locality.clone(),
            country: race.circuit.location.country.clone(),
            race_date: race.date.clone(),
            race_time: race.time.clone(),
        })
    }
}

/// Points as Ergast reports them; blanks and garbage count as zero.
pub fn parse_points(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn parse_count(raw: &str) -> u32 {
    let raw = raw.trim();
    raw.parse::<u32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u32))
        .unwrap_or(0)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}
