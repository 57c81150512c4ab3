// src/season/rows.rs

/// Fixed column layout of one output table. Column order is part of the
/// file contract and does not depend on the season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl TableSchema {
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name)
    }
}

pub const DRIVER_RACE_POINTS: TableSchema = TableSchema {
    name: "f1_official_driver_race_points",
    columns: &[
        "season",
        "round",
        "raceName",
        "position",
        "points",
        "driverAbbr",
        "ergast_driver_id",
        "driver_givenName",
        "driver_familyName",
        "constructorCode",
        "constructorAbbr",
        "constructor_name",
    ],
};

pub const CONSTRUCTOR_RACE_POINTS: TableSchema = TableSchema {
    name: "f1_official_constructor_race_points",
    columns: &[
        "season",
        "round",
        "raceName",
        "points",
        "constructorCode",
        "constructorAbbr",
        "constructor_name",
    ],
};

pub const DRIVER_STANDINGS: TableSchema = TableSchema {
    name: "f1_official_driver_standings",
    columns: &[
        "season",
        "round",
        "raceName",
        "position",
        "points",
        "wins",
        "driverAbbr",
        "ergast_driver_id",
        "driver_givenName",
        "driver_familyName",
        "constructorCode",
        "constructorAbbr",
        "constructor_name",
    ],
};

pub const CONSTRUCTOR_STANDINGS: TableSchema = TableSchema {
    name: "f1_official_constructor_standings",
    columns: &[
        "season",
        "round",
        "raceName",
        "position",
        "points",
        "wins",
        "constructorCode",
        "constructorAbbr",
        "constructor_name",
    ],
};

pub const SCHEDULE: TableSchema = TableSchema {
    name: "dim_round_dates",
    columns: &[
        "season",
        "round",
        "raceName",
        "circuitName",
        "locality",
        "country",
        "raceDate",
        "raceTime",
    ],
};

/// A row that can render any column of its table by name.
pub trait TableRow {
    /// Rendered value for `column`, or `None` when the row has no such field.
    fn field(&self, column: &str) -> Option<String>;
}

/// Render a point total the way the API reads: `25`, `0.5`, `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Points scored by one driver in one round.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverResultRow {
    pub season: u32,
    pub round: u32,
    pub race_name: String,
    pub position: String,
    pub points: f64,
    pub driver_abbr: String,
    pub ergast_driver_id: String,
    pub driver_given_name: String,
    pub driver_family_name: String,
    pub constructor_code: String,
    pub constructor_abbr: String,
    pub constructor_name: String,
}

impl TableRow for DriverResultRow {
    fn field(&self, column: &str) -> Option<String> {
        Some(match column {
            "season" => self.season.to_string(),
            "round" => self.round.to_string(),
            "raceName" => self.race_name.clone(),
            "position" => self.position.clone(),
            "points" => format_number(self.points),
            "driverAbbr" => self.driver_abbr.clone(),
            "ergast_driver_id" => self.ergast_driver_id.clone(),
            "driver_givenName" => self.driver_given_name.clone(),
            "driver_familyName" => self.driver_family_name.clone(),
            "constructorCode" => self.constructor_code.clone(),
            "constructorAbbr" => self.constructor_abbr.clone(),
            "constructor_name" => self.constructor_name.clone(),
            _ => return None,
        })
    }
}

/// Points scored by one constructor in one round, summed over its drivers.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorResultRow {
    pub season: u32,
    pub round: u32,
    pub race_name: String,
    pub points: f64,
    pub constructor_code: String,
    pub constructor_abbr: String,
    pub constructor_name: String,
}

impl TableRow for ConstructorResultRow {
    fn field(&self, column: &str) -> Option<String> {
        Some(match column {
            "season" => self.season.to_string(),
            "round" => self.round.to_string(),
            "raceName" => self.race_name.clone(),
            "points" => format_number(self.points),
            "constructorCode" => self.constructor_code.clone(),
            "constructorAbbr" => self.constructor_abbr.clone(),
            "constructor_name" => self.constructor_name.clone(),
            _ => return None,
        })
    }
}

/// Cumulative driver championship position after one round.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverStandingRow {
    pub season: u32,
    pub round: u32,
    pub race_name: String,
    pub position: String,
    pub points: f64,
    pub wins: u32,
    pub driver_abbr: String,
    pub ergast_driver_id: String,
    pub driver_given_name: String,
    pub driver_family_name: String,
    pub constructor_code: String,
    pub constructor_abbr: String,
    pub constructor_name: String,
}

impl TableRow for DriverStandingRow {
    fn field(&self, column: &str) -> Option<String> {
        Some(match column {
            "season" => self.season.to_string(),
            "round" => self.round.to_string(),
            "raceName" => self.race_name.clone(),
            "position" => self.position.clone(),
            "points" => format_number(self.points),
            "wins" => self.wins.to_string(),
            "driverAbbr" => self.driver_abbr.clone(),
            "ergast_driver_id" => self.ergast_driver_id.clone(),
            "driver_givenName" => self.driver_given_name.clone(),
            "driver_familyName" => self.driver_family_name.clone(),
            "constructorCode" => self.constructor_code.clone(),
            "constructorAbbr" => self.constructor_abbr.clone(),
            "constructor_name" => self.constructor_name.clone(),
            _ => return None,
        })
    }
}

/// Cumulative constructor championship position after one round.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorStandingRow {
    pub season: u32,
    pub round: u32,
    pub race_name: String,
    pub position: String,
    pub points: f64,
    pub wins: u32,
    pub constructor_code: String,
    pub constructor_abbr: String,
    pub constructor_name: String,
}

impl TableRow for ConstructorStandingRow {
    fn field(&self, column: &str) -> Option<String> {
        Some(match column {
            "season" => self.season.to_string(),
            "round" => self.round.to_string(),
            "raceName" => self.race_name.clone(),
            "position" => self.position.clone(),
            "points" => format_number(self.points),
            "wins" => self.wins.to_string(),
            "constructorCode" => self.constructor_code.clone(),
            "constructorAbbr" => self.constructor_abbr.clone(),
            "constructor_name" => self.constructor_name.clone(),
            _ => return None,
        })
    }
}
