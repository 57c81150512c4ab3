// src/season/schedule.rs

use super::rows::TableRow;
use crate::fetch::Round;

/// Schedule rows (`dim_round_dates`) are the rounds themselves.
impl TableRow for Round {
    fn field(&self, column: &str) -> Option<String> {
        Some(match column {
            "season" => self.season.to_string(),
            "round" => self.round.to_string(),
            "raceName" => self.race_name.clone(),
            "circuitName" => self.circuit_name.clone(),
            "locality" => self.locality.clone(),
            "country" => self.country.clone(),
            "raceDate" => self.race_date.clone(),
            "raceTime" => self.race_time.clone(),
            _ => return None,
        })
    }
}
