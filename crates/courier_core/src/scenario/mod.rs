//! Scenario assembly: input documents, parameters, and the world builder.
//!
//! Map, job, and weather data are immutable inputs loaded once at game
//! start. Malformed or missing data is fatal for the whole simulation — no
//! default city is ever synthesized silently.

mod build;
mod data;
mod params;

pub use build::{build_scenario, human_entity};
pub use data::{
    parse_bursts_doc, parse_jobs_doc, parse_map_doc, parse_weather_doc, BurstEntry, BurstsDoc,
    JobEntry, JobsDoc, LegendEntry, MapDoc, WeatherDoc, WeatherInitial,
};
pub use params::{BotSpec, ScenarioParams, SimulationEndTimeMs, TickConfig};

use std::fmt;

/// Load-time failure. Every variant carries a human-readable reason.
#[derive(Debug)]
pub enum ScenarioError {
    /// Input document is not valid JSON.
    Parse(serde_json::Error),
    Map(String),
    Jobs(String),
    Weather(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Parse(err) => write!(f, "invalid scenario document: {err}"),
            ScenarioError::Map(reason) => write!(f, "invalid map data: {reason}"),
            ScenarioError::Jobs(reason) => write!(f, "invalid job data: {reason}"),
            ScenarioError::Weather(reason) => write!(f, "invalid weather data: {reason}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(err: serde_json::Error) -> Self {
        ScenarioError::Parse(err)
    }
}
