//! Serde shapes for the four input documents (map, jobs, weather seed,
//! burst schedule) and their validation into core types.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::city::{CityMap, TileSpec};
use crate::orders::Order;
use crate::weather::{Burst, WeatherCondition, WeatherModel};

use super::ScenarioError;

#[derive(Debug, Clone, Deserialize)]
pub struct LegendEntry {
    pub name: Option<String>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default = "default_surface_weight")]
    pub surface_weight: f64,
}

fn default_surface_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapDoc {
    pub name: Option<String>,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<String>,
    pub legend: HashMap<String, LegendEntry>,
    #[serde(default)]
    pub goal: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobEntry {
    pub id: String,
    pub pickup: (i32, i32),
    pub dropoff: (i32, i32),
    #[serde(default)]
    pub payout: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub release_time: f64,
    /// Raw source deadline; superseded by the priority-derived deadline at
    /// acceptance and therefore unused.
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Job documents come either as a bare list or wrapped in a `jobs` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JobsDoc {
    List(Vec<JobEntry>),
    Wrapped { jobs: Vec<JobEntry> },
}

impl JobsDoc {
    pub fn entries(self) -> Vec<JobEntry> {
        match self {
            JobsDoc::List(entries) => entries,
            JobsDoc::Wrapped { jobs } => jobs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherInitial {
    pub condition: String,
    #[serde(default)]
    pub intensity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherDoc {
    pub city: Option<String>,
    pub initial: WeatherInitial,
    #[serde(default)]
    pub conditions: Vec<String>,
    pub transition: HashMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BurstEntry {
    pub condition: String,
    pub start_s: f64,
    pub duration_s: f64,
    #[serde(default = "default_intensity")]
    pub intensity: f64,
}

fn default_intensity() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BurstsDoc {
    #[serde(default)]
    pub bursts: Vec<BurstEntry>,
}

/// Parse and validate a map document into a [`CityMap`].
pub fn parse_map_doc(json: &str) -> Result<CityMap, ScenarioError> {
    let doc: MapDoc = serde_json::from_str(json)?;

    if doc.width == 0 || doc.height == 0 {
        return Err(ScenarioError::Map("zero width or height".into()));
    }
    if doc.tiles.len() != doc.height {
        return Err(ScenarioError::Map(format!(
            "expected {} rows, found {}",
            doc.height,
            doc.tiles.len()
        )));
    }

    let mut legend: HashMap<char, TileSpec> = HashMap::new();
    for (key, entry) in &doc.legend {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(ScenarioError::Map(format!(
                "legend key {key:?} is not a single character"
            )));
        };
        if entry.surface_weight < 0.0 {
            return Err(ScenarioError::Map(format!(
                "tile {c:?} has a negative surface weight"
            )));
        }
        legend.insert(
            c,
            TileSpec {
                name: entry.name.clone().unwrap_or_else(|| c.to_string()),
                blocked: entry.blocked,
                surface_weight: entry.surface_weight,
            },
        );
    }

    let mut tiles = Vec::with_capacity(doc.height);
    for (y, row) in doc.tiles.iter().enumerate() {
        let row: Vec<char> = row.chars().collect();
        if row.len() != doc.width {
            return Err(ScenarioError::Map(format!(
                "row {y} has {} tiles, expected {}",
                row.len(),
                doc.width
            )));
        }
        for &c in &row {
            if !legend.contains_key(&c) {
                return Err(ScenarioError::Map(format!(
                    "tile {c:?} at row {y} is missing from the legend"
                )));
            }
        }
        tiles.push(row);
    }

    let map = CityMap::new(
        doc.name.unwrap_or_else(|| "unnamed".to_string()),
        tiles,
        legend,
        doc.goal,
    );
    if map.walkable_tiles().is_empty() {
        return Err(ScenarioError::Map("no walkable tiles".into()));
    }
    Ok(map)
}

/// Parse and validate a jobs document into orders, checked against the map.
pub fn parse_jobs_doc(json: &str, map: &CityMap) -> Result<Vec<Order>, ScenarioError> {
    let doc: JobsDoc = serde_json::from_str(json)?;
    let entries = doc.entries();
    if entries.is_empty() {
        return Err(ScenarioError::Jobs("no jobs defined".into()));
    }

    let mut seen = HashSet::new();
    let mut orders = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.id.is_empty() {
            return Err(ScenarioError::Jobs("job with empty id".into()));
        }
        if !seen.insert(entry.id.clone()) {
            return Err(ScenarioError::Jobs(format!("duplicate job id {}", entry.id)));
        }
        for (label, tile) in [("pickup", entry.pickup), ("dropoff", entry.dropoff)] {
            if !map.in_bounds(tile.0, tile.1) {
                return Err(ScenarioError::Jobs(format!(
                    "job {}: {label} {tile:?} is out of bounds",
                    entry.id
                )));
            }
        }
        if entry.payout < 0.0 || entry.weight < 0.0 || entry.release_time < 0.0 {
            return Err(ScenarioError::Jobs(format!(
                "job {}: negative payout, weight, or release time",
                entry.id
            )));
        }
        orders.push(Order::new(
            entry.id,
            entry.pickup,
            entry.dropoff,
            entry.payout,
            entry.weight,
            entry.priority,
            entry.release_time,
        ));
    }
    Ok(orders)
}

fn parse_condition(name: &str, context: &str) -> Result<WeatherCondition, ScenarioError> {
    WeatherCondition::parse(name)
        .ok_or_else(|| ScenarioError::Weather(format!("unknown condition {name:?} in {context}")))
}

/// Parse and validate the weather seed plus burst schedule into a model.
pub fn parse_weather_doc(
    weather_json: &str,
    bursts_json: &str,
    seed: Option<u64>,
) -> Result<WeatherModel, ScenarioError> {
    let doc: WeatherDoc = serde_json::from_str(weather_json)?;
    let bursts_doc: BurstsDoc = serde_json::from_str(bursts_json)?;

    let initial = parse_condition(&doc.initial.condition, "initial state")?;
    if doc.transition.is_empty() {
        return Err(ScenarioError::Weather("empty transition matrix".into()));
    }

    let mut transition = HashMap::new();
    for (from, row) in &doc.transition {
        let from = parse_condition(from, "transition matrix")?;
        if row.is_empty() {
            return Err(ScenarioError::Weather(format!(
                "condition {:?} has an empty transition row",
                from.as_str()
            )));
        }
        let mut parsed_row = Vec::with_capacity(row.len());
        let mut total = 0.0;
        for (to, weight) in row {
            let to = parse_condition(to, "transition matrix")?;
            if *weight < 0.0 {
                return Err(ScenarioError::Weather(format!(
                    "negative probability for {} -> {}",
                    from.as_str(),
                    to.as_str()
                )));
            }
            total += weight;
            parsed_row.push((to, *weight));
        }
        if total <= 0.0 {
            return Err(ScenarioError::Weather(format!(
                "transition row for {} sums to zero",
                from.as_str()
            )));
        }
        // Stable sampling order regardless of JSON map ordering.
        parsed_row.sort_by_key(|(to, _)| *to);
        transition.insert(from, parsed_row);
    }
    if !transition.contains_key(&initial) {
        return Err(ScenarioError::Weather(format!(
            "initial condition {} has no transition row",
            initial.as_str()
        )));
    }

    let mut bursts = Vec::with_capacity(bursts_doc.bursts.len());
    for entry in bursts_doc.bursts {
        let condition = parse_condition(&entry.condition, "burst schedule")?;
        if entry.duration_s < 0.0 || entry.start_s < 0.0 {
            return Err(ScenarioError::Weather(
                "burst with negative start or duration".into(),
            ));
        }
        bursts.push(Burst {
            condition,
            start_s: entry.start_s,
            duration_s: entry.duration_s,
            intensity: entry.intensity.clamp(0.0, 1.0),
        });
    }

    Ok(WeatherModel::new(
        initial,
        doc.initial.intensity,
        transition,
        bursts,
        seed,
    ))
}

/// Parse a burst document alone (exposed for tooling and tests).
pub fn parse_bursts_doc(json: &str) -> Result<BurstsDoc, ScenarioError> {
    Ok(serde_json::from_str(json)?)
}
