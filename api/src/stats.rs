//! Wire types for the stats.nba.com JSON format.
//!
//! Every endpoint answers with a list of named result sets, each a header row
//! plus positional rows:
//!
//! ```json
//! { "resultSets": [ { "name": "LeagueDashPlayerStats",
//!                     "headers": ["PLAYER_ID", "PLAYER_NAME", ...],
//!                     "rowSet": [[203954, "Joel Embiid", ...]] } ] }
//! ```
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default)]
    pub result_sets: Vec<ResultSet>,
}

impl StatsResponse {
    /// The first result set, which is the one every endpoint we use cares about.
    pub fn primary(&self) -> Option<&ResultSet> {
        self.result_sets.first()
    }

    pub fn named(&self, name: &str) -> Option<&ResultSet> {
        self.result_sets.iter().find(|set| set.name == name)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.row_set.iter().map(|values| Row {
            headers: &self.headers,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.row_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_set.is_empty()
    }
}

/// Header-keyed view over one positional row.
///
/// Lookups never fail: a missing column or a null/non-numeric cell reads as
/// zero (or an empty string), so one odd cell can't drop a whole table.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.headers
            .iter()
            .position(|h| h == key)
            .and_then(|i| self.values.get(i))
    }

    pub fn f64(&self, key: &str) -> f64 {
        match self.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or_default(),
            _ => 0.0,
        }
    }

    pub fn u32(&self, key: &str) -> u32 {
        match self.get(key) {
            Some(Value::Number(n)) => n
                .as_u64()
                .map(|v| v.min(u64::from(u32::MAX)) as u32)
                .or_else(|| n.as_f64().map(|v| v.max(0.0) as u32))
                .unwrap_or_default(),
            Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or_default(),
            _ => 0,
        }
    }

    pub fn string(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}
