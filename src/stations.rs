use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

/// Station identifiers arrive as strings or bare numbers depending on the
/// guide export.
#[derive(Clone, Deserialize, Serialize, Debug)]
#[serde(untagged)]
pub enum IdField {
    Text(String),
    Number(i64),
}

impl Default for IdField {
    fn default() -> Self {
        IdField::Text(String::new())
    }
}

impl IdField {
    pub fn as_text(&self) -> String {
        match self {
            IdField::Text(s) => s.trim().to_string(),
            IdField::Number(n) => n.to_string(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize, Debug, Default)]
pub struct StationRecord {
    #[serde(default, rename = "callSign")]
    pub call_sign: String,
    #[serde(default, rename = "stationId")]
    pub station_id: IdField,
    #[serde(default)]
    pub channel: IdField,
    #[serde(default)]
    pub name: String,
}

/// One usable station row after decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Station {
    pub call_sign: String,
    pub station_id: String,
    pub channel: String,
    pub name: String,
}

/// Decode a guide document into station rows. Some exports wrap the station
/// list in an outer array; one level of nesting is unwrapped. Records that
/// fail to decode, carry no call sign, or repeat a call sign are skipped.
pub fn decode_stations(doc: &JsonValue) -> Result<Vec<Station>> {
    let items: &[JsonValue] = match doc {
        JsonValue::Array(items) => match items.first() {
            Some(JsonValue::Array(inner)) => inner,
            _ => items,
        },
        _ => bail!("guide document is not a JSON array of stations"),
    };
    let mut stations = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (idx, item) in items.iter().enumerate() {
        let record: StationRecord = match serde_json::from_value(item.clone()) {
            Ok(r) => r,
            Err(e) => {
                warn!(index = idx, "skipping malformed station record: {e}");
                continue;
            }
        };
        let call_sign = record.call_sign.trim().to_string();
        if call_sign.is_empty() {
            warn!(index = idx, "skipping station record without a callSign");
            continue;
        }
        if !seen.insert(call_sign.clone()) {
            warn!(%call_sign, "skipping duplicate callSign");
            continue;
        }
        stations.push(Station {
            call_sign,
            station_id: record.station_id.as_text(),
            channel: record.channel.as_text(),
            name: record.name.trim().to_string(),
        });
    }
    Ok(stations)
}

/// callSign -> station lookup for enrichment.
pub fn station_lookup(stations: Vec<Station>) -> HashMap<String, Station> {
    stations
        .into_iter()
        .map(|s| (s.call_sign.clone(), s))
        .collect()
}
