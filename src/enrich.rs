use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::domain::{normalize_name, Mapping};
use crate::playlist::Playlist;
use crate::stations::Station;

/// Attribute carrying the call sign on an entry, per the Channels DVR
/// custom-channel convention.
pub const CALL_SIGN_ATTR: &str = "channel-id";
/// Attribute receiving the guide station identifier.
pub const STATION_ID_ATTR: &str = "tvc-guide-stationid";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichStats {
    pub total: usize,
    pub enriched: usize,
    pub passed_through: usize,
    pub guide_misses: usize,
}

/// Merge mapping-table attributes into every entry, then resolve call signs
/// against the guide lookup when one was supplied. Entries without a mapping
/// row pass through unchanged; order and entry count are preserved.
pub fn enrich_playlist(
    playlist: &mut Playlist,
    mapping: &Mapping,
    guide: Option<&HashMap<String, Station>>,
) -> EnrichStats {
    let mut stats = EnrichStats {
        total: playlist.channels.len(),
        ..Default::default()
    };
    for ch in playlist.channels.iter_mut() {
        let mut touched = false;
        if let Some(attrs) = mapping.get(&normalize_name(&ch.name)) {
            for (key, value) in attrs {
                ch.set_attr(key, value);
            }
            touched = !attrs.is_empty();
        }
        if let Some(guide) = guide {
            if let Some(call_sign) = ch.attr(CALL_SIGN_ATTR).map(str::to_owned) {
                match guide.get(&call_sign) {
                    Some(station) if !station.station_id.is_empty() => {
                        ch.set_attr(STATION_ID_ATTR, &station.station_id);
                        touched = true;
                    }
                    _ => {
                        warn!(channel = %ch.name, %call_sign, "no guide station id for call sign");
                        stats.guide_misses += 1;
                    }
                }
            }
        }
        if touched {
            debug!(channel = %ch.name, "enriched");
            stats.enriched += 1;
        } else {
            stats.passed_through += 1;
        }
    }
    info!(
        total = stats.total,
        enriched = stats.enriched,
        passed_through = stats.passed_through,
        guide_misses = stats.guide_misses,
        "Enrichment complete"
    );
    stats
}
