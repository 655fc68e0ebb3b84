use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::{info, warn};

use crate::domain::{normalize_name, Mapping};
use crate::stations::Station;

/// Read a mapping table from CSV. Columns are located by header name so the
/// user may reorder or add columns; rows that are short or empty are skipped.
/// Duplicate (channel, key) pairs keep the last row.
pub fn read_mapping<R: Read>(reader: R) -> Result<Mapping> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let name_idx = column(&["channel", "name"])
        .ok_or_else(|| anyhow!("mapping table has no 'channel' column"))?;
    let key_idx = column(&["key", "attribute"])
        .ok_or_else(|| anyhow!("mapping table has no 'key' column"))?;
    let value_idx =
        column(&["value"]).ok_or_else(|| anyhow!("mapping table has no 'value' column"))?;

    let mut mapping = Mapping::new();
    for (idx, record) in csv_reader.records().enumerate() {
        // header is row 1
        let row = idx + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(row, "skipping malformed mapping row: {e}");
                continue;
            }
        };
        let (Some(name), Some(key), Some(value)) = (
            record.get(name_idx),
            record.get(key_idx),
            record.get(value_idx),
        ) else {
            warn!(row, "skipping short mapping row");
            continue;
        };
        if name.is_empty() || key.is_empty() {
            warn!(row, "skipping mapping row with empty channel or key");
            continue;
        }
        let attrs = mapping.entry(normalize_name(name)).or_default();
        match attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((key.to_string(), value.to_string())),
        }
    }
    Ok(mapping)
}

pub fn load_mapping(path: &Path) -> Result<Mapping> {
    let file = File::open(path)
        .map_err(|e| anyhow!("failed to open mapping table {}: {e}", path.display()))?;
    let mapping = read_mapping(file)?;
    info!(channels = mapping.len(), path = %path.display(), "Loaded mapping table");
    Ok(mapping)
}

/// Write extracted stations as a callSign,stationId table for hand editing.
pub fn write_station_rows(path: &Path, stations: &[Station]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| anyhow!("failed to create {}: {e}", path.display()))?;
    writer.write_record(["callSign", "stationId"])?;
    for s in stations {
        writer.write_record([s.call_sign.as_str(), s.station_id.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_mapping_locates_columns_by_header() {
        let csv = "key,channel,value\ntvg-logo,BBC One,http://x/logo.png\n";
        let mapping = read_mapping(Cursor::new(csv)).unwrap();
        assert_eq!(
            mapping.get("bbc one").unwrap(),
            &vec![("tvg-logo".to_string(), "http://x/logo.png".to_string())]
        );
    }

    #[test]
    fn read_mapping_last_row_wins() {
        let csv = "channel,key,value\nBBC One,tvg-logo,http://old\nBBC One,tvg-logo,http://new\n";
        let mapping = read_mapping(Cursor::new(csv)).unwrap();
        assert_eq!(
            mapping.get("bbc one").unwrap(),
            &vec![("tvg-logo".to_string(), "http://new".to_string())]
        );
    }

    #[test]
    fn read_mapping_trims_fields_and_skips_empty_rows() {
        let csv = "channel,key,value\n BBC One , tvg-logo , http://x/logo.png \n,, \nBBC Two,,x\n";
        let mapping = read_mapping(Cursor::new(csv)).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get("bbc one").unwrap(),
            &vec![("tvg-logo".to_string(), "http://x/logo.png".to_string())]
        );
    }

    #[test]
    fn read_mapping_requires_known_columns() {
        let csv = "a,b,c\n1,2,3\n";
        assert!(read_mapping(Cursor::new(csv)).is_err());
    }
}
