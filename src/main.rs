use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;

use m3u_enrich::{
    config::{Cli, Command},
    enrich, mapping, playlist, stations,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    match cli.command {
        Command::Extract { input, output } => run_extract(&input, &output),
        Command::Enrich {
            input,
            mapping,
            suffix,
            stations,
        } => run_enrich(&input, &mapping, &suffix, stations.as_deref()),
    }
}

fn run_extract(input: &Path, output: &Path) -> Result<()> {
    let stations = stations::decode_stations(&read_guide_document(input)?)?;
    mapping::write_station_rows(output, &stations)?;
    info!(count = stations.len(), output = %output.display(), "Wrote station rows");
    Ok(())
}

fn run_enrich(
    input: &Path,
    mapping_path: &Path,
    suffix: &str,
    stations_path: Option<&Path>,
) -> Result<()> {
    let text = fs::read_to_string(input)
        .map_err(|e| anyhow!("failed to read playlist {}: {e}", input.display()))?;
    let mut playlist = playlist::parse(&text);
    info!(channels = playlist.channels.len(), path = %input.display(), "Parsed playlist");

    let mapping = mapping::load_mapping(mapping_path)?;
    let guide = match stations_path {
        Some(path) => {
            let rows = stations::decode_stations(&read_guide_document(path)?)?;
            info!(count = rows.len(), path = %path.display(), "Loaded guide stations");
            Some(stations::station_lookup(rows))
        }
        None => None,
    };

    enrich::enrich_playlist(&mut playlist, &mapping, guide.as_ref());

    let output = output_path(input, suffix);
    fs::write(&output, playlist::render(&playlist))
        .map_err(|e| anyhow!("failed to write {}: {e}", output.display()))?;
    info!(output = %output.display(), "Wrote enriched playlist");
    Ok(())
}

fn read_guide_document(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read guide document {}: {e}", path.display()))?;
    serde_json::from_str(&text)
        .map_err(|e| anyhow!("guide document {} is not valid JSON: {e}", path.display()))
}

/// `playlist.m3u` + `-enriched` -> `playlist-enriched.m3u`
fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("playlist");
    match input.extension().and_then(|s| s.to_str()) {
        Some(ext) => input.with_file_name(format!("{stem}{suffix}.{ext}")),
        None => input.with_file_name(format!("{stem}{suffix}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_inserts_suffix_before_extension() {
        assert_eq!(
            output_path(Path::new("dir/playlist.m3u"), "-enriched"),
            PathBuf::from("dir/playlist-enriched.m3u")
        );
        assert_eq!(
            output_path(Path::new("playlist"), "-enriched"),
            PathBuf::from("playlist-enriched")
        );
    }
}
