use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI configuration (also reads from env via clap)
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "M3U playlist metadata tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Project callSign -> stationId rows out of a guide JSON document
    Extract {
        /// Station-list JSON document exported from the guide service
        input: PathBuf,
        /// CSV file to write, one row per station with a header
        output: PathBuf,
    },
    /// Inject mapping-table attributes into an M3U playlist
    Enrich {
        /// Original playlist
        input: PathBuf,
        /// Mapping table: channel,key,value rows with a header
        mapping: PathBuf,
        /// Suffix inserted before the output file extension (env: M3U_ENRICH_SUFFIX)
        #[arg(env = "M3U_ENRICH_SUFFIX", default_value = "-enriched", allow_hyphen_values = true)]
        suffix: String,
        /// Guide JSON used to resolve channel-id call signs to station ids
        #[arg(long)]
        stations: Option<PathBuf>,
    },
}
