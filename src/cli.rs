use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{BIA_REGIONS_URL, CMT_BASIC_URL, DEFAULT_TIMEOUT_SECS, Endpoints, FWS_TAXONOMY_URL, TRIBAL_LEADERS_URL};
use crate::csv_handler::DEFAULT_NAME_COLUMN;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch BIA and USFWS data and resolve scientific names", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "csv", global = true)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Also write log lines to this file.
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Append to the log file instead of truncating it.
    #[arg(long, requires = "log_file", global = true)]
    pub log_append: bool,

    /// Only log warnings and errors; with --log-file, do not echo to stderr.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Base URL of the FWS taxonomy service.
    #[arg(long, env = "FWS_TAXONOMY_URL", default_value = FWS_TAXONOMY_URL, global = true, hide_default_value = true)]
    pub taxonomy_url: String,

    /// Tribal leaders directory JSON.
    #[arg(long, env = "BIA_TRIBES_URL", default_value = TRIBAL_LEADERS_URL, global = true, hide_default_value = true)]
    pub tribes_url: String,

    /// BIA region polygons GeoJSON.
    #[arg(long, env = "BIA_REGIONS_URL", default_value = BIA_REGIONS_URL, global = true, hide_default_value = true)]
    pub regions_url: String,

    /// CMT endpoint; region numbers are appended.
    #[arg(long, env = "FWS_CMT_URL", default_value = CMT_BASIC_URL, global = true, hide_default_value = true)]
    pub cmt_url: String,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,
}

impl EndpointArgs {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            tribal_leaders: self.tribes_url.clone(),
            bia_regions: self.regions_url.clone(),
            cmt_basic: self.cmt_url.clone(),
            fws_taxonomy: self.taxonomy_url.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up a scientific name; returns every record the service knows.
    Search { name: String },

    /// Resolve a scientific name to its best-matching taxon.
    BestMatch {
        name: String,
        /// Keep only candidates in these NPSpecies categories (repeatable).
        #[arg(short, long = "category", value_name = "CATEGORY")]
        categories: Vec<String>,
        /// Accepted for compatibility; not used for filtering.
        #[arg(long)]
        kingdom: Option<String>,
    },

    /// Look up FWS taxon codes.
    Codes {
        #[arg(required = true, value_delimiter = ',')]
        codes: Vec<u64>,
    },

    /// Resolve every name in a CSV column.
    Batch {
        /// Path to the input CSV file.
        #[arg(short, long, value_name = "FILE")]
        input_file: PathBuf,
        /// Column holding the scientific names.
        #[arg(long, default_value = DEFAULT_NAME_COLUMN)]
        column: String,
        /// Input is tab-separated.
        #[arg(long)]
        tsv: bool,
        #[arg(short, long = "category", value_name = "CATEGORY")]
        categories: Vec<String>,
    },

    /// BIA tribal leaders directory.
    Tribes,

    /// BIA region boundaries.
    BiaRegions,

    /// USFWS Corporate Master Table (USFWS network only).
    Cmt {
        /// Legacy regions 0-9; all when omitted.
        #[arg(short, long = "region", value_delimiter = ',')]
        regions: Vec<u8>,
        /// Emit GeoJSON points from LAT/LONG instead of a table.
        #[arg(long)]
        points: bool,
    },

    /// Fetch any GeoJSON feature collection.
    Geojson { url: String },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}
