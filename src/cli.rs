use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser};

pub const LOAD_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Parser, Debug)]
#[command(
    name = "hospital-quality",
    version,
    about = "Load CMS hospital quality data into the facility and quality tables"
)]
pub struct Cli {
    #[command(flatten)]
    pub load: LoadArgs,
}

#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Date the dataset was published, applied to every observation (YYYY-MM-DD).
    #[arg(value_name = "LOAD_DATE", value_parser = parse_load_date)]
    pub load_date: NaiveDate,

    /// CMS hospital general information CSV export.
    #[arg(value_name = "FILE_PATH")]
    pub file_path: PathBuf,

    /// Base directory for the default database and run reports.
    #[arg(
        long,
        env = "HOSPITAL_QUALITY_CACHE_ROOT",
        default_value = ".cache/hospital-quality"
    )]
    pub cache_root: PathBuf,

    /// SQLite database file (defaults to <CACHE_ROOT>/hospital_quality.sqlite).
    #[arg(long, env = "HOSPITAL_QUALITY_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Records per insert window; 0 is treated as 1.
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// JSON run report path (defaults to <CACHE_ROOT>/manifests/load_run_<UTC>.json).
    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

pub fn parse_load_date(raw: &str) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(raw.trim(), LOAD_DATE_FORMAT)
        .map_err(|err| format!("expected an ISO date like 2021-07-01: {err}"))?;

    let today = Utc::now().date_naive();
    if date > today {
        return Err(format!("load date {date} is after today ({today})"));
    }

    Ok(date)
}
