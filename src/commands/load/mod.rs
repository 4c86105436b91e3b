use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use csv::ReaderBuilder;
use rusqlite::{Connection, params};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::cli::LoadArgs;
use crate::model::{
    BatchReport, BatchStatus, FacilityRecord, LoadRunCounts, LoadRunManifest, LoadRunPaths,
    LoadSummary, MAX_FACILITY_KEY_CHARS, OVERALL_RATING_RANGE, QualityObservation, QualityRecord,
};

const DB_SCHEMA_VERSION: &str = "0.1.0";

mod batch_insert;
mod db_setup;
mod preprocess;
mod report;
mod run;
mod source;

pub use run::run;

use batch_insert::*;
use db_setup::*;
use preprocess::*;
use report::*;
use source::*;
