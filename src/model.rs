use chrono::NaiveDate;
use serde::Serialize;

pub const MAX_FACILITY_KEY_CHARS: usize = 6;
/// Star ratings outside this range are treated as unknown.
pub const OVERALL_RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Static facility attributes; written once per facility key and never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityRecord {
    pub facility_key: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub state: Option<String>,
}

/// One quality snapshot for a facility, keyed by `(facility_key, load_date)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityObservation {
    pub facility_key: String,
    pub load_date: NaiveDate,
    /// `None` when the source reported a non-numeric rating.
    pub overall_rating: Option<i64>,
    pub ownership: Option<String>,
    pub emergency_services: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityRecord {
    pub facility: FacilityRecord,
    pub observation: QualityObservation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Done,
    DoneAfterBackfill,
    Failed,
}

impl BatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::DoneAfterBackfill => "done_after_backfill",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch: usize,
    pub first_row: usize,
    pub rows: usize,
    pub status: BatchStatus,
    pub observations_inserted: usize,
    pub facilities_inserted: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    pub batches: Vec<BatchReport>,
}

impl LoadSummary {
    pub fn count_status(&self, status: BatchStatus) -> usize {
        self.batches
            .iter()
            .filter(|report| report.status == status)
            .count()
    }

    pub fn observations_inserted(&self) -> usize {
        self.batches
            .iter()
            .map(|report| report.observations_inserted)
            .sum()
    }

    pub fn facilities_inserted(&self) -> usize {
        self.batches
            .iter()
            .map(|report| report.facilities_inserted)
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.count_status(BatchStatus::Failed) > 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadRunPaths {
    pub cache_root: String,
    pub source_path: String,
    pub db_path: String,
    pub report_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadRunCounts {
    pub source_rows: usize,
    pub dropped_rows: usize,
    pub records: usize,
    pub batches: usize,
    pub batches_done: usize,
    pub batches_done_after_backfill: usize,
    pub batches_failed: usize,
    pub observations_inserted: usize,
    pub facilities_inserted: usize,
    pub facilities_total: i64,
    pub observations_total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub db_schema_version: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub load_date: NaiveDate,
    pub batch_size: usize,
    pub source_sha256: String,
    pub paths: LoadRunPaths,
    pub counts: LoadRunCounts,
    pub batches: Vec<BatchReport>,
}
