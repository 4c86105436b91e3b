use super::*;

const QUALITY_INSERT_SQL: &str = "
    INSERT INTO QualityDetails (
      facility_key, load_date, overall_rating, ownership, emergency_services
    ) VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT (facility_key, load_date) DO NOTHING
";

const FACILITY_INSERT_SQL: &str = "
    INSERT INTO FacilitySpecificDetails (
      facility_key, name, address, city, zip, state
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT (facility_key) DO NOTHING
";

#[derive(Debug)]
struct WindowOutcome {
    status: BatchStatus,
    observations_inserted: usize,
    facilities_inserted: usize,
    error: Option<anyhow::Error>,
}

impl WindowOutcome {
    fn done(status: BatchStatus, observations_inserted: usize, facilities_inserted: usize) -> Self {
        Self {
            status,
            observations_inserted,
            facilities_inserted,
            error: None,
        }
    }

    fn failed(facilities_inserted: usize, error: anyhow::Error) -> Self {
        Self {
            status: BatchStatus::Failed,
            observations_inserted: 0,
            facilities_inserted,
            error: Some(error),
        }
    }
}

/// Loads `records` in contiguous windows of `batch_size`, one window at a time.
///
/// A failed window is logged and recorded in the summary; later windows still run.
pub(super) fn batch_insert_quality_records(
    connection: &mut Connection,
    records: &[QualityRecord],
    batch_size: usize,
) -> LoadSummary {
    let batch_size = batch_size.max(1);
    let mut summary = LoadSummary::default();

    for (index, window) in records.chunks(batch_size).enumerate() {
        let batch = index + 1;
        info!(batch, rows = window.len(), "running batch");

        let outcome = load_window(connection, window);
        let error = outcome.error.map(|err| format!("{err:#}"));

        match &error {
            Some(message) => error!(batch, error = %message, "batch failed"),
            None => info!(
                batch,
                status = outcome.status.as_str(),
                observations_inserted = outcome.observations_inserted,
                facilities_inserted = outcome.facilities_inserted,
                "batch committed"
            ),
        }

        summary.batches.push(BatchReport {
            batch,
            first_row: index * batch_size,
            rows: window.len(),
            status: outcome.status,
            observations_inserted: outcome.observations_inserted,
            facilities_inserted: outcome.facilities_inserted,
            error,
        });
    }

    summary
}

fn load_window(connection: &mut Connection, window: &[QualityRecord]) -> WindowOutcome {
    let violation = match insert_observations(connection, window) {
        Ok(inserted) => return WindowOutcome::done(BatchStatus::Done, inserted, 0),
        Err(err) if is_foreign_key_violation(&err) => err,
        Err(err) => {
            return WindowOutcome::failed(
                0,
                anyhow::Error::new(err).context("quality insert failed"),
            );
        }
    };

    // The error does not say which rows lack a facility, so backfill the whole window.
    warn!(error = %violation, "foreign key violation, backfilling facilities");
    let facilities_inserted = match insert_facilities(connection, window) {
        Ok(inserted) => inserted,
        Err(err) => {
            return WindowOutcome::failed(
                0,
                anyhow::Error::new(err).context("facility backfill failed"),
            );
        }
    };

    match insert_observations(connection, window) {
        Ok(inserted) => {
            WindowOutcome::done(BatchStatus::DoneAfterBackfill, inserted, facilities_inserted)
        }
        Err(err) => WindowOutcome::failed(
            facilities_inserted,
            anyhow::Error::new(err).context("quality insert retry after backfill failed"),
        ),
    }
}

fn insert_observations(
    connection: &mut Connection,
    window: &[QualityRecord],
) -> rusqlite::Result<usize> {
    let tx = connection.transaction()?;
    let mut inserted = 0usize;

    {
        let mut statement = tx.prepare(QUALITY_INSERT_SQL)?;
        for record in window {
            let observation = &record.observation;
            inserted += statement.execute(params![
                &observation.facility_key,
                observation.load_date,
                observation.overall_rating,
                &observation.ownership,
                observation.emergency_services,
            ])?;
        }
    }

    tx.commit()?;
    Ok(inserted)
}

fn insert_facilities(
    connection: &mut Connection,
    window: &[QualityRecord],
) -> rusqlite::Result<usize> {
    let tx = connection.transaction()?;
    let mut inserted = 0usize;

    {
        let mut statement = tx.prepare(FACILITY_INSERT_SQL)?;
        for record in window {
            let facility = &record.facility;
            inserted += statement.execute(params![
                &facility.facility_key,
                &facility.name,
                &facility.address,
                &facility.city,
                &facility.zip,
                &facility.state,
            ])?;
        }
    }

    tx.commit()?;
    Ok(inserted)
}

pub(super) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}
