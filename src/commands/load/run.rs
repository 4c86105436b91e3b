use super::*;

const DEFAULT_DB_FILENAME: &str = "hospital_quality.sqlite";

pub fn run(args: LoadArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = utc_timestamp();
    let run_id = run_id_for(started_ts);

    let cache_root = args.cache_root.clone();
    fs::create_dir_all(&cache_root)
        .with_context(|| format!("failed to create directory: {}", cache_root.display()))?;

    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| cache_root.join(DEFAULT_DB_FILENAME));
    let report_path = args
        .report_path
        .clone()
        .unwrap_or_else(|| default_report_path(&cache_root, started_ts));

    info!(
        run_id = %run_id,
        load_date = %args.load_date,
        source = %args.file_path.display(),
        "starting quality load"
    );

    let table = read_source_table(&args.file_path)?;
    let source_sha256 = source_sha256(&args.file_path)?;
    let processed = preprocess_quality_rows(&table, args.load_date)?;

    info!(
        source_rows = table.rows.len(),
        records = processed.records.len(),
        dropped_rows = processed.dropped_rows,
        "quality data preprocessing complete"
    );

    let mut connection = open_connection(&db_path)?;
    ensure_schema(&connection)?;

    let summary =
        batch_insert_quality_records(&mut connection, &processed.records, args.batch_size);

    let facilities_total = count_rows(&connection, "SELECT COUNT(*) FROM FacilitySpecificDetails")?;
    let observations_total = count_rows(&connection, "SELECT COUNT(*) FROM QualityDetails")?;

    let has_failures = summary.has_failures();
    let status = if has_failures {
        "completed_with_failures"
    } else {
        "completed"
    };

    let manifest = LoadRunManifest {
        manifest_version: 1,
        run_id,
        db_schema_version: DB_SCHEMA_VERSION.to_string(),
        status: status.to_string(),
        started_at,
        updated_at: utc_timestamp(),
        load_date: args.load_date,
        batch_size: args.batch_size.max(1),
        source_sha256,
        paths: LoadRunPaths {
            cache_root: cache_root.display().to_string(),
            source_path: args.file_path.display().to_string(),
            db_path: db_path.display().to_string(),
            report_path: report_path.display().to_string(),
        },
        counts: LoadRunCounts {
            source_rows: table.rows.len(),
            dropped_rows: processed.dropped_rows,
            records: processed.records.len(),
            batches: summary.batches.len(),
            batches_done: summary.count_status(BatchStatus::Done),
            batches_done_after_backfill: summary.count_status(BatchStatus::DoneAfterBackfill),
            batches_failed: summary.count_status(BatchStatus::Failed),
            observations_inserted: summary.observations_inserted(),
            facilities_inserted: summary.facilities_inserted(),
            facilities_total,
            observations_total,
        },
        batches: summary.batches,
    };

    write_run_report(&report_path, &manifest)?;
    info!(path = %report_path.display(), "wrote load run report");

    if has_failures {
        warn!(
            batches = manifest.counts.batches,
            batches_failed = manifest.counts.batches_failed,
            "quality load finished with failed batches"
        );
    } else {
        info!(
            batches = manifest.counts.batches,
            observations_inserted = manifest.counts.observations_inserted,
            facilities_inserted = manifest.counts.facilities_inserted,
            "quality load completed"
        );
    }

    Ok(())
}
