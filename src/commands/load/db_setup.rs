use super::*;

pub(super) fn open_connection(db_path: &Path) -> Result<Connection> {
    ensure_parent_dir(db_path)?;

    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;

    Ok(connection)
}

pub(super) fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    connection
        .pragma_update(None, "foreign_keys", true)
        .context("failed to set foreign_keys=ON")?;

    let foreign_keys: i64 = connection
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .context("failed to read foreign_keys pragma")?;
    if foreign_keys != 1 {
        bail!("sqlite build does not enforce foreign keys");
    }

    Ok(())
}

pub(super) fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS FacilitySpecificDetails (
              facility_key TEXT PRIMARY KEY,
              name TEXT,
              address TEXT,
              city TEXT,
              zip TEXT,
              state TEXT
            );

            CREATE TABLE IF NOT EXISTS QualityDetails (
              facility_key TEXT NOT NULL,
              load_date TEXT NOT NULL,
              overall_rating INTEGER
                CHECK (overall_rating IS NULL OR overall_rating BETWEEN 1 AND 5),
              ownership TEXT,
              emergency_services INTEGER NOT NULL,
              PRIMARY KEY (facility_key, load_date),
              FOREIGN KEY (facility_key) REFERENCES FacilitySpecificDetails(facility_key)
            );

            CREATE INDEX IF NOT EXISTS idx_quality_details_load_date ON QualityDetails(load_date);
            ",
        )
        .context("failed to create quality schema")?;

    let now = utc_timestamp();
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [DB_SCHEMA_VERSION],
    )?;
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_updated_at', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [now],
    )?;

    Ok(())
}

pub(super) fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection
        .query_row(sql, [], |row| row.get(0))
        .with_context(|| format!("failed to count rows: {sql}"))?;
    Ok(count)
}
