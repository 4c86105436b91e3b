use super::*;

pub(super) fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn compact_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}

pub(super) fn run_id_for(started: DateTime<Utc>) -> String {
    format!("load-{}", compact_timestamp(started))
}

pub(super) fn default_report_path(cache_root: &Path, started: DateTime<Utc>) -> PathBuf {
    cache_root
        .join("manifests")
        .join(format!("load_run_{}.json", compact_timestamp(started)))
}

pub(super) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display())),
        _ => Ok(()),
    }
}

pub(super) fn write_run_report(path: &Path, manifest: &LoadRunManifest) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut data =
        serde_json::to_vec_pretty(manifest).context("failed to serialize load run report")?;
    data.push(b'\n');

    fs::write(path, data)
        .with_context(|| format!("failed to write load run report: {}", path.display()))
}
