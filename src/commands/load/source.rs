use super::*;

/// Raw CSV contents with every cell kept as text.
#[derive(Debug, Clone, Default)]
pub(super) struct SourceTable {
    pub(super) headers: Vec<String>,
    pub(super) rows: Vec<Vec<String>>,
}

impl SourceTable {
    pub(super) fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.trim() == name)
    }
}

pub(super) fn read_source_table(path: &Path) -> Result<SourceTable> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    read_source_table_from_reader(file)
        .with_context(|| format!("failed to read csv source {}", path.display()))
}

pub(super) fn read_source_table_from_reader<R: Read>(reader: R) -> Result<SourceTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .byte_headers()
        .context("failed to read csv header row")?
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect::<Vec<String>>();

    let mut rows = Vec::new();
    for (index, record) in csv_reader.byte_records().enumerate() {
        let record =
            record.with_context(|| format!("failed to parse csv record {}", index + 1))?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect::<Vec<String>>(),
        );
    }

    Ok(SourceTable { headers, rows })
}

pub(super) fn source_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("failed to read file for hashing: {}", path.display()))?;

    Ok(format!("{:x}", hasher.finalize()))
}
