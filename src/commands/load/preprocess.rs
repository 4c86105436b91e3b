use super::*;

const SOURCE_COLUMN_COUNT: usize = 9;

/// Source columns in `ALL` order; the discriminant doubles as the slot in `ColumnMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SourceColumn {
    FacilityId,
    State,
    FacilityName,
    Address,
    City,
    ZipCode,
    EmergencyServices,
    HospitalOwnership,
    OverallRating,
}

impl SourceColumn {
    pub(super) const ALL: [SourceColumn; SOURCE_COLUMN_COUNT] = [
        Self::FacilityId,
        Self::State,
        Self::FacilityName,
        Self::Address,
        Self::City,
        Self::ZipCode,
        Self::EmergencyServices,
        Self::HospitalOwnership,
        Self::OverallRating,
    ];

    pub(super) fn header(self) -> &'static str {
        match self {
            Self::FacilityId => "Facility ID",
            Self::State => "State",
            Self::FacilityName => "Facility Name",
            Self::Address => "Address",
            Self::City => "City",
            Self::ZipCode => "ZIP Code",
            Self::EmergencyServices => "Emergency Services",
            Self::HospitalOwnership => "Hospital Ownership",
            Self::OverallRating => "Hospital overall rating",
        }
    }

    pub(super) fn canonical_name(self) -> &'static str {
        match self {
            Self::FacilityId => "facility_key",
            Self::State => "state",
            Self::FacilityName => "name",
            Self::Address => "address",
            Self::City => "city",
            Self::ZipCode => "zip",
            Self::EmergencyServices => "emergency_services",
            Self::HospitalOwnership => "ownership",
            Self::OverallRating => "overall_rating",
        }
    }
}

#[derive(Debug)]
struct ColumnMap {
    positions: [usize; SOURCE_COLUMN_COUNT],
}

impl ColumnMap {
    fn resolve(table: &SourceTable) -> Result<Self> {
        let mut positions = [0usize; SOURCE_COLUMN_COUNT];
        let mut missing = Vec::new();

        for column in SourceColumn::ALL {
            match table.column_index(column.header()) {
                Some(index) => positions[column as usize] = index,
                None => missing.push(format!(
                    "'{}' ({})",
                    column.header(),
                    column.canonical_name()
                )),
            }
        }

        if !missing.is_empty() {
            bail!(
                "source is missing required column(s): {}",
                missing.join(", ")
            );
        }

        Ok(Self { positions })
    }

    /// Cell text with surrounding whitespace removed; missing cells read as "".
    fn cell<'a>(&self, row: &'a [String], column: SourceColumn) -> &'a str {
        row.get(self.positions[column as usize])
            .map(|value| value.trim())
            .unwrap_or("")
    }
}

#[derive(Debug, Default)]
pub(super) struct PreprocessOutput {
    pub(super) records: Vec<QualityRecord>,
    pub(super) dropped_rows: usize,
}

pub(super) fn preprocess_quality_rows(
    table: &SourceTable,
    load_date: NaiveDate,
) -> Result<PreprocessOutput> {
    let columns = ColumnMap::resolve(table)?;
    let mut output = PreprocessOutput {
        records: Vec::with_capacity(table.rows.len()),
        dropped_rows: 0,
    };

    for row in &table.rows {
        let facility_key = columns.cell(row, SourceColumn::FacilityId);
        if !is_valid_facility_key(facility_key) {
            output.dropped_rows += 1;
            continue;
        }

        let facility = FacilityRecord {
            facility_key: facility_key.to_string(),
            name: non_blank(columns.cell(row, SourceColumn::FacilityName)),
            address: non_blank(columns.cell(row, SourceColumn::Address)),
            city: non_blank(columns.cell(row, SourceColumn::City)),
            zip: non_blank(columns.cell(row, SourceColumn::ZipCode)),
            state: non_blank(columns.cell(row, SourceColumn::State)),
        };
        let observation = QualityObservation {
            facility_key: facility_key.to_string(),
            load_date,
            overall_rating: parse_overall_rating(columns.cell(row, SourceColumn::OverallRating)),
            ownership: non_blank(columns.cell(row, SourceColumn::HospitalOwnership)),
            emergency_services: parse_emergency_services(
                columns.cell(row, SourceColumn::EmergencyServices),
            ),
        };

        output.records.push(QualityRecord {
            facility,
            observation,
        });
    }

    Ok(output)
}

pub(super) fn is_valid_facility_key(facility_key: &str) -> bool {
    facility_key.chars().count() <= MAX_FACILITY_KEY_CHARS
}

pub(super) fn parse_emergency_services(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("yes")
}

pub(super) fn parse_overall_rating(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    raw.parse::<i64>()
        .ok()
        .filter(|rating| OVERALL_RATING_RANGE.contains(rating))
}

fn non_blank(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
