//! CSV loader for the storm event table.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bzip2::read::MultiBzDecoder;
use csv::StringRecord;
use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::analyzers::types::{
    BGN_DATE, CROPDMG, EVTYPE, FATALITIES, INJURIES, PROPDMG, REQUIRED_COLUMNS, StormRecord,
};
use crate::error::{PipelineError, Result};

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    event_type: usize,
    begin_date: usize,
    fatalities: usize,
    injuries: usize,
    property_damage: usize,
    crop_damage: usize,
}

/// Checks that every required column is present.
///
/// # Errors
///
/// Returns [`PipelineError::SchemaViolation`] listing all missing columns.
pub fn validate_headers(headers: &StringRecord) -> Result<()> {
    column_index(headers).map(|_| ())
}

fn column_index(headers: &StringRecord) -> Result<ColumnIndex> {
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|&&name| position(name).is_none())
        .map(|&name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(PipelineError::SchemaViolation { missing });
    }

    let at = |name: &str| position(name).unwrap_or_default();
    Ok(ColumnIndex {
        event_type: at(EVTYPE),
        begin_date: at(BGN_DATE),
        fatalities: at(FATALITIES),
        injuries: at(INJURIES),
        property_damage: at(PROPDMG),
        crop_damage: at(CROPDMG),
    })
}

/// Parses a numeric cell, treating blanks and non-finite values as missing.
pub fn parse_amount(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads storm records from CSV with a header row.
///
/// Columns are looked up by name and extra columns are ignored. The header
/// is validated before any row is read.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<StormRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let index = column_index(rdr.headers()?)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let cell = |i: usize| row.get(i).unwrap_or("");

        records.push(StormRecord {
            event_type: cell(index.event_type).to_string(),
            begin_date: cell(index.begin_date).to_string(),
            fatalities: parse_amount(cell(index.fatalities)),
            injuries: parse_amount(cell(index.injuries)),
            property_damage: parse_amount(cell(index.property_damage)),
            crop_damage: parse_amount(cell(index.crop_damage)),
        });
    }

    debug!(rows = records.len(), "CSV rows decoded");
    Ok(records)
}

/// Loads storm records from a file, decompressing `.bz2` and `.gz` inputs
/// on the fly.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<StormRecord>> {
    let file = BufReader::new(File::open(path)?);

    let records = match path.extension().and_then(|e| e.to_str()) {
        Some("bz2") => read_records(MultiBzDecoder::new(file))?,
        Some("gz") => read_records(GzDecoder::new(file))?,
        _ => read_records(file)?,
    };

    info!(records = records.len(), "Storm records loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bzip2::write::BzEncoder;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const HEADER: &str = "STATE__,BGN_DATE,EVTYPE,FATALITIES,INJURIES,PROPDMG,CROPDMG\n";

    #[test]
    fn test_read_records_by_column_name() {
        let data = format!("{HEADER}1,4/18/1950 0:00:00,TORNADO,0,15,25,0\n");
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_type, "TORNADO");
        assert_eq!(records[0].begin_date, "4/18/1950 0:00:00");
        assert_eq!(records[0].injuries, Some(15.0));
        assert_eq!(records[0].property_damage, Some(25.0));
    }

    #[test]
    fn test_bad_numeric_cells_become_missing() {
        let data = format!("{HEADER}1,4/18/1950 0:00:00,HAIL,,abc,NaN,2.5\n");
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records[0].fatalities, None);
        assert_eq!(records[0].injuries, None);
        assert_eq!(records[0].property_damage, None);
        assert_eq!(records[0].crop_damage, Some(2.5));
    }

    #[test]
    fn test_event_type_is_kept_verbatim() {
        let data = format!("{HEADER}1,4/18/1950 0:00:00,\" TSTM WIND\",0,0,0,0\n");
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records[0].event_type, " TSTM WIND");
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let data = "BGN_DATE,FATALITIES,INJURIES,PROPDMG\n4/18/1950 0:00:00,0,0,0\n";
        let err = read_records(data.as_bytes()).unwrap_err();

        match err {
            PipelineError::SchemaViolation { missing } => {
                assert_eq!(missing, vec!["EVTYPE".to_string(), "CROPDMG".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_headers_accepts_full_schema() {
        let headers = StringRecord::from(vec![
            "EVTYPE",
            "BGN_DATE",
            "FATALITIES",
            "INJURIES",
            "PROPDMG",
            "CROPDMG",
        ]);
        assert!(validate_headers(&headers).is_ok());
    }

    #[test]
    fn test_load_records_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storm.csv.gz");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(format!("{HEADER}1,1/3/1996 0:00:00,FLOOD,1,2,3,4\n").as_bytes())
            .unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_type, "FLOOD");
    }

    #[test]
    fn test_load_records_bzip2() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("StormData.csv.bz2");

        let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder
            .write_all(format!("{HEADER}1,4/18/1950 0:00:00,TORNADO,0,15,25,0\n").as_bytes())
            .unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_type, "TORNADO");
        assert_eq!(records[0].injuries, Some(15.0));
    }
}
