//! Data types shared by the analysis pipeline.

use serde::Serialize;

/// Column names the input table must carry.
pub const EVTYPE: &str = "EVTYPE";
pub const BGN_DATE: &str = "BGN_DATE";
pub const FATALITIES: &str = "FATALITIES";
pub const INJURIES: &str = "INJURIES";
pub const PROPDMG: &str = "PROPDMG";
pub const CROPDMG: &str = "CROPDMG";

pub const REQUIRED_COLUMNS: [&str; 6] = [EVTYPE, BGN_DATE, FATALITIES, INJURIES, PROPDMG, CROPDMG];

/// A single storm event row.
///
/// Numeric cells that were empty or not a finite number are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StormRecord {
    pub event_type: String,
    pub begin_date: String,
    pub fatalities: Option<f64>,
    pub injuries: Option<f64>,
    pub property_damage: Option<f64>,
    pub crop_damage: Option<f64>,
}

impl StormRecord {
    /// Builds a record with every numeric field present.
    pub fn new(
        event_type: &str,
        begin_date: &str,
        fatalities: f64,
        injuries: f64,
        property_damage: f64,
        crop_damage: f64,
    ) -> Self {
        StormRecord {
            event_type: event_type.to_string(),
            begin_date: begin_date.to_string(),
            fatalities: Some(fatalities),
            injuries: Some(injuries),
            property_damage: Some(property_damage),
            crop_damage: Some(crop_damage),
        }
    }
}

/// Selects one numeric column of a [`StormRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Fatalities,
    Injuries,
    PropertyDamage,
    CropDamage,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Fatalities,
        Field::Injuries,
        Field::PropertyDamage,
        Field::CropDamage,
    ];

    pub fn value(self, record: &StormRecord) -> Option<f64> {
        match self {
            Field::Fatalities => record.fatalities,
            Field::Injuries => record.injuries,
            Field::PropertyDamage => record.property_damage,
            Field::CropDamage => record.crop_damage,
        }
    }

    /// Source column the field is read from.
    pub fn column(self) -> &'static str {
        match self {
            Field::Fatalities => FATALITIES,
            Field::Injuries => INJURIES,
            Field::PropertyDamage => PROPDMG,
            Field::CropDamage => CROPDMG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_reads_matching_column() {
        let mut record = StormRecord::new("HAIL", "4/18/1950 0:00:00", 1.0, 2.0, 3.0, 4.0);
        record.injuries = None;

        assert_eq!(Field::Fatalities.value(&record), Some(1.0));
        assert_eq!(Field::Injuries.value(&record), None);
        assert_eq!(Field::PropertyDamage.value(&record), Some(3.0));
        assert_eq!(Field::CropDamage.value(&record), Some(4.0));
    }

    #[test]
    fn test_field_columns_are_required() {
        for field in Field::ALL {
            assert!(REQUIRED_COLUMNS.contains(&field.column()));
        }
    }
}
