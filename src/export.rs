//! CSV export of the filtered records.

use std::io;

use serde::Serialize;

use crate::dataset::{RiskCategory, ScreenTimeRecord};

/// Column order of exported files: the dataset columns plus the derived band.
pub const EXPORT_HEADER: [&str; 11] = [
    "Age",
    "Gender",
    "City_Type",
    "Device_Type",
    "Daily_Screen_Time",
    "Sleep_Hours",
    "Outdoor_Activity",
    "Purpose",
    "Academic_Performance",
    "Reported_Health_Issues",
    "Risk_Category",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
struct ExportRow<'a> {
    age: u32,
    gender: &'a str,
    city_type: &'a str,
    device_type: &'a str,
    daily_screen_time: f64,
    sleep_hours: f64,
    outdoor_activity: f64,
    purpose: &'a str,
    academic_performance: &'a str,
    reported_health_issues: &'a str,
    risk_category: RiskCategory,
}

impl<'a> From<&'a ScreenTimeRecord> for ExportRow<'a> {
    fn from(r: &'a ScreenTimeRecord) -> Self {
        Self {
            age: r.age,
            gender: &r.gender,
            city_type: &r.city_type,
            device_type: &r.device_type,
            daily_screen_time: r.daily_screen_time,
            sleep_hours: r.sleep_hours,
            outdoor_activity: r.outdoor_activity,
            purpose: &r.purpose,
            academic_performance: &r.academic_performance,
            reported_health_issues: &r.reported_health_issues,
            risk_category: r.risk_category(),
        }
    }
}

/// Encode records as CSV. The header row is always written, even for an
/// empty selection.
pub fn to_csv(records: &[&ScreenTimeRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for record in records {
        writer.serialize(ExportRow::from(*record))?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
