//! Screen time dataset model and CSV loading.
//!
//! Each CSV row describes one child: age, demographics, the device they use
//! most, daily screen time, sleep, outdoor activity, why they use screens, how
//! they do at school, and whether health issues were reported. Columns are
//! matched by header name; columns the dashboard does not use are ignored.

mod risk;

pub use risk::RiskCategory;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::HEALTH_ISSUES_YES;

/// One child's record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScreenTimeRecord {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "City_Type")]
    pub city_type: String,
    #[serde(rename = "Device_Type")]
    pub device_type: String,
    /// Hours per day
    #[serde(rename = "Daily_Screen_Time")]
    pub daily_screen_time: f64,
    #[serde(rename = "Sleep_Hours")]
    pub sleep_hours: f64,
    /// Hours per day
    #[serde(rename = "Outdoor_Activity")]
    pub outdoor_activity: f64,
    #[serde(rename = "Purpose")]
    pub purpose: String,
    #[serde(rename = "Academic_Performance")]
    pub academic_performance: String,
    #[serde(rename = "Reported_Health_Issues")]
    pub reported_health_issues: String,
}

impl ScreenTimeRecord {
    pub fn risk_category(&self) -> RiskCategory {
        RiskCategory::from_screen_time(self.daily_screen_time)
    }

    /// Only an exact `Yes` counts as a reported health issue.
    pub fn has_health_issues(&self) -> bool {
        self.reported_health_issues == HEALTH_ISSUES_YES
    }
}

/// Errors raised while reading the dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset file '{}' not found. Please upload the file.", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read dataset: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid dataset row {row}: {source}")]
    InvalidRow {
        /// 1-based index among data rows (header excluded)
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid dataset header: {0}")]
    Header(#[source] csv::Error),
}

/// The loaded dataset, rows in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<ScreenTimeRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ScreenTimeRecord>) -> Self {
        Self { records }
    }

    /// Load a dataset from a CSV file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
            _ => DatasetError::Io(e),
        })?;
        Self::from_reader(file)
    }

    /// Parse CSV with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        reader.headers().map_err(DatasetError::Header)?;

        let mut records = Vec::new();
        for (index, result) in reader.deserialize::<ScreenTimeRecord>().enumerate() {
            let record = result.map_err(|source| DatasetError::InvalidRow {
                row: index + 1,
                source,
            })?;
            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[ScreenTimeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest and largest age in the dataset, `None` when empty.
    pub fn age_bounds(&self) -> Option<(u32, u32)> {
        let min = self.records.iter().map(|r| r.age).min()?;
        let max = self.records.iter().map(|r| r.age).max()?;
        Some((min, max))
    }
}

/// Distinct values of a column in order of first appearance.
pub fn distinct_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}
