//! Dashboard analytics.
//!
//! Turns the loaded dataset and the visitor's filter selections into a
//! `Dashboard`: headline metrics, chart series, the optional health issue
//! breakdown and plain-language recommendations. The same model backs the
//! HTML page and the JSON API.

mod aggregate;
mod chart;
mod filter;
mod regression;

pub use chart::{Bar, BarChart, ScatterChart, ScatterPoint, TrendLine};
pub use filter::{Filter, FilterError, FilterOptions, FilterParams};
pub use regression::{ols, LinearFit};

use serde::Serialize;

use crate::config::{
    EXCESSIVE_SCREEN_TIME_HOURS, HEALTH_ISSUES_ALERT_PCT, INSUFFICIENT_SLEEP_HOURS,
    MINIMAL_OUTDOOR_HOURS,
};
use crate::dataset::{Dataset, RiskCategory, ScreenTimeRecord};

use aggregate::{group_mean, histogram, mean, percentage, value_counts};

/// Text shown for a metric that has no value (empty selection).
pub const NOT_AVAILABLE: &str = "n/a";

/// Headline figures over the filtered records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub avg_screen_time: Option<f64>,
    pub health_issues_pct: Option<f64>,
    pub avg_sleep: Option<f64>,
    pub avg_outdoor: Option<f64>,
    pub high_risk_pct: Option<f64>,
}

impl KeyMetrics {
    pub fn compute(records: &[&ScreenTimeRecord]) -> Self {
        Self {
            avg_screen_time: mean(records.iter().map(|r| r.daily_screen_time)),
            health_issues_pct: percentage(records, |r| r.has_health_issues()),
            avg_sleep: mean(records.iter().map(|r| r.sleep_hours)),
            avg_outdoor: mean(records.iter().map(|r| r.outdoor_activity)),
            high_risk_pct: percentage(records, |r| r.risk_category().is_elevated()),
        }
    }

    /// Display cards in dashboard order.
    pub fn cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("Avg Daily Screen Time", hours(self.avg_screen_time, 2)),
            MetricCard::new("Health Issues %", percent(self.health_issues_pct)),
            MetricCard::new("Avg Sleep Hours", hours(self.avg_sleep, 1)),
            MetricCard::new("Avg Outdoor Activity", hours(self.avg_outdoor, 1)),
            MetricCard::new("High Risk Children %", percent(self.high_risk_pct)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

impl MetricCard {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Format hours with the given number of decimals, e.g. `3.25 hrs`.
pub fn hours(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*} hrs", precision, v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a percentage with one decimal, e.g. `12.5%`.
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Breakdown of the children with reported health issues.
#[derive(Debug, Clone, Serialize)]
pub struct HealthDetail {
    pub count: usize,
    pub avg_screen_time: String,
    pub avg_sleep: String,
    pub by_age: BarChart,
    pub by_device: BarChart,
    /// Set when nobody in the selection reported health issues
    pub notice: Option<String>,
}

impl HealthDetail {
    pub fn compute(records: &[&ScreenTimeRecord]) -> Self {
        let affected: Vec<&ScreenTimeRecord> = records
            .iter()
            .copied()
            .filter(|r| r.has_health_issues())
            .collect();

        let by_age = BarChart::new(
            "Age Distribution of Children with Health Issues",
            "Age",
            "Count",
        )
        .with_counts(histogram(&affected, |r| r.age));
        let by_device = BarChart::new(
            "Device Usage of Children with Health Issues",
            "Device_Type",
            "Count",
        )
        .with_counts(histogram(&affected, |r| r.device_type.clone()));

        Self {
            count: affected.len(),
            avg_screen_time: hours(mean(affected.iter().map(|r| r.daily_screen_time)), 2),
            avg_sleep: hours(mean(affected.iter().map(|r| r.sleep_hours)), 1),
            by_age,
            by_device,
            notice: affected
                .is_empty()
                .then(|| "No health issues reported in the filtered data.".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ScreenTimeLimits,
    SleepHygiene,
    OutdoorActivity,
    WellnessProgram,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub icon: &'static str,
    pub message: String,
}

/// Recommendations for the selection, in a fixed order.
pub fn recommendations(records: &[&ScreenTimeRecord], metrics: &KeyMetrics) -> Vec<Recommendation> {
    let excessive = records
        .iter()
        .filter(|r| r.daily_screen_time > EXCESSIVE_SCREEN_TIME_HOURS)
        .count();
    let short_sleep = records
        .iter()
        .filter(|r| r.sleep_hours < INSUFFICIENT_SLEEP_HOURS)
        .count();
    let indoors = records
        .iter()
        .filter(|r| r.outdoor_activity < MINIMAL_OUTDOOR_HOURS)
        .count();

    let mut out = Vec::new();

    if excessive > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::ScreenTimeLimits,
            icon: "🚨",
            message: format!(
                "{} children have excessive screen time (>{} hours/day). Consider implementing screen time limits.",
                excessive, EXCESSIVE_SCREEN_TIME_HOURS
            ),
        });
    }

    if short_sleep > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::SleepHygiene,
            icon: "😴",
            message: format!(
                "{} children are getting insufficient sleep (<{} hours). Promote better sleep hygiene.",
                short_sleep, INSUFFICIENT_SLEEP_HOURS
            ),
        });
    }

    if indoors > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::OutdoorActivity,
            icon: "🌳",
            message: format!(
                "{} children have minimal outdoor activity (<{} hour). Encourage more physical activities.",
                indoors, MINIMAL_OUTDOOR_HOURS
            ),
        });
    }

    if let Some(pct) = metrics.health_issues_pct {
        if pct > HEALTH_ISSUES_ALERT_PCT {
            out.push(Recommendation {
                kind: RecommendationKind::WellnessProgram,
                icon: "⚠️",
                message: format!(
                    "{:.1}% of children report health issues. Consider wellness programs.",
                    pct
                ),
            });
        }
    }

    out
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_records: usize,
    pub filtered_records: usize,
    pub filter: Filter,
    pub options: FilterOptions,
    /// Query string reproducing `filter`
    pub query: String,
    pub metrics: KeyMetrics,
    pub metric_cards: Vec<MetricCard>,
    pub screen_time_by_age: BarChart,
    pub screen_time_by_device: BarChart,
    pub purpose_counts: BarChart,
    pub risk_counts: BarChart,
    pub sleep_vs_screen: ScatterChart,
    pub screen_time_by_performance: BarChart,
    /// Present only when the visitor asked for it
    pub health_detail: Option<HealthDetail>,
    pub recommendations: Vec<Recommendation>,
}

impl Dashboard {
    /// Resolve `params` against `dataset` and compute every dashboard section.
    pub fn build(dataset: &Dataset, params: &FilterParams) -> Result<Self, FilterError> {
        let options = FilterOptions::from_dataset(dataset);
        let filter = Filter::resolve(params, &options)?;
        let records = filter.apply(dataset);

        let metrics = KeyMetrics::compute(&records);

        let screen_time_by_age = BarChart::new("Average Screen Time by Age", "Age", "Daily_Screen_Time")
            .with_values(
                group_mean(&records, |r| r.age, |r| r.daily_screen_time),
                |v| hours(Some(v), 2),
            );

        let screen_time_by_device = device_shares(&records);

        let purpose_counts = BarChart::new("Screen Time Purpose Distribution", "Purpose", "Count")
            .with_counts(value_counts(&records, |r| r.purpose.clone()));

        let mut risk_counts = BarChart::new("Health Risk Distribution", "Risk_Category", "Count")
            .with_counts(value_counts(&records, |r| r.risk_category()));
        for bar in &mut risk_counts.bars {
            bar.color = RiskCategory::ALL
                .iter()
                .find(|c| c.label() == bar.label)
                .map(|c| c.color().to_string());
        }

        let sleep_vs_screen = ScatterChart::new(
            "Sleep Hours vs Screen Time",
            "Daily_Screen_Time",
            "Sleep_Hours",
            records
                .iter()
                .map(|r| (r.daily_screen_time, r.sleep_hours, r.reported_health_issues.clone()))
                .collect(),
        );

        let screen_time_by_performance = BarChart::new(
            "Academic Performance vs Average Screen Time",
            "Academic_Performance",
            "Daily_Screen_Time",
        )
        .with_values(
            group_mean(&records, |r| r.academic_performance.clone(), |r| r.daily_screen_time),
            |v| hours(Some(v), 2),
        );

        let health_detail = filter.show_health.then(|| HealthDetail::compute(&records));
        let recommendations = recommendations(&records, &metrics);

        Ok(Self {
            total_records: dataset.len(),
            filtered_records: records.len(),
            query: filter.to_query(),
            filter,
            options,
            metric_cards: metrics.cards(),
            metrics,
            screen_time_by_age,
            screen_time_by_device,
            purpose_counts,
            risk_counts,
            sleep_vs_screen,
            screen_time_by_performance,
            health_detail,
            recommendations,
        })
    }
}

/// Average screen time per device, shown with each device's share of the total.
fn device_shares(records: &[&ScreenTimeRecord]) -> BarChart {
    let means = group_mean(records, |r| r.device_type.clone(), |r| r.daily_screen_time);
    let total: f64 = means.iter().map(|(_, v)| *v).sum();
    let mut chart = BarChart::new("Screen Time Distribution by Device", "Device_Type", "Daily_Screen_Time")
        .with_values(means, |v| hours(Some(v), 2));
    if total > 0.0 {
        for bar in &mut chart.bars {
            bar.display = format!("{} ({:.1}%)", bar.display, bar.value / total * 100.0);
        }
    }
    chart
}
