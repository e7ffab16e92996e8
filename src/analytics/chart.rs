//! Chart view models rendered by the dashboard templates.
//!
//! Bars carry a width relative to the largest bar so templates can draw them
//! with plain CSS. Scatter points are projected into a fixed SVG viewport.

use serde::Serialize;

use super::regression::{ols, LinearFit};

/// SVG viewport of scatter charts
pub const SCATTER_WIDTH: f64 = 480.0;
pub const SCATTER_HEIGHT: f64 = 320.0;
/// Space kept free around the plot area for axes
pub const SCATTER_PADDING: f64 = 36.0;

#[derive(Debug, Clone, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Preformatted value shown next to the bar
    pub display: String,
    /// Percentage of the widest bar, 0..=100
    pub width_pct: f64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            bars: Vec::new(),
        }
    }

    /// Build bars from `(label, value)` pairs, keeping their order.
    pub fn with_values<L, F>(mut self, values: Vec<(L, f64)>, display: F) -> Self
    where
        L: ToString,
        F: Fn(f64) -> String,
    {
        let max = values.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
        self.bars = values
            .into_iter()
            .map(|(label, value)| Bar {
                label: label.to_string(),
                value,
                display: display(value),
                width_pct: if max > 0.0 { value / max * 100.0 } else { 0.0 },
                color: None,
            })
            .collect();
        self
    }

    /// Same as `with_values` for integer counts.
    pub fn with_counts<L: ToString>(self, counts: Vec<(L, usize)>) -> Self {
        let values = counts.into_iter().map(|(l, c)| (l, c as f64)).collect();
        self.with_values(values, |v| format!("{}", v as usize))
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub series: String,
    /// Projected SVG coordinates
    pub cx: f64,
    pub cy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendLine {
    #[serde(flatten)]
    pub fit: LinearFit,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: f64,
    pub height: f64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Distinct series names in first-appearance order
    pub series: Vec<String>,
    pub points: Vec<ScatterPoint>,
    pub trend: Option<TrendLine>,
}

impl ScatterChart {
    /// Project `(x, y, series)` samples and fit a trend line over all of them.
    pub fn new(title: &str, x_label: &str, y_label: &str, samples: Vec<(f64, f64, String)>) -> Self {
        let x_range = padded_range(samples.iter().map(|s| s.0));
        let y_range = padded_range(samples.iter().map(|s| s.1));
        let project = Projection { x_range, y_range };

        let series = crate::dataset::distinct_in_order(samples.iter().map(|s| s.2.as_str()));

        let pairs: Vec<(f64, f64)> = samples.iter().map(|s| (s.0, s.1)).collect();
        let trend = ols(&pairs).map(|fit| {
            let (x1, y1) = project.point(x_range.0, fit.predict(x_range.0));
            let (x2, y2) = project.point(x_range.1, fit.predict(x_range.1));
            TrendLine {
                fit,
                x1,
                y1,
                x2,
                y2,
            }
        });

        let points = samples
            .into_iter()
            .map(|(x, y, series)| {
                let (cx, cy) = project.point(x, y);
                ScatterPoint {
                    x,
                    y,
                    series,
                    cx,
                    cy,
                }
            })
            .collect();

        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            width: SCATTER_WIDTH,
            height: SCATTER_HEIGHT,
            x_range,
            y_range,
            series,
            points,
            trend,
        }
    }
}

/// Data range widened so a single value or a flat series still has extent.
fn padded_range<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    (min, max)
}

struct Projection {
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Projection {
    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        let plot_w = SCATTER_WIDTH - 2.0 * SCATTER_PADDING;
        let plot_h = SCATTER_HEIGHT - 2.0 * SCATTER_PADDING;
        let fx = (x - self.x_range.0) / (self.x_range.1 - self.x_range.0);
        let fy = (y - self.y_range.0) / (self.y_range.1 - self.y_range.0);
        // SVG y grows downwards
        (
            SCATTER_PADDING + fx * plot_w,
            SCATTER_HEIGHT - SCATTER_PADDING - fy * plot_h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_widths_relative_to_max() {
        let chart = BarChart::new("t", "x", "y")
            .with_values(vec![("a", 2.0), ("b", 4.0)], |v| format!("{:.1}", v));
        assert_eq!(chart.bars[0].width_pct, 50.0);
        assert_eq!(chart.bars[1].width_pct, 100.0);
        assert_eq!(chart.bars[1].display, "4.0");
    }

    #[test]
    fn test_zero_bars_have_zero_width() {
        let chart = BarChart::new("t", "x", "y").with_counts(vec![("a", 0usize)]);
        assert_eq!(chart.bars[0].width_pct, 0.0);
        assert_eq!(chart.bars[0].display, "0");
    }

    #[test]
    fn test_scatter_projection_corners() {
        let chart = ScatterChart::new(
            "t",
            "x",
            "y",
            vec![(0.0, 0.0, "No".to_string()), (10.0, 5.0, "Yes".to_string())],
        );
        let low = &chart.points[0];
        let high = &chart.points[1];
        assert_eq!((low.cx, low.cy), (SCATTER_PADDING, SCATTER_HEIGHT - SCATTER_PADDING));
        assert_eq!((high.cx, high.cy), (SCATTER_WIDTH - SCATTER_PADDING, SCATTER_PADDING));
        assert_eq!(chart.series, vec!["No", "Yes"]);
        assert!(chart.trend.is_some());
    }

    #[test]
    fn test_scatter_single_point_has_no_trend() {
        let chart = ScatterChart::new("t", "x", "y", vec![(3.0, 8.0, "No".to_string())]);
        assert_eq!(chart.x_range, (2.5, 3.5));
        assert!(chart.trend.is_none());
        assert_eq!(chart.points[0].cx, SCATTER_WIDTH / 2.0);
    }

    #[test]
    fn test_empty_scatter() {
        let chart = ScatterChart::new("t", "x", "y", Vec::new());
        assert!(chart.points.is_empty());
        assert_eq!(chart.x_range, (0.0, 1.0));
    }
}
