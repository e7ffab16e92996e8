use std::collections::HashMap;

use tera::Tera;

use crate::analytics;
use crate::error::AppError;

/// Initialize the Tera template engine from every template matching `glob`.
pub fn init_templates(glob: &str) -> Result<Tera, AppError> {
    let mut tera = Tera::new(glob)?;

    tera.register_filter("hours", hours_filter);
    tera.register_filter("percent", percent_filter);
    tera.register_filter("svg", svg_filter);

    Ok(tera)
}

fn precision_arg(args: &HashMap<String, tera::Value>, default: u64) -> usize {
    args.get("precision")
        .and_then(|v| v.as_u64())
        .unwrap_or(default) as usize
}

/// Format a number of hours, e.g. `{{ 3.456 | hours(precision=1) }}` -> `3.5 hrs`.
/// Null renders as `n/a`.
fn hours_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    if value.is_null() {
        return Ok(tera::Value::String(analytics::hours(None, 0)));
    }
    let n = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("hours filter expects a number"))?;
    Ok(tera::Value::String(analytics::hours(
        Some(n),
        precision_arg(args, 2),
    )))
}

/// Format a percentage with one decimal. Null renders as `n/a`.
fn percent_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    if value.is_null() {
        return Ok(tera::Value::String(analytics::percent(None)));
    }
    let n = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("percent filter expects a number"))?;
    Ok(tera::Value::String(analytics::percent(Some(n))))
}

/// Format an SVG coordinate with two decimals so markup stays compact.
fn svg_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let n = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("svg filter expects a number"))?;
    Ok(tera::Value::String(format!("{:.2}", n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(precision: Option<u64>) -> HashMap<String, tera::Value> {
        let mut map = HashMap::new();
        if let Some(p) = precision {
            map.insert("precision".to_string(), tera::Value::from(p));
        }
        map
    }

    #[test]
    fn test_hours_filter() {
        let out = hours_filter(&tera::Value::from(3.456), &args(None)).unwrap();
        assert_eq!(out, tera::Value::String("3.46 hrs".to_string()));
        let out = hours_filter(&tera::Value::from(3.456), &args(Some(1))).unwrap();
        assert_eq!(out, tera::Value::String("3.5 hrs".to_string()));
        let out = hours_filter(&tera::Value::Null, &args(None)).unwrap();
        assert_eq!(out, tera::Value::String("n/a".to_string()));
    }

    #[test]
    fn test_hours_filter_rejects_text() {
        assert!(hours_filter(&tera::Value::from("three"), &args(None)).is_err());
    }

    #[test]
    fn test_percent_filter() {
        let out = percent_filter(&tera::Value::from(12.34), &args(None)).unwrap();
        assert_eq!(out, tera::Value::String("12.3%".to_string()));
    }

    #[test]
    fn test_svg_filter() {
        let out = svg_filter(&tera::Value::from(36), &args(None)).unwrap();
        assert_eq!(out, tera::Value::String("36.00".to_string()));
    }

    fn project_templates() -> Tera {
        init_templates(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap()
    }

    #[test]
    fn test_trend_summary_shows_zero_r_squared() {
        // Flat fit over a symmetric bump: slope 0 and r² exactly 0
        let chart = analytics::ScatterChart::new(
            "Sleep Hours vs Screen Time",
            "Daily_Screen_Time",
            "Sleep_Hours",
            vec![
                (1.0, 1.0, "No".to_string()),
                (2.0, 2.0, "No".to_string()),
                (3.0, 1.0, "Yes".to_string()),
            ],
        );
        assert_eq!(chart.trend.as_ref().unwrap().fit.r_squared, Some(0.0));

        let mut context = tera::Context::new();
        context.insert("chart", &chart);
        let html = project_templates()
            .render_str(
                r#"{% import "partials/charts.html" as charts %}{{ charts::scatter_chart(chart=chart) }}"#,
                &context,
            )
            .unwrap();
        assert!(html.contains("(R² = 0"), "{}", html);
    }

    #[test]
    fn test_project_templates_compile() {
        let tera = project_templates();
        let names: Vec<&str> = tera.get_template_names().collect();
        assert!(names.contains(&"dashboard.html"));
        assert!(names.contains(&"base.html"));
    }
}
