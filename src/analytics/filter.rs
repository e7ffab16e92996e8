//! Dashboard filters: the sidebar selections and the options offered for them.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::FILTER_ALL;
use crate::dataset::{distinct_in_order, Dataset, ScreenTimeRecord};

/// Raw filter selections as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    /// A cleared age box submits an empty value, treated as absent
    #[serde(default, deserialize_with = "deserialize_optional_age")]
    pub age_min: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_age")]
    pub age_max: Option<u32>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub device: Option<String>,
    /// Show the health issue detail section
    #[serde(default)]
    pub health: bool,
}

fn deserialize_optional_age<'a, D: Deserializer<'a>>(d: D) -> Result<Option<u32>, D::Error> {
    match Option::<String>::deserialize(d)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(age) => age.parse().map(Some).map_err(D::Error::custom),
    }
}

/// Choices offered for each filter, derived from the full dataset.
///
/// Categorical lists start with `All` followed by distinct values in order of
/// first appearance.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub age_min: u32,
    pub age_max: u32,
    pub genders: Vec<String>,
    pub cities: Vec<String>,
    pub devices: Vec<String>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let (age_min, age_max) = dataset.age_bounds().unwrap_or((0, 0));
        let records = dataset.records();

        Self {
            age_min,
            age_max,
            genders: with_all(distinct_in_order(records.iter().map(|r| r.gender.as_str()))),
            cities: with_all(distinct_in_order(records.iter().map(|r| r.city_type.as_str()))),
            devices: with_all(distinct_in_order(records.iter().map(|r| r.device_type.as_str()))),
        }
    }
}

fn with_all(values: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(values.len() + 1);
    out.push(FILTER_ALL.to_string());
    out.extend(values);
    out
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Minimum age {min} is greater than maximum age {max}")]
    InvertedAgeRange { min: u32, max: u32 },
}

/// Filter selections after defaults and clamping have been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub age_min: u32,
    pub age_max: u32,
    /// `None` means all genders
    pub gender: Option<String>,
    pub city: Option<String>,
    pub device: Option<String>,
    pub show_health: bool,
}

impl Filter {
    /// Resolve raw parameters against the options of the loaded dataset.
    ///
    /// Missing age bounds default to the dataset's bounds and supplied ones are
    /// clamped into them. A value of `All` (or an empty string) disables that
    /// categorical filter.
    pub fn resolve(params: &FilterParams, options: &FilterOptions) -> Result<Self, FilterError> {
        let clamp = |age: u32| age.clamp(options.age_min, options.age_max);
        let age_min = params.age_min.map(clamp).unwrap_or(options.age_min);
        let age_max = params.age_max.map(clamp).unwrap_or(options.age_max);

        if let (Some(min), Some(max)) = (params.age_min, params.age_max) {
            if min > max {
                return Err(FilterError::InvertedAgeRange { min, max });
            }
        }

        Ok(Self {
            age_min,
            age_max,
            gender: selection(params.gender.as_deref()),
            city: selection(params.city.as_deref()),
            device: selection(params.device.as_deref()),
            show_health: params.health,
        })
    }

    pub fn matches(&self, record: &ScreenTimeRecord) -> bool {
        record.age >= self.age_min
            && record.age <= self.age_max
            && self.gender.as_deref().map_or(true, |g| record.gender == g)
            && self.city.as_deref().map_or(true, |c| record.city_type == c)
            && self.device.as_deref().map_or(true, |d| record.device_type == d)
    }

    /// Records of the dataset that pass every filter, in file order.
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a ScreenTimeRecord> {
        dataset.records().iter().filter(|r| self.matches(r)).collect()
    }

    /// Query string reproducing this filter, used for export and API links.
    pub fn to_query(&self) -> String {
        let mut parts = vec![
            format!("age_min={}", self.age_min),
            format!("age_max={}", self.age_max),
        ];
        for (key, value) in [
            ("gender", &self.gender),
            ("city", &self.city),
            ("device", &self.device),
        ] {
            if let Some(value) = value {
                parts.push(format!("{}={}", key, urlencoding::encode(value)));
            }
        }
        if self.show_health {
            parts.push("health=true".to_string());
        }
        parts.join("&")
    }
}

fn selection(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(v) if v == FILTER_ALL => None,
        Some(v) => Some(v.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample;

    fn params() -> FilterParams {
        FilterParams::default()
    }

    fn parse_query(query: &str) -> Result<FilterParams, String> {
        let uri: axum::http::Uri = format!("/?{}", query).parse().unwrap();
        axum::extract::Query::<FilterParams>::try_from_uri(&uri)
            .map(|q| q.0)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn test_empty_age_is_absent() {
        let params = parse_query("age_min=&age_max=14&gender=All&health=true").unwrap();
        assert_eq!(params.age_min, None);
        assert_eq!(params.age_max, Some(14));
        assert!(params.health);

        let params = parse_query("age_min=%20").unwrap();
        assert_eq!(params.age_min, None);
    }

    #[test]
    fn test_non_numeric_age_is_rejected() {
        let err = parse_query("age_min=ten").unwrap_err();
        assert!(err.contains("age_min"), "{}", err);
    }

    #[test]
    fn test_options_from_dataset() {
        let options = FilterOptions::from_dataset(&sample());
        assert_eq!(options.age_min, 8);
        assert_eq!(options.age_max, 14);
        assert_eq!(options.genders, vec!["All", "Male", "Female"]);
        assert_eq!(options.cities, vec!["All", "Urban", "Rural"]);
        assert_eq!(options.devices, vec!["All", "Smartphone", "TV", "Laptop"]);
    }

    #[test]
    fn test_defaults_select_everything() {
        let data = sample();
        let options = FilterOptions::from_dataset(&data);
        let filter = Filter::resolve(&params(), &options).unwrap();
        assert_eq!((filter.age_min, filter.age_max), (8, 14));
        assert_eq!(filter.gender, None);
        assert_eq!(filter.apply(&data).len(), 5);
    }

    #[test]
    fn test_all_and_empty_disable_filter() {
        let options = FilterOptions::from_dataset(&sample());
        let filter = Filter::resolve(
            &FilterParams {
                gender: Some("All".to_string()),
                city: Some(String::new()),
                ..params()
            },
            &options,
        )
        .unwrap();
        assert_eq!(filter.gender, None);
        assert_eq!(filter.city, None);
    }

    #[test]
    fn test_age_bounds_are_clamped() {
        let options = FilterOptions::from_dataset(&sample());
        let filter = Filter::resolve(
            &FilterParams {
                age_min: Some(2),
                age_max: Some(30),
                ..params()
            },
            &options,
        )
        .unwrap();
        assert_eq!((filter.age_min, filter.age_max), (8, 14));
    }

    #[test]
    fn test_inverted_age_range_rejected() {
        let options = FilterOptions::from_dataset(&sample());
        let err = Filter::resolve(
            &FilterParams {
                age_min: Some(12),
                age_max: Some(10),
                ..params()
            },
            &options,
        )
        .unwrap_err();
        assert_eq!(err, FilterError::InvertedAgeRange { min: 12, max: 10 });
    }

    #[test]
    fn test_combined_filters() {
        let data = sample();
        let options = FilterOptions::from_dataset(&data);
        let filter = Filter::resolve(
            &FilterParams {
                age_min: Some(9),
                age_max: Some(12),
                gender: Some("Male".to_string()),
                device: Some("Smartphone".to_string()),
                ..params()
            },
            &options,
        )
        .unwrap();
        let rows = filter.apply(&data);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].age, 10);
        assert_eq!(rows[0].city_type, "Rural");
    }

    #[test]
    fn test_unknown_value_yields_empty_selection() {
        let data = sample();
        let options = FilterOptions::from_dataset(&data);
        let filter = Filter::resolve(
            &FilterParams {
                city: Some("Suburban".to_string()),
                ..params()
            },
            &options,
        )
        .unwrap();
        assert!(filter.apply(&data).is_empty());
    }

    #[test]
    fn test_to_query_encodes_selection() {
        let options = FilterOptions::from_dataset(&sample());
        let filter = Filter::resolve(
            &FilterParams {
                age_min: Some(10),
                device: Some("Smart TV".to_string()),
                health: true,
                ..params()
            },
            &options,
        )
        .unwrap();
        assert_eq!(
            filter.to_query(),
            "age_min=10&age_max=14&device=Smart%20TV&health=true"
        );
    }
}
