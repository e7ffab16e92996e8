//! Ordinary least squares fit for the sleep vs screen time trend line.

use serde::Serialize;

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; `None` when every `y` is identical
    pub r_squared: Option<f64>,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a line through `points`.
///
/// Returns `None` with fewer than two points or when all `x` values are equal.
pub fn ols(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), &(x, y)| {
        let dx = x - mean_x;
        (sxx + dx * dx, sxy + dx * (y - mean_y))
    });

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let (ss_res, ss_tot) = points.iter().fold((0.0, 0.0), |(res, tot), &(x, y)| {
        let fitted = slope * x + intercept;
        (res + (y - fitted).powi(2), tot + (y - mean_y).powi(2))
    });
    let r_squared = (ss_tot > 0.0).then(|| 1.0 - ss_res / ss_tot);

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}
