use crate::model::MetricStats;

/// Round half away from zero to 2 decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Summary statistics of a series, rounded to 2 decimals. `None` for an empty series.
///
/// `std` is the sample standard deviation, 0 for a single value.
pub fn summarize(values: &[f64]) -> Option<MetricStats> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    } else {
        0.0
    };

    Some(MetricStats {
        min: round2(min),
        max: round2(max),
        mean: round2(mean),
        std: round2(std),
    })
}
