use crate::model::Severity;
use crate::tables::schema::MetricRangeSpec;
use crate::tables::MetricRangeTable;

/// Classifies single metric values against a range table.
#[derive(Debug, Clone, Copy)]
pub struct MetricClassifier<'a> {
    table: &'a MetricRangeTable,
}

impl<'a> MetricClassifier<'a> {
    pub fn new(table: &'a MetricRangeTable) -> Self {
        MetricClassifier { table }
    }

    /// Severity of `value` for `metric`. Metrics without a range entry are never flagged.
    pub fn classify(&self, metric: &str, value: f64) -> Severity {
        match self.table.spec(metric) {
            Some(spec) => classify_value(&spec, value),
            None => Severity::Normal,
        }
    }
}

/// Apply the range checks in order; the first match wins.
///
/// The min/max check is independent of the warning band: a value inside the
/// warning band but outside the preferred band is still a warning.
pub fn classify_value(spec: &MetricRangeSpec, value: f64) -> Severity {
    if value < spec.critical_low || value > spec.critical_high {
        return Severity::Critical;
    }
    if value < spec.warning_low || value > spec.warning_high {
        return Severity::Warning;
    }
    if value < spec.min || value > spec.max {
        return Severity::Warning;
    }
    Severity::Normal
}
