use crate::model::FaultSeverity;
use serde::{Deserialize, Serialize};

/// Operating ranges for the metrics a log can contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeTableDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    #[serde(default)]
    pub engine_gate: EngineGateDef,
    pub metrics: Vec<MetricRangeDef>,
}

/// Which metrics are only evaluated over rows where the engine is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineGateDef {
    /// Canonical name of the RPM metric the gate reads.
    pub rpm_metric: String,
    /// Rows with RPM strictly above this count as "engine running".
    pub idle_rpm: f64,
    pub gated_metrics: Vec<String>,
}

impl Default for EngineGateDef {
    fn default() -> Self {
        EngineGateDef {
            rpm_metric: "engine_rpm".into(),
            idle_rpm: 100.0,
            gated_metrics: vec![
                "coolant_temp".into(),
                "maf_rate".into(),
                "fuel_pressure".into(),
            ],
        }
    }
}

/// Range entry for one canonical metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRangeDef {
    pub metric: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    pub min: f64,
    pub max: f64,
    pub warning_low: f64,
    pub warning_high: f64,
    pub critical_low: f64,
    pub critical_high: f64,
}

impl MetricRangeDef {
    pub fn spec(&self) -> MetricRangeSpec {
        MetricRangeSpec {
            min: self.min,
            max: self.max,
            warning_low: self.warning_low,
            warning_high: self.warning_high,
            critical_low: self.critical_low,
            critical_high: self.critical_high,
        }
    }
}

/// The six bounds the metric classifier compares against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRangeSpec {
    pub min: f64,
    pub max: f64,
    pub warning_low: f64,
    pub warning_high: f64,
    pub critical_low: f64,
    pub critical_high: f64,
}

/// Known diagnostic trouble codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultRegistryDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub codes: Vec<FaultCodeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultCodeDef {
    pub code: String,
    pub description: String,
    pub severity: FaultSeverity,
    #[serde(default)]
    pub possible_causes: Vec<String>,
}
