pub mod builtin;
pub mod schema;

use crate::classify::fault::is_fault_code;
use crate::error::ObdError;
use schema::{
    EngineGateDef, FaultCodeDef, FaultRegistryDef, MetricRangeDef, MetricRangeSpec, RangeTableDef,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Read-only metric range table, keyed by canonical metric name.
#[derive(Debug, Clone)]
pub struct MetricRangeTable {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub engine_gate: EngineGateDef,
    entries: Vec<MetricRangeDef>,
    index: HashMap<String, usize>,
}

impl MetricRangeTable {
    /// Build a table from a validated definition.
    pub fn from_def(def: RangeTableDef) -> Result<Self, ObdError> {
        validate_range_table(&def)?;
        let index = def
            .metrics
            .iter()
            .enumerate()
            .map(|(i, m)| (m.metric.clone(), i))
            .collect();
        Ok(MetricRangeTable {
            name: def.name,
            version: def.version,
            description: def.description,
            engine_gate: def.engine_gate,
            entries: def.metrics,
            index,
        })
    }

    pub fn get(&self, metric: &str) -> Option<&MetricRangeDef> {
        self.index.get(metric).map(|&i| &self.entries[i])
    }

    pub fn spec(&self, metric: &str) -> Option<MetricRangeSpec> {
        self.get(metric).map(MetricRangeDef::spec)
    }

    /// Entries in table order.
    pub fn entries(&self) -> &[MetricRangeDef] {
        &self.entries
    }

    pub fn is_gated(&self, metric: &str) -> bool {
        self.engine_gate.gated_metrics.iter().any(|m| m == metric)
    }
}

/// Read-only fault code registry, keyed by upper-case code.
#[derive(Debug, Clone)]
pub struct FaultCodeRegistry {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    codes: HashMap<String, FaultCodeDef>,
}

impl FaultCodeRegistry {
    pub fn from_def(def: FaultRegistryDef) -> Result<Self, ObdError> {
        validate_fault_registry(&def)?;
        let codes = def
            .codes
            .into_iter()
            .map(|mut c| {
                c.code = c.code.to_uppercase();
                (c.code.clone(), c)
            })
            .collect();
        Ok(FaultCodeRegistry {
            name: def.name,
            version: def.version,
            description: def.description,
            codes,
        })
    }

    pub fn get(&self, code: &str) -> Option<&FaultCodeDef> {
        self.codes.get(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All known codes, sorted.
    pub fn codes(&self) -> Vec<&FaultCodeDef> {
        let mut all: Vec<&FaultCodeDef> = self.codes.values().collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        all
    }
}

/// The two static tables every classification run reads from.
#[derive(Debug, Clone)]
pub struct Tables {
    pub ranges: MetricRangeTable,
    pub registry: FaultCodeRegistry,
}

impl Tables {
    /// The tables compiled into the crate.
    pub fn builtin() -> Result<Self, ObdError> {
        Ok(Tables {
            ranges: builtin::range_table()?,
            registry: builtin::fault_registry()?,
        })
    }
}

/// Load a metric range table from a JSON file.
pub fn load_range_table(path: &Path) -> Result<MetricRangeTable, ObdError> {
    let content = std::fs::read_to_string(path).map_err(|e| ObdError::TableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let def: RangeTableDef = serde_json::from_str(&content).map_err(|e| ObdError::TableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    MetricRangeTable::from_def(def)
}

/// Parse a metric range table from a JSON string (no file path context).
pub fn parse_range_table_str(json: &str) -> Result<MetricRangeTable, ObdError> {
    let def: RangeTableDef = serde_json::from_str(json)?;
    MetricRangeTable::from_def(def)
}

/// Load a fault code registry from a JSON file.
pub fn load_fault_registry(path: &Path) -> Result<FaultCodeRegistry, ObdError> {
    let content = std::fs::read_to_string(path).map_err(|e| ObdError::TableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let def: FaultRegistryDef =
        serde_json::from_str(&content).map_err(|e| ObdError::TableLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    FaultCodeRegistry::from_def(def)
}

pub fn parse_fault_registry_str(json: &str) -> Result<FaultCodeRegistry, ObdError> {
    let def: FaultRegistryDef = serde_json::from_str(json)?;
    FaultCodeRegistry::from_def(def)
}

/// Validate that a range table is well-formed.
///
/// Bands must nest: critical outside warning, and min <= max. The preferred
/// band is not required to sit inside the warning band.
pub fn validate_range_table(def: &RangeTableDef) -> Result<(), ObdError> {
    if def.metrics.is_empty() {
        return Err(ObdError::TableInvalid("metrics must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for m in &def.metrics {
        if m.metric.is_empty() {
            return Err(ObdError::TableInvalid(
                "metric name must not be empty".into(),
            ));
        }
        if !seen.insert(m.metric.as_str()) {
            return Err(ObdError::TableInvalid(format!(
                "metric '{}' is listed more than once",
                m.metric
            )));
        }

        let bounds = [
            m.min,
            m.max,
            m.warning_low,
            m.warning_high,
            m.critical_low,
            m.critical_high,
        ];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(ObdError::TableInvalid(format!(
                "metric '{}' has a non-finite bound",
                m.metric
            )));
        }
        if m.min > m.max {
            return Err(ObdError::TableInvalid(format!(
                "metric '{}': min {} is above max {}",
                m.metric, m.min, m.max
            )));
        }
        if !(m.critical_low <= m.warning_low
            && m.warning_low <= m.warning_high
            && m.warning_high <= m.critical_high)
        {
            return Err(ObdError::TableInvalid(format!(
                "metric '{}': bands must satisfy critical_low <= warning_low <= warning_high <= critical_high",
                m.metric
            )));
        }
    }

    let gate = &def.engine_gate;
    if gate.rpm_metric.is_empty() {
        return Err(ObdError::TableInvalid(
            "engine_gate.rpm_metric must not be empty".into(),
        ));
    }
    if !gate.idle_rpm.is_finite() {
        return Err(ObdError::TableInvalid(
            "engine_gate.idle_rpm must be a finite number".into(),
        ));
    }
    if gate.gated_metrics.iter().any(|m| m.is_empty()) {
        return Err(ObdError::TableInvalid(
            "engine_gate.gated_metrics must not contain empty names".into(),
        ));
    }

    Ok(())
}

/// Validate that a fault registry is well-formed.
pub fn validate_fault_registry(def: &FaultRegistryDef) -> Result<(), ObdError> {
    if def.codes.is_empty() {
        return Err(ObdError::TableInvalid("codes must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for c in &def.codes {
        let upper = c.code.to_uppercase();
        if !is_fault_code(&upper) {
            return Err(ObdError::TableInvalid(format!(
                "'{}' is not a valid fault code (expected a letter P/C/B/U followed by 4 digits)",
                c.code
            )));
        }
        if !seen.insert(upper) {
            return Err(ObdError::TableInvalid(format!(
                "code '{}' is listed more than once",
                c.code
            )));
        }
        if c.description.trim().is_empty() {
            return Err(ObdError::TableInvalid(format!(
                "code '{}' has no description",
                c.code
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_range_table() {
        let json = r#"{
            "name": "Test",
            "version": "1.0",
            "metrics": [
                { "metric": "oil_temp", "unit": "°C",
                  "min": 80, "max": 120, "warning_low": 60, "warning_high": 130,
                  "critical_low": 40, "critical_high": 150 }
            ]
        }"#;
        let table = parse_range_table_str(json).unwrap();
        assert_eq!(table.name, "Test");
        assert_eq!(table.spec("oil_temp").unwrap().warning_high, 130.0);
        // Missing engine_gate falls back to the default gate
        assert_eq!(table.engine_gate.rpm_metric, "engine_rpm");
        assert_eq!(table.engine_gate.idle_rpm, 100.0);
    }

    #[test]
    fn test_empty_metrics_rejected() {
        let json = r#"{ "name": "Bad", "version": "1.0", "metrics": [] }"#;
        assert!(parse_range_table_str(json).is_err());
    }

    #[test]
    fn test_inverted_bands_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "metrics": [
                { "metric": "x", "min": 0, "max": 10, "warning_low": 5, "warning_high": 20,
                  "critical_low": 6, "critical_high": 30 }
            ]
        }"#;
        let err = parse_range_table_str(json).unwrap_err();
        assert!(err.to_string().contains("critical_low"));
    }

    #[test]
    fn test_min_above_max_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "metrics": [
                { "metric": "x", "min": 11, "max": 10, "warning_low": 0, "warning_high": 20,
                  "critical_low": 0, "critical_high": 30 }
            ]
        }"#;
        assert!(parse_range_table_str(json).is_err());
    }

    #[test]
    fn test_max_above_warning_high_accepted() {
        // Same shape as the built-in engine_rpm entry
        let json = r#"{
            "name": "Ok",
            "version": "1.0",
            "metrics": [
                { "metric": "engine_rpm", "min": 600, "max": 7000, "warning_low": 400,
                  "warning_high": 6500, "critical_low": 200, "critical_high": 7500 }
            ]
        }"#;
        assert!(parse_range_table_str(json).is_ok());
    }

    #[test]
    fn test_duplicate_metric_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "metrics": [
                { "metric": "x", "min": 0, "max": 1, "warning_low": 0, "warning_high": 1,
                  "critical_low": 0, "critical_high": 1 },
                { "metric": "x", "min": 0, "max": 1, "warning_low": 0, "warning_high": 1,
                  "critical_low": 0, "critical_high": 1 }
            ]
        }"#;
        assert!(parse_range_table_str(json).is_err());
    }

    #[test]
    fn test_parse_valid_registry_normalizes_case() {
        let json = r#"{
            "name": "Codes",
            "version": "1.0",
            "codes": [
                { "code": "p0420", "description": "Catalyst Efficiency", "severity": "warning" }
            ]
        }"#;
        let reg = parse_fault_registry_str(json).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(reg.get("P0420").is_some());
        assert!(reg.get("P0420").unwrap().possible_causes.is_empty());
    }

    #[test]
    fn test_bad_code_syntax_rejected() {
        let json = r#"{
            "name": "Codes",
            "version": "1.0",
            "codes": [ { "code": "X123", "description": "Nope", "severity": "info" } ]
        }"#;
        assert!(parse_fault_registry_str(json).is_err());
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let json = r#"{
            "name": "Codes",
            "version": "1.0",
            "codes": [ { "code": "P0001", "description": "Fuel", "severity": "amber" } ]
        }"#;
        assert!(parse_fault_registry_str(json).is_err());
    }

    #[test]
    fn test_load_range_table_missing_file() {
        let err = load_range_table(Path::new("/nonexistent/ranges.json")).unwrap_err();
        assert!(matches!(err, ObdError::TableLoad { .. }));
    }
}
