use crate::error::ObdError;
use crate::tables::schema::{FaultRegistryDef, RangeTableDef};
use crate::tables::{FaultCodeRegistry, MetricRangeTable};

const METRIC_RANGES_JSON: &str = include_str!("../../../../tables/metric-ranges.json");
const FAULT_CODES_JSON: &str = include_str!("../../../../tables/fault-codes.json");

/// Names accepted by `tables explain`.
pub const BUILTIN_TABLES: &[&str] = &["ranges", "codes"];

/// The built-in metric range table.
pub fn range_table() -> Result<MetricRangeTable, ObdError> {
    let def: RangeTableDef = serde_json::from_str(METRIC_RANGES_JSON)?;
    MetricRangeTable::from_def(def)
}

/// The built-in fault code registry.
pub fn fault_registry() -> Result<FaultCodeRegistry, ObdError> {
    let def: FaultRegistryDef = serde_json::from_str(FAULT_CODES_JSON)?;
    FaultCodeRegistry::from_def(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FaultSeverity;

    #[test]
    fn test_load_builtin_ranges() {
        let table = range_table().unwrap();
        assert_eq!(table.entries().len(), 10);
        let rpm = table.spec("engine_rpm").unwrap();
        assert_eq!(rpm.critical_low, 200.0);
        assert_eq!(rpm.warning_low, 400.0);
        let coolant = table.spec("coolant_temp").unwrap();
        assert_eq!(coolant.warning_high, 110.0);
        assert_eq!(coolant.critical_high, 120.0);
        assert_eq!(table.get("battery_voltage").unwrap().unit, "V");
    }

    #[test]
    fn test_builtin_engine_gate() {
        let table = range_table().unwrap();
        assert_eq!(table.engine_gate.rpm_metric, "engine_rpm");
        assert_eq!(table.engine_gate.idle_rpm, 100.0);
        assert_eq!(table.engine_gate.gated_metrics.len(), 3);
        assert!(table.is_gated("coolant_temp"));
        assert!(!table.is_gated("vehicle_speed"));
    }

    #[test]
    fn test_load_builtin_registry() {
        let reg = fault_registry().unwrap();
        assert!(reg.len() > 200);
        let misfire = reg.get("P0300").unwrap();
        assert_eq!(misfire.severity, FaultSeverity::Critical);
        assert!(misfire.description.to_lowercase().contains("misfire"));
        assert_eq!(reg.get("P0442").unwrap().severity, FaultSeverity::Info);
        assert!(reg.get("U0100").is_some());
    }
}
