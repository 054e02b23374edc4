use std::collections::HashMap;

pub const FAULT_CODES: &str = "fault_codes";
pub const TIMESTAMP: &str = "timestamp";

/// Canonical column names, in resolution order, with their accepted header aliases.
///
/// Matching is case-insensitive and exact. The canonical name itself is always tried first.
pub const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    ("engine_rpm", &["rpm", "engine rpm", "eng_rpm"]),
    (
        "coolant_temp",
        &["coolant_temperature", "ect", "engine_coolant_temp"],
    ),
    ("vehicle_speed", &["speed", "vss"]),
    ("throttle_position", &["throttle", "tps"]),
    ("engine_load", &["load", "calculated_load"]),
    ("fuel_level", &["fuel", "fuel_tank_level"]),
    ("intake_air_temp", &["iat", "intake_temp"]),
    ("maf_rate", &["maf", "mass_air_flow"]),
    ("fuel_pressure", &["fp"]),
    ("battery_voltage", &["battery", "voltage"]),
    (FAULT_CODES, &["dtc", "trouble_codes", "codes"]),
    (TIMESTAMP, &["time", "datetime"]),
];

/// A header matched to a canonical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub canonical: &'static str,
    /// Header text as it appeared in the file.
    pub header: String,
    pub index: usize,
}

impl ResolvedColumn {
    /// Fault codes and timestamps are recognized but carry no numeric metric.
    pub fn is_metric(&self) -> bool {
        self.canonical != FAULT_CODES && self.canonical != TIMESTAMP
    }
}

/// Map headers to canonical columns. Unresolved names are simply absent.
///
/// For each canonical name the first alias present wins. If two headers differ
/// only in case, the later one shadows the earlier.
pub fn resolve_columns(headers: &[String]) -> Vec<ResolvedColumn> {
    let by_lower: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();

    COLUMN_ALIASES
        .iter()
        .filter_map(|&(canonical, aliases)| {
            std::iter::once(canonical)
                .chain(aliases.iter().copied())
                .find_map(|name| by_lower.get(name).copied())
                .map(|index| ResolvedColumn {
                    canonical,
                    header: headers[index].clone(),
                    index,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_names_resolve() {
        let cols = resolve_columns(&headers(&["engine_rpm", "coolant_temp", "fault_codes"]));
        let names: Vec<_> = cols.iter().map(|c| c.canonical).collect();
        assert_eq!(names, vec!["engine_rpm", "coolant_temp", "fault_codes"]);
        assert!(cols[0].is_metric());
        assert!(!cols[2].is_metric());
    }

    #[test]
    fn test_aliases_case_insensitive() {
        let cols = resolve_columns(&headers(&["Time", "RPM", "ECT", "Engine RPM", "DTC"]));
        let rpm = cols.iter().find(|c| c.canonical == "engine_rpm").unwrap();
        // "rpm" is tried before "engine rpm"
        assert_eq!(rpm.header, "RPM");
        assert_eq!(rpm.index, 1);
        assert!(cols.iter().any(|c| c.canonical == "coolant_temp" && c.index == 2));
        assert!(cols.iter().any(|c| c.canonical == TIMESTAMP));
        assert!(cols.iter().any(|c| c.canonical == FAULT_CODES));
    }

    #[test]
    fn test_canonical_beats_alias() {
        let cols = resolve_columns(&headers(&["speed", "vehicle_speed"]));
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].index, 1);
    }

    #[test]
    fn test_output_in_canonical_order() {
        let cols = resolve_columns(&headers(&["voltage", "maf", "rpm"]));
        let names: Vec<_> = cols.iter().map(|c| c.canonical).collect();
        assert_eq!(names, vec!["engine_rpm", "maf_rate", "battery_voltage"]);
    }

    #[test]
    fn test_unknown_headers_ignored() {
        assert!(resolve_columns(&headers(&["a", "b", "c"])).is_empty());
        assert!(resolve_columns(&[]).is_empty());
    }
}
