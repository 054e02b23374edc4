use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Three-level danger rating. Ordered so that `Critical > Warning > Normal`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Normal => write!(f, "normal"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl Severity {
    /// Parse a severity coming from outside the crate (stored messages, JSON).
    /// Anything unrecognized is treated as normal.
    pub fn from_str_loose(s: &str) -> Severity {
        match s.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "warning" => Severity::Warning,
            _ => Severity::Normal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "Normal",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }

    /// General guidance shown alongside a verdict.
    pub fn recommendation(&self) -> &'static str {
        match self {
            Severity::Critical => "IMMEDIATE ACTION REQUIRED: Please address these issues before continuing to drive. Consider having your vehicle towed to a mechanic if necessary.",
            Severity::Warning => "ATTENTION NEEDED: Schedule a service appointment soon to address these issues and prevent potential problems.",
            Severity::Normal => "ALL GOOD: Your vehicle appears to be in good condition. Continue with regular maintenance.",
        }
    }
}

/// Severity stored against a fault code in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultSeverity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for FaultSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultSeverity::Info => write!(f, "info"),
            FaultSeverity::Warning => write!(f, "warning"),
            FaultSeverity::Critical => write!(f, "critical"),
        }
    }
}

impl FaultSeverity {
    pub fn from_str_loose(s: &str) -> FaultSeverity {
        match s.trim().to_lowercase().as_str() {
            "critical" => FaultSeverity::Critical,
            "warning" => FaultSeverity::Warning,
            _ => FaultSeverity::Info,
        }
    }
}

fn loose_severity<'de, D: Deserializer<'de>>(d: D) -> Result<Severity, D::Error> {
    let s = String::deserialize(d)?;
    Ok(Severity::from_str_loose(&s))
}

fn loose_fault_severity<'de, D: Deserializer<'de>>(d: D) -> Result<FaultSeverity, D::Error> {
    let s = String::deserialize(d)?;
    Ok(FaultSeverity::from_str_loose(&s))
}

impl From<FaultSeverity> for Severity {
    fn from(s: FaultSeverity) -> Self {
        match s {
            FaultSeverity::Info => Severity::Normal,
            FaultSeverity::Warning => Severity::Warning,
            FaultSeverity::Critical => Severity::Critical,
        }
    }
}

/// System a fault code belongs to, from its first letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Powertrain,
    Chassis,
    Body,
    Network,
    Unknown,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Powertrain => write!(f, "powertrain"),
            Category::Chassis => write!(f, "chassis"),
            Category::Body => write!(f, "body"),
            Category::Network => write!(f, "network"),
            Category::Unknown => write!(f, "unknown"),
        }
    }
}

impl Category {
    pub fn from_prefix(c: char) -> Category {
        match c.to_ascii_uppercase() {
            'P' => Category::Powertrain,
            'C' => Category::Chassis,
            'B' => Category::Body,
            'U' => Category::Network,
            _ => Category::Unknown,
        }
    }
}

/// The reported state of one metric after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    /// Canonical metric name (e.g. "coolant_temp").
    pub name: String,
    /// Latest valid value, rounded to 2 decimals.
    pub value: f64,
    pub unit: String,
    /// Read back leniently: stored results may carry any casing or an unknown label.
    #[serde(deserialize_with = "loose_severity")]
    pub status: Severity,
    pub description: String,
    /// "{min} - {max}" from the range table, or "N/A".
    pub normal_range: String,
}

/// A diagnostic trouble code with everything the chat layer needs to explain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultCodeEntry {
    pub code: String,
    pub description: String,
    #[serde(deserialize_with = "loose_fault_severity")]
    pub severity: FaultSeverity,
    pub category: Category,
    pub is_generic: bool,
    pub possible_causes: Vec<String>,
    pub recommended_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_rows: usize,
    pub metrics_count: usize,
    pub normal_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    pub metric_statistics: BTreeMap<String, MetricStats>,
}

/// Everything extracted from one log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionResult {
    pub file_path: String,
    pub row_count: usize,
    pub metrics: Vec<MetricReading>,
    pub fault_codes: Vec<FaultCodeEntry>,
    pub statistics: Statistics,
    pub has_issues: bool,
    pub critical_count: usize,
    pub warning_count: usize,
}

impl IngestionResult {
    pub fn metric(&self, name: &str) -> Option<&MetricReading> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Normal);
        assert_eq!(
            [Severity::Warning, Severity::Critical, Severity::Normal]
                .into_iter()
                .max(),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn test_severity_loose_parse_defaults_to_normal() {
        assert_eq!(Severity::from_str_loose(" CRITICAL "), Severity::Critical);
        assert_eq!(Severity::from_str_loose("Warning"), Severity::Warning);
        assert_eq!(Severity::from_str_loose("amber"), Severity::Normal);
        assert_eq!(Severity::from_str_loose(""), Severity::Normal);
    }

    #[test]
    fn test_fault_severity_maps_info_to_normal() {
        assert_eq!(Severity::from(FaultSeverity::Info), Severity::Normal);
        assert_eq!(Severity::from(FaultSeverity::Critical), Severity::Critical);
        assert_eq!(FaultSeverity::from_str_loose("bogus"), FaultSeverity::Info);
    }

    #[test]
    fn test_stored_reading_status_is_lenient() {
        let json = r#"{"name":"coolant_temp","value":112.0,"unit":"°C","status":"Critical",
                       "description":"Engine coolant temperature","normal_range":"70 - 105"}"#;
        let reading: MetricReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.status, Severity::Critical);

        let json = json.replace("\"Critical\"", "\"amber\"");
        let reading: MetricReading = serde_json::from_str(&json).unwrap();
        assert_eq!(reading.status, Severity::Normal);
    }

    #[test]
    fn test_stored_fault_severity_is_lenient() {
        let json = r#"{"code":"P0420","description":"Catalyst efficiency below threshold",
                       "severity":"WARNING","category":"powertrain","is_generic":true,
                       "possible_causes":[],"recommended_action":"Schedule service"}"#;
        let entry: FaultCodeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.severity, FaultSeverity::Warning);

        let json = json.replace("WARNING", "unknown");
        let entry: FaultCodeEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.severity, FaultSeverity::Info);
    }

    #[test]
    fn test_category_from_prefix() {
        assert_eq!(Category::from_prefix('p'), Category::Powertrain);
        assert_eq!(Category::from_prefix('U'), Category::Network);
        assert_eq!(Category::from_prefix('X'), Category::Unknown);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_recommendation_wording() {
        assert!(Severity::Critical
            .recommendation()
            .to_lowercase()
            .contains("immediate"));
        assert!(Severity::Warning.recommendation().contains("soon"));
        assert!(Severity::Normal.recommendation().contains("good"));
    }
}
