pub mod columns;
pub mod csv;
pub mod stats;
pub mod values;

use crate::classify::fault::{collect_codes, FaultCodeClassifier};
use crate::classify::metric::MetricClassifier;
use crate::error::{ObdError, ValidationFailure};
use crate::model::{
    FaultCodeEntry, FaultSeverity, IngestionResult, MetricReading, MetricStats, Severity,
    Statistics,
};
use crate::tables::{MetricRangeTable, Tables};
use columns::{resolve_columns, ResolvedColumn, FAULT_CODES};
use csv::CsvTable;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use values::{numeric_cells, numeric_series};

/// Outcome of a successful `validate_log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub row_count: usize,
    /// Canonical names of every recognized column, fault codes and timestamp included.
    pub recognized: Vec<String>,
}

impl ValidationReport {
    pub fn message(&self) -> String {
        format!(
            "Valid OBD-II log file with {} metrics detected.",
            self.recognized.len()
        )
    }
}

/// A log that passed validation, ready for extraction.
struct LoadedLog {
    table: CsvTable,
    columns: Vec<ResolvedColumn>,
}

/// Check that `path` is a usable OBD-II log without classifying anything.
pub fn validate_log(path: &Path) -> Result<ValidationReport, ObdError> {
    let log = load_log(path)?;
    Ok(ValidationReport {
        row_count: log.table.row_count(),
        recognized: log
            .columns
            .iter()
            .map(|c| c.canonical.to_string())
            .collect(),
    })
}

/// Read, validate and classify an OBD-II CSV log.
///
/// Validation failures keep their specific reason. Read errors and malformed
/// CSV are reported as `ObdError::Parse`.
pub fn parse_log(path: &Path, tables: &Tables) -> Result<IngestionResult, ObdError> {
    let log = load_log(path).map_err(|failure| match failure {
        ValidationFailure::Unreadable(_) | ValidationFailure::Malformed(_) => {
            ObdError::Parse(failure.to_string())
        }
        other => ObdError::Validation(other),
    })?;

    tracing::info!(
        file = %path.display(),
        rows = log.table.row_count(),
        "parsing OBD-II log"
    );

    let result = ingest(&log, &path.display().to_string(), tables);

    tracing::info!(
        file = %path.display(),
        metrics = result.metrics.len(),
        fault_codes = result.fault_codes.len(),
        has_issues = result.has_issues,
        "parsed OBD-II log"
    );

    Ok(result)
}

/// Checks run in order: existence, extension, readability, CSV shape, rows, columns.
fn load_log(path: &Path) -> Result<LoadedLog, ValidationFailure> {
    if !path.exists() {
        return Err(ValidationFailure::Missing);
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ValidationFailure::WrongExtension);
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(file = %path.display(), error = %e, "failed to read log");
        ValidationFailure::Unreadable(e.to_string())
    })?;

    let table = csv::parse_csv(&text).map_err(|detail| {
        tracing::warn!(file = %path.display(), %detail, "malformed CSV");
        ValidationFailure::Malformed(detail)
    })?;

    if table.row_count() == 0 {
        return Err(ValidationFailure::Empty);
    }

    let columns = resolve_columns(&table.headers);
    if columns.is_empty() {
        return Err(ValidationFailure::NoRecognizedColumns);
    }

    Ok(LoadedLog { table, columns })
}

fn ingest(log: &LoadedLog, file_path: &str, tables: &Tables) -> IngestionResult {
    let (metrics, metric_statistics) = extract_metrics(log, &tables.ranges);
    let fault_codes = extract_fault_codes(log, tables);

    let metric_count = |s: Severity| metrics.iter().filter(|m| m.status == s).count();
    let fault_count = |s: FaultSeverity| fault_codes.iter().filter(|f| f.severity == s).count();

    let statistics = Statistics {
        total_rows: log.table.row_count(),
        metrics_count: metrics.len(),
        normal_count: metric_count(Severity::Normal) + fault_count(FaultSeverity::Info),
        warning_count: metric_count(Severity::Warning) + fault_count(FaultSeverity::Warning),
        critical_count: metric_count(Severity::Critical) + fault_count(FaultSeverity::Critical),
        metric_statistics,
    };

    let has_issues =
        metrics.iter().any(|m| m.status != Severity::Normal) || !fault_codes.is_empty();

    IngestionResult {
        file_path: file_path.to_string(),
        row_count: log.table.row_count(),
        critical_count: metric_count(Severity::Critical) + fault_count(FaultSeverity::Critical),
        warning_count: metric_count(Severity::Warning) + fault_count(FaultSeverity::Warning),
        has_issues,
        metrics,
        fault_codes,
        statistics,
    }
}

fn extract_metrics(
    log: &LoadedLog,
    ranges: &MetricRangeTable,
) -> (Vec<MetricReading>, BTreeMap<String, MetricStats>) {
    let classifier = MetricClassifier::new(ranges);
    let engine_running = engine_running_rows(log, ranges);

    let mut metrics = Vec::new();
    let mut statistics = BTreeMap::new();

    for column in log.columns.iter().filter(|c| c.is_metric()) {
        let name = column.canonical;
        let cells = numeric_cells(log.table.column(column.index));
        let full: Vec<f64> = cells.iter().flatten().copied().collect();

        let Some(&last_full) = full.last() else {
            tracing::warn!(metric = name, header = %column.header, "no numeric values, skipping metric");
            continue;
        };

        let latest = match (&engine_running, ranges.is_gated(name)) {
            (Some(running), true) => {
                let gated = cells
                    .iter()
                    .zip(running)
                    .filter_map(|(v, &on)| if on { *v } else { None })
                    .last();
                if gated.is_none() {
                    tracing::debug!(metric = name, "no engine-running rows, using all rows");
                }
                gated.unwrap_or(last_full)
            }
            _ => last_full,
        };

        let status = classifier.classify(name, latest);
        tracing::debug!(metric = name, value = latest, %status, "classified metric");

        let entry = ranges.get(name);
        metrics.push(MetricReading {
            name: name.to_string(),
            value: stats::round2(latest),
            unit: entry.map(|e| e.unit.clone()).unwrap_or_default(),
            status,
            description: entry.map(|e| e.description.clone()).unwrap_or_default(),
            normal_range: entry
                .map(|e| format!("{} - {}", e.min, e.max))
                .unwrap_or_else(|| "N/A".into()),
        });

        if let Some(summary) = stats::summarize(&full) {
            statistics.insert(name.to_string(), summary);
        }
    }

    (metrics, statistics)
}

/// Per-row flag: engine speed above idle. `None` when the rpm column is
/// absent or holds no numbers, in which case no gating applies.
fn engine_running_rows(log: &LoadedLog, ranges: &MetricRangeTable) -> Option<Vec<bool>> {
    let gate = &ranges.engine_gate;
    let rpm = log
        .columns
        .iter()
        .find(|c| c.canonical == gate.rpm_metric)?;
    let cells = numeric_cells(log.table.column(rpm.index));
    if cells.iter().all(Option::is_none) {
        return None;
    }
    Some(
        cells
            .iter()
            .map(|v| v.is_some_and(|rpm| rpm > gate.idle_rpm))
            .collect(),
    )
}

fn extract_fault_codes(log: &LoadedLog, tables: &Tables) -> Vec<FaultCodeEntry> {
    let Some(column) = log.columns.iter().find(|c| c.canonical == FAULT_CODES) else {
        return Vec::new();
    };
    let classifier = FaultCodeClassifier::new(&tables.registry);
    collect_codes(log.table.column(column.index))
        .iter()
        .map(|code| classifier.classify(code))
        .collect()
}

/// Numeric series of one canonical column, for callers that want raw values.
pub fn column_values(table: &CsvTable, canonical: &str) -> Option<Vec<f64>> {
    let column = resolve_columns(&table.headers)
        .into_iter()
        .find(|c| c.canonical == canonical)?;
    Some(numeric_series(table.column(column.index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_log(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    fn tables() -> Tables {
        Tables::builtin().unwrap()
    }

    fn validation(err: ObdError) -> ValidationFailure {
        match err {
            ObdError::Validation(f) => f,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = validate_log(Path::new("/nonexistent/log.csv")).unwrap_err();
        assert_eq!(validation(err), ValidationFailure::Missing);
    }

    #[test]
    fn test_wrong_extension_regardless_of_content() {
        let (_dir, path) = write_log("log.txt", "engine_rpm\n800\n");
        let err = validate_log(&path).unwrap_err();
        assert!(err.to_string().contains(".csv"));
        assert_eq!(validation(err), ValidationFailure::WrongExtension);
    }

    #[test]
    fn test_uppercase_extension_accepted() {
        let (_dir, path) = write_log("LOG.CSV", "engine_rpm\n800\n");
        assert!(validate_log(&path).is_ok());
    }

    #[test]
    fn test_header_only_is_empty() {
        let (_dir, path) = write_log("log.csv", "engine_rpm,coolant_temp\n");
        assert_eq!(
            validation(validate_log(&path).unwrap_err()),
            ValidationFailure::Empty
        );
        let (_dir, path) = write_log("log.csv", "");
        assert_eq!(
            validation(validate_log(&path).unwrap_err()),
            ValidationFailure::Empty
        );
    }

    #[test]
    fn test_no_recognized_columns() {
        let (_dir, path) = write_log("log.csv", "a,b,c\n1,2,3\n");
        let err = validate_log(&path).unwrap_err();
        assert!(err.to_string().contains("No valid OBD-II data"));
    }

    #[test]
    fn test_validate_counts_all_recognized_columns() {
        let (_dir, path) = write_log("log.csv", "timestamp,rpm,ect,dtc,other\n0,800,90,,x\n");
        let report = validate_log(&path).unwrap();
        assert_eq!(report.row_count, 1);
        assert_eq!(report.recognized.len(), 4);
        assert_eq!(report.message(), "Valid OBD-II log file with 4 metrics detected.");
    }

    #[test]
    fn test_malformed_is_parse_error_from_parse_log() {
        let (_dir, path) = write_log("log.csv", "engine_rpm\n800,1\n");
        let err = validate_log(&path).unwrap_err();
        assert!(matches!(validation(err), ValidationFailure::Malformed(_)));
        let err = parse_log(&path, &tables()).unwrap_err();
        assert!(matches!(err, ObdError::Parse(_)));
    }

    #[test]
    fn test_latest_value_drives_status_not_mean() {
        let (_dir, path) = write_log(
            "log.csv",
            "engine_rpm,coolant_temp\n2000,130\n2000,130\n2000,90\n",
        );
        let result = parse_log(&path, &tables()).unwrap();
        let coolant = result.metric("coolant_temp").unwrap();
        assert_eq!(coolant.value, 90.0);
        assert_eq!(coolant.status, Severity::Normal);
        let s = &result.statistics.metric_statistics["coolant_temp"];
        assert_eq!(s.mean, 116.67);
        assert_eq!(s.max, 130.0);
    }

    #[test]
    fn test_engine_gate_uses_running_rows() {
        // The final row has the engine off; coolant is taken from the last running row
        let (_dir, path) = write_log(
            "log.csv",
            "engine_rpm,coolant_temp,vehicle_speed\n850,125,10\n0,20,0\n",
        );
        let result = parse_log(&path, &tables()).unwrap();
        assert_eq!(result.metric("coolant_temp").unwrap().value, 125.0);
        assert_eq!(
            result.metric("coolant_temp").unwrap().status,
            Severity::Critical
        );
        // Not gated: reports the literal last value
        assert_eq!(result.metric("vehicle_speed").unwrap().value, 0.0);
    }

    #[test]
    fn test_engine_gate_falls_back_when_never_running() {
        let (_dir, path) = write_log("log.csv", "engine_rpm,coolant_temp\n0,40\n50,45\n");
        let result = parse_log(&path, &tables()).unwrap();
        assert_eq!(result.metric("coolant_temp").unwrap().value, 45.0);
    }

    #[test]
    fn test_no_gate_without_rpm_values() {
        let (_dir, path) = write_log("log.csv", "engine_rpm,coolant_temp\n,40\nn/a,95\n");
        let result = parse_log(&path, &tables()).unwrap();
        assert!(result.metric("engine_rpm").is_none());
        assert_eq!(result.metric("coolant_temp").unwrap().value, 95.0);
    }

    #[test]
    fn test_non_numeric_cells_dropped_and_empty_metric_skipped() {
        let (_dir, path) = write_log(
            "log.csv",
            "engine_rpm,fuel_level,battery_voltage\n2500,abc,13.8\n2600,,error\n",
        );
        let result = parse_log(&path, &tables()).unwrap();
        assert!(result.metric("fuel_level").is_none());
        assert_eq!(result.metric("battery_voltage").unwrap().value, 13.8);
        assert_eq!(result.metrics.len(), 2);
        assert_eq!(result.statistics.metrics_count, 2);
    }

    #[test]
    fn test_reading_metadata() {
        let (_dir, path) = write_log("log.csv", "rpm\n2500.456\n");
        let result = parse_log(&path, &tables()).unwrap();
        let rpm = result.metric("engine_rpm").unwrap();
        assert_eq!(rpm.value, 2500.46);
        assert_eq!(rpm.unit, "RPM");
        assert_eq!(rpm.normal_range, "600 - 7000");
        assert!(!rpm.description.is_empty());
        assert_eq!(result.statistics.metric_statistics["engine_rpm"].std, 0.0);
    }

    #[test]
    fn test_fault_codes_only_log() {
        let (_dir, path) = write_log("log.csv", "dtc\np0171 P0420\nP0171\n");
        let result = parse_log(&path, &tables()).unwrap();
        assert!(result.metrics.is_empty());
        let codes: Vec<_> = result.fault_codes.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["P0171", "P0420"]);
        assert!(result.has_issues);
        assert_eq!(result.warning_count, 2);
        assert_eq!(result.statistics.warning_count, 2);
    }

    #[test]
    fn test_info_code_counts_as_normal() {
        let (_dir, path) = write_log("log.csv", "rpm,dtc\n2500,P0442\n");
        let result = parse_log(&path, &tables()).unwrap();
        assert_eq!(result.fault_codes[0].severity, FaultSeverity::Info);
        assert_eq!(result.statistics.normal_count, 2);
        assert_eq!(result.statistics.warning_count, 0);
        assert_eq!(result.warning_count, 0);
        assert!(result.has_issues);
    }

    #[test]
    fn test_column_values() {
        let table = csv::parse_csv("RPM,x\n800,a\nbad,b\n900,c\n").unwrap();
        assert_eq!(column_values(&table, "engine_rpm"), Some(vec![800.0, 900.0]));
        assert_eq!(column_values(&table, "coolant_temp"), None);
    }
}
