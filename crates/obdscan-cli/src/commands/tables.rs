use obdscan_core::classify::combine::{CRITICAL_CODE_PREFIXES, WARNING_CODE_PREFIXES};
use obdscan_core::error::ObdError;
use obdscan_core::model::FaultSeverity;
use obdscan_core::tables::{builtin, load_fault_registry, load_range_table};
use std::path::Path;

pub fn list() -> Result<(), ObdError> {
    println!("Built-in tables:\n");
    let ranges = builtin::range_table()?;
    println!(
        "  {:<8} {} (v{}), {} metrics",
        "ranges",
        ranges.name,
        ranges.version,
        ranges.entries().len()
    );
    if let Some(ref desc) = ranges.description {
        println!("           {desc}");
    }
    println!();

    let registry = builtin::fault_registry()?;
    println!(
        "  {:<8} {} (v{}), {} codes",
        "codes",
        registry.name,
        registry.version,
        registry.len()
    );
    if let Some(ref desc) = registry.description {
        println!("           {desc}");
    }
    println!();

    println!("Use `obdscan tables explain <name>` for details.");
    Ok(())
}

pub fn explain(name: &str) -> Result<(), ObdError> {
    match name {
        "ranges" => explain_ranges(),
        "codes" => explain_codes(),
        other => Err(ObdError::TableInvalid(format!(
            "unknown table '{}'. Available: {}",
            other,
            builtin::BUILTIN_TABLES.join(", ")
        ))),
    }
}

fn explain_ranges() -> Result<(), ObdError> {
    let table = builtin::range_table()?;
    println!("{} (v{})\n", table.name, table.version);
    if let Some(ref desc) = table.description {
        println!("{desc}\n");
    }

    println!("A metric's latest value is checked in order; the first match wins:");
    println!("  1. outside critical_low..critical_high   -> critical");
    println!("  2. outside warning_low..warning_high     -> warning");
    println!("  3. outside min..max                      -> warning");
    println!("  4. otherwise                             -> normal\n");

    let max_name_len = table
        .entries()
        .iter()
        .map(|m| m.metric.len())
        .max()
        .unwrap_or(20);

    println!(
        "  {:<width$}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  Unit",
        "Metric",
        "crit_lo",
        "warn_lo",
        "min",
        "max",
        "warn_hi",
        "crit_hi",
        width = max_name_len
    );
    println!("  {}", "-".repeat(max_name_len + 6 * 10 + 6));
    for m in table.entries() {
        println!(
            "  {:<width$}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {}",
            m.metric,
            m.critical_low,
            m.warning_low,
            m.min,
            m.max,
            m.warning_high,
            m.critical_high,
            m.unit,
            width = max_name_len
        );
    }
    println!();

    let gate = &table.engine_gate;
    println!(
        "Engine-running gate: {} are read only from rows where {} > {}.",
        gate.gated_metrics.join(", "),
        gate.rpm_metric,
        gate.idle_rpm
    );
    println!("If no row qualifies, all rows are used.\n");

    Ok(())
}

fn explain_codes() -> Result<(), ObdError> {
    let registry = builtin::fault_registry()?;
    println!("{} (v{})\n", registry.name, registry.version);
    if let Some(ref desc) = registry.description {
        println!("{desc}\n");
    }

    let count = |s: FaultSeverity| registry.codes().iter().filter(|c| c.severity == s).count();
    println!(
        "  {} codes: {} critical, {} warning, {} info\n",
        registry.len(),
        count(FaultSeverity::Critical),
        count(FaultSeverity::Warning),
        count(FaultSeverity::Info)
    );

    println!("Codes are a letter and four digits: P powertrain, C chassis, B body, U network.");
    println!("A second digit of 0, 2 or 3 marks a generic code; 1 is manufacturer-specific.");
    println!("Unknown generic codes are reported as warning, unknown manufacturer codes as info.\n");

    println!(
        "When combining, codes starting with {} are always critical",
        CRITICAL_CODE_PREFIXES.join(", ")
    );
    println!(
        "and codes starting with {} are at least warning.\n",
        WARNING_CODE_PREFIXES.join(", ")
    );

    Ok(())
}

pub fn schema() -> Result<(), ObdError> {
    print!(
        r#"JSON Table Schemas
==================

Two tables drive classification. Pass replacements with --ranges and
--codes on `obdscan parse` and `obdscan assess`.

Metric range table (--ranges)
-----------------------------
  name          (string, required)  Human-readable name of the table
  description   (string, optional)  What this table is for
  version       (string, required)  Version identifier (e.g., "1.0")
  engine_gate   (object, optional)  Metrics read only while the engine runs.
                                    Default: engine_rpm / 100 /
                                    coolant_temp, maf_rate, fuel_pressure
      rpm_metric     (string)       Canonical name of the RPM metric
      idle_rpm       (number)       Rows with RPM above this count as running
      gated_metrics  (array)        Canonical metric names to gate
  metrics       (array, required)   One entry per canonical metric (see below)

Each entry in "metrics":
  metric        (string, required)  Canonical metric name (e.g., "coolant_temp")
  unit          (string, optional)  Unit for display
  description   (string, optional)  One-line explanation
  min, max      (number, required)  Preferred operating band
  warning_low, warning_high
                (number, required)  Outside this band -> warning
  critical_low, critical_high
                (number, required)  Outside this band -> critical

Bounds must satisfy critical_low <= warning_low <= warning_high <= critical_high
and min <= max.

Example:
{{
  "name": "Track day ranges",
  "version": "1.0",
  "metrics": [
    {{
      "metric": "coolant_temp",
      "unit": "°C",
      "min": 70, "max": 115,
      "warning_low": 50, "warning_high": 118,
      "critical_low": 30, "critical_high": 125
    }}
  ]
}}

Fault code registry (--codes)
-----------------------------
  name          (string, required)
  description   (string, optional)
  version       (string, required)
  codes         (array, required)   One entry per code:
      code             (string)     Letter P/C/B/U and 4 digits, e.g. "P0300"
      description      (string)     What the code means
      severity         (string)     "critical", "warning" or "info"
      possible_causes  (array)      Optional list of likely causes

Example:
{{
  "name": "Fleet codes",
  "version": "1.0",
  "codes": [
    {{
      "code": "P0300",
      "description": "Random/Multiple Cylinder Misfire Detected",
      "severity": "critical",
      "possible_causes": ["Spark plugs", "Ignition coils"]
    }}
  ]
}}
"#
    );
    Ok(())
}

pub fn validate(ranges: Option<&Path>, codes: Option<&Path>) -> Result<(), ObdError> {
    if let Some(path) = ranges {
        let table = load_range_table(path)?;
        println!("Range table '{}' (v{}) is valid.", table.name, table.version);
        println!("  Metrics: {}", table.entries().len());

        // Check for potential issues (warnings, not errors)
        let mut warnings = Vec::new();
        for m in table.entries() {
            if m.min < m.warning_low || m.max > m.warning_high {
                warnings.push(format!(
                    "metric '{}' has min/max wider than its warning band; the warning band decides there",
                    m.metric
                ));
            }
        }
        let gate = &table.engine_gate;
        if table.get(&gate.rpm_metric).is_none() {
            warnings.push(format!(
                "engine gate metric '{}' has no range entry",
                gate.rpm_metric
            ));
        }

        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in &warnings {
                println!("  - {w}");
            }
        }
    }

    if let Some(path) = codes {
        let registry = load_fault_registry(path)?;
        println!(
            "Fault code registry '{}' (v{}) is valid.",
            registry.name, registry.version
        );
        println!("  Codes: {}", registry.len());
    }

    Ok(())
}
