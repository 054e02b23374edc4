use obdscan_core::classify::outcome::Assessment;
use obdscan_core::model::{FaultCodeEntry, IngestionResult, Severity};

fn marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "!!",
        Severity::Warning => "! ",
        Severity::Normal => "  ",
    }
}

/// Format an ingestion result as a human-readable table.
pub fn format_result(result: &IngestionResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("File: {}\n", result.file_path));
    out.push_str(&format!("Rows: {}\n\n", result.row_count));

    if result.metrics.is_empty() {
        out.push_str("  No metric columns with numeric data.\n");
    } else {
        let max_name = result
            .metrics
            .iter()
            .map(|m| m.name.len())
            .max()
            .unwrap_or(10);

        out.push_str(&format!(
            "     {:<width$}  {:>10}  {:<6}  {:<9}  Normal range\n",
            "Metric",
            "Value",
            "Unit",
            "Status",
            width = max_name
        ));
        out.push_str(&format!("  {}\n", "-".repeat(max_name + 50)));

        for m in &result.metrics {
            out.push_str(&format!(
                "  {} {:<width$}  {:>10}  {:<6}  {:<9}  {}\n",
                marker(m.status),
                m.name,
                m.value,
                m.unit,
                m.status.to_string(),
                m.normal_range,
                width = max_name
            ));
        }
    }

    out.push('\n');
    if result.fault_codes.is_empty() {
        out.push_str("  Fault codes: none\n");
    } else {
        out.push_str(&format!("  Fault codes ({}):\n", result.fault_codes.len()));
        for f in &result.fault_codes {
            out.push_str(&format!(
                "    {}  {:<8}  {}\n",
                f.code,
                f.severity.to_string(),
                f.description
            ));
        }
    }

    out.push_str(&format!(
        "\n  {} critical, {} warning\n",
        result.critical_count, result.warning_count
    ));

    out
}

pub fn print_assessment(assessment: &Assessment) {
    println!(
        "  Verdict: {} ({})\n",
        assessment.verdict.label(),
        assessment.reason
    );
    println!("    metrics:     {}", assessment.metric_severity);
    println!("    fault codes: {}", assessment.fault_severity);
    if let Some(text) = assessment.text_severity {
        println!("    response:    {text}");
    }
    println!("\n  {}", assessment.verdict.recommendation());
}

pub fn print_fault_code(entry: &FaultCodeEntry) {
    let origin = if entry.is_generic {
        "generic"
    } else {
        "manufacturer-specific"
    };
    println!("{}  {}", entry.code, entry.description);
    println!(
        "  Severity: {}   Category: {} ({})",
        entry.severity, entry.category, origin
    );
    if !entry.possible_causes.is_empty() {
        println!("  Possible causes:");
        for cause in &entry.possible_causes {
            println!("    - {cause}");
        }
    }
    println!("  Recommended: {}", entry.recommended_action);
}
