use crate::classify::outcome::Assessment;
use crate::classify::text;
use crate::model::{FaultCodeEntry, MetricReading, Severity};

/// Codes treated as critical regardless of their registry severity:
/// the misfire family and hard sensor failures.
pub const CRITICAL_CODE_PREFIXES: &[&str] = &["P03", "P0118", "P0120", "P0122", "P0123"];

/// Fuel/air, ignition, emission and transmission families.
pub const WARNING_CODE_PREFIXES: &[&str] = &["P01", "P02", "P04", "P05", "P07"];

/// Label used in `Assessment::determining` when the text decided the verdict.
pub const RESPONSE_TEXT: &str = "response text";

/// Severity implied by a code's prefix alone. Case-insensitive.
pub fn prefix_severity(code: &str) -> Severity {
    let code = code.to_uppercase();
    if CRITICAL_CODE_PREFIXES.iter().any(|p| code.starts_with(p)) {
        Severity::Critical
    } else if WARNING_CODE_PREFIXES.iter().any(|p| code.starts_with(p)) {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

/// Effective severity of one fault code: the stored severity, escalated by prefix.
pub fn fault_code_severity(entry: &FaultCodeEntry) -> Severity {
    Severity::from(entry.severity).max(prefix_severity(&entry.code))
}

pub fn metric_severity(metrics: &[MetricReading]) -> Severity {
    metrics
        .iter()
        .map(|m| m.status)
        .max()
        .unwrap_or(Severity::Normal)
}

pub fn fault_severity(fault_codes: &[FaultCodeEntry]) -> Severity {
    fault_codes
        .iter()
        .map(fault_code_severity)
        .max()
        .unwrap_or(Severity::Normal)
}

/// Merge metric, fault code and text severities into one verdict. Most severe wins.
///
/// A critical metric or fault code decides the verdict without looking at the text.
pub fn combine(
    metrics: &[MetricReading],
    fault_codes: &[FaultCodeEntry],
    response_text: Option<&str>,
) -> Severity {
    let metric = metric_severity(metrics);
    let fault = fault_severity(fault_codes);
    if metric == Severity::Critical || fault == Severity::Critical {
        return Severity::Critical;
    }
    let text = response_text.map(text::score).unwrap_or_default();
    metric.max(fault).max(text)
}

/// Same verdict as [`combine`], plus what produced it.
pub fn assess(
    metrics: &[MetricReading],
    fault_codes: &[FaultCodeEntry],
    response_text: Option<&str>,
) -> Assessment {
    let metric = metric_severity(metrics);
    let fault = fault_severity(fault_codes);

    let text = if metric == Severity::Critical || fault == Severity::Critical {
        None
    } else {
        response_text.map(text::score)
    };
    let verdict = metric.max(fault).max(text.unwrap_or_default());

    if verdict == Severity::Normal {
        return Assessment {
            verdict,
            metric_severity: metric,
            fault_severity: fault,
            text_severity: text,
            determining: Vec::new(),
            reason: "No issues detected".into(),
        };
    }

    let mut determining: Vec<String> = metrics
        .iter()
        .filter(|m| m.status == verdict)
        .map(|m| m.name.clone())
        .collect();
    determining.extend(
        fault_codes
            .iter()
            .filter(|f| fault_code_severity(f) == verdict)
            .map(|f| f.code.clone()),
    );
    if text == Some(verdict) {
        determining.push(RESPONSE_TEXT.into());
    }

    let reason = if determining.len() == 1 {
        format!("Determined by {} ({})", determining[0], verdict)
    } else {
        format!(
            "Determined by {} items at {}: {}",
            determining.len(),
            verdict,
            determining.join(", ")
        )
    };

    tracing::debug!(%verdict, determining = ?determining, "assessment complete");

    Assessment {
        verdict,
        metric_severity: metric,
        fault_severity: fault,
        text_severity: text,
        determining,
        reason,
    }
}
