pub mod assistant;
pub mod classify;
pub mod error;
pub mod model;
pub mod parsing;
pub mod tables;

use assistant::ResponseGenerator;
use classify::outcome::Assessment;
use classify::FaultCodeClassifier;
use error::ObdError;
use model::{FaultCodeEntry, IngestionResult, Severity};
use std::path::Path;
use tables::{MetricRangeTable, Tables};

pub use parsing::{parse_log, validate_log, ValidationReport};

/// Main API entry point: parse a log and combine its severities with an optional response.
pub fn assess_log(
    path: &Path,
    tables: &Tables,
    response_text: Option<&str>,
) -> Result<(IngestionResult, Assessment), ObdError> {
    let result = parse_log(path, tables)?;
    let assessment = assess(&result, response_text);
    Ok((result, assessment))
}

/// Combined verdict for an already parsed log.
pub fn assess(result: &IngestionResult, response_text: Option<&str>) -> Assessment {
    classify::assess(&result.metrics, &result.fault_codes, response_text)
}

/// Ask `generator` for a summary of the log, then assess the log together with the answer.
///
/// Returns the generated text alongside the verdict.
pub fn assess_with_generator(
    result: &IngestionResult,
    generator: &dyn ResponseGenerator,
) -> Result<(String, Assessment), ObdError> {
    let prompt = assistant::summary_prompt(result);
    let response = generator.generate(&prompt, result).map_err(|e| match e {
        ObdError::Generator { .. } => e,
        other => ObdError::Generator {
            backend: generator.backend_name().to_string(),
            reason: other.to_string(),
        },
    })?;
    tracing::debug!(
        backend = generator.backend_name(),
        bytes = response.len(),
        "generated response"
    );
    let assessment = assess(result, Some(&response));
    Ok((response, assessment))
}

/// Severity of a free-form message, e.g. a stored chat reply.
pub fn classify_message(text: &str) -> Severity {
    classify::text::score(text)
}

/// Look up a trouble code. Unknown codes get a synthesized entry.
pub fn fault_code_info(code: &str, tables: &Tables) -> FaultCodeEntry {
    FaultCodeClassifier::new(&tables.registry).classify(code)
}

/// One-line explanation of a canonical metric name.
pub fn metric_explanation(name: &str, ranges: &MetricRangeTable) -> String {
    ranges
        .get(name)
        .map(|m| m.description.clone())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("OBD-II metric: {name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_explanation() {
        let tables = Tables::builtin().unwrap();
        assert_eq!(
            metric_explanation("coolant_temp", &tables.ranges),
            "Engine coolant temperature"
        );
        assert_eq!(
            metric_explanation("oil_pressure", &tables.ranges),
            "OBD-II metric: oil_pressure"
        );
    }

    #[test]
    fn test_classify_message() {
        assert_eq!(
            classify_message("Stop driving immediately, this is dangerous."),
            Severity::Critical
        );
    }

    #[test]
    fn test_fault_code_info_unknown() {
        let tables = Tables::builtin().unwrap();
        let entry = fault_code_info("p1234", &tables);
        assert_eq!(entry.code, "P1234");
        assert!(!entry.is_generic);
    }
}
