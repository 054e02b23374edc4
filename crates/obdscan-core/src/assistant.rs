//! Seam to the natural-language assistant that explains a log to the driver.
//!
//! The core only needs text back from it; that text is scored like any other
//! response when combining severities.

use crate::error::ObdError;
use crate::model::{IngestionResult, Severity};

/// Trait for response generation backends (LLM clients, canned replies, ...).
pub trait ResponseGenerator: Send + Sync {
    /// Produce a natural-language answer to `prompt` about the given log.
    fn generate(&self, prompt: &str, context: &IngestionResult) -> Result<String, ObdError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Backend that always answers with the same text, e.g. a response saved to disk.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    text: String,
}

impl CannedResponse {
    pub fn new(text: impl Into<String>) -> Self {
        CannedResponse { text: text.into() }
    }
}

impl ResponseGenerator for CannedResponse {
    fn generate(&self, _prompt: &str, _context: &IngestionResult) -> Result<String, ObdError> {
        Ok(self.text.clone())
    }

    fn backend_name(&self) -> &str {
        "canned"
    }
}

/// Prompt asking for a vehicle health summary of `result`.
pub fn summary_prompt(result: &IngestionResult) -> String {
    let worst = result
        .metrics
        .iter()
        .map(|m| m.status)
        .max()
        .unwrap_or_default();
    let status = match worst {
        Severity::Critical => "CRITICAL - Immediate attention required",
        Severity::Warning => "WARNING - Some issues need attention",
        Severity::Normal => "HEALTHY - No significant issues detected",
    };

    format!(
        "Generate a vehicle health summary.\n\n\
         Overall Status: {status}\n\
         Metrics Analyzed: {}\n\
         Fault Codes Found: {}\n\n\
         {}",
        result.metrics.len(),
        result.fault_codes.len(),
        format_context(result)
    )
}

/// Metrics and fault codes as plain text lines for a prompt.
pub fn format_context(result: &IngestionResult) -> String {
    let mut lines = Vec::new();

    if result.metrics.is_empty() {
        lines.push("No metrics data available.".to_string());
    } else {
        lines.push("VEHICLE METRICS:".to_string());
        for m in &result.metrics {
            lines.push(format!(
                "- {}: {} {} (Status: {})",
                m.name, m.value, m.unit, m.status
            ));
        }
    }

    lines.push(String::new());
    if result.fault_codes.is_empty() {
        lines.push("FAULT CODES: None detected".to_string());
    } else {
        lines.push("FAULT CODES:".to_string());
        for f in &result.fault_codes {
            lines.push(format!(
                "- {}: {} (Severity: {})",
                f.code, f.description, f.severity
            ));
        }
    }

    lines.join("\n")
}
