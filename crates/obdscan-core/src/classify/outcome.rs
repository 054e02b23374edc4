use crate::model::Severity;
use serde::{Deserialize, Serialize};

/// Final verdict for one log (and optionally one response), with its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// The combined severity. Always equal to `combine` for the same inputs.
    pub verdict: Severity,
    /// Worst status across metric readings.
    pub metric_severity: Severity,
    /// Worst severity across fault codes, after prefix escalation.
    pub fault_severity: Severity,
    /// Severity of the response text. `None` when no text was given or the
    /// verdict was already critical from metrics or fault codes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_severity: Option<Severity>,
    /// Metric names, fault codes or "response text" that produced the verdict.
    pub determining: Vec<String>,
    /// Human-readable explanation of the verdict.
    pub reason: String,
}

impl Assessment {
    pub fn has_issues(&self) -> bool {
        self.verdict > Severity::Normal
    }
}
