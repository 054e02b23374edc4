use crate::model::{Category, FaultCodeEntry, FaultSeverity};
use crate::tables::FaultCodeRegistry;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static CODE_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[PCBU][0-9]{4}").unwrap());

static WHOLE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[PCBU][0-9]{4}$").unwrap());

const UNKNOWN_CODE_ACTION: &str = "Have the code diagnosed by a professional mechanic";

/// True if `code` is exactly one upper-case trouble code.
pub fn is_fault_code(code: &str) -> bool {
    WHOLE_CODE.is_match(code)
}

/// Find every trouble code inside a cell, case-insensitively, normalized to upper case.
///
/// Cells may hold several codes separated by spaces or commas.
pub fn extract_codes(cell: &str) -> Vec<String> {
    let upper = cell.to_uppercase();
    CODE_IN_TEXT
        .find_iter(&upper)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Union of all codes across cells, sorted.
pub fn collect_codes<'a>(cells: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<String> = cells.into_iter().flat_map(extract_codes).collect();
    set.into_iter().collect()
}

/// Guidance attached to a registry hit, by severity.
pub fn recommended_action(severity: FaultSeverity) -> &'static str {
    match severity {
        FaultSeverity::Critical => {
            "Stop driving immediately and have the vehicle inspected by a professional mechanic."
        }
        FaultSeverity::Warning => {
            "Schedule a service appointment soon to diagnose and address this issue."
        }
        FaultSeverity::Info => "Monitor the situation. This may not require immediate attention.",
    }
}

/// Generic codes have 0, 2 or 3 as their second character; 1 marks manufacturer-specific.
pub fn is_generic(code: &str) -> bool {
    matches!(code.chars().nth(1), Some('0' | '2' | '3'))
}

/// Looks codes up in a registry, synthesizing an entry for unknown codes.
#[derive(Debug, Clone, Copy)]
pub struct FaultCodeClassifier<'a> {
    registry: &'a FaultCodeRegistry,
}

impl<'a> FaultCodeClassifier<'a> {
    pub fn new(registry: &'a FaultCodeRegistry) -> Self {
        FaultCodeClassifier { registry }
    }

    /// Always returns an entry.
    pub fn classify(&self, code: &str) -> FaultCodeEntry {
        let code = code.trim().to_uppercase();
        let category = code
            .chars()
            .next()
            .map(Category::from_prefix)
            .unwrap_or(Category::Unknown);
        let generic = is_generic(&code);

        match self.registry.get(&code) {
            Some(known) => FaultCodeEntry {
                description: known.description.clone(),
                severity: known.severity,
                category,
                is_generic: generic,
                possible_causes: known.possible_causes.clone(),
                recommended_action: recommended_action(known.severity).to_string(),
                code,
            },
            None => {
                let origin = if generic {
                    "Generic"
                } else {
                    "Manufacturer-specific"
                };
                FaultCodeEntry {
                    description: format!("{origin} {category} code"),
                    severity: if generic {
                        FaultSeverity::Warning
                    } else {
                        FaultSeverity::Info
                    },
                    category,
                    is_generic: generic,
                    possible_causes: vec!["Refer to vehicle service manual".to_string()],
                    recommended_action: UNKNOWN_CODE_ACTION.to_string(),
                    code,
                }
            }
        }
    }
}
