use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::skills::SKILL_KEYS;
use crate::normalize::value::is_truthy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Checks a raw record against the canonical shape.
///
/// Every check runs, in a fixed order, and every failure is reported:
/// 1. `personalInfo` is an object
/// 2. `education` is a non-empty array
/// 3. `experience` is a non-empty array
/// 4. `skills` is present
/// 5. each of the six skill buckets is an array (only when `skills` is present)
/// 6. `targetRole` is truthy
/// 7. `applicationDate` is truthy
/// 8. `yearsOfExperience` is a number
///
/// Only canonical key names count. A record that spells a field with a legacy
/// alias is reported as missing it, which routes it through normalization.
pub fn validate_structure(record: &Value) -> StructureReport {
    let mut issues = Vec::new();
    let field = |key: &str| record.get(key);

    if !field("personalInfo").is_some_and(Value::is_object) {
        issues.push("Missing personalInfo".to_string());
    }
    if !is_non_empty_array(field("education")) {
        issues.push("Missing or empty education array".to_string());
    }
    if !is_non_empty_array(field("experience")) {
        issues.push("Missing or empty experience array".to_string());
    }

    match field("skills").filter(|v| is_truthy(v)) {
        None => issues.push("Missing skills".to_string()),
        Some(skills) => {
            for key in SKILL_KEYS {
                if !skills.get(key).is_some_and(Value::is_array) {
                    issues.push(format!("skills.{key} must be an array"));
                }
            }
        }
    }

    if !field("targetRole").is_some_and(is_truthy) {
        issues.push("Missing targetRole".to_string());
    }
    if !field("applicationDate").is_some_and(is_truthy) {
        issues.push("Missing applicationDate".to_string());
    }
    if !field("yearsOfExperience").is_some_and(Value::is_number) {
        issues.push("Missing or invalid yearsOfExperience".to_string());
    }

    StructureReport {
        valid: issues.is_empty(),
        issues,
    }
}

fn is_non_empty_array(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_array)
        .is_some_and(|arr| !arr.is_empty())
}
