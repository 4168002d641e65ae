use serde::{Deserialize, Serialize};
use serde_json::Number;

pub const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: Location,
    pub date_of_birth: String,
    pub linkedin: String,
    pub github: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

impl PersonalInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub degree: String,
    pub field: String,
    pub institution: String,
    pub start_date: String,
    pub end_date: String,
    /// `None` means unknown, which is distinct from a recorded GPA of zero.
    pub gpa: Option<Number>,
    #[serde(default)]
    pub honors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_date: String,
    /// `None` or `"Present"` for a current position.
    pub end_date: Option<String>,
    pub description: String,
}

/// The six fixed skill buckets. No other keys exist in canonical form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    pub programming: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub cloud: Vec<String>,
    pub databases: Vec<String>,
    pub testing: Vec<String>,
}

impl SkillSet {
    pub fn total(&self) -> usize {
        self.programming.len()
            + self.frameworks.len()
            + self.tools.len()
            + self.cloud.len()
            + self.databases.len()
            + self.testing.len()
    }
}

/// Canonical candidate application as stored in `generalInformation.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateApplication {
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: SkillSet,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    pub target_role: String,
    pub application_date: String,
    pub status: String,
    pub years_of_experience: Number,
}

impl CandidateApplication {
    pub fn to_value(&self) -> serde_json::Value {
        // Every field is a string, number, sequence or nested struct; this cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
