//! Skills flattener: collapses nested legacy skill taxonomies into the six
//! canonical buckets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::SkillSet;

/// Canonical bucket names, in canonical order.
pub const SKILL_KEYS: [&str; 6] = [
    "programming",
    "frameworks",
    "tools",
    "cloud",
    "databases",
    "testing",
];

// The slow path never routes into frameworks, databases or testing; those
// buckets are only filled by already-flat records.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillBucket {
    Programming,
    Frameworks,
    Tools,
    Cloud,
    Databases,
    Testing,
}

/// How far below an outer category the slow path looks for skill arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillDepth {
    /// Arrays directly under a nested sub-category. Deeper values are ignored.
    #[default]
    OneLevel,
    /// Arrays at any depth under an outer category, still routed by the outer key.
    Unbounded,
}

/// Routes a nested category's skills by its outer key. First match wins.
///
/// The cicd/monitoring and security/networking rules land in the same bucket
/// as the fallback today but are kept as their own rules so they can be
/// re-targeted independently.
#[allow(clippy::if_same_then_else)]
pub fn route_outer_category(category: &str) -> SkillBucket {
    if category.contains("cloud") || category == "iac" || category == "containers" {
        SkillBucket::Cloud
    } else if category == "scripting" {
        SkillBucket::Programming
    } else if category == "cicd" || category == "monitoring" {
        SkillBucket::Tools
    } else if category == "security" || category == "networking" {
        SkillBucket::Tools
    } else {
        SkillBucket::Tools
    }
}

/// Bucket for an array sitting directly under the skills object in a
/// non-canonical record. versionControl and operatingSystems were the
/// historical cases; everything lands in tools.
pub fn route_top_level_array(category: &str) -> SkillBucket {
    match category {
        "versionControl" | "operatingSystems" => SkillBucket::Tools,
        _ => SkillBucket::Tools,
    }
}

/// Flattens any `skills` value with the canonical one-level walker.
pub fn flatten_skills(skills: Option<&Value>) -> SkillSet {
    flatten_skills_with_depth(skills, SkillDepth::OneLevel)
}

pub fn flatten_skills_with_depth(skills: Option<&Value>, depth: SkillDepth) -> SkillSet {
    let Some(skills) = skills.filter(|v| !v.is_null()) else {
        return SkillSet::default();
    };

    if skills.get("programming").is_some_and(Value::is_array) {
        return passthrough_flat(skills);
    }

    let mut collector = BucketCollector::default();
    if let Some(categories) = skills.as_object() {
        for (category, value) in categories {
            match value {
                Value::Array(items) => collector.extend(route_top_level_array(category), items),
                Value::Object(nested) => {
                    let bucket = route_outer_category(category);
                    collect_nested(&mut collector, bucket, nested, depth);
                }
                // Scalars under a skill category are dropped.
                _ => {}
            }
        }
    }
    collector.finish()
}

/// Fast path for already-flat input: each bucket's strings verbatim, other keys ignored.
fn passthrough_flat(skills: &Value) -> SkillSet {
    let bucket = |key: &str| -> Vec<String> {
        skills
            .get(key)
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    };
    SkillSet {
        programming: bucket("programming"),
        frameworks: bucket("frameworks"),
        tools: bucket("tools"),
        cloud: bucket("cloud"),
        databases: bucket("databases"),
        testing: bucket("testing"),
    }
}

fn collect_nested(
    collector: &mut BucketCollector,
    bucket: SkillBucket,
    nested: &Map<String, Value>,
    depth: SkillDepth,
) {
    for value in nested.values() {
        match value {
            Value::Array(items) => collector.extend(bucket, items),
            Value::Object(deeper) if depth == SkillDepth::Unbounded => {
                collect_nested(collector, bucket, deeper, depth)
            }
            _ => {}
        }
    }
}

#[derive(Default)]
struct BucketCollector {
    programming: Vec<Value>,
    frameworks: Vec<Value>,
    tools: Vec<Value>,
    cloud: Vec<Value>,
    databases: Vec<Value>,
    testing: Vec<Value>,
}

impl BucketCollector {
    fn extend(&mut self, bucket: SkillBucket, items: &[Value]) {
        let target = match bucket {
            SkillBucket::Programming => &mut self.programming,
            SkillBucket::Frameworks => &mut self.frameworks,
            SkillBucket::Tools => &mut self.tools,
            SkillBucket::Cloud => &mut self.cloud,
            SkillBucket::Databases => &mut self.databases,
            SkillBucket::Testing => &mut self.testing,
        };
        target.extend(items.iter().cloned());
    }

    fn finish(self) -> SkillSet {
        SkillSet {
            programming: clean_bucket(self.programming),
            frameworks: clean_bucket(self.frameworks),
            tools: clean_bucket(self.tools),
            cloud: clean_bucket(self.cloud),
            databases: clean_bucket(self.databases),
            testing: clean_bucket(self.testing),
        }
    }
}

/// Exact-match dedup, then drops non-strings and blank strings.
/// "Git" and "git" are distinct entries.
fn clean_bucket(items: Vec<Value>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .filter(|s| !s.trim().is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
