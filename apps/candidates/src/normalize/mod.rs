// Candidate record normalizer.
// validate -> reconcile -> flatten skills -> emit. Every stage is pure and
// total over any JSON value; only the emitted record is typed.

pub mod emit;
pub mod reconcile;
pub mod skills;
pub mod validation;
pub mod value;

use serde_json::Value;

use crate::models::CandidateApplication;

pub use skills::SkillDepth;
pub use validation::validate_structure;

/// Normalizes a raw record with the canonical one-level skills walker.
pub fn normalize(record: &Value) -> CandidateApplication {
    let skills = value::lookup(record, reconcile::SKILLS);
    emit::emit(reconcile::reconcile(record), skills::flatten_skills(skills))
}

pub fn normalize_with_depth(record: &Value, depth: SkillDepth) -> CandidateApplication {
    let skills = value::lookup(record, reconcile::SKILLS);
    emit::emit(
        reconcile::reconcile(record),
        skills::flatten_skills_with_depth(skills, depth),
    )
}
