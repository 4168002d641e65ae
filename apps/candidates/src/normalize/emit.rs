use crate::models::{CandidateApplication, SkillSet};
use crate::normalize::reconcile::ReconciledRecord;

/// Assembles the canonical record. `portfolio` and `projects` carry through
/// as `None` when the source lacked them, so their keys are omitted on output.
pub fn emit(reconciled: ReconciledRecord, skills: SkillSet) -> CandidateApplication {
    let ReconciledRecord {
        personal_info,
        education,
        experience,
        certifications,
        projects,
        target_role,
        application_date,
        status,
        years_of_experience,
    } = reconciled;

    CandidateApplication {
        personal_info,
        education,
        experience,
        skills,
        certifications,
        projects,
        target_role,
        application_date,
        status,
        years_of_experience,
    }
}
