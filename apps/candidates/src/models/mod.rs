pub mod candidate;

pub use candidate::{
    CandidateApplication, EducationEntry, ExperienceEntry, Location, PersonalInfo, SkillSet,
    DEFAULT_STATUS,
};
