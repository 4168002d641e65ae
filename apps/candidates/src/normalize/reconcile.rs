//! Field reconciler: derives every canonical field except skills from
//! whichever legacy spelling or shape a record carries.

use serde_json::{Number, Value};

use crate::models::{EducationEntry, ExperienceEntry, Location, PersonalInfo, DEFAULT_STATUS};
use crate::normalize::value::{
    is_truthy, lookup, lookup_array, lookup_number, lookup_string, string_elements,
    string_or_empty,
};

// Canonical key first; legacy spellings after it.
pub const PERSONAL_INFO: &[&str] = &["personalInfo", "personal_info"];
pub const SKILLS: &[&str] = &["skills"];
const FIRST_NAME: &[&str] = &["firstName", "first_name"];
const LAST_NAME: &[&str] = &["lastName", "last_name"];
const EMAIL: &[&str] = &["email"];
const PHONE: &[&str] = &["phone"];
const LOCATION: &[&str] = &["location"];
const DATE_OF_BIRTH: &[&str] = &["dateOfBirth", "date_of_birth"];
const LINKEDIN: &[&str] = &["linkedin"];
const GITHUB: &[&str] = &["github"];
const PORTFOLIO: &[&str] = &["portfolio"];
const EDUCATION: &[&str] = &["education"];
const EXPERIENCE: &[&str] = &["experience"];
const START_DATE: &[&str] = &["startDate", "start_date"];
const END_DATE: &[&str] = &["endDate", "end_date"];
const CERTIFICATIONS: &[&str] = &["certifications"];
const PROJECTS: &[&str] = &["projects"];
const TARGET_ROLE: &[&str] = &["targetRole", "target_role"];
const APPLICATION_DATE: &[&str] = &["applicationDate", "application_date"];
const STATUS: &[&str] = &["status"];
const YEARS_OF_EXPERIENCE: &[&str] = &["yearsOfExperience", "years_of_experience"];

static NULL: Value = Value::Null;

/// Every canonical field except skills, with fallbacks applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRecord {
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub certifications: Vec<String>,
    /// `Some` only when the source carries a `projects` array.
    pub projects: Option<Vec<String>>,
    pub target_role: String,
    pub application_date: String,
    pub status: String,
    pub years_of_experience: Number,
}

/// Reconciles a raw record. Total over any JSON value.
pub fn reconcile(record: &Value) -> ReconciledRecord {
    let personal = lookup(record, PERSONAL_INFO).unwrap_or(&NULL);

    ReconciledRecord {
        personal_info: reconcile_personal_info(personal),
        education: lookup_array(record, EDUCATION)
            .map(|items| items.iter().map(reconcile_education).collect())
            .unwrap_or_default(),
        experience: lookup_array(record, EXPERIENCE)
            .map(|items| items.iter().map(reconcile_experience).collect())
            .unwrap_or_default(),
        certifications: lookup_array(record, CERTIFICATIONS)
            .map(|items| string_elements(items))
            .unwrap_or_default(),
        projects: lookup_array(record, PROJECTS).map(|items| string_elements(items)),
        target_role: string_or_empty(record, TARGET_ROLE),
        application_date: string_or_empty(record, APPLICATION_DATE),
        status: lookup_string(record, STATUS).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        years_of_experience: lookup_number(record, YEARS_OF_EXPERIENCE)
            .unwrap_or_else(|| Number::from(0)),
    }
}

fn reconcile_personal_info(personal: &Value) -> PersonalInfo {
    let portfolio = lookup(personal, PORTFOLIO)
        .filter(|v| is_truthy(v))
        .and_then(|_| lookup_string(personal, PORTFOLIO));

    PersonalInfo {
        first_name: string_or_empty(personal, FIRST_NAME),
        last_name: string_or_empty(personal, LAST_NAME),
        email: string_or_empty(personal, EMAIL),
        phone: string_or_empty(personal, PHONE),
        location: reconcile_location(lookup(personal, LOCATION)),
        date_of_birth: string_or_empty(personal, DATE_OF_BIRTH),
        linkedin: string_or_empty(personal, LINKEDIN),
        github: string_or_empty(personal, GITHUB),
        portfolio,
    }
}

/// Accepts either a `{city, state, country}` object or a comma-separated string.
fn reconcile_location(location: Option<&Value>) -> Location {
    match location {
        Some(Value::String(text)) => parse_location_string(text),
        Some(obj @ Value::Object(_)) => Location {
            city: string_or_empty(obj, &["city"]),
            state: string_or_empty(obj, &["state"]),
            country: string_or_empty(obj, &["country"]),
        },
        _ => Location::default(),
    }
}

/// "City" | "City, Country" | "City, State, Country[, ...]"
pub fn parse_location_string(text: &str) -> Location {
    let parts: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [] => Location::default(),
        [city] => Location {
            city: city.to_string(),
            ..Default::default()
        },
        [city, country] => Location {
            city: city.to_string(),
            state: String::new(),
            country: country.to_string(),
        },
        [city, state, rest @ ..] => Location {
            city: city.to_string(),
            state: state.to_string(),
            country: rest.join(", "),
        },
    }
}

fn reconcile_education(entry: &Value) -> EducationEntry {
    EducationEntry {
        degree: string_or_empty(entry, &["degree"]),
        field: string_or_empty(entry, &["field"]),
        institution: string_or_empty(entry, &["institution"]),
        start_date: string_or_empty(entry, START_DATE),
        end_date: string_or_empty(entry, END_DATE),
        gpa: lookup_number(entry, &["gpa"]),
        honors: lookup_array(entry, &["honors"])
            .map(|items| string_elements(items))
            .unwrap_or_default(),
    }
}

fn reconcile_experience(entry: &Value) -> ExperienceEntry {
    ExperienceEntry {
        title: string_or_empty(entry, &["title"]),
        company: string_or_empty(entry, &["company"]),
        start_date: string_or_empty(entry, START_DATE),
        end_date: lookup_string(entry, END_DATE),
        description: string_or_empty(entry, &["description"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_gets_every_fallback() {
        let r = reconcile(&json!({}));
        assert_eq!(r.personal_info, PersonalInfo::default());
        assert!(r.education.is_empty());
        assert!(r.experience.is_empty());
        assert!(r.certifications.is_empty());
        assert!(r.projects.is_none());
        assert_eq!(r.target_role, "");
        assert_eq!(r.application_date, "");
        assert_eq!(r.status, "pending");
        assert_eq!(r.years_of_experience, Number::from(0));
    }

    #[test]
    fn test_non_object_inputs_are_total() {
        for input in [json!(null), json!(42), json!("text"), json!([{"a": 1}])] {
            let r = reconcile(&input);
            assert!(r.education.is_empty());
            assert_eq!(r.status, "pending");
        }
    }

    #[test]
    fn test_null_intermediate_objects_fall_through() {
        let r = reconcile(&json!({"personalInfo": {"location": null}}));
        assert_eq!(r.personal_info.location, Location::default());
        let r = reconcile(&json!({"personalInfo": null}));
        assert_eq!(r.personal_info.first_name, "");
    }

    #[test]
    fn test_personal_info_fields_and_location_object() {
        let r = reconcile(&json!({
            "personalInfo": {
                "firstName": "Grace",
                "lastName": "Hopper",
                "email": "grace@example.com",
                "phone": "+1 555 0100",
                "location": {"city": "Arlington", "state": "VA", "country": "USA"},
                "dateOfBirth": "1906-12-09",
                "linkedin": "linkedin.com/in/grace",
                "github": "github.com/grace"
            }
        }));
        let p = &r.personal_info;
        assert_eq!(p.full_name(), "Grace Hopper");
        assert_eq!(p.location.city, "Arlington");
        assert_eq!(p.location.state, "VA");
        assert_eq!(p.location.country, "USA");
        assert!(p.portfolio.is_none());
    }

    #[test]
    fn test_snake_case_aliases() {
        let r = reconcile(&json!({
            "personal_info": {"first_name": "Alan", "last_name": "Turing", "date_of_birth": "1912-06-23"},
            "target_role": "Cryptanalyst",
            "application_date": "2024-01-05",
            "years_of_experience": 7,
            "experience": [{"title": "Researcher", "start_date": "1936-01", "end_date": "1938-06"}]
        }));
        assert_eq!(r.personal_info.first_name, "Alan");
        assert_eq!(r.personal_info.date_of_birth, "1912-06-23");
        assert_eq!(r.target_role, "Cryptanalyst");
        assert_eq!(r.application_date, "2024-01-05");
        assert_eq!(r.years_of_experience, Number::from(7));
        assert_eq!(r.experience[0].start_date, "1936-01");
        assert_eq!(r.experience[0].end_date.as_deref(), Some("1938-06"));
    }

    #[test]
    fn test_location_string_shapes() {
        assert_eq!(
            parse_location_string("Austin, TX, USA"),
            Location {
                city: "Austin".to_string(),
                state: "TX".to_string(),
                country: "USA".to_string()
            }
        );
        assert_eq!(
            parse_location_string("Berlin, Germany"),
            Location {
                city: "Berlin".to_string(),
                state: String::new(),
                country: "Germany".to_string()
            }
        );
        assert_eq!(parse_location_string("Remote").city, "Remote");
        assert_eq!(parse_location_string("  "), Location::default());
        assert_eq!(
            parse_location_string("Leeds, West Yorkshire, England, UK").country,
            "England, UK"
        );
    }

    #[test]
    fn test_string_location_in_record() {
        let r = reconcile(&json!({"personalInfo": {"location": "Pune, Maharashtra, India"}}));
        assert_eq!(r.personal_info.location.state, "Maharashtra");
    }

    #[test]
    fn test_gpa_unknown_vs_zero() {
        let r = reconcile(&json!({"education": [
            {"degree": "BSc", "gpa": 3.8},
            {"degree": "MSc", "gpa": 0},
            {"degree": "PhD"},
            {"degree": "BA", "gpa": "3.2"}
        ]}));
        assert_eq!(r.education[0].gpa, Number::from_f64(3.8));
        assert_eq!(r.education[1].gpa, Some(Number::from(0)));
        assert_eq!(r.education[2].gpa, None);
        assert_eq!(r.education[3].gpa, None);
        assert!(r.education.iter().all(|e| e.honors.is_empty()));
    }

    #[test]
    fn test_education_entry_fields() {
        let r = reconcile(&json!({"education": [{
            "degree": "BSc", "field": "CS", "institution": "MIT",
            "startDate": "2015-09", "endDate": "2019-06",
            "honors": ["Cum Laude", 3, "Dean's List"]
        }]}));
        let e = &r.education[0];
        assert_eq!(e.institution, "MIT");
        assert_eq!(e.end_date, "2019-06");
        assert_eq!(e.honors, vec!["Cum Laude", "Dean's List"]);
    }

    #[test]
    fn test_experience_end_date_null_and_present() {
        let r = reconcile(&json!({"experience": [
            {"title": "SRE", "company": "Acme", "startDate": "2021-01", "endDate": "Present"},
            {"title": "Dev", "company": "Initech", "startDate": "2018-01", "endDate": null},
            {"title": "Intern"}
        ]}));
        assert_eq!(r.experience[0].end_date.as_deref(), Some("Present"));
        assert_eq!(r.experience[1].end_date, None);
        assert_eq!(r.experience[2].end_date, None);
        assert_eq!(r.experience[2].company, "");
    }

    #[test]
    fn test_non_array_education_becomes_empty() {
        let r = reconcile(&json!({"education": {"degree": "BSc"}, "experience": "lots"}));
        assert!(r.education.is_empty());
        assert!(r.experience.is_empty());
    }

    #[test]
    fn test_empty_education_is_not_synthesized() {
        let r = reconcile(&json!({"education": []}));
        assert!(r.education.is_empty());
    }

    #[test]
    fn test_years_of_experience_must_be_numeric() {
        assert_eq!(
            reconcile(&json!({"yearsOfExperience": "5"})).years_of_experience,
            Number::from(0)
        );
        assert_eq!(
            reconcile(&json!({"yearsOfExperience": 2.5})).years_of_experience,
            Number::from_f64(2.5).unwrap()
        );
    }

    #[test]
    fn test_portfolio_only_when_truthy() {
        let with = reconcile(&json!({"personalInfo": {"portfolio": "https://ada.dev"}}));
        assert_eq!(with.personal_info.portfolio.as_deref(), Some("https://ada.dev"));
        let empty = reconcile(&json!({"personalInfo": {"portfolio": ""}}));
        assert!(empty.personal_info.portfolio.is_none());
    }

    #[test]
    fn test_projects_only_when_array() {
        assert!(reconcile(&json!({})).projects.is_none());
        assert!(reconcile(&json!({"projects": "a compiler"})).projects.is_none());
        assert_eq!(
            reconcile(&json!({"projects": []})).projects,
            Some(Vec::<String>::new())
        );
        assert_eq!(
            reconcile(&json!({"projects": ["Compiler", {"name": "x"}]})).projects,
            Some(vec!["Compiler".to_string()])
        );
    }

    #[test]
    fn test_certifications_default_empty() {
        assert!(reconcile(&json!({"certifications": "AWS SA"}))
            .certifications
            .is_empty());
        assert_eq!(
            reconcile(&json!({"certifications": ["CKA"]})).certifications,
            vec!["CKA"]
        );
    }

    #[test]
    fn test_empty_status_defaults_to_pending() {
        assert_eq!(reconcile(&json!({"status": ""})).status, "pending");
        assert_eq!(reconcile(&json!({"status": "shortlisted"})).status, "shortlisted");
    }
}
