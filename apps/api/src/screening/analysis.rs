//! `ResumeAnalysis`: the structured judgement the model returns for one
//! resume, plus the deterministic clean-up applied to it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::screening::lenient;

/// Sentinel for contact fields the resume did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Requirement text → the model's verdict. Key order is the model's order.
/// Values are expected to be booleans; anything else is kept but not counted.
pub type MatchMap = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, deserialize_with = "lenient::text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub other_links: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub age: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub total_work_experience: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_position: String,
}

impl ContactInfo {
    /// Replaces every blank scalar field with `"N/A"`. `other_links` is
    /// already an empty list when absent.
    pub fn fill_missing(&mut self) {
        for field in [
            &mut self.full_name,
            &mut self.email,
            &mut self.phone,
            &mut self.location,
            &mut self.linkedin,
            &mut self.age,
            &mut self.gender,
            &mut self.total_work_experience,
            &mut self.last_position,
        ] {
            if field.trim().is_empty() {
                *field = NOT_AVAILABLE.to_string();
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MustHaveMatch {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub technical_skills: MatchMap,
    /// `None` when the model did not answer with a boolean.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub experience: Option<bool>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub qualifications: Option<bool>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub core_responsibilities: MatchMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodToHaveMatch {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub additional_skills: MatchMap,
}

/// Boolean mirror of `JobRequirements`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementMatch {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub must_have_requirements: MustHaveMatch,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub good_to_have_requirements: GoodToHaveMatch,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub additional_screening_criteria: MatchMap,
}

/// Matched/total count for one group of boolean checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupProgress {
    pub group: &'static str,
    pub matched: u32,
    pub total: u32,
}

impl RequirementMatch {
    /// Per-group progress over the map-valued groups, in display order.
    pub fn group_progress(&self) -> Vec<GroupProgress> {
        let must = &self.must_have_requirements;
        [
            ("technical_skills", &must.technical_skills),
            ("core_responsibilities", &must.core_responsibilities),
            (
                "additional_skills",
                &self.good_to_have_requirements.additional_skills,
            ),
            (
                "additional_screening_criteria",
                &self.additional_screening_criteria,
            ),
        ]
        .into_iter()
        .map(|(group, map)| {
            let (matched, total) = tally(map.values());
            GroupProgress {
                group,
                matched,
                total,
            }
        })
        .collect()
    }

    /// Counts `true` leaves and boolean leaves over every checked path:
    /// technical skills, experience, qualifications, core responsibilities,
    /// additional skills and screening criteria.
    pub fn tally(&self) -> (u32, u32) {
        let must = &self.must_have_requirements;
        let scalars = [must.experience, must.qualifications]
            .into_iter()
            .flatten()
            .map(Value::Bool)
            .collect::<Vec<_>>();

        tally(
            must.technical_skills
                .values()
                .chain(scalars.iter())
                .chain(must.core_responsibilities.values())
                .chain(self.good_to_have_requirements.additional_skills.values())
                .chain(self.additional_screening_criteria.values()),
        )
    }
}

fn tally<'a>(values: impl Iterator<Item = &'a Value>) -> (u32, u32) {
    values.fold((0, 0), |(matched, total), value| match value {
        Value::Bool(true) => (matched + 1, total + 1),
        Value::Bool(false) => (matched, total + 1),
        _ => (matched, total),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitativeAssessment {
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub inferred_skills_from_projects: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub project_gravity: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ownership_and_initiative: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub transferability_to_role: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text_list"
    )]
    pub strengths: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text_list"
    )]
    pub weaknesses: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub recruiter_style_summary: String,
}

/// Coarse colour band for a qualitative label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MeterBand {
    #[serde(rename = "high")]
    High,
    #[serde(rename = "mid")]
    Mid,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "n/a")]
    NotAvailable,
}

/// Numeric level of a qualitative label; unknown labels are 0.
/// Case, surrounding whitespace and space-vs-hyphen are ignored.
pub fn qualitative_level(label: &str) -> u32 {
    match label.trim().to_lowercase().replace(' ', "-").as_str() {
        "very-low" => 10,
        "low" => 25,
        "moderate" | "medium" => 50,
        "medium-high" => 65,
        "high" | "strong" => 85,
        "very-high" => 95,
        _ => 0,
    }
}

pub fn meter_band(label: &str) -> MeterBand {
    match qualitative_level(label) {
        75..=u32::MAX => MeterBand::High,
        40..=74 => MeterBand::Mid,
        1..=39 => MeterBand::Low,
        0 => MeterBand::NotAvailable,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Meters {
    pub project_gravity: MeterBand,
    pub ownership_and_initiative: MeterBand,
    pub transferability_to_role: MeterBand,
}

impl QualitativeAssessment {
    pub fn meters(&self) -> Meters {
        Meters {
            project_gravity: meter_band(&self.project_gravity),
            ownership_and_initiative: meter_band(&self.ownership_and_initiative),
            transferability_to_role: meter_band(&self.transferability_to_role),
        }
    }
}

/// The model's full judgement of one resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub contact_info: ContactInfo,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub requirement_match: RequirementMatch,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub qualitative_assessment: QualitativeAssessment,
    #[serde(default, deserialize_with = "lenient::text")]
    pub final_recommendation: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub summary_of_key_factors: Vec<String>,
}

impl ResumeAnalysis {
    pub fn is_recommended(&self) -> bool {
        self.final_recommendation.trim().eq_ignore_ascii_case("yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_reply() -> Value {
        json!({
            "contact_info": {
                "full_name": "Jane Roe",
                "email": "jane@example.com",
                "phone": "+1-555-0100",
                "location": "Austin, TX",
                "linkedin": "https://linkedin.com/in/janeroe",
                "other_links": ["github.com/janeroe"],
                "age": 31,
                "gender": "N/A",
                "total_work_experience": "5 years",
                "last_position": "Backend Engineer at Acme"
            },
            "requirement_match": {
                "must_have_requirements": {
                    "technical_skills": {"Python": true, "REST APIs": true, "Kafka": false},
                    "experience": true,
                    "qualifications": false,
                    "core_responsibilities": {"Build backend services": true}
                },
                "good_to_have_requirements": {
                    "additional_skills": {"Docker": true, "GraphQL": false}
                },
                "additional_screening_criteria": {"Full-time": true}
            },
            "qualitative_assessment": {
                "inferred_skills_from_projects": ["Python", "PostgreSQL"],
                "project_gravity": "High",
                "ownership_and_initiative": "Medium-High",
                "transferability_to_role": "very high",
                "recruiter_style_summary": "Solid backend engineer."
            },
            "final_recommendation": "Yes",
            "summary_of_key_factors": ["Five years of Python", "Owned REST platform"]
        })
    }

    #[test]
    fn test_full_reply_deserializes() {
        let analysis: ResumeAnalysis = serde_json::from_value(full_reply()).unwrap();
        assert_eq!(analysis.contact_info.full_name, "Jane Roe");
        assert_eq!(analysis.contact_info.age, "31");
        assert_eq!(analysis.contact_info.other_links, vec!["github.com/janeroe"]);
        assert_eq!(
            analysis.requirement_match.must_have_requirements.experience,
            Some(true)
        );
        assert!(analysis.is_recommended());
        assert!(analysis.qualitative_assessment.strengths.is_none());
    }

    #[test]
    fn test_match_map_preserves_model_order() {
        let analysis: ResumeAnalysis = serde_json::from_value(full_reply()).unwrap();
        let keys: Vec<&str> = analysis
            .requirement_match
            .must_have_requirements
            .technical_skills
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["Python", "REST APIs", "Kafka"]);
    }

    #[test]
    fn test_tally_counts_every_boolean_leaf() {
        let analysis: ResumeAnalysis = serde_json::from_value(full_reply()).unwrap();
        // skills 2/3, experience 1/1, qualifications 0/1, core 1/1, additional 1/2, screening 1/1
        assert_eq!(analysis.requirement_match.tally(), (6, 9));
    }

    #[test]
    fn test_tally_ignores_non_boolean_leaves() {
        let rm: RequirementMatch = serde_json::from_value(json!({
            "must_have_requirements": {
                "technical_skills": {"Rust": true, "Go": "yes", "C": null},
                "experience": "true",
                "qualifications": true
            }
        }))
        .unwrap();
        assert_eq!(rm.must_have_requirements.experience, None);
        assert_eq!(rm.tally(), (2, 2));
    }

    #[test]
    fn test_tally_of_empty_match_is_zero() {
        assert_eq!(RequirementMatch::default().tally(), (0, 0));
    }

    #[test]
    fn test_screening_criteria_as_list_is_ignored() {
        let rm: RequirementMatch = serde_json::from_value(json!({
            "additional_screening_criteria": ["Full-time", "Onsite"]
        }))
        .unwrap();
        assert!(rm.additional_screening_criteria.is_empty());
    }

    #[test]
    fn test_group_progress() {
        let analysis: ResumeAnalysis = serde_json::from_value(full_reply()).unwrap();
        let progress = analysis.requirement_match.group_progress();
        assert_eq!(progress.len(), 4);
        assert_eq!(progress[0].group, "technical_skills");
        assert_eq!((progress[0].matched, progress[0].total), (2, 3));
        assert_eq!(progress[2].group, "additional_skills");
        assert_eq!((progress[2].matched, progress[2].total), (1, 2));
    }

    #[test]
    fn test_fill_missing_sets_sentinel() {
        let mut contact: ContactInfo =
            serde_json::from_value(json!({"full_name": "Jane Roe", "phone": "  "})).unwrap();
        contact.fill_missing();
        assert_eq!(contact.full_name, "Jane Roe");
        assert_eq!(contact.email, NOT_AVAILABLE);
        assert_eq!(contact.phone, NOT_AVAILABLE);
        assert_eq!(contact.linkedin, NOT_AVAILABLE);
        assert_eq!(contact.last_position, NOT_AVAILABLE);
        assert!(contact.other_links.is_empty());
    }

    #[test]
    fn test_missing_sections_default() {
        let analysis: ResumeAnalysis = serde_json::from_value(json!({})).unwrap();
        assert_eq!(analysis, ResumeAnalysis::default());
        assert!(!analysis.is_recommended());
    }

    #[test]
    fn test_qualitative_levels() {
        assert_eq!(qualitative_level("Very Low"), 10);
        assert_eq!(qualitative_level("low"), 25);
        assert_eq!(qualitative_level("Moderate"), 50);
        assert_eq!(qualitative_level("Medium"), 50);
        assert_eq!(qualitative_level("medium high"), 65);
        assert_eq!(qualitative_level(" Strong "), 85);
        assert_eq!(qualitative_level("very-high"), 95);
        assert_eq!(qualitative_level("N/A"), 0);
        assert_eq!(qualitative_level("excellent"), 0);
    }

    #[test]
    fn test_meter_bands() {
        assert_eq!(meter_band("High"), MeterBand::High);
        assert_eq!(meter_band("Medium-High"), MeterBand::Mid);
        assert_eq!(meter_band("medium"), MeterBand::Mid);
        assert_eq!(meter_band("Low"), MeterBand::Low);
        assert_eq!(meter_band(""), MeterBand::NotAvailable);
    }

    #[test]
    fn test_meters_serialize_as_labels() {
        let analysis: ResumeAnalysis = serde_json::from_value(full_reply()).unwrap();
        let meters = serde_json::to_value(analysis.qualitative_assessment.meters()).unwrap();
        assert_eq!(
            meters,
            json!({
                "project_gravity": "high",
                "ownership_and_initiative": "mid",
                "transferability_to_role": "high"
            })
        );
    }
}
