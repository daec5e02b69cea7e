//! Aggregator/Exporter: ranks scored resumes and flattens them into rows for
//! the API response and the CSV export.

use serde::Serialize;
use serde_json::Value;

use crate::screening::analysis::{GroupProgress, MatchMap, Meters, ResumeAnalysis};
use crate::screening::scorer::{ScoredResult, SemanticSource};
use crate::screening::ScreeningError;

/// Columns produced by `flatten`, in export order.
pub const FLATTEN_KEYS: [&str; 22] = [
    "full_name",
    "email",
    "phone",
    "location",
    "linkedin",
    "other_links",
    "age",
    "gender",
    "total_work_experience",
    "last_position",
    "core_responsibilities",
    "additional_skills",
    "additional_screening_criteria",
    "inferred_skills_from_projects",
    "project_gravity",
    "ownership_and_initiative",
    "transferability_to_role",
    "strengths",
    "weaknesses",
    "recruiter_style_summary",
    "final_recommendation",
    "summary_of_key_factors",
];

/// Columns appended after the flattened analysis in the CSV export.
pub const EXPORT_KEYS: [&str; 4] = [
    "filename",
    "quantitative_percentage",
    "semantic_percentage",
    "percentage",
];

pub const CSV_FILENAME: &str = "resume_analysis_results.csv";

/// Projects an analysis onto `FLATTEN_KEYS`, same keys in the same order for
/// every input. Lists are joined with ", "; match maps render as
/// `"key: True, key2: False"`.
pub fn flatten(analysis: &ResumeAnalysis) -> Vec<(&'static str, String)> {
    let contact = &analysis.contact_info;
    let rm = &analysis.requirement_match;
    let qa = &analysis.qualitative_assessment;
    let optional_list = |list: &Option<Vec<String>>| {
        list.as_deref().map(|items| items.join(", ")).unwrap_or_default()
    };

    let values = [
        contact.full_name.clone(),
        contact.email.clone(),
        contact.phone.clone(),
        contact.location.clone(),
        contact.linkedin.clone(),
        contact.other_links.join(", "),
        contact.age.clone(),
        contact.gender.clone(),
        contact.total_work_experience.clone(),
        contact.last_position.clone(),
        render_matches(&rm.must_have_requirements.core_responsibilities),
        render_matches(&rm.good_to_have_requirements.additional_skills),
        render_matches(&rm.additional_screening_criteria),
        qa.inferred_skills_from_projects.join(", "),
        qa.project_gravity.clone(),
        qa.ownership_and_initiative.clone(),
        qa.transferability_to_role.clone(),
        optional_list(&qa.strengths),
        optional_list(&qa.weaknesses),
        qa.recruiter_style_summary.clone(),
        analysis.final_recommendation.clone(),
        analysis.summary_of_key_factors.join(", "),
    ];

    FLATTEN_KEYS.into_iter().zip(values).collect()
}

fn render_matches(map: &MatchMap) -> String {
    map.iter()
        .map(|(key, value)| format!("{key}: {}", render_verdict(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_verdict(value: &Value) -> String {
    match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Stable sort, highest semantic score first. The quantitative score does
/// not affect order.
pub fn rank(mut results: Vec<ScoredResult>) -> Vec<ScoredResult> {
    results.sort_by(|a, b| b.semantic_score.cmp(&a.semantic_score));
    results
}

/// Serializes results to CSV: a header of `FLATTEN_KEYS` + `EXPORT_KEYS`,
/// then one row per result. An empty collection is an error, never an empty
/// file.
pub fn to_csv(results: &[ScoredResult]) -> Result<Vec<u8>, ScreeningError> {
    if results.is_empty() {
        return Err(ScreeningError::EmptyExport);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(FLATTEN_KEYS.iter().chain(EXPORT_KEYS.iter()))?;

    for result in results {
        let semantic = result.semantic_score.to_string();
        let mut record: Vec<String> = flatten(&result.analysis)
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        record.extend([
            result.filename.clone(),
            result.quantitative_percentage.to_string(),
            semantic.clone(),
            semantic,
        ]);
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| ScreeningError::Csv(e.into_error().into()))
}

/// One ranked result as returned by the API.
#[derive(Debug, Serialize)]
pub struct ResultRow<'a> {
    pub filename: &'a str,
    pub quantitative_score: String,
    pub quantitative_percentage: u32,
    pub semantic_score: u32,
    pub semantic_percentage: u32,
    /// Headline percentage; the semantic score.
    pub percentage: u32,
    pub semantic_source: SemanticSource,
    pub meters: Meters,
    pub progress: Vec<GroupProgress>,
    pub analysis: &'a ResumeAnalysis,
}

impl<'a> From<&'a ScoredResult> for ResultRow<'a> {
    fn from(result: &'a ScoredResult) -> Self {
        ResultRow {
            filename: &result.filename,
            quantitative_score: result.quantitative_score.to_string(),
            quantitative_percentage: result.quantitative_percentage,
            semantic_score: result.semantic_score,
            semantic_percentage: result.semantic_score,
            percentage: result.semantic_score,
            semantic_source: result.semantic_source,
            meters: result.analysis.qualitative_assessment.meters(),
            progress: result.analysis.requirement_match.group_progress(),
            analysis: &result.analysis,
        }
    }
}
