//! Resume Scorer: asks the LLM to judge one resume against the current
//! requirements, then derives the two per-resume scores.
//!
//! - quantitative: `matched/total` over the boolean requirement checks
//! - semantic: 0–100 from a second LLM call over the qualitative assessment,
//!   or a local heuristic when that call fails

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::llm_client::{
    complete_json, ChatMessage, ChatModel, CompletionOptions, LlmError, ReasoningEffort,
};
use crate::screening::analysis::{RequirementMatch, ResumeAnalysis, NOT_AVAILABLE};
use crate::screening::prompts::{
    fill, REQUIREMENTS_BLOCK_TEMPLATE, RESUME_ANALYSIS_PROMPT_TEMPLATE, RESUME_ANALYSIS_SYSTEM,
    SEMANTIC_SCORE_PROMPT_TEMPLATE, SEMANTIC_SCORE_SYSTEM, SEMANTIC_SCORE_TEMPERATURE,
};
use crate::screening::requirements::JobRequirements;
use crate::screening::ScreeningError;

/// `matched/total` over the boolean checks in a `RequirementMatch`.
/// Serializes as the string `"X/Y"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantitativeScore {
    pub matched: u32,
    pub total: u32,
}

impl QuantitativeScore {
    pub fn from_match(requirement_match: &RequirementMatch) -> Self {
        let (matched, total) = requirement_match.tally();
        Self { matched, total }
    }

    /// Same rounding as `quantitative_percentage` applied to the rendered ratio.
    pub fn percentage(&self) -> u32 {
        quantitative_percentage(&self.to_string())
    }
}

impl fmt::Display for QuantitativeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.matched, self.total)
    }
}

impl Serialize for QuantitativeScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Converts an `"X/Y"` ratio string to a rounded percentage.
/// Malformed input and a zero denominator give 0.
pub fn quantitative_percentage(score: &str) -> u32 {
    let Some((numerator, denominator)) = score.split_once('/') else {
        return 0;
    };
    match (
        numerator.trim().parse::<u32>(),
        denominator.trim().parse::<u32>(),
    ) {
        (Ok(n), Ok(d)) => ratio_percentage(n, d),
        _ => 0,
    }
}

/// Half-to-even rounding, so 1/8 (12.5%) is 12 and 3/8 (37.5%) is 38.
fn ratio_percentage(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (100.0 * f64::from(numerator) / f64::from(denominator)).round_ties_even() as u32
}

/// Where a semantic score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticSource {
    Model,
    Fallback,
}

/// One scored resume. Owns the analysis it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub filename: String,
    pub quantitative_score: QuantitativeScore,
    pub quantitative_percentage: u32,
    pub semantic_score: u32,
    pub semantic_source: SemanticSource,
    pub analysis: ResumeAnalysis,
}

/// Model ids used while scoring resumes.
#[derive(Debug, Clone)]
pub struct ScoringModels {
    pub resume: String,
    pub semantic: String,
}

/// Scores one resume against `requirements`.
///
/// A failed analysis call fails the whole resume. A failed semantic call only
/// switches the semantic score to the heuristic.
pub async fn score_resume(
    llm: &dyn ChatModel,
    filename: &str,
    resume_text: &str,
    requirements: &JobRequirements,
    models: &ScoringModels,
) -> Result<ScoredResult, ScreeningError> {
    let mut analysis = analyze_resume(llm, resume_text, requirements, &models.resume)
        .await
        .map_err(|e| {
            error!("Resume analysis failed for {filename}: {e}");
            ScreeningError::Scoring(e)
        })?;

    analysis.contact_info.fill_missing();

    let quantitative_score = QuantitativeScore::from_match(&analysis.requirement_match);
    let (semantic_score, semantic_source) =
        match semantic_score(llm, &models.semantic, &analysis).await {
            Ok(score) => (score, SemanticSource::Model),
            Err(e) => {
                warn!("Semantic scoring failed for {filename}, using heuristic: {e}");
                (fallback_semantic_score(&analysis), SemanticSource::Fallback)
            }
        };

    info!(
        "Scored {filename}: quantitative={quantitative_score}, semantic={semantic_score} ({semantic_source:?})"
    );

    Ok(ScoredResult {
        filename: filename.to_string(),
        quantitative_score,
        quantitative_percentage: quantitative_score.percentage(),
        semantic_score,
        semantic_source,
        analysis,
    })
}

async fn analyze_resume(
    llm: &dyn ChatModel,
    resume_text: &str,
    requirements: &JobRequirements,
    model: &str,
) -> Result<ResumeAnalysis, LlmError> {
    let block = requirements_block(requirements);
    debug!("Requirements used for analysis:{block}");

    let prompt = fill(
        RESUME_ANALYSIS_PROMPT_TEMPLATE,
        &[("requirements", block.as_str()), ("resume_text", resume_text)],
    );
    let messages = [
        ChatMessage::system(RESUME_ANALYSIS_SYSTEM),
        ChatMessage::user(prompt),
    ];
    let options = CompletionOptions {
        json_response: true,
        reasoning_effort: Some(ReasoningEffort::High),
        store: Some(false),
        ..Default::default()
    };

    complete_json(llm, model, &messages, &options).await
}

/// Renders the requirements section of the scoring prompt.
fn requirements_block(requirements: &JobRequirements) -> String {
    let must_have = pretty(&requirements.must_have_requirements);
    let good_to_have = pretty(&requirements.good_to_have_requirements);
    let screening = pretty(&requirements.additional_screening_criteria);
    fill(
        REQUIREMENTS_BLOCK_TEMPLATE,
        &[
            ("original_job_description", requirements.original_job_description.as_str()),
            ("must_have_json", must_have.as_str()),
            ("good_to_have_json", good_to_have.as_str()),
            ("screening_json", screening.as_str()),
        ],
    )
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Asks the model for a 0–100 fit score from the qualitative assessment only.
async fn semantic_score(
    llm: &dyn ChatModel,
    model: &str,
    analysis: &ResumeAnalysis,
) -> Result<u32, LlmError> {
    let assessment = assessment_data(analysis);
    let assessment_json = pretty(&assessment);
    let prompt = fill(
        SEMANTIC_SCORE_PROMPT_TEMPLATE,
        &[("assessment_json", assessment_json.as_str())],
    );
    let messages = [
        ChatMessage::system(SEMANTIC_SCORE_SYSTEM),
        ChatMessage::user(prompt),
    ];
    let options = CompletionOptions {
        temperature: Some(SEMANTIC_SCORE_TEMPERATURE),
        json_response: true,
        ..Default::default()
    };

    let reply: Value = complete_json(llm, model, &messages, &options).await?;
    let reasoning = reply
        .get("reasoning")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("");
    debug!("Semantic score reasoning: {reasoning}");

    reply
        .get("semantic_score")
        .and_then(parse_semantic_score)
        .map(|score| score.clamp(0, 100) as u32)
        .ok_or(LlmError::EmptyContent)
}

fn assessment_data(analysis: &ResumeAnalysis) -> Value {
    let qa = &analysis.qualitative_assessment;
    let label = |value: &str| {
        if value.trim().is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            value.to_string()
        }
    };
    json!({
        "transferability_to_role": label(&qa.transferability_to_role),
        "project_gravity": label(&qa.project_gravity),
        "ownership_and_initiative": label(&qa.ownership_and_initiative),
        "inferred_skills": qa.inferred_skills_from_projects,
        "recruiter_summary": qa.recruiter_style_summary,
        "final_recommendation": analysis.final_recommendation,
        "key_factors": analysis.summary_of_key_factors,
    })
}

/// Integers, floats (truncated) and integer strings are accepted.
fn parse_semantic_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Heuristic semantic score: 70 for a "Yes" recommendation, 30 otherwise,
/// adjusted by the transferability label (+15 high, +5 medium, -10 low).
pub fn fallback_semantic_score(analysis: &ResumeAnalysis) -> u32 {
    let base: i32 = if analysis.is_recommended() { 70 } else { 30 };
    let transferability = analysis
        .qualitative_assessment
        .transferability_to_role
        .to_lowercase();

    let adjustment = if transferability.contains("high") {
        15
    } else if transferability.contains("medium") {
        5
    } else if transferability.contains("low") {
        -10
    } else {
        0
    };

    (base + adjustment).clamp(0, 100) as u32
}
