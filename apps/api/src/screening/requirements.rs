//! Requirement Extractor: turns a raw job description into a `JobRequirements`
//! object via the LLM.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::llm_client::{complete_json, ChatMessage, ChatModel, CompletionOptions};
use crate::screening::lenient;
use crate::screening::prompts::{
    fill, JD_EXTRACTION_MAX_TOKENS, JD_EXTRACTION_PROMPT_TEMPLATE, JD_EXTRACTION_SYSTEM,
    JD_EXTRACTION_TEMPERATURE,
};
use crate::screening::ScreeningError;

/// Mandatory requirements. `experience` is a single free-text value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MustHaveRequirements {
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub technical_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub experience: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub qualifications: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub core_responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodToHaveRequirements {
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub additional_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub extra_qualifications: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub bonus_experience: Vec<String>,
}

/// Canonical requirements for one screening session.
///
/// Every list defaults to empty when the model omits it or returns the wrong
/// shape, so a partial parse never leaves a field absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default, deserialize_with = "lenient::text")]
    pub original_job_description: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub must_have_requirements: MustHaveRequirements,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub good_to_have_requirements: GoodToHaveRequirements,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub additional_screening_criteria: Vec<String>,
}

impl JobRequirements {
    /// Number of list items across all sections, for logging.
    pub fn item_count(&self) -> usize {
        let must = &self.must_have_requirements;
        let good = &self.good_to_have_requirements;
        must.technical_skills.len()
            + must.qualifications.len()
            + must.core_responsibilities.len()
            + good.additional_skills.len()
            + good.extra_qualifications.len()
            + good.bonus_experience.len()
            + self.additional_screening_criteria.len()
    }
}

/// Extracts structured requirements from `job_description` using `model`.
///
/// `original_job_description` is always overwritten with the caller's text;
/// whatever the model echoed back is discarded.
pub async fn extract_requirements(
    llm: &dyn ChatModel,
    job_description: &str,
    model: &str,
) -> Result<JobRequirements, ScreeningError> {
    let prompt = fill(
        JD_EXTRACTION_PROMPT_TEMPLATE,
        &[("job_description", job_description)],
    );
    let messages = [
        ChatMessage::system(JD_EXTRACTION_SYSTEM),
        ChatMessage::user(prompt),
    ];
    let options = CompletionOptions {
        temperature: Some(JD_EXTRACTION_TEMPERATURE),
        max_output_tokens: Some(JD_EXTRACTION_MAX_TOKENS),
        json_response: true,
        ..Default::default()
    };

    let mut requirements: JobRequirements = complete_json(llm, model, &messages, &options)
        .await
        .map_err(|e| {
            error!("Job description analysis failed (model {model}): {e}");
            ScreeningError::Extraction(e)
        })?;

    requirements.original_job_description = job_description.to_string();

    info!(
        "Extracted {} requirement items (model {model})",
        requirements.item_count()
    );

    Ok(requirements)
}
