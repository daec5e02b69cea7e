// Resume screening pipeline.
// Flow: extract requirements from a JD → optional free-text edit round trip →
// score each resume → rank → export.
// All LLM calls go through llm_client, never directly to the provider.

use thiserror::Error;

use crate::llm_client::LlmError;

pub mod aggregate;
pub mod analysis;
pub mod editable;
pub mod handlers;
pub mod lenient;
pub mod pipeline;
pub mod prompts;
pub mod requirements;
pub mod scorer;

#[derive(Debug, Error)]
pub enum ScreeningError {
    /// Job description analysis failed. Blocks all downstream scoring.
    #[error("job description analysis failed: {0}")]
    Extraction(#[source] LlmError),

    /// One resume could not be analysed. The batch carries on without it.
    #[error("resume analysis failed: {0}")]
    Scoring(#[source] LlmError),

    #[error("no job requirements available; analyze a job description first")]
    NoRequirements,

    #[error("no analysis results to export")]
    EmptyExport,

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}
