//! Batch orchestration for one "analyze resumes" run.
//!
//! Resumes are processed one at a time in upload order. A resume that cannot
//! be read or scored is recorded as a failure and the batch moves on.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extract::extract_text;
use crate::llm_client::ChatModel;
use crate::screening::aggregate::rank;
use crate::screening::requirements::JobRequirements;
use crate::screening::scorer::{score_resume, ScoredResult, ScoringModels};

/// One uploaded file, as received from the multipart body.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedResume {
    pub filename: String,
    pub reason: String,
}

/// Ranked results of one run plus the files that did not make it.
#[derive(Debug)]
pub struct BatchOutcome {
    pub run_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub results: Vec<ScoredResult>,
    pub failures: Vec<FailedResume>,
}

pub async fn analyze_batch(
    llm: &dyn ChatModel,
    uploads: Vec<ResumeUpload>,
    requirements: &JobRequirements,
    models: &ScoringModels,
) -> BatchOutcome {
    let run_id = Uuid::new_v4();
    let total = uploads.len();
    info!(%run_id, "Analyzing {total} resumes with {}", models.resume);

    let mut results = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (index, upload) in uploads.into_iter().enumerate() {
        let position = index + 1;
        let ResumeUpload {
            filename,
            content_type,
            data,
        } = upload;

        let resume_text = match read_upload(filename.clone(), data).await {
            Ok(text) => text,
            Err(reason) => {
                warn!(%run_id, "[{position}/{total}] Skipping {filename}: {reason}");
                failures.push(FailedResume { filename, reason });
                continue;
            }
        };
        tracing::debug!(
            "[{position}/{total}] {filename} ({}) text preview: {}",
            content_type.as_deref().unwrap_or("unknown type"),
            resume_text.chars().take(500).collect::<String>()
        );

        match score_resume(llm, &filename, &resume_text, requirements, models).await {
            Ok(result) => {
                info!(
                    %run_id,
                    "[{position}/{total}] {filename}: {} matched, semantic {}",
                    result.quantitative_score,
                    result.semantic_score
                );
                results.push(result);
            }
            Err(e) => {
                warn!(%run_id, "[{position}/{total}] {filename} failed: {e}");
                failures.push(FailedResume {
                    filename,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        %run_id,
        "Batch finished: {} scored, {} failed",
        results.len(),
        failures.len()
    );

    BatchOutcome {
        run_id,
        completed_at: Utc::now(),
        results: rank(results),
        failures,
    }
}

/// Runs the blocking extractor off the async runtime.
async fn read_upload(filename: String, data: Bytes) -> Result<String, String> {
    tokio::task::spawn_blocking(move || extract_text(&filename, &data))
        .await
        .map_err(|e| format!("text extraction task failed: {e}"))?
        .map_err(|e| e.to_string())
}
