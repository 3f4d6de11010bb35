//! Analyzer — pluggable, trait-based seam between the view state and the model.
//!
//! Default: `GeminiAnalyzer` (prompt + schema → one `generateContent` call →
//! JSON parse → schema validation → typed result). Tests swap in scripted analyzers.
//!
//! `AppState` holds an `Arc<dyn Analyzer>`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::models::{AnalysisResult, Verdict};
use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::schema::{analysis_schema, ResponseSchema, SchemaViolation};
use crate::llm_client::{LlmClient, LlmError};

/// The only analysis failure text users ever see.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to get a valid analysis from the AI. The response may have been blocked or malformed.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Response is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError>;
}

pub struct GeminiAnalyzer {
    llm: LlmClient,
    schema: ResponseSchema,
}

impl GeminiAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            schema: analysis_schema(),
        }
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let prompt = build_analysis_prompt(resume_text, job_description);
        let text = self.llm.call_text(&prompt, self.schema.as_value()).await?;
        let raw: Value = serde_json::from_str(&text)?;
        let result = decode_analysis(&self.schema, raw)?;

        info!(
            score = result.relevance_score,
            verdict = result.verdict.as_str(),
            "Analysis completed"
        );
        Ok(result)
    }
}

/// Validates `raw` against `schema`, then decodes it into the typed result.
pub fn decode_analysis(
    schema: &ResponseSchema,
    raw: Value,
) -> Result<AnalysisResult, AnalysisError> {
    schema.validate(&raw)?;
    let result: AnalysisResult = serde_json::from_value(raw)?;

    let expected = Verdict::expected_for_score(result.relevance_score);
    if expected != result.verdict {
        debug!(
            score = result.relevance_score,
            verdict = result.verdict.as_str(),
            expected = expected.as_str(),
            "Model verdict disagrees with the score bands in the prompt"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::json;
    use std::time::Duration;

    use crate::llm_client::MODEL;

    fn result_json() -> Value {
        json!({
            "relevanceScore": 40,
            "verdict": "Low",
            "missingSkills": ["Kubernetes", "Go"],
            "missingCertifications": ["CKA"],
            "missingProjects": [],
            "feedback": "Focus on infrastructure work."
        })
    }

    #[test]
    fn test_decode_valid_response() {
        let result = decode_analysis(&analysis_schema(), result_json()).unwrap();
        assert_eq!(result.relevance_score, 40);
        assert_eq!(result.verdict, Verdict::Low);
        assert_eq!(result.missing_skills, vec!["Kubernetes", "Go"]);
        assert_eq!(result.missing_certifications, vec!["CKA"]);
        assert!(result.missing_projects.is_empty());
    }

    #[test]
    fn test_decode_keeps_out_of_band_verdict() {
        let mut raw = result_json();
        raw["relevanceScore"] = json!(90);
        let result = decode_analysis(&analysis_schema(), raw).unwrap();
        assert_eq!(result.relevance_score, 90);
        assert_eq!(result.verdict, Verdict::Low);
    }

    #[test]
    fn test_decode_schema_violation_is_typed() {
        let mut raw = result_json();
        raw["missingProjects"] = json!("none");
        let err = decode_analysis(&analysis_schema(), raw).unwrap_err();
        match err {
            AnalysisError::Schema(v) => assert_eq!(v.path, "$.missingProjects"),
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gemini_analyzer_end_to_end() {
        let path = format!("/v1beta/models/{MODEL}:generateContent");
        let app = Router::new().route(
            &path,
            post(|Json(body): Json<Value>| async move {
                let prompt = body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                assert!(prompt.contains("RESUME-BODY"));
                assert!(prompt.contains("JD-BODY"));
                assert_eq!(
                    body["generationConfig"]["responseJsonSchema"]["properties"]["verdict"]["enum"],
                    json!(["High", "Medium", "Low"])
                );
                let text = result_json().to_string();
                Json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": text }] }, "finishReason": "STOP" }]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let llm = LlmClient::new(
            "test-key".to_string(),
            format!("http://{addr}"),
            Duration::from_secs(5),
        )
        .unwrap();
        let analyzer = GeminiAnalyzer::new(llm);
        let result = analyzer.analyze("RESUME-BODY", "JD-BODY").await.unwrap();
        assert_eq!(result.verdict, Verdict::Low);
        assert_eq!(result.feedback, "Focus on infrastructure work.");
    }

    #[tokio::test]
    async fn test_gemini_analyzer_prose_reply_is_malformed_json() {
        let path = format!("/v1beta/models/{MODEL}:generateContent");
        let app = Router::new().route(
            &path,
            post(|| async {
                Json(json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "Sure! Here is the analysis you asked for." }] },
                        "finishReason": "STOP"
                    }]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let llm = LlmClient::new(
            "test-key".to_string(),
            format!("http://{addr}"),
            Duration::from_secs(5),
        )
        .unwrap();
        let err = GeminiAnalyzer::new(llm)
            .analyze("resume", "jd")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedJson(_)));
    }
}
