//! Scripted analyzers shared by the controller, session and handler tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::analysis::analyzer::{AnalysisError, Analyzer};
use crate::analysis::controller::{AnalysisController, AnalysisInput, SubmitError, ViewState};
use crate::analysis::models::{AnalysisResult, Verdict};
use crate::llm_client::LlmError;

impl AnalysisInput {
    pub fn new(resume_text: impl Into<String>, job_description: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_description: job_description.into(),
        }
    }
}

impl AnalysisController {
    /// `begin` followed by `run`, awaited inline.
    pub async fn submit(&self, input: AnalysisInput) -> Result<ViewState, SubmitError> {
        let pending = self.begin(input).await?;
        Ok(pending.run().await)
    }
}

pub fn sample_result(score: i64, verdict: Verdict) -> AnalysisResult {
    AnalysisResult {
        relevance_score: score,
        verdict,
        missing_skills: vec![],
        missing_certifications: vec![],
        missing_projects: vec!["Add a CI/CD pipeline project".to_string()],
        feedback: "Strong match.".to_string(),
    }
}

fn simulated_failure() -> AnalysisError {
    AnalysisError::Llm(LlmError::Api {
        status: 503,
        message: "simulated network failure".to_string(),
    })
}

/// Replays a fixed list of outcomes; `None` is a failure. The last outcome repeats.
pub struct ScriptedAnalyzer {
    outcomes: Mutex<VecDeque<Option<AnalysisResult>>>,
    calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn sequence(outcomes: Vec<Option<AnalysisResult>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding(result: AnalysisResult) -> Self {
        Self::sequence(vec![Some(result)])
    }

    pub fn failing() -> Self {
        Self::sequence(vec![None])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(
        &self,
        _resume_text: &str,
        _job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.len() > 1 {
                outcomes.pop_front().flatten()
            } else {
                outcomes.front().cloned().flatten()
            }
        };
        next.ok_or_else(simulated_failure)
    }
}

/// Succeeds with `result`, but only after `release` is called.
pub struct GatedAnalyzer {
    result: AnalysisResult,
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedAnalyzer {
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            result,
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyzer for GatedAnalyzer {
    async fn analyze(
        &self,
        _resume_text: &str,
        _job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.result.clone())
    }
}
