//! View state controller — owns `{result, loading, error}` for one session.
//!
//! A submission runs in two steps so callers can respond before the model answers:
//! `begin` validates and flips to loading, `PendingAnalysis::run` performs the
//! remote call and lands the outcome. A second submission while loading is
//! rejected with `SubmitError::Busy`; the in-flight request keeps ownership of
//! the state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::analysis::analyzer::{Analyzer, ANALYSIS_FAILED_MESSAGE};
use crate::analysis::models::AnalysisResult;

pub const VALIDATION_MESSAGE: &str =
    "Please provide both the resume text and the job description.";

/// What the UI should show. `result` and `error` are never both set, and
/// neither is set while `loading`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub result: Option<AnalysisResult>,
    pub loading: bool,
    pub error: Option<String>,
}

/// The two form fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

impl AnalysisInput {
    /// Both fields must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.resume_text.trim().is_empty() || self.job_description.trim().is_empty() {
            return Err(SubmitError::Validation);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,

    #[error("An analysis is already in progress")]
    Busy,
}

#[derive(Default)]
struct Session {
    view: ViewState,
    draft: AnalysisInput,
}

pub struct AnalysisController {
    session: Arc<Mutex<Session>>,
    analyzer: Arc<dyn Analyzer>,
}

/// An accepted submission whose remote call has not run yet.
pub struct PendingAnalysis {
    session: Arc<Mutex<Session>>,
    analyzer: Arc<dyn Analyzer>,
    input: AnalysisInput,
}

impl AnalysisController {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::default())),
            analyzer,
        }
    }

    pub async fn snapshot(&self) -> ViewState {
        self.session.lock().await.view.clone()
    }

    /// The last form values submitted, for re-populating the form.
    pub async fn draft(&self) -> AnalysisInput {
        self.session.lock().await.draft.clone()
    }

    /// Validates `input` and moves the view to loading.
    ///
    /// On a validation failure the message replaces whatever was shown before
    /// and no remote call is made.
    pub async fn begin(&self, input: AnalysisInput) -> Result<PendingAnalysis, SubmitError> {
        let mut session = self.session.lock().await;

        if session.view.loading {
            warn!("Rejected submission while an analysis is in flight");
            return Err(SubmitError::Busy);
        }

        session.draft = input.clone();

        if let Err(e) = input.validate() {
            session.view = ViewState {
                result: None,
                loading: false,
                error: Some(e.to_string()),
            };
            return Err(e);
        }

        session.view = ViewState {
            result: None,
            loading: true,
            error: None,
        };

        Ok(PendingAnalysis {
            session: Arc::clone(&self.session),
            analyzer: Arc::clone(&self.analyzer),
            input,
        })
    }
}

impl PendingAnalysis {
    /// Performs the remote call and stores its outcome. Loading is cleared on every path.
    pub async fn run(self) -> ViewState {
        let outcome = self
            .analyzer
            .analyze(&self.input.resume_text, &self.input.job_description)
            .await;

        let mut session = self.session.lock().await;
        session.view = match outcome {
            Ok(result) => {
                info!(score = result.relevance_score, "Analysis stored in view state");
                ViewState {
                    result: Some(result),
                    loading: false,
                    error: None,
                }
            }
            Err(e) => {
                error!("Error analyzing resume: {e}");
                ViewState {
                    result: None,
                    loading: false,
                    error: Some(ANALYSIS_FAILED_MESSAGE.to_string()),
                }
            }
        };
        session.view.clone()
    }
}
