use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Verdict: High, Medium, or Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Verdict {
    High,
    Medium,
    Low,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::High => "High",
            Verdict::Medium => "Medium",
            Verdict::Low => "Low",
        }
    }

    /// The tier the prompt asks the model to pick for `score`.
    /// High: >75, Medium: 50–75, Low: <50. Advisory only, never enforced.
    pub fn expected_for_score(score: i64) -> Self {
        if score > 75 {
            Verdict::High
        } else if score >= 50 {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }
}

// Doc comments below become schema descriptions sent to the model.
// The 0-100 score range is not checked locally.

/// Structured analysis returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisResult {
    /// Relevance score from 0-100.
    pub relevance_score: i64,
    /// Verdict: High, Medium, or Low.
    pub verdict: Verdict,
    /// List of key skills from the job description that are missing from the resume.
    pub missing_skills: Vec<String>,
    /// List of key certifications mentioned in the job description that are missing from the resume. If none are mentioned, return an empty array.
    pub missing_certifications: Vec<String>,
    /// Suggestions for types of projects the candidate could build to better match the role, based on the job description. For example, 'A project using React with state management libraries'.
    pub missing_projects: Vec<String>,
    /// A short, constructive paragraph (2-3 sentences) offering personalized feedback to the candidate on how to improve their resume for this specific job role.
    pub feedback: String,
}
