//! Presentation — turns a `ViewState` into what the page shows.
//!
//! The page shows the form plus at most one of: loading indicator, error banner,
//! result. Colour treatment is derived here so it can be tested without a browser.

use std::f64::consts::PI;

use askama::Template;
use uuid::Uuid;

use crate::analysis::controller::{AnalysisInput, ViewState};
use crate::analysis::models::{AnalysisResult, Verdict};

pub const NO_MISSING_SKILLS: &str = "No critical skills appear to be missing. Great job!";
pub const NO_MISSING_CERTIFICATIONS: &str = "No specific certifications were found missing.";
pub const NO_SUGGESTED_PROJECTS: &str = "Your project experience seems well-aligned.";

const GAUGE_RADIUS: f64 = 45.0;
/// Seconds between page reloads while an analysis is in flight.
const LOADING_REFRESH_SECS: u32 = 2;

/// Colour band of the numeric score. >75 high, >50 medium, otherwise low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn from_score(score: i64) -> Self {
        if score > 75 {
            ScoreTier::High
        } else if score > 50 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreTier::High => "tier-high",
            ScoreTier::Medium => "tier-medium",
            ScoreTier::Low => "tier-low",
        }
    }
}

pub fn verdict_css_class(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::High => "verdict-high",
        Verdict::Medium => "verdict-medium",
        Verdict::Low => "verdict-low",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GapList {
    pub title: &'static str,
    pub items: Vec<String>,
    pub empty_text: &'static str,
}

impl GapList {
    fn new(title: &'static str, items: &[String], empty_text: &'static str) -> Self {
        Self {
            title,
            items: items.to_vec(),
            empty_text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub score: i64,
    pub score_tier: ScoreTier,
    pub verdict: Verdict,
    pub feedback: String,
    pub missing_skills: GapList,
    pub missing_certifications: GapList,
    pub suggested_projects: GapList,
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            score: result.relevance_score,
            score_tier: ScoreTier::from_score(result.relevance_score),
            verdict: result.verdict,
            feedback: result.feedback.clone(),
            missing_skills: GapList::new(
                "Missing Skills",
                &result.missing_skills,
                NO_MISSING_SKILLS,
            ),
            missing_certifications: GapList::new(
                "Missing Certifications",
                &result.missing_certifications,
                NO_MISSING_CERTIFICATIONS,
            ),
            suggested_projects: GapList::new(
                "Suggested Projects",
                &result.missing_projects,
                NO_SUGGESTED_PROJECTS,
            ),
        }
    }

    pub fn verdict_label(&self) -> &'static str {
        self.verdict.as_str()
    }

    pub fn verdict_class(&self) -> &'static str {
        verdict_css_class(self.verdict)
    }

    pub fn tier_class(&self) -> &'static str {
        self.score_tier.css_class()
    }

    /// Skills, certifications, then suggested projects.
    pub fn gap_lists(&self) -> [&GapList; 3] {
        [
            &self.missing_skills,
            &self.missing_certifications,
            &self.suggested_projects,
        ]
    }

    pub fn gauge_circumference(&self) -> String {
        format!("{:.2}", 2.0 * PI * GAUGE_RADIUS)
    }

    /// Unfilled arc length; the score is clamped so out-of-range values still draw.
    pub fn gauge_offset(&self) -> String {
        let circumference = 2.0 * PI * GAUGE_RADIUS;
        let fraction = self.score.clamp(0, 100) as f64 / 100.0;
        format!("{:.2}", circumference - fraction * circumference)
    }
}

/// Exactly one of these is shown under the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Empty,
    Loading,
    Error(String),
    Result(ResultView),
}

impl Panel {
    pub fn from_state(state: &ViewState) -> Self {
        if state.loading {
            Panel::Loading
        } else if let Some(message) = &state.error {
            Panel::Error(message.clone())
        } else if let Some(result) = &state.result {
            Panel::Result(ResultView::from_result(result))
        } else {
            Panel::Empty
        }
    }
}

#[derive(Template)]
#[template(
    source = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  {% if loading %}<meta http-equiv="refresh" content="{{ refresh_secs }}">{% endif %}
  <title>Resume Relevance Analyzer</title>
  <style>
    body { font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; max-width: 56rem; margin: 0 auto; padding: 2rem 1rem; }
    textarea { width: 100%; min-height: 12rem; background: #1e293b; color: inherit; border: 1px solid #334155; border-radius: .5rem; padding: 1rem; }
    .card { background: #1e293b; border: 1px solid #334155; border-radius: 1rem; padding: 1.5rem; margin-top: 1.5rem; }
    .alert { background: rgba(127,29,29,.5); border: 1px solid #b91c1c; color: #fecaca; padding: .75rem 1rem; border-radius: .5rem; text-align: center; margin-top: 1.5rem; }
    .badge { padding: .25rem 1rem; border-radius: 999px; font-weight: 700; }
    .verdict-high { background: #22c55e; color: #14532d; }
    .verdict-medium { background: #eab308; color: #713f12; }
    .verdict-low { background: #ef4444; color: #7f1d1d; }
    .tier-high { color: #4ade80; }
    .tier-medium { color: #facc15; }
    .tier-low { color: #f87171; }
    .empty { font-style: italic; color: #94a3b8; }
  </style>
</head>
<body>
  <header>
    <h1>Resume Relevance Analyzer</h1>
    <p>Instantly score your resume against any job description with AI.</p>
  </header>
  <main>
    <form class="card" method="post" action="/sessions/{{ session_id }}/analyze">
      <label for="resume">Paste Your Resume Text</label>
      <textarea id="resume" name="resumeText" placeholder="Paste the full text of your resume here...">{{ draft.resume_text }}</textarea>
      <label for="job-description">Paste the Job Description</label>
      <textarea id="job-description" name="jobDescription" placeholder="Paste the job description text here...">{{ draft.job_description }}</textarea>
      {% if loading %}<button type="submit" disabled>Analyzing...</button>{% else %}<button type="submit">Analyze Relevance</button>{% endif %}
    </form>
    {% if loading %}
    <div class="card" id="loading" role="status">Analyzing your resume...</div>
    {% endif %}
    {% if let Some(message) = error %}
    <div class="alert" id="error" role="alert"><strong>Error: </strong><span>{{ message }}</span></div>
    {% endif %}
    {% if let Some(view) = result %}
    <section id="result">
      <div class="card">
        <h2>Analysis Complete</h2>
        <span>Overall Fit:</span> <span class="badge {{ view.verdict_class() }}" id="verdict">{{ view.verdict_label() }}</span>
        <svg width="192" height="192" viewBox="0 0 120 120">
          <circle r="45" cx="60" cy="60" fill="transparent" stroke="#334155" stroke-width="10"></circle>
          <circle class="{{ view.tier_class() }}" r="45" cx="60" cy="60" fill="transparent" stroke="currentColor" stroke-width="10" stroke-dasharray="{{ view.gauge_circumference() }}" stroke-dashoffset="{{ view.gauge_offset() }}" transform="rotate(-90 60 60)"></circle>
        </svg>
        <span class="score {{ view.tier_class() }}" id="score">{{ view.score }}</span> <span>Relevance Score</span>
      </div>
      <div class="card">
        <h3>Personalized Feedback</h3>
        <p id="feedback">{{ view.feedback }}</p>
      </div>
      {% for list in view.gap_lists() %}
      <div class="card">
        <h3>{{ list.title }}</h3>
        {% if list.is_empty() %}
        <p class="empty">{{ list.empty_text }}</p>
        {% else %}
        <ul>{% for item in list.items %}<li>{{ item }}</li>{% endfor %}</ul>
        {% endif %}
      </div>
      {% endfor %}
    </section>
    {% endif %}
  </main>
  <footer><p>Powered by Gemini API</p></footer>
</body>
</html>"##,
    ext = "html"
)]
struct PageTemplate<'a> {
    session_id: Uuid,
    draft: &'a AnalysisInput,
    loading: bool,
    refresh_secs: u32,
    error: Option<String>,
    result: Option<ResultView>,
}

/// Renders the full HTML page for one session.
pub fn render_page(
    session_id: Uuid,
    draft: &AnalysisInput,
    state: &ViewState,
) -> Result<String, askama::Error> {
    let (loading, error, result) = match Panel::from_state(state) {
        Panel::Loading => (true, None, None),
        Panel::Error(message) => (false, Some(message), None),
        Panel::Result(view) => (false, None, Some(view)),
        Panel::Empty => (false, None, None),
    };

    PageTemplate {
        session_id,
        draft,
        loading,
        refresh_secs: LOADING_REFRESH_SECS,
        error,
        result,
    }
    .render()
}
