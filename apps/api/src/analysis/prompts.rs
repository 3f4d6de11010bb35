// All LLM prompt text for the analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Role and task framing placed at the top of every analysis prompt.
pub const ANALYSIS_PREAMBLE: &str = "You are an expert AI Technical Recruiter. \
    Your task is to analyze the provided resume text against the provided job description.
Provide a detailed analysis in a strict JSON format that adheres to the provided schema.";

/// Field-by-field response contract, including the score → verdict rule.
pub const ANALYSIS_CONTRACT: &str = r#"The analysis should include:
1. `relevanceScore`: An integer score from 0 to 100 representing how well the resume matches the job description. 100 is a perfect match.
2. `verdict`: A verdict of "High", "Medium", or "Low" suitability based on the score. High: >75, Medium: 50-75, Low: <50.
3. `missingSkills`: An array of strings listing key skills from the job description that are missing from the resume.
4. `missingCertifications`: An array of strings listing key certifications from the job description that are missing from the resume. If none are mentioned or missing, return an empty array.
5. `missingProjects`: An array of strings suggesting types of projects the candidate could work on to better match the role, based on the job description.
6. `feedback`: A short, constructive paragraph (2-3 sentences) offering personalized feedback to the candidate on how to improve their resume for this specific job role."#;

/// Builds the analysis prompt. Both texts are embedded verbatim.
pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "{ANALYSIS_PREAMBLE}\n\n{ANALYSIS_CONTRACT}\n\n\
         Resume Text:\n---\n{resume_text}\n---\n\n\
         Job Description:\n---\n{job_description}\n---\n\n\
         {JSON_ONLY_INSTRUCTION}"
    )
}
