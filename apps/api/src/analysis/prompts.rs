// All LLM prompt text for the analysis tasks.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{PRODUCT_NAME, RESUME_STYLE_RULES};

/// System instruction for rewriting an existing resume against a job description.
pub fn improve_system() -> String {
    format!(
        "You are a world-class executive resume writer at {PRODUCT_NAME}. \
        Rewrite the candidate's resume so it is high-impact and tailored to the keywords \
        of the target job description. Do not invent employers, titles or dates. \
        {RESUME_STYLE_RULES} \
        Respond with a JSON object: \"improvedResume\" holds the full rewritten resume in Markdown, \
        \"coverLetter\" holds a single-paragraph cover letter snippet for the same role."
    )
}

/// System instruction for the ATS compatibility check.
pub fn ats_system() -> String {
    format!(
        "You are an expert Applicant Tracking System (ATS) analyzer for {PRODUCT_NAME}. \
        Evaluate the resume text and give it a score out of 100. \
        Break the analysis down into four areas: keywords, formatting, quantified impact, \
        and contact information. List specific, actionable suggestions in priority order. \
        Respond with a JSON object."
    )
}

/// System instruction for building a resume from structured form data.
pub fn build_system() -> String {
    format!(
        "You are an expert resume architect at {PRODUCT_NAME}. \
        Create a professional, modern resume from the structured data provided. \
        Lay out the sections in this order: Contact, Summary, Experience, Projects, Education, \
        Skills, Certifications. Omit a section when its data is empty. \
        {RESUME_STYLE_RULES} \
        Respond with a JSON object whose \"resume\" key holds the Markdown resume."
    )
}

/// Labeled prompt for the improve task: job description first, then the resume.
pub fn improve_prompt(job_description: &str, original_resume: &str) -> String {
    format!("JOB DESCRIPTION:\n{job_description}\n\nORIGINAL RESUME:\n{original_resume}")
}

pub fn ats_prompt(resume_text: &str) -> String {
    format!("Evaluate this resume:\n{resume_text}")
}

/// `form_json` is the pretty-printed builder payload.
pub fn build_prompt(form_json: &str) -> String {
    format!("Create a resume for the following individual:\n{form_json}")
}
