//! Request payloads and typed results for the analysis tasks.
//!
//! Field names serialize in camelCase, which is both the client-facing wire
//! shape and the shape the model is asked to return. Result types derive
//! `JsonSchema`; their field docs become the descriptions the model sees.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Post-deserialization checks a result must pass before it reaches a caller.
pub trait Checked {
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("required field '{field}' is empty"))
    } else {
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveRequest {
    pub original_resume: String,
    pub job_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsRequest {
    pub resume_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub tech: String,
    pub link: String,
    pub description: String,
}

/// Builder form data. Every edit produces a new value; nothing mutates in place.
/// Sequences keep the order the user entered them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildRequest {
    pub personal: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: String,
    pub certifications: String,
}

/// Replaces the entry at `index`, or appends when `index` is past the end.
fn replace_at<T>(mut entries: Vec<T>, index: usize, entry: T) -> Vec<T> {
    match entries.get_mut(index) {
        Some(slot) => *slot = entry,
        None => entries.push(entry),
    }
    entries
}

impl BuildRequest {
    /// The builder's starting state: name and email prefilled, one blank
    /// entry in every list.
    pub fn seeded(name: &str, email: &str) -> Self {
        Self::default()
            .with_personal(PersonalInfo {
                name: name.to_string(),
                email: email.to_string(),
                ..PersonalInfo::default()
            })
            .push_education(EducationEntry::default())
            .push_experience(ExperienceEntry::default())
            .push_project(ProjectEntry::default())
    }

    pub fn with_personal(self, personal: PersonalInfo) -> Self {
        Self { personal, ..self }
    }

    pub fn with_skills(self, skills: impl Into<String>) -> Self {
        Self {
            skills: skills.into(),
            ..self
        }
    }

    pub fn with_certifications(self, certifications: impl Into<String>) -> Self {
        Self {
            certifications: certifications.into(),
            ..self
        }
    }

    pub fn push_education(self, entry: EducationEntry) -> Self {
        let len = self.education.len();
        self.with_education_at(len, entry)
    }

    pub fn push_experience(self, entry: ExperienceEntry) -> Self {
        let len = self.experience.len();
        self.with_experience_at(len, entry)
    }

    pub fn push_project(self, entry: ProjectEntry) -> Self {
        let len = self.projects.len();
        self.with_project_at(len, entry)
    }

    pub fn with_education_at(self, index: usize, entry: EducationEntry) -> Self {
        Self {
            education: replace_at(self.education, index, entry),
            ..self
        }
    }

    pub fn with_experience_at(self, index: usize, entry: ExperienceEntry) -> Self {
        Self {
            experience: replace_at(self.experience, index, entry),
            ..self
        }
    }

    pub fn with_project_at(self, index: usize, entry: ProjectEntry) -> Self {
        Self {
            projects: replace_at(self.projects, index, entry),
            ..self
        }
    }

    /// Sample profile used by the builder's "load demo" action.
    pub fn demo() -> Self {
        Self::default()
            .with_personal(PersonalInfo {
                name: "Jordan Smith".to_string(),
                email: "jordan.smith@example.com".to_string(),
                phone: "+1 (555) 012-3456".to_string(),
                location: "San Francisco, CA".to_string(),
                linkedin: "linkedin.com/in/jordansmith-pro".to_string(),
                github: "github.com/jsmith-dev".to_string(),
                portfolio: "jordansmith.dev".to_string(),
                summary: "Senior Software Engineer with 8+ years of experience building scalable \
                    web applications. Leads cross-functional teams and ships high-impact features \
                    ahead of schedule."
                    .to_string(),
            })
            .push_education(EducationEntry {
                school: "Stanford University".to_string(),
                degree: "M.S. in Computer Science".to_string(),
                year: "2016".to_string(),
            })
            .push_education(EducationEntry {
                school: "UC Berkeley".to_string(),
                degree: "B.S. in Software Engineering".to_string(),
                year: "2014".to_string(),
            })
            .push_experience(ExperienceEntry {
                company: "TechFlow Solutions".to_string(),
                role: "Senior Full Stack Engineer".to_string(),
                period: "2019 - Present".to_string(),
                description: "Architected a microservices dashboard that cut latency by 45%. \
                    Led 6 engineers through a jQuery to React/TypeScript migration. \
                    Set up CI/CD pipelines on GitHub Actions."
                    .to_string(),
            })
            .push_experience(ExperienceEntry {
                company: "InnoData Systems".to_string(),
                role: "Software Developer".to_string(),
                period: "2016 - 2019".to_string(),
                description: "Built and maintained 15+ REST APIs serving 100k daily active users. \
                    Tuned SQL queries for a 30% database throughput gain."
                    .to_string(),
            })
            .push_project(ProjectEntry {
                name: "AI Smart Tasker".to_string(),
                tech: "React, Node.js, OpenAI API".to_string(),
                link: "github.com/jsmith/ai-tasker".to_string(),
                description: "Task manager that prioritizes daily agendas from user habits, \
                    with real-time sync and voice commands."
                    .to_string(),
            })
            .push_project(ProjectEntry {
                name: "EcoTrack Platform".to_string(),
                tech: "Next.js, Tailwind CSS, PostgreSQL".to_string(),
                link: "ecotrack-demo.com".to_string(),
                description: "SaaS carbon-footprint tracker for small businesses. Designed the \
                    database schema and reporting dashboard."
                    .to_string(),
            })
            .with_skills(
                "JavaScript, TypeScript, React, Node.js, Python, AWS (S3, EC2, Lambda), Docker, \
                Kubernetes, PostgreSQL, MongoDB, GraphQL, System Design",
            )
            .with_certifications(
                "AWS Certified Solutions Architect - Associate; Google Professional Cloud Developer",
            )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResult {
    /// The rewritten resume in Markdown
    pub improved_resume: String,
    /// A short cover letter for the target role
    pub cover_letter: String,
}

impl Checked for ImproveResult {
    fn check(&self) -> Result<(), String> {
        require_text("improvedResume", &self.improved_resume)?;
        require_text("coverLetter", &self.cover_letter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AtsAnalysis {
    /// Feedback on keyword usage
    pub keywords: String,
    /// Feedback on layout and parsing
    pub formatting: String,
    /// Feedback on quantified metrics
    pub impact: String,
    /// Feedback on contact details
    pub contact: String,
}

// Range is not enforced; out-of-range scores are passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AtsResult {
    /// Total score out of 100
    pub score: f64,
    pub analysis: AtsAnalysis,
    /// Specific actionable improvements, most important first
    pub suggestions: Vec<String>,
}

impl Checked for AtsResult {
    fn check(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.score) {
            warn!("ATS score {} is outside 0-100; passing it through", self.score);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BuildResult {
    /// The generated resume in Markdown
    pub resume: String,
}

impl Checked for BuildResult {
    fn check(&self) -> Result<(), String> {
        require_text("resume", &self.resume)
    }
}
