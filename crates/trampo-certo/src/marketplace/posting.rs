use serde::{Deserialize, Serialize};

use super::domain::{Job, JobDraft, Modality, DEFAULT_CATEGORY};
use super::flex_score::{accessibility_badges, score_breakdown, FlexScoreBreakdown, FlexScoreInput};

/// Supporting file attached to a posting (facility photos, reports, certificates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityDocument {
    pub name: String,
    #[serde(default)]
    pub size_bytes: u64,
}

/// Company-side posting form, before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub location: String,
    pub modality: Modality,
    pub workload: String,
    #[serde(default)]
    pub salary: Option<String>,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub accessibility: Vec<String>,
    #[serde(default)]
    pub schedule: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub accessibility_documents: Vec<AccessibilityDocument>,
}

/// Reasons a posting form is refused before publication.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostingViolation {
    #[error("posting field '{0}' is required")]
    MissingField(&'static str),
    #[error("attach at least one accessibility document (facility photos, reports, certificates)")]
    MissingAccessibilityDocuments,
}

/// Draft ready for the job store together with its score explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredPosting {
    pub draft: JobDraft,
    pub breakdown: FlexScoreBreakdown,
    pub badges: Vec<&'static str>,
}

/// Stored posting returned to the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedJob {
    pub job: Job,
    pub breakdown: FlexScoreBreakdown,
    pub badges: Vec<&'static str>,
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

impl JobPosting {
    pub fn validate(&self) -> Result<(), PostingViolation> {
        let required = [
            ("title", &self.title),
            ("location", &self.location),
            ("workload", &self.workload),
            ("description", &self.description),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(PostingViolation::MissingField(*field));
        }

        if self.accessibility_documents.is_empty() {
            return Err(PostingViolation::MissingAccessibilityDocuments);
        }

        Ok(())
    }

    /// Validates the form, computes its flex score, and builds the draft published under
    /// `company`.
    pub fn score(self, company: &str) -> Result<ScoredPosting, PostingViolation> {
        self.validate()?;

        let breakdown = score_breakdown(&FlexScoreInput {
            modality: self.modality,
            schedule: &self.schedule,
            workload: &self.workload,
            has_accessibility_documents: !self.accessibility_documents.is_empty(),
        });
        let accessibility = clean_lines(self.accessibility);
        let badges = accessibility_badges(self.modality, &self.schedule, &accessibility);

        let draft = JobDraft {
            title: self.title.trim().to_string(),
            company: company.to_string(),
            location: self.location.trim().to_string(),
            modality: self.modality,
            workload: self.workload.trim().to_string(),
            flex_score: breakdown.score,
            salary: self.salary.filter(|salary| !salary.trim().is_empty()),
            description: self.description,
            requirements: clean_lines(self.requirements),
            benefits: clean_lines(self.benefits),
            accessibility,
            schedule: self.schedule,
            category: self
                .category
                .filter(|category| !category.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        };

        Ok(ScoredPosting {
            draft,
            breakdown,
            badges,
        })
    }
}
