//! Job search: free-text matching, faceted filters, and ordering over the posting catalogue.
//!
//! Facets combine with AND; options inside one facet combine with OR. An empty facet places
//! no constraint. Every function here is a pure projection of its input.

use serde::{Deserialize, Serialize};

use super::domain::{Job, Modality};

/// Hours-per-week ranges offered by the workload facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadBucket {
    /// Up to 20 hours.
    UpTo20,
    /// More than 20 and up to 30 hours.
    From20To30,
    /// More than 30 hours.
    Over30,
}

impl WorkloadBucket {
    pub const ALL: [WorkloadBucket; 3] = [
        WorkloadBucket::UpTo20,
        WorkloadBucket::From20To30,
        WorkloadBucket::Over30,
    ];

    pub const fn contains(self, hours: i64) -> bool {
        match self {
            WorkloadBucket::UpTo20 => hours <= 20,
            WorkloadBucket::From20To30 => hours > 20 && hours <= 30,
            WorkloadBucket::Over30 => hours > 30,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WorkloadBucket::UpTo20 => "up_to_20",
            WorkloadBucket::From20To30 => "from_20_to_30",
            WorkloadBucket::Over30 => "over_30",
        }
    }

    pub const fn display_label(self) -> &'static str {
        match self {
            WorkloadBucket::UpTo20 => "Até 20h/semana",
            WorkloadBucket::From20To30 => "20-30h/semana",
            WorkloadBucket::Over30 => "Acima de 30h/semana",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL.into_iter().find(|bucket| {
            bucket.label().eq_ignore_ascii_case(needle)
                || bucket.display_label().to_lowercase() == needle.to_lowercase()
        })
    }
}

/// Result ordering. `Recent` keeps catalogue order, which is newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Recent,
    FlexScore,
    Workload,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "recent" => Some(SortOrder::Recent),
            "flexscore" | "flex_score" => Some(SortOrder::FlexScore),
            "workload" => Some(SortOrder::Workload),
            _ => None,
        }
    }
}

/// Faceted filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilters {
    #[serde(default)]
    pub modality: Vec<Modality>,
    #[serde(default)]
    pub workload: Vec<WorkloadBucket>,
    #[serde(default)]
    pub schedule: Vec<String>,
    #[serde(default)]
    pub min_flex_score: u8,
    #[serde(default)]
    pub accessibility: Vec<String>,
}

impl JobFilters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, job: &Job) -> bool {
        self.matches_modality(job)
            && self.matches_workload(job)
            && any_tag_contains(&job.schedule, &self.schedule)
            && job.flex_score >= self.min_flex_score
            && any_tag_contains(&job.accessibility, &self.accessibility)
    }

    fn matches_modality(&self, job: &Job) -> bool {
        self.modality.is_empty() || self.modality.contains(&job.modality)
    }

    fn matches_workload(&self, job: &Job) -> bool {
        if self.workload.is_empty() {
            return true;
        }

        match job.workload_hours() {
            Some(hours) => self.workload.iter().any(|bucket| bucket.contains(hours)),
            None => false,
        }
    }
}

/// Complete search request: text, facets, and ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub filters: JobFilters,
    #[serde(default)]
    pub sort: SortOrder,
}

impl JobQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Case-insensitive substring match against title, company, or description.
pub fn matches_text(job: &Job, text: &str) -> bool {
    let needle = text.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [&job.title, &job.company, &job.description]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn any_tag_contains(tags: &[String], selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }

    selected.iter().any(|wanted| {
        let wanted = wanted.to_lowercase();
        tags.iter().any(|tag| tag.to_lowercase().contains(&wanted))
    })
}

/// Filters and orders `jobs`, borrowing the matching postings.
pub fn search<'a>(jobs: &'a [Job], query: &JobQuery) -> Vec<&'a Job> {
    let mut matched: Vec<&Job> = jobs
        .iter()
        .filter(|job| matches_text(job, &query.text))
        .filter(|job| query.filters.matches(job))
        .collect();

    match query.sort {
        SortOrder::Recent => {}
        SortOrder::FlexScore => {
            matched.sort_by(|left, right| right.flex_score.cmp(&left.flex_score));
        }
        SortOrder::Workload => {
            matched.sort_by_key(|job| job.workload_hours().unwrap_or(i64::MAX));
        }
    }

    matched
}

/// Raw search parameters as they arrive from a query string or command line.
/// Multi-valued facets are comma-separated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub modality: Option<String>,
    #[serde(default)]
    pub workload: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub accessibility: Option<String>,
    #[serde(default)]
    pub min_flex_score: Option<u8>,
    #[serde(default)]
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchParamError {
    #[error("unknown modality '{0}'")]
    Modality(String),
    #[error("unknown workload range '{0}'")]
    Workload(String),
    #[error("unknown sort order '{0}'")]
    Sort(String),
    #[error("minimum flex score must be between 0 and 100, got {0}")]
    MinFlexScore(u8),
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_list<T>(
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    error: impl Fn(String) -> SearchParamError,
) -> Result<Vec<T>, SearchParamError> {
    split_list(raw)
        .map(|value| parse(value).ok_or_else(|| error(value.to_string())))
        .collect()
}

impl SearchParams {
    pub fn into_query(self) -> Result<JobQuery, SearchParamError> {
        let min_flex_score = self.min_flex_score.unwrap_or(0);
        if min_flex_score > 100 {
            return Err(SearchParamError::MinFlexScore(min_flex_score));
        }

        let sort = match self.sort.as_deref() {
            None => SortOrder::default(),
            Some(raw) => SortOrder::parse(raw).ok_or_else(|| SearchParamError::Sort(raw.to_string()))?,
        };

        let filters = JobFilters {
            modality: parse_list(self.modality.as_deref(), Modality::parse, SearchParamError::Modality)?,
            workload: parse_list(
                self.workload.as_deref(),
                WorkloadBucket::parse,
                SearchParamError::Workload,
            )?,
            schedule: split_list(self.schedule.as_deref()).map(str::to_string).collect(),
            min_flex_score,
            accessibility: split_list(self.accessibility.as_deref())
                .map(str::to_string)
                .collect(),
        };

        Ok(JobQuery {
            text: self.q.map(|text| text.trim().to_string()).unwrap_or_default(),
            filters,
            sort,
        })
    }
}
