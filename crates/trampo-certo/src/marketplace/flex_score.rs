//! Flex-Score: an additive 0-100 rating of how flexible and accessible a posting is.

use serde::{Deserialize, Serialize};

use super::domain::{parse_workload_hours, Modality};

/// Schedule tag that earns the flexible-hours bonus. Matched exactly.
pub const FLEXIBLE_HOURS_TAG: &str = "Horários flexíveis";

pub const BASE_SCORE: u8 = 50;
pub const MAX_SCORE: u8 = 100;
const REDUCED_WORKLOAD_LIMIT_HOURS: i64 = 20;

/// Attributes of a posting that feed the score.
#[derive(Debug, Clone, Copy)]
pub struct FlexScoreInput<'a> {
    pub modality: Modality,
    pub schedule: &'a [String],
    pub workload: &'a str,
    pub has_accessibility_documents: bool,
}

/// Bonus categories contributing to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexFactor {
    Base,
    RemoteWork,
    HybridWork,
    FlexibleHours,
    ReducedWorkload,
    AccessibilityDocumentation,
}

/// Single contribution to a flex score so postings can show where the points came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexComponent {
    pub factor: FlexFactor,
    pub points: u8,
    pub notes: String,
}

/// Clamped score plus the raw total and the contributions that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexScoreBreakdown {
    pub score: u8,
    pub raw_total: u16,
    pub components: Vec<FlexComponent>,
}

impl FlexScoreBreakdown {
    pub fn level(&self) -> FlexLevel {
        FlexLevel::from_score(self.score)
    }
}

/// Computes the clamped score.
pub fn flex_score(input: &FlexScoreInput<'_>) -> u8 {
    score_breakdown(input).score
}

pub fn score_breakdown(input: &FlexScoreInput<'_>) -> FlexScoreBreakdown {
    let mut components = vec![FlexComponent {
        factor: FlexFactor::Base,
        points: BASE_SCORE,
        notes: "base score".to_string(),
    }];

    match input.modality {
        Modality::Remote => components.push(FlexComponent {
            factor: FlexFactor::RemoteWork,
            points: 20,
            notes: "fully remote".to_string(),
        }),
        Modality::Hybrid => components.push(FlexComponent {
            factor: FlexFactor::HybridWork,
            points: 10,
            notes: "hybrid arrangement".to_string(),
        }),
        Modality::Onsite => {}
    }

    if input.schedule.iter().any(|tag| tag == FLEXIBLE_HOURS_TAG) {
        components.push(FlexComponent {
            factor: FlexFactor::FlexibleHours,
            points: 15,
            notes: format!("schedule includes '{FLEXIBLE_HOURS_TAG}'"),
        });
    }

    // An unparseable workload earns nothing.
    if let Some(hours) = parse_workload_hours(input.workload) {
        if hours <= REDUCED_WORKLOAD_LIMIT_HOURS {
            components.push(FlexComponent {
                factor: FlexFactor::ReducedWorkload,
                points: 15,
                notes: format!("{hours}h per week within {REDUCED_WORKLOAD_LIMIT_HOURS}h"),
            });
        }
    }

    if input.has_accessibility_documents {
        components.push(FlexComponent {
            factor: FlexFactor::AccessibilityDocumentation,
            points: 10,
            notes: "accessibility documentation attached".to_string(),
        });
    }

    let raw_total: u16 = components
        .iter()
        .map(|component| u16::from(component.points))
        .sum();
    let score = raw_total.min(u16::from(MAX_SCORE)) as u8;

    FlexScoreBreakdown {
        score,
        raw_total,
        components,
    }
}

/// Coarse band used when displaying a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexLevel {
    High,
    Moderate,
    Limited,
}

impl FlexLevel {
    pub const fn from_score(score: u8) -> Self {
        if score >= 80 {
            FlexLevel::High
        } else if score >= 60 {
            FlexLevel::Moderate
        } else {
            FlexLevel::Limited
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FlexLevel::High => "Alta Flexibilidade",
            FlexLevel::Moderate => "Flexibilidade Moderada",
            FlexLevel::Limited => "Flexibilidade Limitada",
        }
    }
}

/// Badges shown on a published posting, derived from modality, schedule, and free-text
/// accessibility notes.
pub fn accessibility_badges(
    modality: Modality,
    schedule: &[String],
    accessibility_notes: &[String],
) -> Vec<&'static str> {
    let mut badges = Vec::new();
    let notes = accessibility_notes.join("\n").to_lowercase();

    if modality == Modality::Remote {
        badges.push("Trabalho Remoto");
    }
    if schedule.iter().any(|tag| tag == FLEXIBLE_HOURS_TAG) {
        badges.push("Horários Flexíveis");
    }
    if notes.contains("cadeirante") {
        badges.push("Acessível para Cadeirantes");
    }
    if notes.contains("visual") || notes.contains("cego") {
        badges.push("Acessível para Deficientes Visuais");
    }

    badges
}
