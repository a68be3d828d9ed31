use std::fmt;

use serde::{Deserialize, Serialize};

/// Display label given to a posting at the moment it is published.
pub const JUST_POSTED_LABEL: &str = "Há poucos minutos";

/// Category assigned to postings published through the company flow.
pub const DEFAULT_CATEGORY: &str = "Geral";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a job posting.
    JobId
);
string_id!(
    /// Identifier of a student's application to a posting.
    ApplicationId
);
string_id!(
    /// Identifier shared by a student profile and the account that owns it.
    StudentId
);

/// Short random identifier, comparable to the nine character keys the web client generated.
pub(crate) fn fresh_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

/// Work arrangement of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Remote,
    Hybrid,
    Onsite,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Remote, Modality::Hybrid, Modality::Onsite];

    pub const fn label(self) -> &'static str {
        match self {
            Modality::Remote => "remote",
            Modality::Hybrid => "hybrid",
            Modality::Onsite => "onsite",
        }
    }

    /// Portuguese label shown on listing cards and filter checkboxes.
    pub const fn display_label(self) -> &'static str {
        match self {
            Modality::Remote => "Remoto",
            Modality::Hybrid => "Híbrido",
            Modality::Onsite => "Presencial",
        }
    }

    /// Accepts either the stored identifier or the display label.
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL.into_iter().find(|modality| {
            modality.label().eq_ignore_ascii_case(needle)
                || modality.display_label().to_lowercase() == needle.to_lowercase()
        })
    }
}

/// Extracts the hours-per-week number from strings such as `"20h/semana"`.
///
/// Leading whitespace and one sign are skipped, then the leading digits are read.
/// A digit run too long for `i64` saturates. Anything without leading digits yields `None`.
pub fn parse_workload_hours(workload: &str) -> Option<i64> {
    let trimmed = workload.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut hours: Option<i64> = None;
    for digit in digits.chars().map_while(|ch| ch.to_digit(10)) {
        let digit = i64::from(digit);
        let magnitude = hours.unwrap_or(0).saturating_mul(10);
        hours = Some(if negative {
            magnitude.saturating_sub(digit)
        } else {
            magnitude.saturating_add(digit)
        });
    }
    hours
}

/// Published job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub modality: Modality,
    pub workload: String,
    pub flex_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
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
    pub posted_date: String,
    pub category: String,
}

impl Job {
    pub fn workload_hours(&self) -> Option<i64> {
        parse_workload_hours(&self.workload)
    }
}

/// Everything a posting carries before the store assigns its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub modality: Modality,
    pub workload: String,
    pub flex_score: u8,
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
    pub category: String,
}

impl JobDraft {
    pub(crate) fn into_job(self, id: JobId, posted_date: impl Into<String>) -> Job {
        Job {
            id,
            title: self.title,
            company: self.company,
            location: self.location,
            modality: self.modality,
            workload: self.workload,
            flex_score: self.flex_score.min(100),
            salary: self.salary,
            description: self.description,
            requirements: self.requirements,
            benefits: self.benefits,
            accessibility: self.accessibility,
            schedule: self.schedule,
            posted_date: posted_date.into(),
            category: self.category,
        }
    }
}

/// Lifecycle of an application. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Wording students see on their applications list.
    pub const fn student_label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Em análise",
            ApplicationStatus::Approved => "Aprovado",
            ApplicationStatus::Rejected => "Não selecionado",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A student's application, carrying a snapshot of the applicant at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub student_id: StudentId,
    pub student_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    pub applied_date: String,
    pub status: ApplicationStatus,
}

/// Applicant details copied onto a new application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
}

impl Applicant {
    pub fn new(id: impl Into<StudentId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            university: None,
            course: None,
            semester: None,
        }
    }
}

impl From<&Student> for Applicant {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            university: student.university.clone(),
            course: student.course.clone(),
            semester: student.semester.clone(),
        }
    }
}

/// Public student profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Field-level changes to a student profile; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl StudentProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Student {
    pub fn apply(&mut self, update: StudentProfileUpdate) {
        let StudentProfileUpdate {
            name,
            email,
            university,
            course,
            semester,
            phone,
            bio,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if university.is_some() {
            self.university = university;
        }
        if course.is_some() {
            self.course = course;
        }
        if semester.is_some() {
            self.semester = semester;
        }
        if phone.is_some() {
            self.phone = phone;
        }
        if bio.is_some() {
            self.bio = bio;
        }
    }
}
