use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "ssr")]
pub mod client;

/// List slot the project cards are registered under.
pub const PROJECTS_LIST: &str = "projects";
/// Reveal timing for the project grid: card `i` waits `600 + i * 150` ms.
pub const CARD_BASE_DELAY_MS: u64 = 600;
pub const CARD_STAGGER_MS: u64 = 150;

pub const CATEGORIES: [&str; 3] = ["Machine Learning", "Cloud Computing", "Full-Stack"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Project {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn created_at_label(&self) -> Option<String> {
        self.created_at()
            .map(|d| d.format("%b %e %Y").to_string())
    }
}

// the backend writes naive ISO timestamps (no offset); treat those as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(raw) {
        return Some(d.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|d| d.and_utc())
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub category: String,
    pub description: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl NewProject {
    /// Checks the required fields in the order the backend does and reports
    /// the first blank one.
    pub fn validate(&self) -> Result<(), ProjectError> {
        let required = [
            ("title", &self.title),
            ("category", &self.category),
            ("description", &self.description),
            ("imageUrl", &self.image_url),
        ];
        match required.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((name, _)) => Err(ProjectError::MissingField(*name)),
            None => Ok(()),
        }
    }

    /// Trims every field and turns blank optional links into `None`.
    pub fn normalized(&self) -> Self {
        let link = |l: &Option<String>| {
            l.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
            github: link(&self.github),
            website: link(&self.website),
        }
    }
}

/// Response of `POST /media`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaUpload {
    pub url: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("couldn't decode response: {0}")]
    Decode(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl ProjectError {
    /// Text to show the user. Backend error bodies are passed through as-is.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { body, .. } if !body.trim().is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Fail-soft view of a listing: any error means "no projects".
pub fn listing_or_empty(result: Result<Vec<Project>, ProjectError>) -> Vec<Project> {
    match result {
        Ok(projects) => projects,
        Err(e) => {
            log::warn!("couldn't load projects, showing none: {e}");
            Vec::new()
        }
    }
}
