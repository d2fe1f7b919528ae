//! Case study model with its dependent sections and metrics.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A portfolio case study.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub tags: Vec<String>,
    pub slug: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating or updating a case study.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Summary is required"))]
    pub summary: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub thumbnail_image: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A content section belonging to a case study; deleted with its parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudySection {
    pub id: String,
    pub case_study_id: String,
    pub title: String,
    pub content: String,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for adding a section to a case study.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SectionInput {
    #[validate(length(min = 1, message = "Section title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Section content is required"))]
    pub content: String,
    #[serde(default)]
    pub order: Option<i64>,
}

/// A headline metric belonging to a case study; deleted with its parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyMetric {
    pub id: String,
    pub case_study_id: String,
    pub label: String,
    pub value: String,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for adding a metric to a case study.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MetricInput {
    #[validate(length(min = 1, message = "Metric label is required"))]
    pub label: String,
    #[validate(length(min = 1, message = "Metric value is required"))]
    pub value: String,
    #[serde(default)]
    pub order: Option<i64>,
}
