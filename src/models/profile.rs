//! Profile singleton and its ordered sub-resources.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fixed id of the singleton profile document.
pub const PROFILE_ID: &str = "main";

/// External links shown on the profile page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default)]
    #[validate(url(message = "Invalid LinkedIn URL"))]
    pub linkedin: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Invalid GitHub URL"))]
    pub github: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Invalid Twitter URL"))]
    pub twitter: Option<String>,
}

/// The site owner's profile. There is exactly one, with id `"main"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating or replacing the profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[validate(length(min = 1, message = "Display name is required"))]
    pub display_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub social_links: Option<SocialLinks>,
}

/// The profile together with its ordered sub-resources, as served publicly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub work_experiences: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
}

/// A work experience entry, ordered within the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: String,
    pub profile_id: String,
    pub company: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub current: bool,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for adding a work experience entry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceInput {
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub order: Option<i64>,
}

/// An education entry, ordered within the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub profile_id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for adding an education entry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    #[validate(length(min = 1, message = "Institution is required"))]
    pub institution: String,
    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,
    #[validate(length(min = 1, message = "Field of study is required"))]
    pub field: String,
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

/// A skill entry with a 1-5 proficiency, ordered within the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub profile_id: String,
    pub name: String,
    pub category: String,
    pub proficiency: i64,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for adding a skill.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    #[validate(length(min = 1, message = "Skill name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(default = "default_proficiency")]
    #[validate(range(min = 1, max = 5, message = "Proficiency must be between 1 and 5"))]
    pub proficiency: i64,
    #[serde(default)]
    pub order: Option<i64>,
}

fn default_proficiency() -> i64 {
    3
}
