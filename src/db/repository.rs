//! Database repository for CRUD operations.
//!
//! Owns the slug uniqueness guard for blog posts and case studies and the
//! cascade delete for case study dependents.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    AdminAccount, BlogPost, BlogPostInput, CaseStudy, CaseStudyInput, CaseStudyMetric,
    CaseStudySection, ContactFormInput, ContactSubmission, Education, EducationInput, MetricInput,
    NewStoredImage, Profile, ProfileInput, Role, SectionInput, Skill, SkillInput, StoredImage,
    WorkExperience, WorkExperienceInput, PROFILE_ID,
};
use crate::validation::{slug_is_usable, slugify};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check store connectivity for the health endpoint.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    // ==================== BLOG POST OPERATIONS ====================

    /// List all blog posts, newest first.
    pub async fn list_blog_posts(&self) -> Result<Vec<BlogPost>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, summary, content, cover_image, thumbnail_image, published_date, featured, published, tags, slug, created_at, updated_at FROM blog_posts ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(blog_post_from_row).collect())
    }

    /// Get a blog post by ID.
    pub async fn get_blog_post(&self, id: &str) -> Result<Option<BlogPost>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, summary, content, cover_image, thumbnail_image, published_date, featured, published, tags, slug, created_at, updated_at FROM blog_posts WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(blog_post_from_row))
    }

    /// Find a blog post by slug.
    pub async fn find_blog_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, summary, content, cover_image, thumbnail_image, published_date, featured, published, tags, slug, created_at, updated_at FROM blog_posts WHERE slug = ?"
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(blog_post_from_row))
    }

    /// Create a new blog post with a slug derived from the title.
    pub async fn create_blog_post(&self, input: &BlogPostInput) -> Result<BlogPost, AppError> {
        let slug = slugify(&input.title);
        if !slug_is_usable(&slug) {
            return Err(AppError::invalid(
                "Title must contain at least one word character",
            ));
        }

        if self.find_blog_post_by_slug(&slug).await?.is_some() {
            return Err(AppError::AlreadyExists(
                "A blog post with this title already exists".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let tags_json = serde_json::to_string(&input.tags).unwrap_or_default();

        sqlx::query(
            "INSERT INTO blog_posts (id, title, summary, content, cover_image, thumbnail_image, published_date, featured, published, tags, slug, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&input.title)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(&input.cover_image)
        .bind(&input.thumbnail_image)
        .bind(&input.published_date)
        .bind(input.featured as i32)
        .bind(input.published as i32)
        .bind(&tags_json)
        .bind(&slug)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(BlogPost {
            id,
            title: input.title.clone(),
            summary: input.summary.clone(),
            content: input.content.clone(),
            cover_image: input.cover_image.clone(),
            thumbnail_image: input.thumbnail_image.clone(),
            published_date: input.published_date.clone(),
            featured: input.featured,
            published: input.published,
            tags: input.tags.clone(),
            slug,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update a blog post, recomputing the slug only when the title changed.
    pub async fn update_blog_post(
        &self,
        id: &str,
        input: &BlogPostInput,
    ) -> Result<BlogPost, AppError> {
        let existing = self
            .get_blog_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))?;

        let slug = if input.title != existing.title {
            let slug = slugify(&input.title);
            if !slug_is_usable(&slug) {
                return Err(AppError::invalid(
                    "Title must contain at least one word character",
                ));
            }
            // A match against the same document is not a conflict
            if let Some(other) = self.find_blog_post_by_slug(&slug).await? {
                if other.id != id {
                    return Err(AppError::AlreadyExists(
                        "A blog post with this title already exists".to_string(),
                    ));
                }
            }
            slug
        } else {
            existing.slug.clone()
        };

        let now = Utc::now().to_rfc3339();
        let tags_json = serde_json::to_string(&input.tags).unwrap_or_default();

        sqlx::query(
            "UPDATE blog_posts SET title = ?, summary = ?, content = ?, cover_image = ?, thumbnail_image = ?, published_date = ?, featured = ?, published = ?, tags = ?, slug = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&input.title)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(&input.cover_image)
        .bind(&input.thumbnail_image)
        .bind(&input.published_date)
        .bind(input.featured as i32)
        .bind(input.published as i32)
        .bind(&tags_json)
        .bind(&slug)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(BlogPost {
            id: id.to_string(),
            title: input.title.clone(),
            summary: input.summary.clone(),
            content: input.content.clone(),
            cover_image: input.cover_image.clone(),
            thumbnail_image: input.thumbnail_image.clone(),
            published_date: input.published_date.clone(),
            featured: input.featured,
            published: input.published,
            tags: input.tags.clone(),
            slug,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete a blog post.
    pub async fn delete_blog_post(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".to_string()));
        }

        Ok(())
    }

    // ==================== CASE STUDY OPERATIONS ====================

    /// List all case studies, newest first.
    pub async fn list_case_studies(&self) -> Result<Vec<CaseStudy>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, summary, content, cover_image, thumbnail_image, published_date, featured, published, tags, slug, created_at, updated_at FROM case_studies ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(case_study_from_row).collect())
    }

    /// Get a case study by ID.
    pub async fn get_case_study(&self, id: &str) -> Result<Option<CaseStudy>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, summary, content, cover_image, thumbnail_image, published_date, featured, published, tags, slug, created_at, updated_at FROM case_studies WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(case_study_from_row))
    }

    /// Find a case study by slug.
    pub async fn find_case_study_by_slug(&self, slug: &str) -> Result<Option<CaseStudy>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, summary, content, cover_image, thumbnail_image, published_date, featured, published, tags, slug, created_at, updated_at FROM case_studies WHERE slug = ?"
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(case_study_from_row))
    }

    /// Create a new case study with a slug derived from the title.
    pub async fn create_case_study(&self, input: &CaseStudyInput) -> Result<CaseStudy, AppError> {
        let slug = slugify(&input.title);
        if !slug_is_usable(&slug) {
            return Err(AppError::invalid(
                "Title must contain at least one word character",
            ));
        }

        if self.find_case_study_by_slug(&slug).await?.is_some() {
            return Err(AppError::AlreadyExists(
                "A case study with this title already exists".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let tags_json = serde_json::to_string(&input.tags).unwrap_or_default();

        sqlx::query(
            "INSERT INTO case_studies (id, title, summary, content, cover_image, thumbnail_image, published_date, featured, published, tags, slug, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&input.title)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(&input.cover_image)
        .bind(&input.thumbnail_image)
        .bind(&input.published_date)
        .bind(input.featured as i32)
        .bind(input.published as i32)
        .bind(&tags_json)
        .bind(&slug)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(CaseStudy {
            id,
            title: input.title.clone(),
            summary: input.summary.clone(),
            content: input.content.clone(),
            cover_image: input.cover_image.clone(),
            thumbnail_image: input.thumbnail_image.clone(),
            published_date: input.published_date.clone(),
            featured: input.featured,
            published: input.published,
            tags: input.tags.clone(),
            slug,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update a case study, recomputing the slug only when the title changed.
    pub async fn update_case_study(
        &self,
        id: &str,
        input: &CaseStudyInput,
    ) -> Result<CaseStudy, AppError> {
        let existing = self
            .get_case_study(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Case study not found".to_string()))?;

        let slug = if input.title != existing.title {
            let slug = slugify(&input.title);
            if !slug_is_usable(&slug) {
                return Err(AppError::invalid(
                    "Title must contain at least one word character",
                ));
            }
            if let Some(other) = self.find_case_study_by_slug(&slug).await? {
                if other.id != id {
                    return Err(AppError::AlreadyExists(
                        "A case study with this title already exists".to_string(),
                    ));
                }
            }
            slug
        } else {
            existing.slug.clone()
        };

        let now = Utc::now().to_rfc3339();
        let tags_json = serde_json::to_string(&input.tags).unwrap_or_default();

        sqlx::query(
            "UPDATE case_studies SET title = ?, summary = ?, content = ?, cover_image = ?, thumbnail_image = ?, published_date = ?, featured = ?, published = ?, tags = ?, slug = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&input.title)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(&input.cover_image)
        .bind(&input.thumbnail_image)
        .bind(&input.published_date)
        .bind(input.featured as i32)
        .bind(input.published as i32)
        .bind(&tags_json)
        .bind(&slug)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(CaseStudy {
            id: id.to_string(),
            title: input.title.clone(),
            summary: input.summary.clone(),
            content: input.content.clone(),
            cover_image: input.cover_image.clone(),
            thumbnail_image: input.thumbnail_image.clone(),
            published_date: input.published_date.clone(),
            featured: input.featured,
            published: input.published,
            tags: input.tags.clone(),
            slug,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete a case study together with its sections and metrics.
    ///
    /// All three deletes commit in one transaction or not at all.
    pub async fn delete_case_study(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM case_study_sections WHERE case_study_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM case_study_metrics WHERE case_study_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM case_studies WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the dependent deletes
            return Err(AppError::NotFound("Case study not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// List the sections of a case study in display order.
    pub async fn list_case_study_sections(
        &self,
        case_study_id: &str,
    ) -> Result<Vec<CaseStudySection>, AppError> {
        let rows = sqlx::query(
            "SELECT id, case_study_id, title, content, order_index, created_at, updated_at FROM case_study_sections WHERE case_study_id = ? ORDER BY order_index"
        )
        .bind(case_study_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(section_from_row).collect())
    }

    /// Add a section to an existing case study.
    pub async fn add_case_study_section(
        &self,
        case_study_id: &str,
        input: &SectionInput,
    ) -> Result<CaseStudySection, AppError> {
        self.get_case_study(case_study_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Case study not found".to_string()))?;

        let order = match input.order {
            Some(order) => order,
            None => {
                let row = sqlx::query(
                    "SELECT MAX(order_index) AS max_order FROM case_study_sections WHERE case_study_id = ?",
                )
                .bind(case_study_id)
                .fetch_one(&self.pool)
                .await?;
                row.get::<Option<i64>, _>("max_order").unwrap_or(0) + 1
            }
        };

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO case_study_sections (id, case_study_id, title, content, order_index, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(case_study_id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(CaseStudySection {
            id,
            case_study_id: case_study_id.to_string(),
            title: input.title.clone(),
            content: input.content.clone(),
            order,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// List the metrics of a case study in display order.
    pub async fn list_case_study_metrics(
        &self,
        case_study_id: &str,
    ) -> Result<Vec<CaseStudyMetric>, AppError> {
        let rows = sqlx::query(
            "SELECT id, case_study_id, label, value, order_index, created_at, updated_at FROM case_study_metrics WHERE case_study_id = ? ORDER BY order_index"
        )
        .bind(case_study_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(metric_from_row).collect())
    }

    /// Add a metric to an existing case study.
    pub async fn add_case_study_metric(
        &self,
        case_study_id: &str,
        input: &MetricInput,
    ) -> Result<CaseStudyMetric, AppError> {
        self.get_case_study(case_study_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Case study not found".to_string()))?;

        let order = match input.order {
            Some(order) => order,
            None => {
                let row = sqlx::query(
                    "SELECT MAX(order_index) AS max_order FROM case_study_metrics WHERE case_study_id = ?",
                )
                .bind(case_study_id)
                .fetch_one(&self.pool)
                .await?;
                row.get::<Option<i64>, _>("max_order").unwrap_or(0) + 1
            }
        };

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO case_study_metrics (id, case_study_id, label, value, order_index, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(case_study_id)
        .bind(&input.label)
        .bind(&input.value)
        .bind(order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(CaseStudyMetric {
            id,
            case_study_id: case_study_id.to_string(),
            label: input.label.clone(),
            value: input.value.clone(),
            order,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    // ==================== PROFILE OPERATIONS ====================

    /// Get the singleton profile.
    pub async fn get_profile(&self) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query(
            "SELECT id, display_name, headline, bio, email, phone, location, website, linkedin, github, twitter, created_at, updated_at FROM profile WHERE id = ?"
        )
        .bind(PROFILE_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    /// Create or replace the singleton profile.
    pub async fn upsert_profile(&self, input: &ProfileInput) -> Result<Profile, AppError> {
        let existing = self.get_profile().await?;
        let now = Utc::now().to_rfc3339();

        let linkedin = input.social_links.as_ref().and_then(|l| l.linkedin.clone());
        let github = input.social_links.as_ref().and_then(|l| l.github.clone());
        let twitter = input.social_links.as_ref().and_then(|l| l.twitter.clone());

        let created_at = match existing {
            Some(profile) => {
                sqlx::query(
                    "UPDATE profile SET display_name = ?, headline = ?, bio = ?, email = ?, phone = ?, location = ?, website = ?, linkedin = ?, github = ?, twitter = ?, updated_at = ? WHERE id = ?"
                )
                .bind(&input.display_name)
                .bind(&input.headline)
                .bind(&input.bio)
                .bind(&input.email)
                .bind(&input.phone)
                .bind(&input.location)
                .bind(&input.website)
                .bind(&linkedin)
                .bind(&github)
                .bind(&twitter)
                .bind(&now)
                .bind(PROFILE_ID)
                .execute(&self.pool)
                .await?;
                profile.created_at
            }
            None => {
                sqlx::query(
                    "INSERT INTO profile (id, display_name, headline, bio, email, phone, location, website, linkedin, github, twitter, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                )
                .bind(PROFILE_ID)
                .bind(&input.display_name)
                .bind(&input.headline)
                .bind(&input.bio)
                .bind(&input.email)
                .bind(&input.phone)
                .bind(&input.location)
                .bind(&input.website)
                .bind(&linkedin)
                .bind(&github)
                .bind(&twitter)
                .bind(&now)
                .bind(&now)
                .execute(&self.pool)
                .await?;
                now.clone()
            }
        };

        Ok(Profile {
            id: PROFILE_ID.to_string(),
            display_name: input.display_name.clone(),
            headline: input.headline.clone(),
            bio: input.bio.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            location: input.location.clone(),
            website: input.website.clone(),
            social_links: input.social_links.clone(),
            created_at,
            updated_at: now,
        })
    }

    /// List work experiences in display order.
    pub async fn list_work_experiences(&self) -> Result<Vec<WorkExperience>, AppError> {
        let rows = sqlx::query(
            "SELECT id, profile_id, company, position, description, start_date, end_date, current, order_index, created_at, updated_at FROM work_experiences ORDER BY order_index"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(work_experience_from_row).collect())
    }

    /// Add a work experience entry to the profile.
    pub async fn add_work_experience(
        &self,
        input: &WorkExperienceInput,
    ) -> Result<WorkExperience, AppError> {
        self.require_profile().await?;

        let order = match input.order {
            Some(order) => order,
            None => self.next_order("work_experiences").await?,
        };

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO work_experiences (id, profile_id, company, position, description, start_date, end_date, current, order_index, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(PROFILE_ID)
        .bind(&input.company)
        .bind(&input.position)
        .bind(&input.description)
        .bind(&input.start_date)
        .bind(&input.end_date)
        .bind(input.current as i32)
        .bind(order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(WorkExperience {
            id,
            profile_id: PROFILE_ID.to_string(),
            company: input.company.clone(),
            position: input.position.clone(),
            description: input.description.clone(),
            start_date: input.start_date.clone(),
            end_date: input.end_date.clone(),
            current: input.current,
            order,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// List education entries in display order.
    pub async fn list_education(&self) -> Result<Vec<Education>, AppError> {
        let rows = sqlx::query(
            "SELECT id, profile_id, institution, degree, field, start_date, end_date, order_index, created_at, updated_at FROM education ORDER BY order_index"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(education_from_row).collect())
    }

    /// Add an education entry to the profile.
    pub async fn add_education(&self, input: &EducationInput) -> Result<Education, AppError> {
        self.require_profile().await?;

        let order = match input.order {
            Some(order) => order,
            None => self.next_order("education").await?,
        };

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO education (id, profile_id, institution, degree, field, start_date, end_date, order_index, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(PROFILE_ID)
        .bind(&input.institution)
        .bind(&input.degree)
        .bind(&input.field)
        .bind(&input.start_date)
        .bind(&input.end_date)
        .bind(order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Education {
            id,
            profile_id: PROFILE_ID.to_string(),
            institution: input.institution.clone(),
            degree: input.degree.clone(),
            field: input.field.clone(),
            start_date: input.start_date.clone(),
            end_date: input.end_date.clone(),
            order,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// List skills in display order.
    pub async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let rows = sqlx::query(
            "SELECT id, profile_id, name, category, proficiency, order_index, created_at, updated_at FROM skills ORDER BY order_index"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(skill_from_row).collect())
    }

    /// Add a skill to the profile.
    pub async fn add_skill(&self, input: &SkillInput) -> Result<Skill, AppError> {
        self.require_profile().await?;

        let order = match input.order {
            Some(order) => order,
            None => self.next_order("skills").await?,
        };

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO skills (id, profile_id, name, category, proficiency, order_index, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(PROFILE_ID)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.proficiency)
        .bind(order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Skill {
            id,
            profile_id: PROFILE_ID.to_string(),
            name: input.name.clone(),
            category: input.category.clone(),
            proficiency: input.proficiency,
            order,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn require_profile(&self) -> Result<Profile, AppError> {
        self.get_profile().await?.ok_or_else(|| {
            AppError::NotFound("Profile not found. Please create a profile first.".to_string())
        })
    }

    async fn next_order(&self, table: &str) -> Result<i64, AppError> {
        let row = sqlx::query(&format!(
            "SELECT MAX(order_index) AS max_order FROM {}",
            table
        ))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<Option<i64>, _>("max_order").unwrap_or(0) + 1)
    }

    // ==================== CONTACT OPERATIONS ====================

    /// Record a contact form submission.
    pub async fn create_contact_submission(
        &self,
        input: &ContactFormInput,
    ) -> Result<ContactSubmission, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO contact_submissions (id, name, email, subject, message, read, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, ?, ?)"
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.subject)
        .bind(&input.message)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(ContactSubmission {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
            subject: input.subject.clone(),
            message: input.message.clone(),
            read: false,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// List contact submissions, newest first.
    pub async fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, email, subject, message, read, created_at, updated_at FROM contact_submissions ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(contact_from_row).collect())
    }

    /// Mark a contact submission as read.
    pub async fn mark_contact_read(&self, id: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE contact_submissions SET read = 1, updated_at = ? WHERE id = ?",
        )
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Contact submission not found".to_string(),
            ));
        }

        Ok(())
    }

    /// Delete a contact submission.
    pub async fn delete_contact_submission(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contact_submissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Contact submission not found".to_string(),
            ));
        }

        Ok(())
    }

    // ==================== ADMIN ACCOUNT OPERATIONS ====================

    /// Get an admin account by uid.
    pub async fn get_admin_account(&self, uid: &str) -> Result<Option<AdminAccount>, AppError> {
        let row = sqlx::query(
            "SELECT uid, email, display_name, role, password_hash, created_at, created_by FROM admin_accounts WHERE uid = ?"
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(admin_from_row).transpose()
    }

    /// Find an admin account by email.
    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AppError> {
        let row = sqlx::query(
            "SELECT uid, email, display_name, role, password_hash, created_at, created_by FROM admin_accounts WHERE email = ?"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(admin_from_row).transpose()
    }

    /// Count admin accounts; used by the startup bootstrap.
    pub async fn count_admin_accounts(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM admin_accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Create a new admin account with a pre-hashed password.
    pub async fn create_admin_account(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
        role: Role,
        created_by: Option<&str>,
    ) -> Result<AdminAccount, AppError> {
        if self.find_admin_by_email(email).await?.is_some() {
            return Err(AppError::AlreadyExists(
                "An account with this email already exists".to_string(),
            ));
        }

        let uid = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO admin_accounts (uid, email, display_name, role, password_hash, created_at, created_by) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&uid)
        .bind(email)
        .bind(display_name)
        .bind(role.as_str())
        .bind(password_hash)
        .bind(&now)
        .bind(created_by)
        .execute(&self.pool)
        .await?;

        Ok(AdminAccount {
            uid,
            email: email.to_string(),
            display_name: display_name.map(|s| s.to_string()),
            role,
            password_hash: password_hash.to_string(),
            created_at: now,
            created_by: created_by.map(|s| s.to_string()),
        })
    }

    /// Change an account's role.
    pub async fn update_admin_role(&self, uid: &str, role: Role) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE admin_accounts SET role = ? WHERE uid = ?")
            .bind(role.as_str())
            .bind(uid)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        Ok(())
    }

    // ==================== IMAGE METADATA OPERATIONS ====================

    /// List stored-image records, newest first.
    pub async fn list_images(&self) -> Result<Vec<StoredImage>, AppError> {
        let rows = sqlx::query(
            "SELECT id, original_path, optimized_path, thumbnail_path, content_type, folder, uploaded_by, created_at FROM images ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(image_from_row).collect())
    }

    /// Record the variants a pipeline run stored.
    pub async fn record_image(&self, new: &NewStoredImage) -> Result<StoredImage, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO images (id, original_path, optimized_path, thumbnail_path, content_type, folder, uploaded_by, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&new.original_path)
        .bind(&new.optimized_path)
        .bind(&new.thumbnail_path)
        .bind(&new.content_type)
        .bind(&new.folder)
        .bind(&new.uploaded_by)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(StoredImage {
            id,
            original_path: new.original_path.clone(),
            optimized_path: new.optimized_path.clone(),
            thumbnail_path: new.thumbnail_path.clone(),
            content_type: new.content_type.clone(),
            folder: new.folder.clone(),
            uploaded_by: new.uploaded_by.clone(),
            created_at: now,
        })
    }
}

// Helper functions for row conversion

fn blog_post_from_row(row: &sqlx::sqlite::SqliteRow) -> BlogPost {
    let featured: i32 = row.get("featured");
    let published: i32 = row.get("published");
    let tags_str: String = row.get("tags");
    BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        summary: row.get("summary"),
        content: row.get("content"),
        cover_image: row.get("cover_image"),
        thumbnail_image: row.get("thumbnail_image"),
        published_date: row.get("published_date"),
        featured: featured != 0,
        published: published != 0,
        tags: parse_json_array(&tags_str),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn case_study_from_row(row: &sqlx::sqlite::SqliteRow) -> CaseStudy {
    let featured: i32 = row.get("featured");
    let published: i32 = row.get("published");
    let tags_str: String = row.get("tags");
    CaseStudy {
        id: row.get("id"),
        title: row.get("title"),
        summary: row.get("summary"),
        content: row.get("content"),
        cover_image: row.get("cover_image"),
        thumbnail_image: row.get("thumbnail_image"),
        published_date: row.get("published_date"),
        featured: featured != 0,
        published: published != 0,
        tags: parse_json_array(&tags_str),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn section_from_row(row: &sqlx::sqlite::SqliteRow) -> CaseStudySection {
    CaseStudySection {
        id: row.get("id"),
        case_study_id: row.get("case_study_id"),
        title: row.get("title"),
        content: row.get("content"),
        order: row.get("order_index"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn metric_from_row(row: &sqlx::sqlite::SqliteRow) -> CaseStudyMetric {
    CaseStudyMetric {
        id: row.get("id"),
        case_study_id: row.get("case_study_id"),
        label: row.get("label"),
        value: row.get("value"),
        order: row.get("order_index"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn profile_from_row(row: &sqlx::sqlite::SqliteRow) -> Profile {
    let linkedin: Option<String> = row.get("linkedin");
    let github: Option<String> = row.get("github");
    let twitter: Option<String> = row.get("twitter");

    let social_links = if linkedin.is_some() || github.is_some() || twitter.is_some() {
        Some(crate::models::SocialLinks {
            linkedin,
            github,
            twitter,
        })
    } else {
        None
    };

    Profile {
        id: row.get("id"),
        display_name: row.get("display_name"),
        headline: row.get("headline"),
        bio: row.get("bio"),
        email: row.get("email"),
        phone: row.get("phone"),
        location: row.get("location"),
        website: row.get("website"),
        social_links,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn work_experience_from_row(row: &sqlx::sqlite::SqliteRow) -> WorkExperience {
    let current: i32 = row.get("current");
    WorkExperience {
        id: row.get("id"),
        profile_id: row.get("profile_id"),
        company: row.get("company"),
        position: row.get("position"),
        description: row.get("description"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        current: current != 0,
        order: row.get("order_index"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn education_from_row(row: &sqlx::sqlite::SqliteRow) -> Education {
    Education {
        id: row.get("id"),
        profile_id: row.get("profile_id"),
        institution: row.get("institution"),
        degree: row.get("degree"),
        field: row.get("field"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        order: row.get("order_index"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn skill_from_row(row: &sqlx::sqlite::SqliteRow) -> Skill {
    Skill {
        id: row.get("id"),
        profile_id: row.get("profile_id"),
        name: row.get("name"),
        category: row.get("category"),
        proficiency: row.get("proficiency"),
        order: row.get("order_index"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn contact_from_row(row: &sqlx::sqlite::SqliteRow) -> ContactSubmission {
    let read: i32 = row.get("read");
    ContactSubmission {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        subject: row.get("subject"),
        message: row.get("message"),
        read: read != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn admin_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<AdminAccount, AppError> {
    let role_str: String = row.get("role");
    let role = Role::from_str(&role_str).ok_or_else(|| {
        tracing::error!("Unknown role in account record: {}", role_str);
        AppError::Internal("Corrupt account record".to_string())
    })?;

    Ok(AdminAccount {
        uid: row.get("uid"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        role,
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        created_by: row.get("created_by"),
    })
}

fn image_from_row(row: &sqlx::sqlite::SqliteRow) -> StoredImage {
    StoredImage {
        id: row.get("id"),
        original_path: row.get("original_path"),
        optimized_path: row.get("optimized_path"),
        thumbnail_path: row.get("thumbnail_path"),
        content_type: row.get("content_type"),
        folder: row.get("folder"),
        uploaded_by: row.get("uploaded_by"),
        created_at: row.get("created_at"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
