pub mod api;
pub mod db;
pub mod listing;
pub mod logging;
pub mod matching;
pub mod translation;

use chrono::{DateTime, Utc};

use translation::TranslationStatus;

// Commonly used data models shared by the matching and listing paths.

/// A job posting with parallel English (default) and Arabic field sets.
///
/// `translation_status == Completed` guarantees the `*_ar` columns are
/// populated; while `Pending` the Arabic side may be absent and readers fall
/// back to the English fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub languages: Option<String>,
    pub salary: Option<String>,
    pub city: Option<String>,
    pub hours: Option<String>,
    pub days: Option<String>,
    pub company_name: Option<String>,
    pub title_ar: Option<String>,
    pub description_ar: Option<String>,
    pub qualification_ar: Option<String>,
    pub experience_ar: Option<String>,
    pub languages_ar: Option<String>,
    pub salary_ar: Option<String>,
    pub city_ar: Option<String>,
    pub hours_ar: Option<String>,
    pub days_ar: Option<String>,
    pub company_name_ar: Option<String>,
    pub translation_status: TranslationStatus,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for JobPosting {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: None,
            description: None,
            qualification: None,
            experience: None,
            languages: None,
            salary: None,
            city: None,
            hours: None,
            days: None,
            company_name: None,
            title_ar: None,
            description_ar: None,
            qualification_ar: None,
            experience_ar: None,
            languages_ar: None,
            salary_ar: None,
            city_ar: None,
            hours_ar: None,
            days_ar: None,
            company_name_ar: None,
            translation_status: TranslationStatus::Pending,
            posted_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Candidate search preferences, owned by the profile service and read-only
/// here. All three fields are free text; positions and skills are
/// comma-separated lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateProfile {
    pub candidate_id: String,
    pub desired_positions: Option<String>,
    pub skills: Option<String>,
    pub preferred_location: Option<String>,
}

/// A persisted (candidate, job) evaluation produced by the ranking workflow.
/// Unique per (candidate_id, job_id); this core only reads these rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRecord {
    pub candidate_id: String,
    pub job_id: i64,
    pub score: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
