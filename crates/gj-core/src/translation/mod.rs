pub mod provider;
pub mod service;
pub mod worker;

use serde::{Deserialize, Serialize};

use crate::JobPosting;

pub use provider::{
    provider_from_env, DisabledTranslationProvider, HttpTranslationProvider, TranslationError,
    TranslationProvider,
};
pub use service::{resolve_posting, translate_and_store, translate_page};
pub use worker::{spawn_translation_worker, TranslationTrigger, WorkerConfig};

/// Which language a caller wants posting content in. English is the default
/// (authoring) locale; Arabic is derived by translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    /// Lenient parse used at the query boundary; anything unrecognized is
    /// corrected to the default locale rather than rejected.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("ar") => Locale::Ar,
            _ => Locale::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }
}

/// Translation readiness. The transition is one-way: once a posting is
/// `Completed` it never goes back except through a default-locale edit,
/// which resets the row to `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    #[default]
    Pending,
    Completed,
}

impl TranslationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationStatus::Pending => "pending",
            TranslationStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(TranslationStatus::Pending),
            "completed" => Some(TranslationStatus::Completed),
            _ => None,
        }
    }
}

/// The full Arabic field set produced by one provider call. Fields mirror
/// the posting's default-locale columns one-to-one; empty source text maps
/// to an empty (still non-null) translation, which keeps the
/// `Completed ⇒ all *_ar non-null` invariant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedFields {
    pub title: String,
    pub description: String,
    pub qualification: String,
    pub experience: String,
    pub languages: String,
    pub salary: String,
    pub city: String,
    pub hours: String,
    pub days: String,
    pub company_name: String,
}

/// True when serving this posting under `locale` requires a provider call.
pub fn needs_translation(posting: &JobPosting, locale: Locale) -> bool {
    locale == Locale::Ar && posting.translation_status == TranslationStatus::Pending
}

/// Ids of the postings on a page that still need translating for `locale`.
pub fn pending_ids(postings: &[JobPosting], locale: Locale) -> Vec<i64> {
    postings
        .iter()
        .filter(|posting| needs_translation(posting, locale))
        .map(|posting| posting.id)
        .collect()
}

/// Fold a provider result into the in-memory posting, marking it completed.
pub fn apply_translation(posting: &mut JobPosting, fields: TranslatedFields) {
    posting.title_ar = Some(fields.title);
    posting.description_ar = Some(fields.description);
    posting.qualification_ar = Some(fields.qualification);
    posting.experience_ar = Some(fields.experience);
    posting.languages_ar = Some(fields.languages);
    posting.salary_ar = Some(fields.salary);
    posting.city_ar = Some(fields.city);
    posting.hours_ar = Some(fields.hours);
    posting.days_ar = Some(fields.days);
    posting.company_name_ar = Some(fields.company_name);
    posting.translation_status = TranslationStatus::Completed;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_param_defaults_to_english() {
        assert_eq!(Locale::from_param(None), Locale::En);
        assert_eq!(Locale::from_param(Some("en")), Locale::En);
        assert_eq!(Locale::from_param(Some("AR")), Locale::Ar);
        assert_eq!(Locale::from_param(Some("fr")), Locale::En);
        assert_eq!(Locale::from_param(Some(" ar ")), Locale::Ar);
    }

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(TranslationStatus::parse("pending"), Some(TranslationStatus::Pending));
        assert_eq!(TranslationStatus::parse("completed"), Some(TranslationStatus::Completed));
        assert_eq!(TranslationStatus::parse("done"), None);
        assert_eq!(TranslationStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn only_pending_postings_under_arabic_need_translation() {
        let pending = JobPosting::default();
        let completed = JobPosting {
            translation_status: TranslationStatus::Completed,
            ..JobPosting::default()
        };

        assert!(needs_translation(&pending, Locale::Ar));
        assert!(!needs_translation(&pending, Locale::En));
        assert!(!needs_translation(&completed, Locale::Ar));
    }

    #[test]
    fn pending_ids_skips_completed_rows() {
        let mut first = JobPosting::default();
        first.id = 1;
        let mut second = JobPosting::default();
        second.id = 2;
        second.translation_status = TranslationStatus::Completed;
        let mut third = JobPosting::default();
        third.id = 3;

        let page = vec![first, second, third];
        assert_eq!(pending_ids(&page, Locale::Ar), vec![1, 3]);
        assert!(pending_ids(&page, Locale::En).is_empty());
    }

    #[test]
    fn apply_translation_completes_the_posting() {
        let mut posting = JobPosting {
            title: Some("Accountant".into()),
            ..JobPosting::default()
        };

        apply_translation(
            &mut posting,
            TranslatedFields {
                title: "محاسب".into(),
                ..TranslatedFields::default()
            },
        );

        assert_eq!(posting.translation_status, TranslationStatus::Completed);
        assert_eq!(posting.title_ar.as_deref(), Some("محاسب"));
        assert_eq!(posting.description_ar.as_deref(), Some(""));
    }
}
