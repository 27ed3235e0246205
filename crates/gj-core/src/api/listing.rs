use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::translation::{Locale, TranslationStatus};
use crate::JobPosting;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 15;
/// Upper bound on a caller-supplied page size.
pub const MAX_LIMIT: i64 = 100;

/// Raw listing query string. Pagination and enum-ish fields arrive as
/// untyped text on purpose: malformed values are corrected to defaults at
/// this boundary instead of bouncing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub locale: Option<String>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub experience: Option<String>,
    pub attendance: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub candidate_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    SalaryDesc,
    SalaryAsc,
}

impl SortKey {
    /// Lenient parse; unknown keys fall back to the default ordering.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("date_asc") => SortKey::DateAsc,
            Some("salary_desc") => SortKey::SalaryDesc,
            Some("salary_asc") => SortKey::SalaryAsc,
            _ => SortKey::DateDesc,
        }
    }
}

pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(DEFAULT_PAGE)
}

pub fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|limit| *limit >= 1)
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalized, validated listing query used by the query builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub locale: Locale,
    pub search: Option<String>,
    pub city: Option<String>,
    pub experience: Option<String>,
    pub attendance: Option<String>,
    pub sort: SortKey,
    pub page: i64,
    pub limit: i64,
    pub candidate_id: Option<String>,
}

impl ListingQuery {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl ListingParams {
    pub fn normalize(self) -> ListingQuery {
        ListingQuery {
            locale: Locale::from_param(self.locale.as_deref()),
            search: non_empty(self.search),
            city: non_empty(self.city),
            experience: non_empty(self.experience),
            attendance: non_empty(self.attendance),
            sort: SortKey::from_param(self.sort.as_deref()),
            page: parse_page(self.page.as_deref()),
            limit: parse_limit(self.limit.as_deref()),
            candidate_id: non_empty(self.candidate_id),
        }
    }
}

/// Pagination metadata returned alongside every listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl PageMeta {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            total,
            page,
            limit,
            pages,
        }
    }
}

/// A posting as delivered to callers: locale-resolved fields plus the
/// translation status and, when a known candidate asked, the live match
/// percentage. `score` stays null for anonymous or unknown candidates.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
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
    pub translation_status: TranslationStatus,
    pub posted_at: DateTime<Utc>,
    pub score: Option<f64>,
}

fn pick(default: &Option<String>, alternate: &Option<String>, use_alternate: bool) -> Option<String> {
    if use_alternate {
        alternate.clone().or_else(|| default.clone())
    } else {
        default.clone()
    }
}

impl JobView {
    /// Project a posting into the requested locale. Arabic fields are only
    /// authoritative once the translation completed; anything else serves
    /// the English side.
    pub fn resolve(posting: &JobPosting, locale: Locale) -> Self {
        let use_alternate =
            locale == Locale::Ar && posting.translation_status == TranslationStatus::Completed;

        Self {
            id: posting.id,
            title: pick(&posting.title, &posting.title_ar, use_alternate),
            description: pick(&posting.description, &posting.description_ar, use_alternate),
            qualification: pick(&posting.qualification, &posting.qualification_ar, use_alternate),
            experience: pick(&posting.experience, &posting.experience_ar, use_alternate),
            languages: pick(&posting.languages, &posting.languages_ar, use_alternate),
            salary: pick(&posting.salary, &posting.salary_ar, use_alternate),
            city: pick(&posting.city, &posting.city_ar, use_alternate),
            hours: pick(&posting.hours, &posting.hours_ar, use_alternate),
            days: pick(&posting.days, &posting.days_ar, use_alternate),
            company_name: pick(&posting.company_name, &posting.company_name_ar, use_alternate),
            translation_status: posting.translation_status,
            posted_at: posting.posted_at,
            score: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingResponse {
    pub items: Vec<JobView>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_cover_missing_zero_and_garbage() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-4")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some(" 3 ")), 3);
    }

    #[test]
    fn limit_defaults_cover_missing_zero_and_garbage() {
        assert_eq!(parse_limit(None), 15);
        assert_eq!(parse_limit(Some("0")), 15);
        assert_eq!(parse_limit(Some("-1")), 15);
        assert_eq!(parse_limit(Some("twenty")), 15);
        assert_eq!(parse_limit(Some("25")), 25);
        assert_eq!(parse_limit(Some("9999")), MAX_LIMIT);
    }

    #[test]
    fn sort_parses_the_four_keys_and_falls_back() {
        assert_eq!(SortKey::from_param(Some("date_desc")), SortKey::DateDesc);
        assert_eq!(SortKey::from_param(Some("date_asc")), SortKey::DateAsc);
        assert_eq!(SortKey::from_param(Some("salary_desc")), SortKey::SalaryDesc);
        assert_eq!(SortKey::from_param(Some("salary_asc")), SortKey::SalaryAsc);
        assert_eq!(SortKey::from_param(Some("views")), SortKey::DateDesc);
        assert_eq!(SortKey::from_param(None), SortKey::DateDesc);
    }

    #[test]
    fn normalize_trims_and_drops_empty_filters() {
        let query = ListingParams {
            locale: Some("ar".into()),
            search: Some("  nurse ".into()),
            city: Some("   ".into()),
            page: Some("2".into()),
            limit: Some("x".into()),
            ..ListingParams::default()
        }
        .normalize();

        assert_eq!(query.locale, Locale::Ar);
        assert_eq!(query.search.as_deref(), Some("nurse"));
        assert_eq!(query.city, None);
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 15);
        assert_eq!(query.offset(), 15);
    }

    #[test]
    fn page_meta_rounds_pages_up() {
        assert_eq!(PageMeta::new(15, 2, 10).pages, 2);
        assert_eq!(PageMeta::new(30, 1, 15).pages, 2);
        assert_eq!(PageMeta::new(31, 1, 15).pages, 3);
        assert_eq!(PageMeta::new(0, 1, 15).pages, 0);
    }

    #[test]
    fn english_view_ignores_arabic_columns() {
        let posting = JobPosting {
            id: 4,
            title: Some("Teacher".into()),
            title_ar: Some("معلم".into()),
            translation_status: TranslationStatus::Completed,
            ..JobPosting::default()
        };

        let view = JobView::resolve(&posting, Locale::En);
        assert_eq!(view.title.as_deref(), Some("Teacher"));
        assert!(view.score.is_none());
    }

    #[test]
    fn arabic_view_requires_completed_status() {
        let mut posting = JobPosting {
            id: 4,
            title: Some("Teacher".into()),
            title_ar: Some("معلم".into()),
            ..JobPosting::default()
        };

        // Pending: Arabic columns are not authoritative yet.
        let view = JobView::resolve(&posting, Locale::Ar);
        assert_eq!(view.title.as_deref(), Some("Teacher"));

        posting.translation_status = TranslationStatus::Completed;
        let view = JobView::resolve(&posting, Locale::Ar);
        assert_eq!(view.title.as_deref(), Some("معلم"));
    }
}
