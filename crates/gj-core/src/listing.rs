use std::time::Duration;

use tracing::instrument;

use crate::api::listing::{JobView, ListingQuery, ListingResponse, PageMeta};
use crate::db::{self, PgPool};
use crate::matching::score_posting;
use crate::translation::{self, Locale, TranslationProvider};
use crate::{CandidateProfile, JobPosting};

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error(transparent)]
    Postings(#[from] db::PostingStoreError),
    #[error(transparent)]
    Profiles(#[from] db::ProfileStoreError),
}

fn assemble_items(
    page: &[JobPosting],
    profile: Option<&CandidateProfile>,
    locale: Locale,
) -> Vec<JobView> {
    page.iter()
        .map(|posting| {
            let mut view = JobView::resolve(posting, locale);
            if let Some(profile) = profile {
                view.score = Some(score_posting(posting, profile).percent);
            }
            view
        })
        .collect()
}

/// Serve one page of the job listing: filter and count the corpus, translate
/// the returned page when Arabic was requested, then resolve locale fields
/// and attach live match scores for a known candidate.
///
/// A failing corpus store fails the call; translation failures never do.
#[instrument(skip(pool, provider, query), fields(page = query.page, limit = query.limit))]
pub async fn list_postings(
    pool: &PgPool,
    provider: &dyn TranslationProvider,
    query: &ListingQuery,
    translation_timeout: Duration,
) -> Result<ListingResponse, ListingError> {
    let total = db::postings::count_listing(pool, query).await?;
    let mut page = db::postings::fetch_listing_page(pool, query).await?;

    // Translation cost is bounded to the page actually returned. The page
    // is re-read only when a translation landed, so rows stay consistent.
    if translation::translate_page(pool, provider, &page, query.locale, translation_timeout).await {
        page = db::postings::fetch_listing_page(pool, query).await?;
    }

    let profile = match &query.candidate_id {
        Some(candidate_id) => db::fetch_profile(pool, candidate_id).await?,
        None => None,
    };

    Ok(ListingResponse {
        items: assemble_items(&page, profile.as_ref(), query.locale),
        meta: PageMeta::new(total, query.page, query.limit),
    })
}

/// Locale-resolved single-posting read; `None` when the id is unknown.
#[instrument(skip(pool, provider))]
pub async fn get_posting(
    pool: &PgPool,
    provider: &dyn TranslationProvider,
    id: i64,
    locale: Locale,
    translation_timeout: Duration,
) -> Result<Option<JobView>, ListingError> {
    let Some(posting) = db::postings::fetch_posting(pool, id).await? else {
        return Ok(None);
    };

    let resolved =
        translation::resolve_posting(pool, provider, posting, locale, translation_timeout).await;
    Ok(Some(JobView::resolve(&resolved, locale)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Vec<JobPosting> {
        vec![
            JobPosting {
                id: 1,
                title: Some("Software Engineer".into()),
                description: Some("Python and React work.".into()),
                city: Some("Dubai".into()),
                ..JobPosting::default()
            },
            JobPosting {
                id: 2,
                title: Some("Accountant".into()),
                description: Some("Ledger upkeep.".into()),
                city: Some("Sharjah".into()),
                ..JobPosting::default()
            },
        ]
    }

    #[test]
    fn anonymous_listings_carry_no_score() {
        let items = assemble_items(&page(), None, Locale::En);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.score.is_none()));
    }

    #[test]
    fn known_candidates_get_percentage_scores() {
        let profile = CandidateProfile {
            candidate_id: "cand-1".into(),
            desired_positions: Some("Software Engineer".into()),
            skills: Some("Python, React".into()),
            preferred_location: Some("Dubai".into()),
        };

        let items = assemble_items(&page(), Some(&profile), Locale::En);
        assert_eq!(items[0].score, Some(100.0));
        let second = items[1].score.expect("every item is scored");
        assert!(second < 100.0);
    }
}
