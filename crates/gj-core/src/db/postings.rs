use deadpool_postgres::PoolError;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Error as PgError, Row};
use tracing::instrument;

use crate::api::listing::{ListingQuery, SortKey};
use crate::api::posting::{PostingDraft, PostingPatch};
use crate::db::PgPool;
use crate::translation::{Locale, TranslatedFields, TranslationStatus};
use crate::JobPosting;

#[derive(Debug, thiserror::Error)]
pub enum PostingStoreError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to map posting row: {0}")]
    Mapping(String),
}

/// Business constant: listings only show postings located in these cities.
/// Compared against `LOWER(city)`.
pub const ALLOWED_CITIES: &[&str] = &[
    "dubai",
    "abu dhabi",
    "sharjah",
    "ajman",
    "al ain",
    "ras al khaimah",
    "fujairah",
    "umm al quwain",
];

/// Business constant: listings only show postings from the last two months.
const LISTING_WINDOW: &str = "posted_at >= NOW() - INTERVAL '2 months'";

/// Leading numeric token of the free-text salary; rows without one sort as
/// lowest (-1 sits below any real salary).
const SALARY_SORT_EXPR: &str =
    r"COALESCE(substring(salary FROM '^\s*([0-9]+(?:\.[0-9]+)?)')::numeric, -1)";

const POSTING_COLUMNS: &str = "id, title, description, qualification, experience, languages, \
     salary, city, hours, days, company_name, \
     title_ar, description_ar, qualification_ar, experience_ar, languages_ar, \
     salary_ar, city_ar, hours_ar, days_ar, company_name_ar, \
     translation_status, posted_at, created_at, updated_at";

type SqlValue = Box<dyn ToSql + Sync + Send>;

fn as_params(values: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    values
        .iter()
        .map(|value| value.as_ref() as &(dyn ToSql + Sync))
        .collect()
}

/// Build the WHERE clause shared by the count and page queries. Conditions
/// are AND-combined; the recency window and the city allow-list always
/// apply.
fn listing_where(query: &ListingQuery) -> (String, Vec<SqlValue>) {
    let mut conditions = vec![LISTING_WINDOW.to_string()];
    let mut values: Vec<SqlValue> = Vec::new();

    let allowed: Vec<String> = ALLOWED_CITIES.iter().map(|city| city.to_string()).collect();
    values.push(Box::new(allowed));
    conditions.push(format!("LOWER(city) = ANY(${})", values.len()));

    if let Some(search) = &query.search {
        values.push(Box::new(format!("%{search}%")));
        let idx = values.len();
        // Search the locale the caller reads; Arabic falls back to English
        // for untranslated rows.
        match query.locale {
            Locale::Ar => conditions.push(format!(
                "(COALESCE(title_ar, title) ILIKE ${idx} \
                 OR COALESCE(description_ar, description) ILIKE ${idx})"
            )),
            Locale::En => {
                conditions.push(format!("(title ILIKE ${idx} OR description ILIKE ${idx})"))
            }
        }
    }

    if let Some(city) = &query.city {
        values.push(Box::new(city.clone()));
        conditions.push(format!("LOWER(city) = LOWER(${})", values.len()));
    }

    if let Some(experience) = &query.experience {
        values.push(Box::new(experience.clone()));
        conditions.push(format!("experience = ${}", values.len()));
    }

    if let Some(attendance) = &query.attendance {
        values.push(Box::new(format!("%{attendance}%")));
        conditions.push(format!("description ILIKE ${}", values.len()));
    }

    if let Some(candidate_id) = &query.candidate_id {
        values.push(Box::new(candidate_id.clone()));
        conditions.push(format!(
            "NOT EXISTS (SELECT 1 FROM rankings r \
             WHERE r.job_id = postings.id AND r.candidate_id = ${})",
            values.len()
        ));
    }

    (conditions.join(" AND "), values)
}

fn order_clause(sort: SortKey) -> String {
    match sort {
        SortKey::DateDesc => "posted_at DESC, id DESC".to_string(),
        SortKey::DateAsc => "posted_at ASC, id ASC".to_string(),
        SortKey::SalaryDesc => format!("{SALARY_SORT_EXPR} DESC, id ASC"),
        SortKey::SalaryAsc => format!("{SALARY_SORT_EXPR} ASC, id ASC"),
    }
}

fn posting_from_row(row: &Row) -> Result<JobPosting, PostingStoreError> {
    let status_raw: String = row.get("translation_status");
    let translation_status = TranslationStatus::parse(&status_raw).ok_or_else(|| {
        PostingStoreError::Mapping(format!("unknown translation_status: {status_raw}"))
    })?;

    Ok(JobPosting {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        qualification: row.get("qualification"),
        experience: row.get("experience"),
        languages: row.get("languages"),
        salary: row.get("salary"),
        city: row.get("city"),
        hours: row.get("hours"),
        days: row.get("days"),
        company_name: row.get("company_name"),
        title_ar: row.get("title_ar"),
        description_ar: row.get("description_ar"),
        qualification_ar: row.get("qualification_ar"),
        experience_ar: row.get("experience_ar"),
        languages_ar: row.get("languages_ar"),
        salary_ar: row.get("salary_ar"),
        city_ar: row.get("city_ar"),
        hours_ar: row.get("hours_ar"),
        days_ar: row.get("days_ar"),
        company_name_ar: row.get("company_name_ar"),
        translation_status,
        posted_at: row.get("posted_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Size of the filtered set, before pagination.
#[instrument(skip(pool, query))]
pub async fn count_listing(pool: &PgPool, query: &ListingQuery) -> Result<i64, PostingStoreError> {
    let client = pool.get().await?;
    let (where_clause, values) = listing_where(query);

    let sql = format!("SELECT COUNT(*) FROM postings WHERE {where_clause}");
    let row = client.query_one(&sql, &as_params(&values)).await?;
    Ok(row.get(0))
}

/// One page of the filtered, sorted listing.
#[instrument(skip(pool, query))]
pub async fn fetch_listing_page(
    pool: &PgPool,
    query: &ListingQuery,
) -> Result<Vec<JobPosting>, PostingStoreError> {
    let client = pool.get().await?;
    let (where_clause, mut values) = listing_where(query);

    values.push(Box::new(query.limit));
    let limit_idx = values.len();
    values.push(Box::new(query.offset()));
    let offset_idx = values.len();

    let sql = format!(
        "SELECT {POSTING_COLUMNS} FROM postings \
         WHERE {where_clause} \
         ORDER BY {} \
         LIMIT ${limit_idx} OFFSET ${offset_idx}",
        order_clause(query.sort)
    );

    let rows = client.query(&sql, &as_params(&values)).await?;
    rows.iter().map(posting_from_row).collect()
}

#[instrument(skip(pool))]
pub async fn fetch_posting(
    pool: &PgPool,
    id: i64,
) -> Result<Option<JobPosting>, PostingStoreError> {
    let client = pool.get().await?;

    let sql = format!("SELECT {POSTING_COLUMNS} FROM postings WHERE id = $1");
    let row = client.query_opt(&sql, &[&id]).await?;
    row.as_ref().map(posting_from_row).transpose()
}

/// Insert a new default-locale posting; the row starts `pending` and the
/// caller fires the background translation trigger.
#[instrument(skip(pool, draft))]
pub async fn insert_posting(pool: &PgPool, draft: &PostingDraft) -> Result<i64, PostingStoreError> {
    let client = pool.get().await?;

    let stmt = client
        .prepare(
            "INSERT INTO postings (
                title, description, city, qualification, experience,
                languages, salary, hours, days, company_name, posted_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, NOW())
            ) RETURNING id",
        )
        .await?;

    let row = client
        .query_one(
            &stmt,
            &[
                &draft.title,
                &draft.description,
                &draft.city,
                &draft.qualification,
                &draft.experience,
                &draft.languages,
                &draft.salary,
                &draft.hours,
                &draft.days,
                &draft.company_name,
                &draft.posted_at,
            ],
        )
        .await?;

    Ok(row.get(0))
}

/// Apply a partial default-locale edit. Any successful edit resets
/// `translation_status` to `pending` so stale Arabic text is never served
/// as authoritative. Returns false when the posting does not exist.
#[instrument(skip(pool, patch))]
pub async fn update_posting(
    pool: &PgPool,
    id: i64,
    patch: &PostingPatch,
) -> Result<bool, PostingStoreError> {
    let client = pool.get().await?;

    let mut assignments: Vec<String> = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();

    let mut push_field = |column: &str, value: &Option<String>| {
        if let Some(value) = value {
            values.push(Box::new(value.clone()));
            assignments.push(format!("{column} = ${}", values.len()));
        }
    };

    push_field("title", &patch.title);
    push_field("description", &patch.description);
    push_field("qualification", &patch.qualification);
    push_field("experience", &patch.experience);
    push_field("languages", &patch.languages);
    push_field("salary", &patch.salary);
    push_field("city", &patch.city);
    push_field("hours", &patch.hours);
    push_field("days", &patch.days);
    push_field("company_name", &patch.company_name);

    if let Some(posted_at) = patch.posted_at {
        values.push(Box::new(posted_at));
        assignments.push(format!("posted_at = ${}", values.len()));
    }

    assignments.push("translation_status = 'pending'".to_string());
    assignments.push("updated_at = NOW()".to_string());

    values.push(Box::new(id));
    let sql = format!(
        "UPDATE postings SET {} WHERE id = ${}",
        assignments.join(", "),
        values.len()
    );

    let updated = client.execute(&sql, &as_params(&values)).await?;
    Ok(updated > 0)
}

/// Persist a completed translation. Last write wins when two translators
/// race on the same posting; both carry equivalent data.
#[instrument(skip(pool, fields))]
pub async fn store_translation(
    pool: &PgPool,
    id: i64,
    fields: &TranslatedFields,
) -> Result<(), PostingStoreError> {
    let client = pool.get().await?;

    let stmt = client
        .prepare(
            "UPDATE postings SET
                title_ar = $2,
                description_ar = $3,
                qualification_ar = $4,
                experience_ar = $5,
                languages_ar = $6,
                salary_ar = $7,
                city_ar = $8,
                hours_ar = $9,
                days_ar = $10,
                company_name_ar = $11,
                translation_status = 'completed',
                updated_at = NOW()
             WHERE id = $1",
        )
        .await?;

    client
        .execute(
            &stmt,
            &[
                &id,
                &fields.title,
                &fields.description,
                &fields.qualification,
                &fields.experience,
                &fields.languages,
                &fields.salary,
                &fields.city,
                &fields.hours,
                &fields.days,
                &fields.company_name,
            ],
        )
        .await?;

    Ok(())
}
