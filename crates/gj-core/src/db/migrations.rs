use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;
use tracing::{info, instrument};

use crate::db::PgPool;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to run migration: {0}")]
    Postgres(#[from] PgError),
}

struct Migration {
    id: i32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: 1,
        description: "postings with parallel en/ar columns",
        sql: r#"
CREATE TABLE IF NOT EXISTS postings (
    id BIGSERIAL PRIMARY KEY,
    title TEXT,
    description TEXT,
    qualification TEXT,
    experience TEXT,
    languages TEXT,
    salary TEXT,
    city TEXT,
    hours TEXT,
    days TEXT,
    company_name TEXT,
    title_ar TEXT,
    description_ar TEXT,
    qualification_ar TEXT,
    experience_ar TEXT,
    languages_ar TEXT,
    salary_ar TEXT,
    city_ar TEXT,
    hours_ar TEXT,
    days_ar TEXT,
    company_name_ar TEXT,
    translation_status TEXT NOT NULL DEFAULT 'pending'
        CHECK (translation_status IN ('pending', 'completed')),
    posted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_postings_posted_at
    ON postings(posted_at DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_postings_city
    ON postings(LOWER(city));
CREATE INDEX IF NOT EXISTS idx_postings_translation_status
    ON postings(translation_status)
    WHERE translation_status = 'pending';
"#,
    },
    Migration {
        id: 2,
        description: "candidate profiles (read-only mirror)",
        sql: r#"
CREATE TABLE IF NOT EXISTS candidate_profiles (
    candidate_id TEXT PRIMARY KEY,
    desired_positions TEXT,
    skills TEXT,
    preferred_location TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#,
    },
    Migration {
        id: 3,
        description: "rankings keyed by (candidate, job)",
        sql: r#"
CREATE TABLE IF NOT EXISTS rankings (
    id BIGSERIAL PRIMARY KEY,
    candidate_id TEXT NOT NULL,
    job_id BIGINT NOT NULL REFERENCES postings(id),
    score DOUBLE PRECISION NOT NULL
        CHECK (score >= 0.0 AND score <= 100.0),
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (candidate_id, job_id)
);

CREATE INDEX IF NOT EXISTS idx_rankings_candidate_score
    ON rankings(candidate_id, score DESC, job_id);
CREATE INDEX IF NOT EXISTS idx_rankings_candidate_status
    ON rankings(candidate_id, status);
"#,
    },
];

#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    let mut client = pool.get().await?;
    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
             );",
        )
        .await?;

    for migration in MIGRATIONS {
        let already_applied: bool = client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM schema_migrations WHERE id = $1)",
                &[&migration.id],
            )
            .await?
            .get(0);

        if already_applied {
            continue;
        }

        let tx = client.transaction().await?;
        tx.batch_execute(migration.sql).await?;
        tx.execute(
            "INSERT INTO schema_migrations (id, description) VALUES ($1, $2)",
            &[&migration.id, &migration.description],
        )
        .await?;
        tx.commit().await?;

        info!(
            id = migration.id,
            description = migration.description,
            "applied migration"
        );
    }

    Ok(())
}
