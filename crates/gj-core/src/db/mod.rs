pub mod migrations;
pub mod pool;
pub mod postings;
pub mod profiles;
pub mod rankings;

// Keep re-exports unique so downstream crates see a single symbol per helper.
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool_from_url, create_pool_from_url_checked, DbPoolError, PgPool};
pub use postings::PostingStoreError;
pub use profiles::{fetch_profile, ProfileStoreError};
pub use rankings::{
    count_applied_distinct, count_rankings, fetch_applied, fetch_matched_page, has_rankings,
    RankingStoreError,
};
