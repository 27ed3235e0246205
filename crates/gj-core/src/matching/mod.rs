pub mod location;
pub mod scoring;
pub mod similarity;

pub use scoring::{score_posting, MatchBreakdown};
