use crate::{CandidateProfile, JobPosting};

use super::location::location_similarity;
use super::similarity::{best_term_coverage, mention_ratio};

/// Fixed scoring weights. These are part of the external contract (ranking
/// rows produced elsewhere use the same formula) and must not drift.
pub const TITLE_WEIGHT: f64 = 0.4;
pub const SKILLS_WEIGHT: f64 = 0.4;
pub const LOCATION_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchBreakdown {
    pub title: f64,
    pub skills: f64,
    pub location: f64,
    /// Weighted total in [0, 1], rounded to 3 decimals.
    pub total: f64,
    /// `total * 100` rounded to 2 decimals; the externally reported score.
    pub percent: f64,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score a posting against a candidate profile. Pure and infallible: empty
/// or missing text yields a low sub-score, never an error.
pub fn score_posting(posting: &JobPosting, profile: &CandidateProfile) -> MatchBreakdown {
    let title = best_term_coverage(
        profile.desired_positions.as_deref().unwrap_or(""),
        posting.title.as_deref().unwrap_or(""),
    );
    let skills = mention_ratio(
        profile.skills.as_deref().unwrap_or(""),
        posting.description.as_deref().unwrap_or(""),
    );
    let location = location_similarity(
        posting.city.as_deref().unwrap_or(""),
        profile.preferred_location.as_deref().unwrap_or(""),
    );

    let total = round3(TITLE_WEIGHT * title + SKILLS_WEIGHT * skills + LOCATION_WEIGHT * location);

    MatchBreakdown {
        title,
        skills,
        location,
        total,
        percent: round2(total * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting() -> JobPosting {
        JobPosting {
            title: Some("Senior Software Engineer".into()),
            description: Some("We build web platforms. Python and React required.".into()),
            city: Some("Dubai".into()),
            ..JobPosting::default()
        }
    }

    fn profile() -> CandidateProfile {
        CandidateProfile {
            candidate_id: "cand-1".into(),
            desired_positions: Some("Software Engineer".into()),
            skills: Some("Python, React".into()),
            preferred_location: Some("Dubai".into()),
        }
    }

    #[test]
    fn weights_sum_to_one() {
        assert!((TITLE_WEIGHT + SKILLS_WEIGHT + LOCATION_WEIGHT - 1.0).abs() < 1e-9);
    }

    #[test]
    fn full_match_scores_one_hundred() {
        let breakdown = score_posting(&posting(), &profile());
        assert_eq!(breakdown.title, 1.0);
        assert_eq!(breakdown.skills, 1.0);
        assert_eq!(breakdown.location, 1.0);
        assert_eq!(breakdown.total, 1.0);
        assert_eq!(breakdown.percent, 100.0);
    }

    #[test]
    fn percent_stays_within_bounds() {
        let mut candidate = profile();
        candidate.skills = Some("Rust, Go, Kubernetes".into());
        candidate.preferred_location = Some("Sharjah".into());

        let breakdown = score_posting(&posting(), &candidate);
        assert!(breakdown.percent >= 0.0 && breakdown.percent <= 100.0);
        assert!(breakdown.total >= 0.0 && breakdown.total <= 1.0);
    }

    #[test]
    fn empty_profile_scores_low_without_error() {
        let empty = CandidateProfile {
            candidate_id: "cand-2".into(),
            ..CandidateProfile::default()
        };

        let breakdown = score_posting(&posting(), &empty);
        assert_eq!(breakdown.total, 0.0);
        assert_eq!(breakdown.percent, 0.0);
    }

    #[test]
    fn rounding_follows_the_contract() {
        // title 0.5, skills 1/3, location 0.5 → 0.4*0.5 + 0.4*0.3333 + 0.2*0.5
        // = 0.43333... → total 0.433, percent 43.3.
        let job = JobPosting {
            title: Some("Data Engineer".into()),
            description: Some("SQL pipelines all day.".into()),
            city: Some("Dubai".into()),
            ..JobPosting::default()
        };
        let candidate = CandidateProfile {
            candidate_id: "cand-3".into(),
            desired_positions: Some("Platform Engineer".into()),
            skills: Some("SQL, Python, Spark".into()),
            preferred_location: Some("Sharjah".into()),
        };

        let breakdown = score_posting(&job, &candidate);
        assert_eq!(breakdown.title, 0.5);
        assert!((breakdown.skills - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(breakdown.location, 0.5);
        assert_eq!(breakdown.total, 0.433);
        assert_eq!(breakdown.percent, 43.3);
    }

    #[test]
    fn partial_title_match_uses_best_position() {
        let mut candidate = profile();
        candidate.desired_positions = Some("Accountant, Software Engineer".into());

        let breakdown = score_posting(&posting(), &candidate);
        assert_eq!(breakdown.title, 1.0);
    }
}
