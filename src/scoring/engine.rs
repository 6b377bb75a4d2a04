use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::config::{PlacementFormula, ScoringConfig};
use crate::kaggle::types::Placement;

/// Outcome of scoring one batch of placements.
#[derive(Debug, Clone, Default)]
pub struct PlacementTally {
    pub points: f64,
    pub counted: usize, // eligible, well-formed records that scored
    pub skipped: usize, // malformed records dropped instead of scored
}

/// Sum the per-vote weight over every kernel vote count.
///
/// Empty input scores 0. Counts from different kernels are not
/// distinguished; only their values matter.
pub fn score_kernel_votes(counts: &[u64], config: &ScoringConfig) -> f64 {
    let weight = config.vote_weight();
    counts.iter().map(|&votes| weight * votes as f64).sum()
}

/// Score a single placement with the progression formula:
/// `scale * rank^exponent * log(1 + log(field_size))`.
///
/// A field of one team scores exactly 0 (the inner log vanishes).
/// Callers must only pass `rank >= 1`; the rank power is unbounded at 0.
pub fn score_placement(rank: u64, field_size: u64, formula: &PlacementFormula) -> f64 {
    let rank_factor = (rank as f64).powf(formula.rank_exponent);
    let field_factor = (1.0 + (field_size as f64).log(formula.log_base)).log(formula.log_base);
    formula.scale * rank_factor * field_factor
}

/// Score every eligible placement in `records` and sum the results.
///
/// A record contributes only when its competition name is in `eligible`,
/// matched byte-for-byte (competition titles carry typographic apostrophes
/// and accents; no normalization is attempted). Records outside the set are
/// exclusions, not errors. Malformed records (zero rank or field size) are
/// dropped and counted in `skipped` so they can never turn the total into
/// NaN. When `since` is set, placements known to have ended before it are
/// excluded; placements with no known end date are kept.
pub fn score_placements(
    records: &[Placement],
    eligible: &HashSet<String>,
    since: Option<DateTime<Utc>>,
    formula: &PlacementFormula,
) -> PlacementTally {
    let mut tally = PlacementTally::default();

    for record in records {
        if !eligible.contains(&record.competition) {
            continue;
        }
        if let (Some(cutoff), Some(ended)) = (since, record.ended_at) {
            if ended < cutoff {
                continue;
            }
        }
        if !record.is_well_formed() {
            tally.skipped += 1;
            continue;
        }
        tally.points += score_placement(record.rank, record.field_size, formula);
        tally.counted += 1;
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn eligible(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vote_score_is_weight_times_sum() {
        let config = ScoringConfig::default();
        assert_eq!(score_kernel_votes(&[2, 5, 0], &config), 560.0);
    }

    #[test]
    fn test_vote_score_empty_is_zero() {
        let config = ScoringConfig::default();
        assert_eq!(score_kernel_votes(&[], &config), 0.0);
    }

    #[test]
    fn test_vote_score_custom_weight() {
        let config = ScoringConfig {
            vote_weight: Some(10.0),
            placement: None,
        };
        assert_eq!(score_kernel_votes(&[3], &config), 30.0);
    }

    #[test]
    fn test_placement_first_of_hundred() {
        // 100000 * 1 * log10(1 + log10(100)) = 100000 * log10(3)
        let formula = PlacementFormula::default();
        let expected = 100_000.0 * 3.0_f64.log10();
        assert!((score_placement(1, 100, &formula) - expected).abs() < 1e-6);
        assert!((score_placement(1, 100, &formula) - 47_712.125).abs() < 0.001);
    }

    #[test]
    fn test_placement_field_of_one_scores_zero() {
        let formula = PlacementFormula::default();
        for rank in [1, 2, 17, 1000] {
            assert_eq!(score_placement(rank, 1, &formula), 0.0);
        }
    }

    #[test]
    fn test_placement_decreasing_in_rank() {
        let formula = PlacementFormula::default();
        let mut previous = f64::INFINITY;
        for rank in 1..=50 {
            let score = score_placement(rank, 200, &formula);
            assert!(score >= 0.0);
            assert!(score < previous, "rank {} did not score below rank {}", rank, rank - 1);
            previous = score;
        }
    }

    #[test]
    fn test_placement_non_decreasing_in_field_size() {
        let formula = PlacementFormula::default();
        let mut previous = -1.0;
        for field_size in [1, 2, 10, 100, 1000, 10_000] {
            let score = score_placement(3, field_size, &formula);
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_ineligible_competition_contributes_nothing() {
        let formula = PlacementFormula::default();
        let only_a = score_placements(
            &[Placement::new(1, 10, "A")],
            &eligible(&["A"]),
            None,
            &formula,
        );
        let with_b = score_placements(
            &[Placement::new(1, 10, "A"), Placement::new(1, 10, "B")],
            &eligible(&["A"]),
            None,
            &formula,
        );
        assert_eq!(only_a.points, with_b.points);
        assert_eq!(with_b.counted, 1);
        assert_eq!(with_b.skipped, 0);
    }

    #[test]
    fn test_eligibility_is_exact_match() {
        // Typographic vs ASCII apostrophe must not cross-match
        let formula = PlacementFormula::default();
        let tally = score_placements(
            &[Placement::new(1, 10, "Porto Seguro's Safe Driver Prediction")],
            &eligible(&["Porto Seguro\u{2019}s Safe Driver Prediction"]),
            None,
            &formula,
        );
        assert_eq!(tally.points, 0.0);
        assert_eq!(tally.counted, 0);
    }

    #[test]
    fn test_malformed_records_are_skipped_not_nan() {
        let formula = PlacementFormula::default();
        let tally = score_placements(
            &[
                Placement::new(0, 10, "A"),  // rank 0: formula undefined
                Placement::new(2, 0, "A"),   // empty field
                Placement::new(2, 50, "A"),
            ],
            &eligible(&["A"]),
            None,
            &formula,
        );
        assert!(tally.points.is_finite());
        assert_eq!(tally.counted, 1);
        assert_eq!(tally.skipped, 2);
        let expected = score_placement(2, 50, &formula);
        assert!((tally.points - expected).abs() < 1e-9);
    }

    #[test]
    fn test_since_cutoff_excludes_old_placements() {
        let formula = PlacementFormula::default();
        let cutoff = Utc.with_ymd_and_hms(2017, 9, 1, 0, 0, 0).unwrap();

        let mut old = Placement::new(1, 100, "A");
        old.ended_at = Some(Utc.with_ymd_and_hms(2017, 3, 1, 0, 0, 0).unwrap());
        let mut recent = Placement::new(1, 100, "A");
        recent.ended_at = Some(Utc.with_ymd_and_hms(2017, 12, 1, 0, 0, 0).unwrap());
        let undated = Placement::new(1, 100, "A");

        let tally = score_placements(
            &[old, recent, undated],
            &eligible(&["A"]),
            Some(cutoff),
            &formula,
        );
        // The dated-old record is excluded; the undated one is kept
        assert_eq!(tally.counted, 2);
    }

    #[test]
    fn test_empty_records_score_zero() {
        let formula = PlacementFormula::default();
        let tally = score_placements(&[], &eligible(&["A"]), None, &formula);
        assert_eq!(tally.points, 0.0);
        assert_eq!(tally.counted, 0);
        assert_eq!(tally.skipped, 0);
    }
}
