use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(weight) = config.vote_weight {
        if !weight.is_finite() || weight < 0.0 {
            errors.push("scoring.vote_weight: must be non-negative".to_string());
        }
    }

    if let Some(ref placement) = config.placement {
        if !placement.scale.is_finite() || placement.scale < 0.0 {
            errors.push("scoring.placement.scale: must be non-negative".to_string());
        }
        if !placement.rank_exponent.is_finite() || placement.rank_exponent >= 0.0 {
            errors.push(
                "scoring.placement.rank_exponent: must be negative so a worse rank earns fewer points"
                    .to_string(),
            );
        }
        if !placement.log_base.is_finite() || placement.log_base <= 1.0 {
            errors.push("scoring.placement.log_base: must be greater than 1".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::PlacementFormula;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = ScoringConfig {
            vote_weight: None,
            placement: None,
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_negative_vote_weight() {
        let config = ScoringConfig {
            vote_weight: Some(-80.0),
            placement: None,
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("vote_weight"));
    }

    #[test]
    fn test_positive_rank_exponent_rejected() {
        let config = ScoringConfig {
            vote_weight: None,
            placement: Some(PlacementFormula {
                rank_exponent: 0.75,
                ..PlacementFormula::default()
            }),
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("rank_exponent"));
    }

    #[test]
    fn test_log_base_of_one_rejected() {
        let config = ScoringConfig {
            vote_weight: None,
            placement: Some(PlacementFormula {
                log_base: 1.0,
                ..PlacementFormula::default()
            }),
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("log_base"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            vote_weight: Some(-1.0),
            placement: Some(PlacementFormula {
                scale: -5.0,
                rank_exponent: 2.0,
                log_base: 0.5,
            }),
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
