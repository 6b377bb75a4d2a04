use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Defines how student scores are calculated. Every constant of the formula
/// is configurable so the board can be recalibrated without touching the
/// scoring logic.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   vote_weight: 80
///   placement:
///     scale: 100000
///     rank_exponent: -0.75
///     log_base: 10
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Points awarded per kernel vote (default: 80.0)
    #[serde(default)]
    pub vote_weight: Option<f64>,

    /// Constants of the competition placement formula
    #[serde(default)]
    pub placement: Option<PlacementFormula>,
}

impl ScoringConfig {
    pub fn vote_weight(&self) -> f64 {
        self.vote_weight.unwrap_or(80.0)
    }

    pub fn placement(&self) -> PlacementFormula {
        self.placement.clone().unwrap_or_default()
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            vote_weight: Some(80.0),
            placement: Some(PlacementFormula::default()),
        }
    }
}

/// Placement formula constants.
///
/// A placement contributes `scale * rank^rank_exponent *
/// log(1 + log(field_size))`, with both logs taken in `log_base`. The
/// defaults reproduce Kaggle's published progression scheme; change them
/// only if the class uses a different metric, since scores are otherwise
/// comparable to the official ones.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlacementFormula {
    /// Multiplier applied to every placement (default: 100000.0)
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Exponent applied to the rank; must be negative so a worse rank
    /// earns fewer points (default: -0.75)
    #[serde(default = "default_rank_exponent")]
    pub rank_exponent: f64,

    /// Base of the nested logarithms over the field size (default: 10.0)
    #[serde(default = "default_log_base")]
    pub log_base: f64,
}

fn default_scale() -> f64 {
    100_000.0
}

fn default_rank_exponent() -> f64 {
    -0.75
}

fn default_log_base() -> f64 {
    10.0
}

impl Default for PlacementFormula {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            rank_exponent: default_rank_exponent(),
            log_base: default_log_base(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.vote_weight, Some(80.0));
        let placement = config.placement();
        assert_eq!(placement.scale, 100_000.0);
        assert_eq!(placement.rank_exponent, -0.75);
        assert_eq!(placement.log_base, 10.0);
    }

    #[test]
    fn test_empty_config_falls_back_to_defaults() {
        let yaml = "{}";
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.vote_weight.is_none());
        assert!(config.placement.is_none());
        // Accessors still produce the published constants
        assert_eq!(config.vote_weight(), 80.0);
        assert_eq!(config.placement().scale, 100_000.0);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_placement_parse() {
        let yaml = r#"
vote_weight: 50
placement:
  rank_exponent: -0.5
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.vote_weight, Some(50.0));

        let placement = config.placement();
        assert_eq!(placement.rank_exponent, -0.5);
        // Unspecified fields keep their defaults
        assert_eq!(placement.scale, 100_000.0);
        assert_eq!(placement.log_base, 10.0);
    }

    #[test]
    fn test_full_scoring_config_parse() {
        let yaml = r#"
vote_weight: 100
placement:
  scale: 50000
  rank_exponent: -1.0
  log_base: 2
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.vote_weight(), 100.0);
        let placement = config.placement();
        assert_eq!(placement.scale, 50_000.0);
        assert_eq!(placement.rank_exponent, -1.0);
        assert_eq!(placement.log_base, 2.0);
    }
}
