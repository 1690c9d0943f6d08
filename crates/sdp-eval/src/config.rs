// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::plot::{CONFUSION_MATRIX_PLOT_NAME, PlotKey, SCORE_DISTRIBUTION_PLOT_NAME};
use sdp_core::{MIN_NUM_THRESHOLDS, SdpError};

/// Default number of evenly spaced thresholds.
pub const DEFAULT_NUM_THRESHOLDS: usize = 1000;

/// Which view of the derived matrices a plot exposes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlotKind {
    /// Label-agnostic: weight scored above vs. at-or-below each threshold.
    #[default]
    ScoreDistribution,
    /// Label-aware true/false positive/negative counts.
    ConfusionMatrix,
}

impl PlotKind {
    /// Stable plot name used when the config leaves `name` empty.
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::ScoreDistribution => SCORE_DISTRIBUTION_PLOT_NAME,
            Self::ConfusionMatrix => CONFUSION_MATRIX_PLOT_NAME,
        }
    }
}

/// Configuration of a threshold plot computation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreDistributionPlotConfig {
    pub num_thresholds: usize,
    pub kind: PlotKind,
    /// Plot name; empty means the kind's default name.
    pub name: String,
    pub model_name: String,
    pub output_name: String,
}

impl Default for ScoreDistributionPlotConfig {
    fn default() -> Self {
        Self {
            num_thresholds: DEFAULT_NUM_THRESHOLDS,
            kind: PlotKind::default(),
            name: String::new(),
            model_name: String::new(),
            output_name: String::new(),
        }
    }
}

impl ScoreDistributionPlotConfig {
    pub fn with_num_thresholds(num_thresholds: usize) -> Self {
        Self {
            num_thresholds,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SdpError> {
        if self.num_thresholds < MIN_NUM_THRESHOLDS {
            return Err(SdpError::invalid_input(format!(
                "ScoreDistributionPlotConfig.num_thresholds must be >= {MIN_NUM_THRESHOLDS}; got {}",
                self.num_thresholds
            )));
        }
        if !self.name.is_empty() && self.name.trim().is_empty() {
            return Err(SdpError::invalid_input(
                "ScoreDistributionPlotConfig.name must not be blank",
            ));
        }
        Ok(())
    }

    /// Key the produced plot is reported under.
    pub fn plot_key(&self) -> PlotKey {
        let name = if self.name.is_empty() {
            self.kind.default_name().to_string()
        } else {
            self.name.clone()
        };
        PlotKey::new(name)
            .with_model_name(self.model_name.clone())
            .with_output_name(self.output_name.clone())
    }

    /// Parses and validates a JSON config; absent fields take defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(raw: &str) -> Result<Self, SdpError> {
        let config: Self = serde_json::from_str(raw).map_err(|err| {
            SdpError::invalid_input(format!("invalid score distribution plot config JSON: {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_NUM_THRESHOLDS, PlotKind, ScoreDistributionPlotConfig};
    use crate::plot::{CONFUSION_MATRIX_PLOT_NAME, SCORE_DISTRIBUTION_PLOT_NAME};

    #[test]
    fn default_config_is_valid_score_distribution() {
        let config = ScoreDistributionPlotConfig::default();
        config.validate().expect("default config should validate");
        assert_eq!(config.num_thresholds, DEFAULT_NUM_THRESHOLDS);
        assert_eq!(config.kind, PlotKind::ScoreDistribution);
        assert_eq!(config.plot_key().name, SCORE_DISTRIBUTION_PLOT_NAME);
    }

    #[test]
    fn plot_key_uses_kind_default_or_override() {
        let config = ScoreDistributionPlotConfig {
            kind: PlotKind::ConfusionMatrix,
            model_name: "baseline".to_string(),
            ..ScoreDistributionPlotConfig::default()
        };
        let key = config.plot_key();
        assert_eq!(key.name, CONFUSION_MATRIX_PLOT_NAME);
        assert_eq!(key.model_name, "baseline");

        let config = ScoreDistributionPlotConfig {
            name: "custom_scores".to_string(),
            ..ScoreDistributionPlotConfig::default()
        };
        assert_eq!(config.plot_key().name, "custom_scores");
    }

    #[test]
    fn validate_rejects_too_few_thresholds_and_blank_name() {
        let err = ScoreDistributionPlotConfig::with_num_thresholds(1)
            .validate()
            .expect_err("one threshold should be rejected");
        assert!(err.to_string().contains("num_thresholds must be >= 2"));

        let config = ScoreDistributionPlotConfig {
            name: "   ".to_string(),
            ..ScoreDistributionPlotConfig::default()
        };
        let err = config.validate().expect_err("blank name should be rejected");
        assert!(err.to_string().contains("name must not be blank"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn from_json_applies_defaults_and_validates() {
        let config = ScoreDistributionPlotConfig::from_json(r#"{"num_thresholds": 4}"#)
            .expect("partial config should parse");
        assert_eq!(config.num_thresholds, 4);
        assert_eq!(config.kind, PlotKind::ScoreDistribution);

        let config = ScoreDistributionPlotConfig::from_json(r#"{"kind": "confusion_matrix"}"#)
            .expect("kind should parse");
        assert_eq!(config.kind, PlotKind::ConfusionMatrix);
        assert_eq!(config.num_thresholds, DEFAULT_NUM_THRESHOLDS);

        let err = ScoreDistributionPlotConfig::from_json(r#"{"num_thresholds": 0}"#)
            .expect_err("invalid threshold count");
        assert!(err.to_string().contains("num_thresholds"));

        let err = ScoreDistributionPlotConfig::from_json(r#"{"thresholds": 4}"#)
            .expect_err("unknown field");
        assert!(err.to_string().contains("invalid score distribution plot config JSON"));
    }
}
