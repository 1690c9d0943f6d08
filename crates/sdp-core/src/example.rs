// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::SdpError;

/// Binary ground truth of a single example; encoded as `0.0` / `1.0`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "f64", try_from = "f64"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    /// Parses a label that must be exactly `0.0` or `1.0`.
    pub fn from_f64(value: f64) -> Result<Self, SdpError> {
        if !value.is_finite() {
            return Err(SdpError::invalid_input(format!(
                "LabeledPrediction.label must be finite and in {{0,1}}; got {value}"
            )));
        }
        if value == 0.0 {
            return Ok(Self::Negative);
        }
        if value == 1.0 {
            return Ok(Self::Positive);
        }
        Err(SdpError::invalid_input(format!(
            "LabeledPrediction.label must be in {{0,1}}; got {value}"
        )))
    }

    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Negative => 0.0,
            Self::Positive => 1.0,
        }
    }
}

impl From<Label> for f64 {
    fn from(label: Label) -> Self {
        label.as_f64()
    }
}

impl TryFrom<f64> for Label {
    type Error = SdpError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

/// One `(label, prediction, weight)` triple handed over by example ingestion.
///
/// Construction validates the data contract, so a value of this type is
/// always safe to feed into an accumulator.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabeledPrediction {
    label: Label,
    prediction: f64,
    weight: f64,
}

impl LabeledPrediction {
    /// Validates and builds an example.
    ///
    /// Fails when `label` is outside `{0, 1}`, `prediction` is not finite, or
    /// `weight` is negative or not finite.
    pub fn new(label: f64, prediction: f64, weight: f64) -> Result<Self, SdpError> {
        let label = Label::from_f64(label)?;
        if !prediction.is_finite() {
            return Err(SdpError::invalid_input(format!(
                "LabeledPrediction.prediction must be finite; got {prediction}"
            )));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(SdpError::invalid_input(format!(
                "LabeledPrediction.weight must be finite and >= 0; got {weight}"
            )));
        }
        Ok(Self {
            label,
            prediction,
            weight,
        })
    }

    /// Builds an example with the default weight of one.
    pub fn unweighted(label: f64, prediction: f64) -> Result<Self, SdpError> {
        Self::new(label, prediction, 1.0)
    }

    pub const fn label(&self) -> Label {
        self.label
    }

    pub const fn prediction(&self) -> f64 {
        self.prediction
    }

    pub const fn weight(&self) -> f64 {
        self.weight
    }

    pub const fn is_positive(&self) -> bool {
        matches!(self.label, Label::Positive)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for LabeledPrediction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            label: f64,
            prediction: f64,
            #[serde(default = "default_weight")]
            weight: f64,
        }

        fn default_weight() -> f64 {
            1.0
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.label, raw.prediction, raw.weight)
            .map_err(serde::de::Error::custom)
    }
}
