use crate::error::{Result, TreeError};

/// Growth and pruning parameters of a [`DecisionTreeClassifier`](super::classifier::DecisionTreeClassifier).
///
/// The defaults grow the tree until no attribute improves the split and prune
/// with a one-standard-error margin.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<u16>,
    pub min_samples_split: u16,
    pub min_gain_ratio: f64,
    pub pruning_confidence: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 1,
            min_gain_ratio: 0.0,
            pruning_confidence: 1.0,
        }
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<()> {
        if max_depth.is_some_and(|depth| depth < 1) {
            return Err(TreeError::InvalidParameter(
                "The maximum depth must be greater than 0.".into(),
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<()> {
        if min_samples_split < 1 {
            return Err(TreeError::InvalidParameter(
                "The minimum number of samples to split must be at least 1.".into(),
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    pub fn set_min_gain_ratio(&mut self, min_gain_ratio: f64) -> Result<()> {
        if !min_gain_ratio.is_finite() || min_gain_ratio < 0.0 {
            return Err(TreeError::InvalidParameter(format!(
                "The minimum gain ratio must be a non-negative number, got {}.",
                min_gain_ratio
            )));
        }
        self.min_gain_ratio = min_gain_ratio;
        Ok(())
    }

    /// Sets the number of standard errors a leaf may exceed the subtree's error by
    /// and still replace it.
    pub fn set_pruning_confidence(&mut self, pruning_confidence: f64) -> Result<()> {
        if !pruning_confidence.is_finite() || pruning_confidence < 0.0 {
            return Err(TreeError::InvalidParameter(format!(
                "The pruning confidence must be a non-negative number, got {}.",
                pruning_confidence
            )));
        }
        self.pruning_confidence = pruning_confidence;
        Ok(())
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> u16 {
        self.min_samples_split
    }

    pub fn min_gain_ratio(&self) -> f64 {
        self.min_gain_ratio
    }

    pub fn pruning_confidence(&self) -> f64 {
        self.pruning_confidence
    }
}
