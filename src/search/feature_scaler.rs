use serde::{Deserialize, Serialize};

use crate::error::{RecommenderError, Result};

/// Projection of raw catalog features into the space the similarity index
/// compares in. Supplied by the pretrained model store.
pub trait FeatureScaler: Send + Sync {
    /// Ordered column names the scaler was fitted on.
    fn feature_names(&self) -> &[String];

    /// Scales one raw row, ordered as `feature_names()`.
    fn transform(&self, row: &[f64]) -> Vec<f64>;
}

/// Standardizing scaler: `(x - mean) / scale` per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names_in: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(feature_names_in: Vec<String>, mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self {
            feature_names_in,
            mean,
            scale,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn validate(&self) -> Result<()> {
        let n = self.feature_names_in.len();
        if self.mean.len() != n || self.scale.len() != n {
            return Err(RecommenderError::InvalidArtifact {
                name: "food_scaler".to_string(),
                reason: format!(
                    "Feature count mismatch: {} names, {} means, {} scales",
                    n,
                    self.mean.len(),
                    self.scale.len()
                ),
            });
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn feature_names(&self) -> &[String] {
        &self.feature_names_in
    }

    fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| {
                // zero-variance features are left unscaled
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect()
    }
}
