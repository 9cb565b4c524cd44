use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::MealType;
use crate::error::{RecommenderError, Result};
use crate::search::feature_scaler::StandardScaler;

pub const SCALER_FILE: &str = "food_scaler.json";
pub const ENCODER_FILE: &str = "food_encoder.json";
pub const CLUSTERS_FILE: &str = "food_clusters.json";

pub fn predictor_file(meal: MealType) -> String {
    format!("{}_predictor.json", meal.as_str())
}

/// Pretrained artifacts required at startup. Only the scaler feeds a
/// recommendation path; the encoder, clustering model and per-meal
/// predictors are held as opaque documents.
#[derive(Debug, Clone)]
pub struct ModelStore {
    pub scaler: StandardScaler,
    pub encoder: serde_json::Value,
    pub clusters: serde_json::Value,
    pub meal_predictors: BTreeMap<MealType, serde_json::Value>,
}

fn read_artifact(path: &Path) -> Result<serde_json::Value> {
    if !path.exists() {
        return Err(RecommenderError::unavailable(path, "model artifact not found"));
    }
    let contents =
        std::fs::read_to_string(path).map_err(|e| RecommenderError::unavailable(path, e))?;
    serde_json::from_str(&contents).map_err(|e| RecommenderError::InvalidArtifact {
        name: path.display().to_string(),
        reason: e.to_string(),
    })
}

impl ModelStore {
    pub fn load(models_dir: &Path) -> Result<Self> {
        info!(?models_dir, "Loading model artifacts");

        let scaler_path = models_dir.join(SCALER_FILE);
        let scaler: StandardScaler = serde_json::from_value(read_artifact(&scaler_path)?)
            .map_err(|e| RecommenderError::InvalidArtifact {
                name: SCALER_FILE.to_string(),
                reason: e.to_string(),
            })?;
        scaler.validate()?;
        debug!(features = scaler.feature_names_in.len(), "Scaler loaded");

        let encoder = read_artifact(&models_dir.join(ENCODER_FILE))?;
        let clusters = read_artifact(&models_dir.join(CLUSTERS_FILE))?;

        let mut meal_predictors = BTreeMap::new();
        for meal in MealType::ALL {
            let path: PathBuf = models_dir.join(predictor_file(meal));
            meal_predictors.insert(meal, read_artifact(&path)?);
        }

        info!(predictors = meal_predictors.len(), "Model artifacts loaded");
        Ok(Self {
            scaler,
            encoder,
            clusters,
            meal_predictors,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::write_artifacts;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_complete_artifact_set() -> std::io::Result<()> {
        let dir = tempdir()?;
        write_artifacts(dir.path(), &["calories", "protein_g"])?;

        let store = ModelStore::load(dir.path()).unwrap();
        assert_eq!(store.scaler.feature_names_in, vec!["calories", "protein_g"]);
        assert_eq!(store.meal_predictors.len(), 4);
        assert_eq!(store.clusters["n_clusters"], 4);
        Ok(())
    }

    #[test]
    fn test_missing_predictor_is_fatal() -> std::io::Result<()> {
        let dir = tempdir()?;
        write_artifacts(dir.path(), &["calories"])?;
        std::fs::remove_file(dir.path().join("dinner_predictor.json"))?;

        let err = ModelStore::load(dir.path()).unwrap_err();
        match err {
            RecommenderError::DataUnavailable { path, .. } => {
                assert!(path.ends_with("dinner_predictor.json"))
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn test_inconsistent_scaler_rejected() -> std::io::Result<()> {
        let dir = tempdir()?;
        write_artifacts(dir.path(), &["calories"])?;
        std::fs::write(
            dir.path().join(SCALER_FILE),
            r#"{"feature_names_in": ["calories", "fat_g"], "mean": [0.0], "scale": [1.0]}"#,
        )?;

        let err = ModelStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, RecommenderError::InvalidArtifact { .. }));
        Ok(())
    }
}
