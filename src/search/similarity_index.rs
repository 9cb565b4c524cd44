//! Pairwise nutrient similarity over the food catalog.
#![forbid(unsafe_code)]

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::catalog::FoodCatalog;
use crate::error::{RecommenderError, Result};
use crate::search::feature_scaler::FeatureScaler;

type Float = f64;

/// Square, symmetric cosine-similarity matrix stored row-major.
/// Row and column `i` correspond to catalog position `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<Float>,
}

impl SimilarityMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> Float {
        self.values[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[Float] {
        let start = i * self.size;
        &self.values[start..start + self.size]
    }
}

/// A food ranked by similarity to a queried item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarFood {
    pub food_id: String,
    pub food_name: String,
    pub similarity: Float,
    pub calories: f64,
    pub protein_g: f64,
    pub diet_type: String,
}

#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    matrix: SimilarityMatrix,
}

impl SimilarityIndex {
    /// Projects every item onto the scaler's features, scales them and
    /// computes all pairwise cosine similarities.
    pub fn build(catalog: &FoodCatalog, scaler: &dyn FeatureScaler) -> Self {
        let names = scaler.feature_names();
        let missing: Vec<&String> = names
            .iter()
            .filter(|name| catalog.iter().all(|item| item.feature_value(name).is_none()))
            .collect();
        if !missing.is_empty() {
            debug!(?missing, "Features absent from catalog are treated as zero");
        }

        let vectors: Vec<Vec<Float>> = catalog
            .iter()
            .map(|item| {
                let raw: Vec<f64> = names
                    .iter()
                    .map(|name| item.feature_value(name).unwrap_or(0.0))
                    .collect();
                normalize(&scaler.transform(&raw))
            })
            .collect();

        let size = vectors.len();
        let values: Vec<Float> = vectors
            .par_iter()
            .flat_map_iter(|row| vectors.iter().map(move |other| simple_dot_product(row, other)))
            .collect();

        info!(items = size, features = names.len(), "Similarity matrix built");
        Self {
            matrix: SimilarityMatrix { size, values },
        }
    }

    /// Wraps a precomputed matrix after checking it fits the catalog.
    pub fn from_matrix(catalog: &FoodCatalog, matrix: SimilarityMatrix) -> Result<Self> {
        let expected_len = matrix.size * matrix.size;
        if matrix.size != catalog.len() || matrix.values.len() != expected_len {
            return Err(RecommenderError::SimilarityCache(format!(
                "Matrix size mismatch: catalog has {} items, matrix is {} with {} values",
                catalog.len(),
                matrix.size,
                matrix.values.len()
            )));
        }
        Ok(Self { matrix })
    }

    pub fn load(cache_path: &Path, catalog: &FoodCatalog) -> Result<Self> {
        let bytes = std::fs::read(cache_path)?;
        let matrix: SimilarityMatrix = bincode::deserialize(&bytes)
            .map_err(|e| RecommenderError::SimilarityCache(e.to_string()))?;
        Self::from_matrix(catalog, matrix)
    }

    pub fn save(&self, cache_path: &Path) -> Result<()> {
        let bytes = bincode::serialize(&self.matrix)
            .map_err(|e| RecommenderError::SimilarityCache(e.to_string()))?;
        std::fs::write(cache_path, bytes)?;
        Ok(())
    }

    /// Uses the cached matrix when it matches the catalog, otherwise builds
    /// and caches a fresh one.
    pub fn load_or_build(
        catalog: &FoodCatalog,
        scaler: &dyn FeatureScaler,
        cache_path: &Path,
    ) -> Result<Self> {
        if cache_path.exists() {
            match Self::load(cache_path, catalog) {
                Ok(index) => {
                    info!(?cache_path, "Loaded cached similarity matrix");
                    return Ok(index);
                }
                Err(e) => warn!(?cache_path, error = %e, "Ignoring stale similarity cache"),
            }
        }
        Self::rebuild(catalog, scaler, cache_path)
    }

    pub fn rebuild(
        catalog: &FoodCatalog,
        scaler: &dyn FeatureScaler,
        cache_path: &Path,
    ) -> Result<Self> {
        let index = Self::build(catalog, scaler);
        index.save(cache_path)?;
        info!(?cache_path, "Similarity matrix cached");
        Ok(index)
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    /// Up to `top_n` foods most similar to `food_id`, best first, excluding
    /// the item itself. Equal scores keep catalog order. Unknown ids yield
    /// an empty list.
    pub fn query(&self, catalog: &FoodCatalog, food_id: &str, top_n: usize) -> Vec<SimilarFood> {
        let Some(idx) = catalog.position_of(food_id) else {
            return Vec::new();
        };
        if idx >= self.matrix.size {
            return Vec::new();
        }

        let mut scored: Vec<(usize, Float)> = self
            .matrix
            .row(idx)
            .iter()
            .copied()
            .enumerate()
            .filter(|(j, _)| *j != idx)
            .collect();
        // stable: ties stay in catalog order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored
            .into_iter()
            .take(top_n)
            .filter_map(|(j, score)| {
                catalog.get(j).map(|food| SimilarFood {
                    food_id: food.food_id.clone(),
                    food_name: food.food_name.clone(),
                    similarity: score,
                    calories: food.calories,
                    protein_g: food.protein_g,
                    diet_type: food.diet_type.clone(),
                })
            })
            .collect()
    }
}

#[inline]
fn simple_dot_product(vec1: &[Float], vec2: &[Float]) -> Float {
    vec1.iter().zip(vec2.iter()).map(|(a, b)| a * b).sum()
}

/// Normalize a vector to unit length. Zero vectors stay zero, so their
/// similarity to anything is 0.
pub fn normalize(vector: &[Float]) -> Vec<Float> {
    let norm_sq: Float = vector.iter().map(|&x| x * x).sum();
    if norm_sq == 0.0 {
        return vec![0.0; vector.len()];
    }
    let inv_norm = 1.0 / norm_sq.sqrt();
    vector.iter().map(|&x| x * inv_norm).collect()
}
