pub mod constraint_filter;
pub mod feature_scaler;
pub mod similarity_index;

pub use constraint_filter::{ConstraintFilter, FilterCriteria, Relaxation};
pub use feature_scaler::{FeatureScaler, StandardScaler};
pub use similarity_index::{SimilarFood, SimilarityIndex, SimilarityMatrix};
