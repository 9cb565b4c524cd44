pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod model_store;
pub mod plan_store;
pub mod planning;
pub mod profile;
pub mod search;

pub use engine::RecommenderContext;
pub use error::{RecommenderError, Result};
