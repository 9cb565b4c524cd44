pub mod data_loader;
pub mod food_item;

pub use data_loader::load_food_catalog;
pub use food_item::{FoodItem, MealType, Season};

use crate::error::{RecommenderError, Result};
use std::collections::HashMap;

/// The ordered, read-only food database. Positions are stable for the
/// lifetime of the catalog and index the similarity matrix.
#[derive(Debug, Clone)]
pub struct FoodCatalog {
    items: Vec<FoodItem>,
    positions: HashMap<String, usize>,
}

impl FoodCatalog {
    pub fn new(items: Vec<FoodItem>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if positions.insert(item.food_id.clone(), idx).is_some() {
                return Err(RecommenderError::DuplicateFoodId(item.food_id.clone()));
            }
        }
        Ok(Self { items, positions })
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FoodItem> {
        self.items.iter()
    }

    pub fn get(&self, position: usize) -> Option<&FoodItem> {
        self.items.get(position)
    }

    pub fn position_of(&self, food_id: &str) -> Option<usize> {
        self.positions.get(food_id).copied()
    }

    pub fn find(&self, food_id: &str) -> Option<&FoodItem> {
        self.position_of(food_id).map(|idx| &self.items[idx])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::food_item::test_support::food;
    use super::*;

    #[test]
    fn test_duplicate_food_id_rejected() {
        let items = vec![
            food("1", "Vegan", "Thai", 100.0, 1.0),
            food("1", "Regular", "Greek", 200.0, 2.0),
        ];
        let err = FoodCatalog::new(items).unwrap_err();
        assert!(matches!(err, RecommenderError::DuplicateFoodId(id) if id == "1"));
    }

    #[test]
    fn test_lookup_by_id_keeps_order() {
        let catalog = FoodCatalog::new(vec![
            food("a", "Vegan", "Thai", 100.0, 1.0),
            food("b", "Regular", "Greek", 200.0, 2.0),
        ])
        .unwrap();
        assert_eq!(catalog.position_of("b"), Some(1));
        assert_eq!(catalog.find("a").map(|f| f.calories), Some(100.0));
        assert!(catalog.find("zzz").is_none());
        assert_eq!(catalog.len(), 2);
    }
}
