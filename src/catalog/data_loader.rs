use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::path::Path;

use super::{FoodCatalog, FoodItem};
use crate::error::{RecommenderError, Result};

// Required column headers
const ID_COL: &str = "food_id";
const NAME_COL: &str = "food_name";
const DIET_COL: &str = "diet_type";
const CUISINE_COL: &str = "cuisine_type";
const CALORIES_COL: &str = "calories";
const PROTEIN_COL: &str = "protein_g";
const FAT_COL: &str = "fat_g";
const CARBS_COL: &str = "carbs_g";
const ALLERGENS_COL: &str = "allergens";

const FLAG_COLS: [&str; 8] = [
    "suitable_breakfast",
    "suitable_lunch",
    "suitable_dinner",
    "suitable_snack",
    "spring",
    "summer",
    "fall",
    "winter",
];

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    s.parse::<f64>().ok()
}

/// Nutrient amounts must be finite and non-negative.
fn nutrient_value(value: f64, name: &str, raw: &str, row_index: usize) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(RecommenderError::InvalidCatalog(format!(
            "invalid {} '{}' at row {}: expected a non-negative number",
            name,
            raw.trim(),
            row_index
        )))
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "1.0" | "true" | "yes" | "y"
    )
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| RecommenderError::InvalidCatalog(format!("Column '{}' not found", name)))
}

/// Loads the food database CSV into an immutable catalog.
pub fn load_food_catalog(csv_path: &Path) -> Result<FoodCatalog> {
    if !csv_path.exists() {
        return Err(RecommenderError::unavailable(csv_path, "food catalog file not found"));
    }

    let file = std::fs::File::open(csv_path)
        .map_err(|e| RecommenderError::unavailable(csv_path, e))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr
        .headers()
        .map_err(|e| RecommenderError::InvalidCatalog(e.to_string()))?
        .clone();

    let id_idx = column(&headers, ID_COL)?;
    let name_idx = column(&headers, NAME_COL)?;
    let diet_idx = column(&headers, DIET_COL)?;
    let cuisine_idx = column(&headers, CUISINE_COL)?;
    let calories_idx = column(&headers, CALORIES_COL)?;
    let protein_idx = column(&headers, PROTEIN_COL)?;
    let fat_idx = column(&headers, FAT_COL)?;
    let carbs_idx = column(&headers, CARBS_COL)?;
    let allergens_idx = column(&headers, ALLERGENS_COL).ok();
    let flag_idx: Vec<Option<usize>> = FLAG_COLS
        .iter()
        .map(|name| column(&headers, name).ok())
        .collect();

    let known: Vec<usize> = [
        id_idx,
        name_idx,
        diet_idx,
        cuisine_idx,
        calories_idx,
        protein_idx,
        fat_idx,
        carbs_idx,
    ]
    .into_iter()
    .chain(allergens_idx)
    .chain(flag_idx.iter().flatten().copied())
    .collect();
    let extra_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !known.contains(idx))
        .map(|(idx, h)| (idx, h.trim().to_string()))
        .collect();

    let mut items = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            RecommenderError::InvalidCatalog(format!("failed to read row {}: {}", row_index, e))
        })?;

        let text = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        let number = |idx: usize, name: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("");
            let value = parse_number(raw).ok_or_else(|| {
                RecommenderError::InvalidCatalog(format!(
                    "non-numeric {} '{}' at row {}",
                    name, raw, row_index
                ))
            })?;
            nutrient_value(value, name, raw, row_index)
        };
        let flag = |pos: usize| {
            flag_idx[pos]
                .and_then(|idx| record.get(idx))
                .map(parse_flag)
                .unwrap_or(false)
        };

        let food_id = text(id_idx);
        if food_id.is_empty() {
            return Err(RecommenderError::InvalidCatalog(format!(
                "missing food_id at row {}",
                row_index
            )));
        }

        let mut extra_nutrients = BTreeMap::new();
        for (idx, name) in &extra_cols {
            let raw = record.get(*idx).unwrap_or("");
            // Text columns that happen to sit outside the known set are ignored.
            if let Some(value) = parse_number(raw) {
                extra_nutrients.insert(name.clone(), nutrient_value(value, name, raw, row_index)?);
            }
        }

        items.push(FoodItem {
            food_id,
            food_name: text(name_idx),
            diet_type: text(diet_idx),
            cuisine_type: text(cuisine_idx),
            calories: number(calories_idx, CALORIES_COL)?,
            protein_g: number(protein_idx, PROTEIN_COL)?,
            fat_g: number(fat_idx, FAT_COL)?,
            carbs_g: number(carbs_idx, CARBS_COL)?,
            suitable_breakfast: flag(0),
            suitable_lunch: flag(1),
            suitable_dinner: flag(2),
            suitable_snack: flag(3),
            spring: flag(4),
            summer: flag(5),
            fall: flag(6),
            winter: flag(7),
            allergens: allergens_idx
                .map(text)
                .filter(|s| !s.is_empty()),
            extra_nutrients,
        });
    }

    if items.is_empty() {
        return Err(RecommenderError::unavailable(csv_path, "no food rows loaded"));
    }

    FoodCatalog::new(items)
}
