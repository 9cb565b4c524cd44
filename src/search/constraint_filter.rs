use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::catalog::{FoodCatalog, FoodItem, MealType, Season};

/// Maximum number of items returned by the last-resort cascade stages.
pub const FALLBACK_LIMIT: usize = 10;

/// A filtered view over the catalog, in catalog order.
pub type FoodSet<'a> = Vec<&'a FoodItem>;

/// Constraints for one filter request. Every field is optional; an empty
/// diet type or cuisine list counts as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub diet_type: Option<String>,
    pub meal_type: Option<MealType>,
    pub season: Option<Season>,
    pub cuisines: Option<Vec<String>>,
    pub allergens: Vec<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diet_type(mut self, diet_type: impl Into<String>) -> Self {
        self.diet_type = Some(diet_type.into());
        self
    }

    pub fn meal_type(mut self, meal_type: MealType) -> Self {
        self.meal_type = Some(meal_type);
        self
    }

    pub fn season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn cuisines<I, S>(mut self, cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cuisines = Some(cuisines.into_iter().map(Into::into).collect());
        self
    }

    pub fn allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergens = allergens.into_iter().map(Into::into).collect();
        self
    }

    fn active_diet(&self) -> Option<&str> {
        self.diet_type.as_deref().filter(|d| !d.is_empty())
    }

    fn active_cuisines(&self) -> Option<&[String]> {
        self.cuisines.as_deref().filter(|c| !c.is_empty())
    }
}

/// One step of the fallback cascade, tried in `CASCADE` order when the
/// constrained result is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relaxation {
    /// Re-filter without the cuisine constraint.
    DropCuisines,
    /// Re-filter without the meal-type constraint.
    DropMealType,
    /// Re-filter without the season constraint.
    DropSeason,
    /// Exact diet type and allergen exclusion over the full catalog.
    DietAndAllergensOnly,
    /// Allergen exclusion over the full catalog, first `FALLBACK_LIMIT` items.
    AllergensOnly,
    /// Random sample of the unfiltered catalog. Not deterministic unless seeded.
    RandomSample,
}

impl Relaxation {
    pub const CASCADE: [Relaxation; 6] = [
        Relaxation::DropCuisines,
        Relaxation::DropMealType,
        Relaxation::DropSeason,
        Relaxation::DietAndAllergensOnly,
        Relaxation::AllergensOnly,
        Relaxation::RandomSample,
    ];

    /// Criteria a re-filtering stage runs with: only the dropped constraint
    /// changes. `None` for stages that do not re-filter, or when the
    /// constraint was never set.
    pub fn relaxed(&self, criteria: &FilterCriteria) -> Option<FilterCriteria> {
        match self {
            Relaxation::DropCuisines => criteria.active_cuisines().map(|_| FilterCriteria {
                cuisines: None,
                ..criteria.clone()
            }),
            Relaxation::DropMealType => criteria.meal_type.map(|_| FilterCriteria {
                meal_type: None,
                ..criteria.clone()
            }),
            Relaxation::DropSeason => criteria.season.map(|_| FilterCriteria {
                season: None,
                ..criteria.clone()
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConstraintFilter<'a> {
    catalog: &'a FoodCatalog,
    seed: Option<u64>,
}

impl<'a> ConstraintFilter<'a> {
    pub fn new(catalog: &'a FoodCatalog) -> Self {
        Self {
            catalog,
            seed: None,
        }
    }

    /// Seeds the random-sample stage so its output is reproducible.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn catalog(&self) -> &'a FoodCatalog {
        self.catalog
    }

    /// Filters the catalog, relaxing constraints in `Relaxation::CASCADE`
    /// order until something is found.
    pub fn filter(&self, criteria: &FilterCriteria) -> FoodSet<'a> {
        let constrained = self.apply_constraints(criteria);
        if !constrained.is_empty() {
            return constrained;
        }

        for stage in Relaxation::CASCADE {
            if let Some(found) = self.relax(stage, criteria) {
                if !found.is_empty() {
                    debug!(?stage, count = found.len(), "Constraints relaxed");
                    return found;
                }
            }
        }
        constrained
    }

    /// Single pass over the constraints. Each narrowing step is skipped when
    /// it would leave nothing; allergen exclusion always applies.
    pub fn apply_constraints(&self, criteria: &FilterCriteria) -> FoodSet<'a> {
        let mut set: FoodSet<'a> = self.catalog.iter().collect();

        if let Some(diet) = criteria.active_diet() {
            set = match_diet_type(set, diet);
        }
        if let Some(meal) = criteria.meal_type {
            set = narrow(set, |item| item.is_suitable_for(meal));
        }
        if let Some(season) = criteria.season {
            set = narrow(set, |item| item.in_season(season));
        }
        if let Some(cuisines) = criteria.active_cuisines() {
            set = narrow(set, |item| cuisines.contains(&item.cuisine_type));
        }
        exclude_allergens(set, &criteria.allergens)
    }

    /// Result of one cascade stage, or `None` when the stage does not apply
    /// to these criteria.
    fn relax(&self, stage: Relaxation, criteria: &FilterCriteria) -> Option<FoodSet<'a>> {
        match stage {
            Relaxation::DropCuisines | Relaxation::DropMealType | Relaxation::DropSeason => {
                stage.relaxed(criteria).map(|relaxed| self.filter(&relaxed))
            }
            Relaxation::DietAndAllergensOnly => {
                let diet = criteria.active_diet()?;
                if criteria.allergens.is_empty() {
                    return None;
                }
                let set = self
                    .catalog
                    .iter()
                    .filter(|item| item.diet_type == diet)
                    .collect();
                Some(exclude_allergens(set, &criteria.allergens))
            }
            Relaxation::AllergensOnly => {
                let set = self.catalog.iter().collect();
                let mut set = exclude_allergens(set, &criteria.allergens);
                set.truncate(FALLBACK_LIMIT);
                Some(set)
            }
            Relaxation::RandomSample => {
                warn!(seed = ?self.seed, "No food satisfies the allergen constraints, sampling the catalog");
                Some(self.random_sample(FALLBACK_LIMIT))
            }
        }
    }

    fn random_sample(&self, amount: usize) -> FoodSet<'a> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.catalog
            .items()
            .choose_multiple(&mut rng, amount)
            .collect()
    }
}

/// Keeps items matching `keep`, unless none do.
fn narrow<'a>(set: FoodSet<'a>, keep: impl Fn(&FoodItem) -> bool) -> FoodSet<'a> {
    let narrowed: FoodSet<'a> = set.iter().copied().filter(|item| keep(*item)).collect();
    if narrowed.is_empty() {
        set
    } else {
        narrowed
    }
}

/// Exact match first, then case-insensitive, otherwise the constraint is ignored.
fn match_diet_type<'a>(set: FoodSet<'a>, diet: &str) -> FoodSet<'a> {
    let exact: FoodSet<'a> = set
        .iter()
        .copied()
        .filter(|item| item.diet_type == diet)
        .collect();
    if !exact.is_empty() {
        return exact;
    }
    let lowered = diet.to_lowercase();
    narrow(set, |item| item.diet_type.to_lowercase() == lowered)
}

/// Removes every item whose allergen text mentions any non-blank term.
pub fn exclude_allergens<'a>(set: FoodSet<'a>, allergens: &[String]) -> FoodSet<'a> {
    set.into_iter()
        .filter(|item| !allergens.iter().any(|term| item.contains_allergen(term)))
        .collect()
}
