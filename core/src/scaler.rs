use anyhow::{Context, Result, bail};
use chrono::Utc;

use crate::models::{
    EXPORT_VERSION, ExportData, Ingredient, parse_weight, validate_ingredient_list,
};

/// Persistence seam for the ingredient list.
///
/// The CLI backs this with SQLite; tests can use the in-memory database.
/// `load` returns an empty list for an unknown recipe key.
pub trait IngredientStore {
    fn load(&self, recipe: &str) -> Result<Vec<Ingredient>>;
    fn save(&mut self, recipe: &str, ingredients: &[Ingredient]) -> Result<()>;
}

/// The single controller owning the authoritative in-memory ingredient list.
///
/// Loads the list from the store at startup and writes the full list back
/// after every successful mutation. All operations are synchronous; the list
/// is never mutated from outside `add`, `delete`, and `rescale`.
pub struct Rescaler<S: IngredientStore> {
    store: S,
    recipe: String,
    ingredients: Vec<Ingredient>,
}

impl<S: IngredientStore> Rescaler<S> {
    pub fn open(store: S, recipe: &str) -> Result<Self> {
        let ingredients = store.load(recipe)?;
        Ok(Self {
            store,
            recipe: recipe.to_string(),
            ingredients,
        })
    }

    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    #[must_use]
    pub fn total_weight_g(&self) -> f64 {
        self.ingredients.iter().map(|i| i.weight_g).sum()
    }

    /// Fresh id: current Unix time in milliseconds, bumped past the current
    /// maximum so two creations in the same millisecond stay distinct.
    fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let max = self.ingredients.iter().map(|i| i.id).max().unwrap_or(0);
        now.max(max + 1)
    }

    /// Append a new ingredient with a fresh id and save.
    ///
    /// The name must be non-blank and the weight text must parse to a
    /// positive finite number of grams.
    pub fn add(&mut self, name: &str, weight_text: &str) -> Result<&Ingredient> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Ingredient name must not be blank");
        }
        let weight_g = parse_weight(weight_text)?;

        let ingredient = Ingredient {
            id: self.next_id(),
            name: name.to_string(),
            weight_g,
        };
        self.ingredients.push(ingredient);
        self.store.save(&self.recipe, &self.ingredients)?;
        Ok(self.ingredients.last().context("list cannot be empty")?)
    }

    /// Remove the ingredient with `id` if present. Returns whether anything
    /// was removed; an absent id leaves the list and the store untouched.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let before = self.ingredients.len();
        self.ingredients.retain(|i| i.id != id);
        if self.ingredients.len() == before {
            return Ok(false);
        }
        self.store.save(&self.recipe, &self.ingredients)?;
        Ok(true)
    }

    /// Set one ingredient's weight and rescale every other ingredient by the
    /// same factor, preserving the recipe's ratios.
    ///
    /// With `old` the target's current weight and `new` the parsed text, the
    /// target gets exactly `new` and each other entry gets
    /// `weight_g * (new / old)`. A missing id or a non-positive baseline is
    /// rejected rather than letting a zero division poison every weight.
    pub fn rescale(&mut self, id: i64, weight_text: &str) -> Result<()> {
        let old = self
            .ingredients
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.weight_g)
            .with_context(|| format!("No ingredient with id {id}"))?;
        let new = parse_weight(weight_text)?;

        if !old.is_finite() || old <= 0.0 {
            bail!("Cannot rescale from a baseline weight of {old} g");
        }
        let ratio = new / old;

        for ingredient in &mut self.ingredients {
            if ingredient.id == id {
                ingredient.weight_g = new;
            } else {
                ingredient.weight_g *= ratio;
            }
        }
        self.store.save(&self.recipe, &self.ingredients)
    }

    /// Snapshot the current list as a versioned export payload.
    #[must_use]
    pub fn export(&self) -> ExportData {
        ExportData {
            version: EXPORT_VERSION,
            exported_at: Utc::now().to_rfc3339(),
            recipe: self.recipe.clone(),
            ingredients: self.ingredients.clone(),
        }
    }

    /// Replace the current list with an imported snapshot after validating
    /// it (non-blank names, positive finite weights, unique ids).
    pub fn import(&mut self, data: &ExportData) -> Result<usize> {
        if data.version > EXPORT_VERSION {
            bail!(
                "Unsupported export version {} (this build understands up to {EXPORT_VERSION})",
                data.version
            );
        }
        validate_ingredient_list(&data.ingredients)?;
        self.ingredients = data.ingredients.clone();
        self.store.save(&self.recipe, &self.ingredients)?;
        Ok(self.ingredients.len())
    }
}
