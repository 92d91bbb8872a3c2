use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// A named mass entry in the recipe.
///
/// `id` is assigned once at creation and never reused; `name` is immutable
/// after creation (there is no rename operation). Only `weight_g` changes,
/// either directly (the edited entry) or proportionally (everything else).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub weight_g: f64,
}

/// Recipe key used when no explicit key is given. The CLI only ever operates
/// on this one; the store schema is keyed so the data layout doesn't need a
/// migration if that ever changes.
pub const DEFAULT_RECIPE: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub version: i64,
    pub exported_at: String,
    pub recipe: String,
    pub ingredients: Vec<Ingredient>,
}

pub const EXPORT_VERSION: i64 = 1;

/// Parse a weight in grams from user text. Accepts "250", "12.5", "250g".
///
/// The text must parse to a finite, strictly positive number. Failures are
/// explicit errors; an unparseable weight never flows into arithmetic.
pub fn parse_weight(s: &str) -> Result<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        bail!("Weight must not be blank");
    }
    let trimmed = trimmed
        .strip_suffix('g')
        .map_or(trimmed, str::trim_end);
    let value: f64 = match trimmed.parse() {
        Ok(v) => v,
        Err(_) => bail!("Invalid weight '{s}'. Use a number of grams like '250' or '12.5'"),
    };
    if !value.is_finite() {
        bail!("Invalid weight '{s}'. Must be a finite number");
    }
    if value <= 0.0 {
        bail!("Weight must be greater than 0");
    }
    Ok(value)
}

/// Validate an ingredient as stored or imported: non-blank name, positive
/// finite weight.
pub fn validate_ingredient(ingredient: &Ingredient) -> Result<()> {
    if ingredient.name.trim().is_empty() {
        bail!("Ingredient name must not be empty");
    }
    if !ingredient.weight_g.is_finite() {
        bail!(
            "Ingredient '{}' has a non-finite weight",
            ingredient.name
        );
    }
    if ingredient.weight_g <= 0.0 {
        bail!(
            "Ingredient '{}' weight must be greater than 0",
            ingredient.name
        );
    }
    Ok(())
}

/// Validate an imported ingredient list: every entry valid, ids unique.
pub fn validate_ingredient_list(ingredients: &[Ingredient]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for ingredient in ingredients {
        validate_ingredient(ingredient)?;
        if !seen.insert(ingredient.id) {
            bail!("Duplicate ingredient id {}", ingredient.id);
        }
    }
    Ok(())
}
